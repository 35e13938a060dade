//! WebSocket connection handlers.
//!
//! Each socket is bound to one (room, client) pair and subscribed to the room's
//! broadcast channel before the upgrade completes, so a client never misses
//! frames published after its handshake. Inbound frames are JSON
//! [`ClientAction`]s; their results are published to the whole room, while
//! malformed frames are answered on this socket only.
//!
//! Closing a socket leaves the room only if that socket's own enter admitted
//! the client, so a second socket under the same id cannot evict the first.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use noriai_shared::time::get_jst_timestamp;
use tokio::sync::{
    broadcast::{self, error::RecvError},
    mpsc,
};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    domain::{
        ChatMessage, ClientId, MessageContent, MessageSender, MessageType, RoomId, Timestamp,
    },
    infrastructure::dto::websocket::{ChatMessageDto, ClientAction},
    ui::state::{AppState, ConnectQuery},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> Domain Models
    let room_id = RoomId::try_from(room_id).map_err(|e| {
        tracing::warn!("Invalid room_id: {}", e);
        StatusCode::BAD_REQUEST
    })?;
    let client_id = ClientId::try_from(query.client_id).map_err(|e| {
        tracing::warn!("Invalid client_id: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let subscription = state.broadcaster.subscribe(&room_id);
    let span = tracing::info_span!(
        "ws",
        connection_id = %Uuid::new_v4(),
        room_id = %room_id,
        client_id = %client_id
    );

    Ok(ws.on_upgrade(move |socket| {
        handle_socket(socket, state, room_id, client_id, subscription).instrument(span)
    }))
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    room_id: RoomId,
    client_id: ClientId,
    mut subscription: broadcast::Receiver<String>,
) {
    tracing::info!("Client connected");
    let (mut sender, mut receiver) = socket.split();

    // Replies meant for this socket only
    let (direct_tx, mut direct_rx) = mpsc::unbounded_channel::<String>();
    // Whether the client is in the room through this socket
    let joined = Arc::new(AtomicBool::new(false));

    // Forward room broadcasts and direct replies to this client
    let mut send_task = tokio::spawn(
        async move {
            loop {
                // Direct replies go out before broadcasts that were published after them
                let frame = tokio::select! {
                    biased;
                    direct = direct_rx.recv() => match direct {
                        Some(frame) => frame,
                        None => break,
                    },
                    received = subscription.recv() => match received {
                        Ok(frame) => frame,
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!("Subscriber lagged, skipped {} frames", skipped);
                            continue;
                        }
                        Err(RecvError::Closed) => break,
                    },
                };

                if sender.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
        }
        .in_current_span(),
    );

    // Dispatch actions received from this client
    let recv_state = state.clone();
    let recv_room_id = room_id.clone();
    let recv_client_id = client_id.clone();
    let recv_joined = joined.clone();
    let mut recv_task = tokio::spawn(
        async move {
            while let Some(msg) = receiver.next().await {
                let msg = match msg {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::error!("WebSocket error: {}", e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => dispatch(
                        &recv_state,
                        &recv_room_id,
                        &recv_client_id,
                        text.as_str(),
                        &direct_tx,
                        &recv_joined,
                    ),
                    Message::Close(_) => {
                        tracing::info!("Client requested close");
                        break;
                    }
                    // Ping/pong is handled automatically by the WebSocket protocol
                    _ => {}
                }
            }
        }
        .in_current_span(),
    );

    // If any one of the tasks completes, abort the other and wait for it,
    // so the subscription is dropped before the channel is released
    tokio::select! {
        _ = &mut recv_task => {
            send_task.abort();
            let _ = send_task.await;
        }
        _ = &mut send_task => {
            recv_task.abort();
            let _ = recv_task.await;
        }
    };

    // A closed socket counts as leaving the room it joined
    if joined.load(Ordering::SeqCst)
        && let Some(message) = state.chat_service.leave(room_id.clone(), client_id)
    {
        publish(&state, &message);
    }
    state.broadcaster.release(&room_id);
    tracing::info!("Client disconnected");
}

/// Run one client action against the chat service and publish its result
fn dispatch(
    state: &AppState,
    room_id: &RoomId,
    client_id: &ClientId,
    text: &str,
    direct_tx: &mpsc::UnboundedSender<String>,
    joined: &AtomicBool,
) {
    let action = match serde_json::from_str::<ClientAction>(text) {
        Ok(action) => action,
        Err(e) => {
            tracing::warn!("Failed to parse client action: {}", e);
            reply_error(direct_tx, room_id, format!("invalid action: {e}"));
            return;
        }
    };

    match action {
        ClientAction::Enter => {
            let result = state
                .chat_service
                .enter(room_id.clone(), client_id.clone());
            match &result.outcome {
                Ok(()) => joined.store(true, Ordering::SeqCst),
                Err(e) => tracing::info!("Enter rejected: {}", e.code()),
            }
            // Duplicate enters carry no message
            if let Some(message) = result.message {
                publish(state, &message);
            }
        }
        ClientAction::Send { content } => {
            let content = match MessageContent::try_from(content) {
                Ok(content) => content,
                Err(e) => {
                    tracing::warn!("Invalid message content: {}", e);
                    reply_error(direct_tx, room_id, e.to_string());
                    return;
                }
            };
            let result = state
                .chat_service
                .send(room_id.clone(), client_id.clone(), content);
            if let Err(e) = &result.outcome {
                tracing::info!("Send rejected: {}", e.code());
            }
            publish(state, &result.message);
        }
        ClientAction::Leave => {
            joined.store(false, Ordering::SeqCst);
            if let Some(message) = state.chat_service.leave(room_id.clone(), client_id.clone()) {
                publish(state, &message);
            }
        }
    }
}

fn publish(state: &AppState, message: &ChatMessage) {
    let Some(frame) = encode(message) else {
        return;
    };
    let delivered = state.broadcaster.publish(&message.room_id, frame);
    tracing::debug!(
        "Published {} from '{}' to {} subscribers",
        message.message_type,
        message.sender,
        delivered
    );
}

fn reply_error(direct_tx: &mpsc::UnboundedSender<String>, room_id: &RoomId, content: String) {
    let message = ChatMessage::new(
        room_id.clone(),
        MessageSender::System,
        content,
        MessageType::Error,
        Timestamp::new(get_jst_timestamp()),
    );
    if let Some(frame) = encode(&message)
        && direct_tx.send(frame).is_err()
    {
        tracing::warn!("Failed to reply to client, socket already closed");
    }
}

fn encode(message: &ChatMessage) -> Option<String> {
    match serde_json::to_string(&ChatMessageDto::from(message)) {
        Ok(frame) => Some(frame),
        Err(e) => {
            tracing::error!("Failed to serialize message: {}", e);
            None
        }
    }
}
