//! Test fixtures shared by the integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use noriai_server::ui::{serve, state::AppState};
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type TestSocket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// In-process server on an ephemeral port, stopped on drop
pub struct TestServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let handle = tokio::spawn(async move {
            serve(listener, Arc::new(AppState::in_memory()))
                .await
                .expect("Server failed");
        });
        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, room_id: &str, client_id: &str) -> String {
        format!("ws://{}/ws/rooms/{}?client_id={}", self.addr, room_id, client_id)
    }

    /// Open a room socket for the client
    pub async fn connect(&self, room_id: &str, client_id: &str) -> TestSocket {
        let (socket, _response) = connect_async(self.ws_url(room_id, client_id))
            .await
            .expect("Failed to connect WebSocket");
        socket
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn send_action(socket: &mut TestSocket, action: serde_json::Value) {
    socket
        .send(Message::text(action.to_string()))
        .await
        .expect("Failed to send action");
}

/// Next JSON text frame, failing after 5 seconds
pub async fn next_frame(socket: &mut TestSocket) -> serde_json::Value {
    let wait = async {
        loop {
            let msg = socket
                .next()
                .await
                .expect("Socket closed")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
        }
    };
    tokio::time::timeout(Duration::from_secs(5), wait)
        .await
        .expect("Timed out waiting for frame")
}

/// Connect and enter, consuming the client's own ENTER frame
pub async fn join(server: &TestServer, room_id: &str, client_id: &str) -> TestSocket {
    let mut socket = server.connect(room_id, client_id).await;
    send_action(&mut socket, serde_json::json!({"action": "enter"})).await;
    let frame = next_frame(&mut socket).await;
    assert_eq!(frame["type"], "ENTER", "unexpected frame: {frame}");
    socket
}
