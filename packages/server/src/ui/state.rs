//! Server state.

use std::sync::Arc;

use serde::Deserialize;

use crate::{
    infrastructure::{InMemoryRoomRepository, RoomBroadcaster, SystemClock},
    usecase::ChatService,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub client_id: String,
}

/// Shared application state
pub struct AppState {
    /// Core operations (enter, leave, send, queries)
    pub chat_service: ChatService,
    /// Per-room fan-out to connected sockets
    pub broadcaster: RoomBroadcaster,
}

impl AppState {
    pub fn new(chat_service: ChatService) -> Self {
        Self {
            chat_service,
            broadcaster: RoomBroadcaster::new(),
        }
    }

    /// Memory-only rooms stamped with the wall clock
    pub fn in_memory() -> Self {
        Self::new(ChatService::new(
            Arc::new(InMemoryRoomRepository::new()),
            Arc::new(SystemClock),
        ))
    }
}
