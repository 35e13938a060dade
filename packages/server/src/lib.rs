//! Ephemeral group chat rooms.
//!
//! Bounded-capacity rooms with ordered message history and system notices,
//! served to WebSocket clients with per-room broadcast.
//!
//! Layers, bottom-up: `domain` (entities, value objects, repository and clock
//! traits), `infrastructure` (in-memory room registry, wall clock, broadcast
//! fan-out, DTOs), `usecase` (one use case per operation plus the
//! [`usecase::ChatService`] facade) and `ui` (axum handlers and runner).

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::{ServerArgs, ServerConfig};
pub use error::ServerError;
pub use ui::run as run_server;
