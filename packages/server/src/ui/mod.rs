//! WebSocket / HTTP transport for the chat service.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{build_router, run, serve};
