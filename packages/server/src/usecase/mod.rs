//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod chat_service;
pub mod enter_room;
pub mod error;
pub mod leave_room;
pub mod query_room;
pub mod send_message;

pub use chat_service::ChatService;
pub use enter_room::{EnterResult, EnterRoomUseCase};
pub use error::{EnterError, SendMessageError};
pub use leave_room::LeaveRoomUseCase;
pub use query_room::{QueryRoomUseCase, RoomSummary};
pub use send_message::{SendMessageUseCase, SendResult};
