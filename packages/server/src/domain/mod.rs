//! Domain layer for the chat application.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod clock;
pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use clock::Clock;
pub use entity::{Admission, ChatMessage, EntryNotices, MAX_PARTICIPANTS, Room};
pub use error::{RoomError, ValueObjectError};
pub use factory::ChatMessageFactory;
pub use repository::RoomRepository;
pub use value_object::{
    ClientId, MessageContent, MessageSender, MessageType, RoomId, SYSTEM_SENDER, Timestamp,
};

#[cfg(test)]
pub use clock::MockClock;
#[cfg(test)]
pub use repository::MockRoomRepository;
