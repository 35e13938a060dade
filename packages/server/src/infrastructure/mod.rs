//! Infrastructure layer: concrete implementations of domain traits and
//! transport-facing plumbing.

pub mod broadcast;
pub mod clock;
pub mod dto;
pub mod repository;

pub use broadcast::RoomBroadcaster;
pub use clock::SystemClock;
pub use repository::InMemoryRoomRepository;
