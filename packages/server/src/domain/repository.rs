//! Repository trait for room state.
//!
//! The domain layer owns this abstraction; the infrastructure layer provides
//! the implementation (dependency inversion).

use super::{
    entity::{Admission, ChatMessage, EntryNotices},
    value_object::{ClientId, RoomId},
};

/// Registry of rooms keyed by room id.
///
/// Rooms are created lazily by the mutating methods and never destroyed.
/// Every method is atomic with respect to other calls on the same room;
/// calls on different rooms do not contend.
#[cfg_attr(test, mockall::automock)]
pub trait RoomRepository: Send + Sync {
    /// Add a client to the room, creating the room first if needed.
    ///
    /// The membership and capacity checks, the insertion and the append of the
    /// applicable notice happen in one critical section.
    fn enter(&self, room_id: &RoomId, client_id: ClientId, notices: EntryNotices) -> Admission;

    /// Remove a client from the room and append `notice` in the same critical
    /// section. Returns the notice when the client was a member.
    ///
    /// Never creates a room.
    fn leave(
        &self,
        room_id: &RoomId,
        client_id: &ClientId,
        notice: ChatMessage,
    ) -> Option<ChatMessage>;

    /// Append to the history of the message's room, creating the room if needed.
    fn append_message(&self, message: ChatMessage);

    /// Whether the room has been created.
    fn contains_room(&self, room_id: &RoomId) -> bool;

    /// Current participants, sorted. Empty for an unknown room.
    fn participants(&self, room_id: &RoomId) -> Vec<ClientId>;

    /// Message history in append order. Empty for an unknown room.
    fn history(&self, room_id: &RoomId) -> Vec<ChatMessage>;

    /// All known room ids, sorted.
    fn room_ids(&self) -> Vec<RoomId>;
}
