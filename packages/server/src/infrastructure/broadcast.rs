//! Per-room fan-out of published messages.
//!
//! Each room gets its own tokio broadcast channel the first time somebody
//! subscribes to it, and loses it again once the last subscriber is released.
//! Publishing to a room without subscribers is a no-op.

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use tokio::sync::broadcast;

use crate::domain::RoomId;

/// Maximum number of frames buffered per room before slow subscribers lag.
pub const CHANNEL_CAPACITY: usize = 100;

/// Registry of per-room broadcast channels carrying serialized frames.
#[derive(Default)]
pub struct RoomBroadcaster {
    channels: RwLock<HashMap<RoomId, broadcast::Sender<String>>>,
}

impl RoomBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to every frame published to the room from now on.
    pub fn subscribe(&self, room_id: &RoomId) -> broadcast::Receiver<String> {
        {
            let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(sender) = channels.get(room_id) {
                return sender.subscribe();
            }
        }

        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        channels
            .entry(room_id.clone())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish a frame to the room's current subscribers.
    ///
    /// Returns the number of subscribers the frame was handed to.
    pub fn publish(&self, room_id: &RoomId, frame: String) -> usize {
        let channels = self.channels.read().unwrap_or_else(PoisonError::into_inner);
        match channels.get(room_id) {
            // Err only means nobody is subscribed right now
            Some(sender) => sender.send(frame).unwrap_or(0),
            None => 0,
        }
    }

    /// Drop the room's channel if no receiver is left.
    ///
    /// Call after the caller's own receiver has been dropped. Returns whether
    /// the channel was removed.
    pub fn release(&self, room_id: &RoomId) -> bool {
        let mut channels = self.channels.write().unwrap_or_else(PoisonError::into_inner);
        let unused = channels
            .get(room_id)
            .is_some_and(|sender| sender.receiver_count() == 0);
        if unused {
            channels.remove(room_id);
            tracing::debug!("Broadcast channel for room '{}' released", room_id);
        }
        unused
    }
}
