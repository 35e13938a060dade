//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! ルームごとに Mutex を持つ HashMap をインメモリ DB として使用します。
//!
//! ## ロックの粒度
//!
//! ```text
//! RwLock<HashMap<RoomId, Arc<Mutex<Room>>>>
//!   └─ 書き込みロックは未知の RoomId を登録するときだけ
//!        └─ Room ごとの Mutex で参加者の追加・削除とその通知の追記を 1 つの区間で直列化
//! ```
//!
//! 別々のルームに対する操作は互いにブロックしません。

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock},
};

use crate::domain::{
    Admission, ChatMessage, ClientId, EntryNotices, Room, RoomId, RoomRepository,
};

/// インメモリ Room Repository 実装
///
/// プロセスの生存期間中すべてのルームを保持します（削除・期限切れなし）。
#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: RwLock<HashMap<RoomId, Arc<Mutex<Room>>>>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, room_id: &RoomId) -> Option<Arc<Mutex<Room>>> {
        let rooms = self.rooms.read().unwrap_or_else(PoisonError::into_inner);
        rooms.get(room_id).cloned()
    }

    /// 既存のルームを返すか、なければ作成して登録する
    ///
    /// 同じ RoomId への初回アクセスが競合しても、登録されるのは 1 つだけ。
    fn get_or_create(&self, room_id: &RoomId) -> Arc<Mutex<Room>> {
        if let Some(room) = self.find(room_id) {
            return room;
        }

        let mut rooms = self.rooms.write().unwrap_or_else(PoisonError::into_inner);
        rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::debug!("Room '{}' created", room_id);
                Arc::new(Mutex::new(Room::new(room_id.clone())))
            })
            .clone()
    }
}

/// Room のロックを取得する
///
/// Room への変更はすべて 1 ステップで完了するため、
/// poison されたロックでも中身の整合性は保たれている。
fn lock(room: &Mutex<Room>) -> MutexGuard<'_, Room> {
    room.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RoomRepository for InMemoryRoomRepository {
    fn enter(&self, room_id: &RoomId, client_id: ClientId, notices: EntryNotices) -> Admission {
        let room = self.get_or_create(room_id);
        let mut room = lock(&room);
        room.enter(client_id, notices)
    }

    fn leave(
        &self,
        room_id: &RoomId,
        client_id: &ClientId,
        notice: ChatMessage,
    ) -> Option<ChatMessage> {
        let room = self.find(room_id)?;
        let mut room = lock(&room);
        room.leave(client_id, notice)
    }

    fn append_message(&self, message: ChatMessage) {
        let room = self.get_or_create(&message.room_id);
        lock(&room).add_message(message);
    }

    fn contains_room(&self, room_id: &RoomId) -> bool {
        self.find(room_id).is_some()
    }

    fn participants(&self, room_id: &RoomId) -> Vec<ClientId> {
        self.find(room_id)
            .map(|room| lock(&room).participants())
            .unwrap_or_default()
    }

    fn history(&self, room_id: &RoomId) -> Vec<ChatMessage> {
        self.find(room_id)
            .map(|room| lock(&room).messages().to_vec())
            .unwrap_or_default()
    }

    fn room_ids(&self) -> Vec<RoomId> {
        let rooms = self.rooms.read().unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<RoomId> = rooms.keys().cloned().collect();
        ids.sort();
        ids
    }
}
