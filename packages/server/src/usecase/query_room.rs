//! UseCase: ルーム状態の参照

use std::sync::Arc;

use crate::domain::{ChatMessage, ClientId, RoomId, RoomRepository};

/// ルーム一覧の 1 行分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub participants: Vec<ClientId>,
    pub message_count: usize,
}

/// ルーム状態参照のユースケース
///
/// 未知のルームに対しては常に空を返す。
pub struct QueryRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl QueryRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// メッセージ履歴（記録順）
    pub fn history(&self, room_id: &RoomId) -> Vec<ChatMessage> {
        self.repository.history(room_id)
    }

    /// 現在の参加者（ID 順）
    pub fn participants(&self, room_id: &RoomId) -> Vec<ClientId> {
        self.repository.participants(room_id)
    }

    /// 作成済みの全ルーム（ID 順）
    pub fn list_rooms(&self) -> Vec<RoomSummary> {
        self.repository
            .room_ids()
            .into_iter()
            .map(|id| RoomSummary {
                participants: self.repository.participants(&id),
                message_count: self.repository.history(&id).len(),
                id,
            })
            .collect()
    }
}
