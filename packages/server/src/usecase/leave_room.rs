//! UseCase: 退室処理

use std::sync::Arc;

use crate::domain::{ChatMessage, ChatMessageFactory, ClientId, Clock, RoomId, RoomRepository};

/// 退室のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl LeaveRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 退室を実行
    ///
    /// 参加者だった場合のみ LEAVE メッセージを記録して返す。
    /// 削除と記録は Repository の 1 回の呼び出しで行われる。
    /// 参加していないクライアントの退室は何もしない（冪等）。
    pub fn execute(&self, room_id: RoomId, client_id: ClientId) -> Option<ChatMessage> {
        let notice = ChatMessageFactory::left(room_id.clone(), &client_id, self.clock.now());
        let Some(message) = self.repository.leave(&room_id, &client_id, notice) else {
            tracing::debug!(
                "Client '{}' is not in room '{}', nothing to leave",
                client_id,
                room_id
            );
            return None;
        };

        tracing::info!("Client '{}' left room '{}'", client_id, room_id);
        Some(message)
    }
}
