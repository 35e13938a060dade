//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 誰も入室したことのないルームへの送信は失敗し、ルームも作られない
//! - 送信者が現在の参加者かどうかは確認しない（従来の挙動を維持）
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存ルームへの送信
//! - 異常系：未知のルームへの送信

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ChatMessageFactory, ClientId, Clock, MessageContent, RoomId, RoomRepository,
};

use super::error::SendMessageError;

/// 送信の結果
///
/// 失敗時の `message` は配信用の ERROR 通知で、履歴には記録されない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    pub outcome: Result<(), SendMessageError>,
    pub message: ChatMessage,
}

impl SendResult {
    pub fn is_delivered(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room_id` - 送信先ルーム
    /// * `from_client_id` - 送信者（参加中かどうかは問わない）
    /// * `content` - メッセージ内容
    pub fn execute(
        &self,
        room_id: RoomId,
        from_client_id: ClientId,
        content: MessageContent,
    ) -> SendResult {
        let timestamp = self.clock.now();

        if !self.repository.contains_room(&room_id) {
            tracing::warn!(
                "Client '{}' sent to unknown room '{}'",
                from_client_id,
                room_id
            );
            return SendResult {
                outcome: Err(SendMessageError::RoomNotFound),
                message: ChatMessageFactory::room_not_found(room_id, timestamp),
            };
        }

        let message = ChatMessageFactory::talk(room_id, from_client_id, content, timestamp);
        self.repository.append_message(message.clone());
        tracing::debug!(
            "Recorded message from '{}' in room '{}'",
            message.sender,
            message.room_id
        );

        SendResult {
            outcome: Ok(()),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageSender, MessageType, MockClock, MockRoomRepository, Timestamp};

    fn room_id() -> RoomId {
        RoomId::new("taxi".to_string()).unwrap()
    }

    fn bob() -> ClientId {
        ClientId::new("bob".to_string()).unwrap()
    }

    fn hi() -> MessageContent {
        MessageContent::new("hi".to_string()).unwrap()
    }

    fn fixed_clock() -> Arc<MockClock> {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(Timestamp::new(4000));
        Arc::new(clock)
    }

    #[test]
    fn test_send_message_success() {
        // テスト項目: 既存ルームへの送信で TALK メッセージが記録される
        // given (前提条件):
        let mut repository = MockRoomRepository::new();
        repository.expect_contains_room().return_const(true);
        repository
            .expect_append_message()
            .withf(|m| m.message_type == MessageType::Talk && m.content == "hi")
            .times(1)
            .return_const(());
        let usecase = SendMessageUseCase::new(Arc::new(repository), fixed_clock());

        // when (操作):
        let result = usecase.execute(room_id(), bob(), hi());

        // then (期待する結果):
        assert!(result.is_delivered());
        assert_eq!(result.message.sender, MessageSender::Client(bob()));
        assert_eq!(result.message.timestamp, Timestamp::new(4000));
    }

    #[test]
    fn test_send_message_room_not_found() {
        // テスト項目: 未知のルームへの送信は ROOM_NOT_FOUND で、履歴に記録しない
        // given (前提条件):
        let mut repository = MockRoomRepository::new();
        repository.expect_contains_room().return_const(false);
        repository.expect_append_message().never();
        let usecase = SendMessageUseCase::new(Arc::new(repository), fixed_clock());

        // when (操作):
        let result = usecase.execute(room_id(), bob(), hi());

        // then (期待する結果):
        assert_eq!(result.outcome, Err(SendMessageError::RoomNotFound));
        assert_eq!(result.message.message_type, MessageType::Error);
        assert_eq!(
            result.message.content,
            "message delivery failed: room not found"
        );
        assert!(result.message.sender.is_system());
    }
}
