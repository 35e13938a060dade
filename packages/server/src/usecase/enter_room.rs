//! UseCase: 入室処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - EnterRoomUseCase::execute() メソッド
//! - 入室成功・満員・重複入室それぞれで記録されるメッセージ
//!
//! ### なぜこのテストが必要か
//! - 満員による拒否も監査用に履歴へ残す必要がある
//! - 重複入室は満員と区別し、通知も出さない
//!
//! ### どのような状況を想定しているか
//! - 正常系：空きのあるルームへの入室
//! - 異常系：満員のルームへの入室
//! - エッジケース：同じクライアントの再入室

use std::sync::Arc;

use crate::domain::{
    ChatMessage, ChatMessageFactory, ClientId, Clock, RoomError, RoomId, RoomRepository,
};

use super::error::EnterError;

/// 入室の結果
///
/// `message` は記録済みで、ルームの購読者全員に配信すべきメッセージ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnterResult {
    pub outcome: Result<(), EnterError>,
    pub message: Option<ChatMessage>,
}

impl EnterResult {
    pub fn is_joined(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// 入室のユースケース
pub struct EnterRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    clock: Arc<dyn Clock>,
}

impl EnterRoomUseCase {
    /// 新しい EnterRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// 入室を実行
    ///
    /// 人数確認・追加・通知の記録は Repository の 1 回の呼び出しで原子的に行われる。
    /// 通知は先に両方を組み立て、Repository が結果に応じて 1 つだけ記録する。
    ///
    /// # Returns
    ///
    /// * `Ok(())` + ENTER メッセージ - 入室成功
    /// * `Err(EnterError::RoomFull)` + ERROR メッセージ - 満員（履歴にも記録）
    /// * `Err(EnterError::AlreadyJoined)` + なし - 参加済み（何も記録しない）
    pub fn execute(&self, room_id: RoomId, client_id: ClientId) -> EnterResult {
        let notices =
            ChatMessageFactory::entry_notices(room_id.clone(), &client_id, self.clock.now());
        let admission = self.repository.enter(&room_id, client_id.clone(), notices);

        let outcome = match admission.outcome {
            Ok(()) => {
                tracing::info!("Client '{}' entered room '{}'", client_id, room_id);
                Ok(())
            }
            Err(RoomError::AlreadyParticipating(_)) => {
                tracing::info!(
                    "Client '{}' is already in room '{}', ignoring enter",
                    client_id,
                    room_id
                );
                Err(EnterError::AlreadyJoined)
            }
            Err(RoomError::CapacityExceeded { capacity, current }) => {
                tracing::warn!(
                    "Room '{}' is full ({}/{}), rejecting '{}'",
                    room_id,
                    current,
                    capacity,
                    client_id
                );
                Err(EnterError::RoomFull)
            }
        };

        EnterResult {
            outcome,
            message: admission.recorded,
        }
    }
}
