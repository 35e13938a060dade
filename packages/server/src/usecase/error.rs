//! UseCase 層のエラー定義
//!
//! どれも呼び出し側への構造化された結果であり、サービス自体は
//! 失敗後もそのまま利用できます。

use thiserror::Error;

/// 入室に失敗した理由
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnterError {
    /// 満員
    #[error("room is full")]
    RoomFull,

    /// すでに参加している
    #[error("client has already joined the room")]
    AlreadyJoined,
}

impl EnterError {
    /// クライアントに返す安定したエラーコード
    pub fn code(&self) -> &'static str {
        match self {
            EnterError::RoomFull => "ROOM_FULL",
            EnterError::AlreadyJoined => "ALREADY_JOINED",
        }
    }
}

/// メッセージ送信に失敗した理由
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// 誰も入室したことのないルーム
    #[error("room not found")]
    RoomNotFound,
}

impl SendMessageError {
    pub fn code(&self) -> &'static str {
        match self {
            SendMessageError::RoomNotFound => "ROOM_NOT_FOUND",
        }
    }
}
