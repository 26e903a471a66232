//! ドメイン層のエラー定義

use thiserror::Error;

use super::value_object::{ChannelId, ConnectionId, UserId};

/// Value Object の生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("user id must be a positive integer")]
    InvalidUserId,

    #[error("channel id must be a positive integer")]
    InvalidChannelId,

    #[error("message content must not be empty")]
    EmptyMessageContent,

    #[error("message content is too long ({actual} chars, max {max})")]
    MessageContentTooLong { max: usize, actual: usize },

    #[error("name must not be empty")]
    EmptyName,

    #[error("name is too long (max {max} chars)")]
    NameTooLong { max: usize },
}

/// 接続レジストリのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// 同じ接続を二重に登録しようとした（不変条件違反）
    #[error("connection {0} is already registered")]
    AlreadyRegistered(ConnectionId),

    /// 接続の所有者と登録先のユーザーが一致しない（不変条件違反）
    #[error("connection {connection_id} belongs to user {owner}, not user {requested}")]
    OwnerMismatch {
        connection_id: ConnectionId,
        owner: UserId,
        requested: UserId,
    },

    /// 新しい接続を受け付けられない
    #[error("connection capacity exhausted (max {max})")]
    CapacityExhausted { max: usize },
}

/// データストアのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("user {0} not found")]
    UserNotFound(UserId),

    #[error("channel {0} not found")]
    ChannelNotFound(ChannelId),

    #[error("user {user_id} is already a member of channel {channel_id}")]
    AlreadyMember {
        channel_id: ChannelId,
        user_id: UserId,
    },

    #[error("user {user_id} is not a member of channel {channel_id}")]
    NotMember {
        channel_id: ChannelId,
        user_id: UserId,
    },

    /// 最後の管理者を降格・削除しようとした
    #[error("channel {0} must keep at least one admin")]
    LastAdmin(ChannelId),

    #[error("notification {0} not found")]
    NotificationNotFound(u64),
}

/// 認証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing bearer credential")]
    MissingCredential,

    #[error("invalid bearer credential")]
    InvalidCredential,
}

/// 個々の接続への送信エラー
///
/// ブロードキャストでは接続単位で吸収され、呼び出し元には伝播しません。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("connection {0} is closed")]
    Closed(ConnectionId),

    #[error("send to connection {0} timed out")]
    Timeout(ConnectionId),
}

/// ペイロードのエンコードエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to encode payload: {0}")]
pub struct EncodeError(pub String);
