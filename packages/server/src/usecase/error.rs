//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{ChannelId, EncodeError, RegistryError, RepositoryError, UserId};

/// セッション開始のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenSessionError {
    /// 同時接続数の上限に達している
    #[error("connection capacity exhausted (max {max})")]
    CapacityExhausted { max: usize },

    /// レジストリの不変条件違反
    #[error("registry rejected the connection: {0}")]
    Registry(RegistryError),
}

impl From<RegistryError> for OpenSessionError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::CapacityExhausted { max } => Self::CapacityExhausted { max },
            other => Self::Registry(other),
        }
    }
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// 送信者がチャンネルのメンバーではない
    #[error("user {user_id} is not a member of channel {channel_id}")]
    AuthorizationFailure {
        channel_id: ChannelId,
        user_id: UserId,
    },

    #[error("channel {0} not found")]
    ChannelNotFound(ChannelId),

    #[error("user {0} not found")]
    ReceiverNotFound(UserId),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for SendMessageError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ChannelNotFound(channel_id) => Self::ChannelNotFound(channel_id),
            RepositoryError::UserNotFound(user_id) => Self::ReceiverNotFound(user_id),
            other => Self::Repository(other),
        }
    }
}

/// チャンネル・メンバーシップ操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("channel {0} not found")]
    ChannelNotFound(ChannelId),

    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// 操作する権限がない
    #[error("user {user_id} is not allowed to modify channel {channel_id}")]
    AuthorizationFailure {
        channel_id: ChannelId,
        user_id: UserId,
    },

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

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ChannelError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ChannelNotFound(channel_id) => Self::ChannelNotFound(channel_id),
            RepositoryError::UserNotFound(user_id) => Self::UserNotFound(user_id),
            RepositoryError::AlreadyMember {
                channel_id,
                user_id,
            } => Self::AlreadyMember {
                channel_id,
                user_id,
            },
            RepositoryError::NotMember {
                channel_id,
                user_id,
            } => Self::NotMember {
                channel_id,
                user_id,
            },
            RepositoryError::LastAdmin(channel_id) => Self::LastAdmin(channel_id),
            other => Self::Repository(other),
        }
    }
}

/// 通知のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("channel {0} not found")]
    ChannelNotFound(ChannelId),

    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// 通知を送る側がチャンネルのメンバーではない
    #[error("user {user_id} is not a member of channel {channel_id}")]
    AuthorizationFailure {
        channel_id: ChannelId,
        user_id: UserId,
    },

    #[error("notification {0} not found")]
    NotFound(u64),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for NotificationError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::ChannelNotFound(channel_id) => Self::ChannelNotFound(channel_id),
            RepositoryError::UserNotFound(user_id) => Self::UserNotFound(user_id),
            RepositoryError::NotificationNotFound(id) => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

/// ユーザー操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("user {0} not found")]
    NotFound(UserId),

    /// 自分以外のユーザーを更新しようとした
    #[error("user {actor} cannot modify user {target}")]
    AuthorizationFailure { actor: UserId, target: UserId },

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for UserError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::UserNotFound(user_id) => Self::NotFound(user_id),
            other => Self::Repository(other),
        }
    }
}
