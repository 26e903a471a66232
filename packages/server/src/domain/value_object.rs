//! Value Object 定義
//!
//! ID やメッセージ本文など、生成時に検証されるドメインの値を定義します。
//! 生成後は不変であり、不正な値は型として存在しません。

use std::{fmt, num::NonZeroU64};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// メッセージ本文の最大文字数
pub const MESSAGE_CONTENT_MAX_CHARS: usize = 4096;

/// ユーザー名・チャンネル名の最大文字数
pub const NAME_MAX_CHARS: usize = 64;

/// ユーザー ID（外部で認証済みの不透明な整数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(NonZeroU64);

impl UserId {
    /// 新しい UserId を作成（0 は不正）
    pub fn new(value: u64) -> Result<Self, ValueObjectError> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or(ValueObjectError::InvalidUserId)
    }

    pub fn value(&self) -> u64 {
        self.0.get()
    }
}

impl From<NonZeroU64> for UserId {
    fn from(value: NonZeroU64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// チャンネル ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(NonZeroU64);

impl ChannelId {
    /// 新しい ChannelId を作成（0 は不正）
    pub fn new(value: u64) -> Result<Self, ValueObjectError> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or(ValueObjectError::InvalidChannelId)
    }

    pub fn value(&self) -> u64 {
        self.0.get()
    }
}

impl From<NonZeroU64> for ChannelId {
    fn from(value: NonZeroU64) -> Self {
        Self(value)
    }
}

impl TryFrom<u64> for ChannelId {
    type Error = ValueObjectError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 接続 ID
///
/// 1 つのトランスポート接続を識別します。再接続すると必ず新しい ID になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// ランダムな接続 ID を生成
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// メッセージ本文
///
/// 前後の空白を除いて空でなく、[`MESSAGE_CONTENT_MAX_CHARS`] 文字以内であること。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent(String);

impl MessageContent {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyMessageContent);
        }
        let chars = value.chars().count();
        if chars > MESSAGE_CONTENT_MAX_CHARS {
            return Err(ValueObjectError::MessageContentTooLong {
                max: MESSAGE_CONTENT_MAX_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// ユーザー名・チャンネル名などの表示名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX_CHARS {
            return Err(ValueObjectError::NameTooLong {
                max: NAME_MAX_CHARS,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
