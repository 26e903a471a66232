//! Entity 定義

use serde::{Deserialize, Serialize};

use super::value_object::{ChannelId, DisplayName, MessageContent, Timestamp, UserId};

/// ユーザー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
}

/// チャンネル
///
/// メンバーシップはチャンネルディレクトリが管理し、エンティティには含めません。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: DisplayName,
    pub creator: UserId,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
}

/// チャンネル内の役割
///
/// 作成者は `Admin` として参加し、追加されたメンバーは `Member` から始まります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    Moderator,
    Member,
}

impl MemberRole {
    /// メンバーを追加できるか
    pub fn can_add_members(self) -> bool {
        matches!(self, Self::Admin | Self::Moderator)
    }

    /// `target` の役割を持つ他のメンバーを外せるか
    ///
    /// モデレーターが外せるのは一般メンバーだけです。
    pub fn can_remove(self, target: MemberRole) -> bool {
        match self {
            Self::Admin => true,
            Self::Moderator => target == Self::Member,
            Self::Member => false,
        }
    }

    /// 他のメンバーの役割を変更できるか
    pub fn can_assign_roles(self) -> bool {
        self == Self::Admin
    }
}

/// チャンネルのメンバーと役割
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelMember {
    pub user_id: UserId,
    pub role: MemberRole,
}

/// ユーザー宛ての通知
///
/// `id` は通知ストアが採番します。既読フラグは受信者だけが立てられます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub user_id: UserId,
    pub channel_id: ChannelId,
    pub message: MessageContent,
    pub read: bool,
    pub created_at: Timestamp,
}

/// メッセージの宛先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MessageTarget {
    Channel(ChannelId),
    Direct(UserId),
}

/// 保存済みメッセージ
///
/// `id` はメッセージストアが採番し、送信順に単調増加します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredMessage {
    pub id: u64,
    pub sender: UserId,
    pub target: MessageTarget,
    pub content: MessageContent,
    pub sent_at: Timestamp,
}

impl StoredMessage {
    /// ダイレクトメッセージの当事者（送信者または受信者）かどうか
    pub fn involves(&self, user_id: UserId) -> bool {
        match self.target {
            MessageTarget::Direct(receiver) => self.sender == user_id || receiver == user_id,
            MessageTarget::Channel(_) => false,
        }
    }
}
