//! HTTP API request / response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::MemberRole;

// ========================================
// Users
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// 作成したユーザーと認証トークン
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedUserDto {
    pub id: u64,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: u64,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_at: String,
    pub online: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceDto {
    pub online_users: Vec<u64>,
    pub connection_count: usize,
}

// ========================================
// Channels
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChannelRequest {
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelDto {
    pub id: u64,
    pub name: String,
    pub creator_id: u64,
    pub avatar_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMemberDto {
    pub user_id: u64,
    pub role: MemberRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMembersDto {
    pub channel_id: u64,
    pub members: Vec<ChannelMemberDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: MemberRole,
}

/// `GET /api/channels/search?query=...`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchChannelsQuery {
    #[serde(default)]
    pub query: String,
}

// ========================================
// Messages
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendChannelMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendDirectMessageRequest {
    pub receiver_id: u64,
    pub content: String,
}

/// 保存済みメッセージ
///
/// チャンネルメッセージは `channel_id`、ダイレクトメッセージは `receiver_id` を持ちます。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: u64,
    pub sender_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<u64>,
    pub content: String,
    pub sent_at: String,
}

/// 送信結果（保存したメッセージと配送の集計）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentMessageDto {
    pub message: MessageDto,
    pub delivered: usize,
    pub unreachable: Vec<u64>,
}

// ========================================
// Notifications
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: u64,
    pub channel_id: u64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationDto {
    pub id: u64,
    pub user_id: u64,
    pub channel_id: u64,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

/// 作成した通知と、届いた接続数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentNotificationDto {
    pub notification: NotificationDto,
    pub delivered: usize,
}

// ========================================
// Errors
// ========================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
