//! Conversion logic from domain entities to DTOs.

use kairo_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{
    Channel, ChannelMember, MessageTarget, Notification, PresenceSnapshot, StoredMessage, User,
};
use crate::infrastructure::dto::{http, websocket::ServerFrame};

// ========================================
// Domain Entity → WebSocket DTO
// ========================================

impl From<&StoredMessage> for ServerFrame {
    fn from(message: &StoredMessage) -> Self {
        let content = message.content.as_str().to_string();
        match message.target {
            MessageTarget::Direct(receiver) => Self::DirectMessage {
                id: message.id,
                sender_id: message.sender.value(),
                receiver_id: receiver.value(),
                content,
                sent_at: message.sent_at.value(),
            },
            MessageTarget::Channel(channel) => Self::ChannelMessage {
                id: message.id,
                channel_id: channel.value(),
                sender_id: message.sender.value(),
                content,
                sent_at: message.sent_at.value(),
            },
        }
    }
}

impl From<&Notification> for ServerFrame {
    fn from(notification: &Notification) -> Self {
        Self::Notification {
            id: notification.id,
            channel_id: notification.channel_id.value(),
            message: notification.message.as_str().to_string(),
            created_at: notification.created_at.value(),
        }
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<StoredMessage> for http::MessageDto {
    fn from(message: StoredMessage) -> Self {
        let (channel_id, receiver_id) = match message.target {
            MessageTarget::Channel(channel) => (Some(channel.value()), None),
            MessageTarget::Direct(receiver) => (None, Some(receiver.value())),
        };
        Self {
            id: message.id,
            sender_id: message.sender.value(),
            channel_id,
            receiver_id,
            content: message.content.into_string(),
            sent_at: timestamp_to_jst_rfc3339(message.sent_at.value()),
        }
    }
}

impl From<Channel> for http::ChannelDto {
    fn from(channel: Channel) -> Self {
        Self {
            id: channel.id.value(),
            name: channel.name.into_string(),
            creator_id: channel.creator.value(),
            avatar_url: channel.avatar_url,
            created_at: timestamp_to_jst_rfc3339(channel.created_at.value()),
        }
    }
}

impl From<ChannelMember> for http::ChannelMemberDto {
    fn from(member: ChannelMember) -> Self {
        Self {
            user_id: member.user_id.value(),
            role: member.role,
        }
    }
}

impl From<Notification> for http::NotificationDto {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id.value(),
            channel_id: notification.channel_id.value(),
            message: notification.message.into_string(),
            read: notification.read,
            created_at: timestamp_to_jst_rfc3339(notification.created_at.value()),
        }
    }
}

impl From<(User, String)> for http::CreatedUserDto {
    fn from((user, token): (User, String)) -> Self {
        Self {
            id: user.id.value(),
            name: user.name.into_string(),
            avatar_url: user.avatar_url,
            created_at: timestamp_to_jst_rfc3339(user.created_at.value()),
            token,
        }
    }
}

impl http::UserDto {
    pub fn new(user: User, online: bool) -> Self {
        Self {
            id: user.id.value(),
            name: user.name.into_string(),
            avatar_url: user.avatar_url,
            created_at: timestamp_to_jst_rfc3339(user.created_at.value()),
            online,
        }
    }
}

impl From<PresenceSnapshot> for http::PresenceDto {
    fn from(snapshot: PresenceSnapshot) -> Self {
        Self {
            online_users: snapshot.online_users.iter().map(|id| id.value()).collect(),
            connection_count: snapshot.connection_count,
        }
    }
}
