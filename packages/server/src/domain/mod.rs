//! Domain layer
//!
//! 接続・メッセージ・チャンネルに関するドメインモデルと、
//! 外部協調者へのインターフェース（trait）を定義します。

pub mod connection;
pub mod encoder;
pub mod entity;
pub mod error;
pub mod message;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use connection::{Connection, ConnectionHandle, ConnectionInbox, SessionState};
pub use encoder::PayloadEncoder;
pub use entity::{
    Channel, ChannelMember, MemberRole, MessageTarget, Notification, StoredMessage, User,
};
pub use error::{
    AuthError, EncodeError, RegistryError, RepositoryError, TransportError, ValueObjectError,
};
pub use message::{DeliveryReport, MessageKind, OrderingLane, OutboundMessage};
pub use message_pusher::{MessagePusher, PresenceSnapshot};
pub use repository::{
    ChannelRepository, IdentityProvider, MessageRepository, NotificationRepository, UserRepository,
};
pub use value_object::{ChannelId, ConnectionId, DisplayName, MessageContent, Timestamp, UserId};

#[cfg(test)]
pub use encoder::MockPayloadEncoder;
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
#[cfg(test)]
pub use repository::{
    MockChannelRepository, MockIdentityProvider, MockMessageRepository,
    MockNotificationRepository, MockUserRepository,
};
