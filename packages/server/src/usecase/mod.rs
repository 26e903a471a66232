//! UseCase layer
//!
//! セッションのライフサイクル、メッセージ送信、チャンネル・ユーザー操作、通知の
//! アプリケーションロジックを提供します。ドメイン層の trait だけに依存します。

mod authenticate;
mod channel;
mod channel_member;
mod close_session;
pub mod error;
mod history;
mod notification;
mod open_session;
mod send_channel_message;
mod send_direct_message;
mod user;

pub use authenticate::AuthenticateUseCase;
pub use channel::{CreateChannelUseCase, ListChannelsUseCase, SearchChannelsUseCase};
pub use channel_member::ChannelMemberUseCase;
pub use close_session::CloseSessionUseCase;
pub use error::{
    ChannelError, NotificationError, OpenSessionError, SendMessageError, UserError,
};
pub use history::{GetChannelHistoryUseCase, GetDirectHistoryUseCase};
pub use notification::{
    ListNotificationsUseCase, MarkNotificationReadUseCase, NotifyUseCase,
};
pub use open_session::OpenSessionUseCase;
pub use send_channel_message::SendChannelMessageUseCase;
pub use send_direct_message::SendDirectMessageUseCase;
pub use user::{GetPresenceUseCase, GetUserUseCase, RegisterUserUseCase, UpdateUserUseCase};

use crate::domain::{DeliveryReport, StoredMessage};

/// 送信結果（保存したメッセージと配送結果）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message: StoredMessage,
    pub report: DeliveryReport,
}
