//! UseCase: 通知の作成・一覧・既読化
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - NotifyUseCase::execute(): 保存してから宛先ユーザーの全接続に配送すること
//! - 通知を送れるのはチャンネルのメンバーだけであること
//! - 既読化は宛先ユーザーだけが行えること
//!
//! ### どのような状況を想定しているか
//! - 正常系：オンラインの宛先への配送、オフラインの宛先（保存のみ）
//! - 異常系：非メンバーからの通知、存在しない宛先、他人の通知の既読化

use std::sync::Arc;

use crate::domain::{
    ChannelId, ChannelRepository, DeliveryReport, MessageContent, MessagePusher, Notification,
    NotificationRepository, OutboundMessage, PayloadEncoder, UserId, UserRepository,
};

use super::error::NotificationError;

/// 通知作成のユースケース
pub struct NotifyUseCase {
    channels: Arc<dyn ChannelRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationRepository>,
    encoder: Arc<dyn PayloadEncoder>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl NotifyUseCase {
    pub fn new(
        channels: Arc<dyn ChannelRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<dyn NotificationRepository>,
        encoder: Arc<dyn PayloadEncoder>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            channels,
            users,
            notifications,
            encoder,
            message_pusher,
        }
    }

    /// `actor` が `channel_id` に関する通知を `user_id` に送る
    ///
    /// 保存は宛先がオフラインでも行います。配送は宛先本人の接続だけが対象です。
    pub async fn execute(
        &self,
        actor: UserId,
        user_id: UserId,
        channel_id: ChannelId,
        message: MessageContent,
    ) -> Result<(Notification, DeliveryReport), NotificationError> {
        // 1. 権限と宛先の確認
        if !self.channels.is_member(channel_id, actor).await? {
            return Err(NotificationError::AuthorizationFailure {
                channel_id,
                user_id: actor,
            });
        }
        self.users.get_user(user_id).await?;

        // 2. 保存
        let notification = self
            .notifications
            .create(user_id, channel_id, message)
            .await?;

        // 3. 配送
        let payload = self.encoder.encode_notification(&notification)?;
        let report = self
            .message_pusher
            .deliver(OutboundMessage::notification(actor, user_id, payload))
            .await;

        tracing::debug!(
            "Notification {} from {} to {}: {:?}",
            notification.id,
            actor,
            user_id,
            report
        );
        Ok((notification, report))
    }
}

/// 自分宛ての通知一覧のユースケース
pub struct ListNotificationsUseCase {
    notifications: Arc<dyn NotificationRepository>,
}

impl ListNotificationsUseCase {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    pub async fn execute(&self, user_id: UserId) -> Vec<Notification> {
        self.notifications.list_for(user_id).await
    }
}

/// 通知の既読化のユースケース
pub struct MarkNotificationReadUseCase {
    notifications: Arc<dyn NotificationRepository>,
}

impl MarkNotificationReadUseCase {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    pub async fn execute(&self, user_id: UserId, id: u64) -> Result<Notification, NotificationError> {
        Ok(self.notifications.mark_read(user_id, id).await?)
    }
}
