//! UseCase: チャンネルメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendChannelMessageUseCase::execute() メソッド
//! - メンバーシップの確認 → 保存 → メンバーのスナップショット → 配送
//!
//! ### なぜこのテストが必要か
//! - メンバー以外からの送信は保存も配送もされず、送信者にだけエラーが返る
//! - メンバー以外の接続には届かない
//! - 解決済みのメッセージは後からのメンバーシップ変更の影響を受けない
//!
//! ### どのような状況を想定しているか
//! - 正常系：全メンバーの全接続への配送
//! - 異常系：メンバー以外の送信、存在しないチャンネル
//! - エッジケース：同じチャンネルへの連続送信の順序

use std::sync::Arc;

use crate::domain::{
    ChannelId, ChannelRepository, ConnectionId, MessageContent, MessagePusher, MessageRepository,
    MessageTarget, OutboundMessage, PayloadEncoder, UserId,
};

use super::{SentMessage, error::SendMessageError};

/// チャンネルメッセージ送信のユースケース
pub struct SendChannelMessageUseCase {
    channels: Arc<dyn ChannelRepository>,
    messages: Arc<dyn MessageRepository>,
    encoder: Arc<dyn PayloadEncoder>,
    message_pusher: Arc<dyn MessagePusher>,
    /// 送信者の他の端末にもエコーするか
    echo_to_sender: bool,
}

impl SendChannelMessageUseCase {
    /// 新しい SendChannelMessageUseCase を作成
    pub fn new(
        channels: Arc<dyn ChannelRepository>,
        messages: Arc<dyn MessageRepository>,
        encoder: Arc<dyn PayloadEncoder>,
        message_pusher: Arc<dyn MessagePusher>,
        echo_to_sender: bool,
    ) -> Self {
        Self {
            channels,
            messages,
            encoder,
            message_pusher,
            echo_to_sender,
        }
    }

    /// チャンネルメッセージを保存し、解決時点のメンバー全員の接続に配送する
    ///
    /// # Returns
    ///
    /// * `Ok(SentMessage)` - 保存したメッセージと配送結果
    /// * `Err(SendMessageError::AuthorizationFailure)` - 送信者がメンバーではない
    ///   （何も保存・配送しない）
    pub async fn execute(
        &self,
        sender: UserId,
        channel_id: ChannelId,
        content: MessageContent,
        origin: Option<ConnectionId>,
    ) -> Result<SentMessage, SendMessageError> {
        // 1. メンバーシップの確認
        if !self.channels.is_member(channel_id, sender).await? {
            tracing::warn!(
                "User {} tried to post to channel {} without membership",
                sender,
                channel_id
            );
            return Err(SendMessageError::AuthorizationFailure {
                channel_id,
                user_id: sender,
            });
        }

        // 2. 保存
        let stored = self
            .messages
            .store(sender, MessageTarget::Channel(channel_id), content)
            .await?;

        // 3. 受信者の解決（この時点のスナップショット）
        let members = self.channels.members_of(channel_id).await?;

        // 4. 配送
        let payload = self.encoder.encode(&stored)?;
        let outbound = OutboundMessage::channel(
            sender,
            channel_id,
            members,
            payload,
            self.echo_to_sender,
            origin,
        );
        let report = self.message_pusher.deliver(outbound).await;

        tracing::debug!(
            "Channel message {} from {} to channel {}: {:?}",
            stored.id,
            sender,
            channel_id,
            report
        );
        Ok(SentMessage {
            message: stored,
            report,
        })
    }
}
