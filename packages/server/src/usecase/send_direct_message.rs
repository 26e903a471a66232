//! UseCase: ダイレクトメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendDirectMessageUseCase::execute() メソッド
//! - 保存してから配送すること、受信者の解決（受信者 + 送信者の他の端末）
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数端末を持つ受信者への配送
//! - 正常系：送信元の接続を除いたエコー
//! - 異常系：存在しない受信者（何も保存・配送しない）

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MessageContent, MessagePusher, MessageRepository, MessageTarget,
    OutboundMessage, PayloadEncoder, UserId, UserRepository,
};

use super::{SentMessage, error::SendMessageError};

/// ダイレクトメッセージ送信のユースケース
pub struct SendDirectMessageUseCase {
    users: Arc<dyn UserRepository>,
    messages: Arc<dyn MessageRepository>,
    encoder: Arc<dyn PayloadEncoder>,
    message_pusher: Arc<dyn MessagePusher>,
    /// 送信者の他の端末にもエコーするか
    echo_to_sender: bool,
}

impl SendDirectMessageUseCase {
    /// 新しい SendDirectMessageUseCase を作成
    pub fn new(
        users: Arc<dyn UserRepository>,
        messages: Arc<dyn MessageRepository>,
        encoder: Arc<dyn PayloadEncoder>,
        message_pusher: Arc<dyn MessagePusher>,
        echo_to_sender: bool,
    ) -> Self {
        Self {
            users,
            messages,
            encoder,
            message_pusher,
            echo_to_sender,
        }
    }

    /// ダイレクトメッセージを保存し、受信者と送信者の接続に配送する
    ///
    /// # Arguments
    ///
    /// * `origin` - 送信元の接続（WebSocket からの送信時のみ）。この接続にはエコーしない
    pub async fn execute(
        &self,
        sender: UserId,
        receiver: UserId,
        content: MessageContent,
        origin: Option<ConnectionId>,
    ) -> Result<SentMessage, SendMessageError> {
        // 1. 受信者の存在確認
        self.users.get_user(receiver).await?;

        // 2. 保存
        let stored = self
            .messages
            .store(sender, MessageTarget::Direct(receiver), content)
            .await?;

        // 3. 配送
        let payload = self.encoder.encode(&stored)?;
        let outbound =
            OutboundMessage::direct(sender, receiver, payload, self.echo_to_sender, origin);
        let report = self.message_pusher.deliver(outbound).await;

        tracing::debug!(
            "Direct message {} from {} to {}: {:?}",
            stored.id,
            sender,
            receiver,
            report
        );
        Ok(SentMessage {
            message: stored,
            report,
        })
    }
}
