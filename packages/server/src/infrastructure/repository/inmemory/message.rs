//! InMemory Message Repository 実装
//!
//! メッセージを送信順に保持します。ID と送信時刻は書き込みロック下で採番するので、
//! ID の順序と保存順は一致します。

use std::{num::NonZeroU64, sync::Arc};

use async_trait::async_trait;
use parking_lot::RwLock;

use kairo_shared::time::Clock;

use crate::domain::{
    ChannelId, ChannelRepository, MessageContent, MessageRepository, MessageTarget,
    RepositoryError, StoredMessage, Timestamp, UserId,
};

struct MessageLog {
    messages: Vec<StoredMessage>,
    next_id: NonZeroU64,
}

/// インメモリ Message Repository 実装
///
/// 宛先チャンネルの存在確認のために `ChannelRepository` を参照します。
pub struct InMemoryMessageRepository {
    log: RwLock<MessageLog>,
    channels: Arc<dyn ChannelRepository>,
    clock: Arc<dyn Clock>,
}

impl InMemoryMessageRepository {
    pub fn new(channels: Arc<dyn ChannelRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            log: RwLock::new(MessageLog {
                messages: Vec::new(),
                next_id: NonZeroU64::MIN,
            }),
            channels,
            clock,
        }
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn store(
        &self,
        sender: UserId,
        target: MessageTarget,
        content: MessageContent,
    ) -> Result<StoredMessage, RepositoryError> {
        if let MessageTarget::Channel(channel_id) = target {
            if !self.channels.channel_exists(channel_id).await {
                return Err(RepositoryError::ChannelNotFound(channel_id));
            }
        }

        let mut log = self.log.write();
        let message = StoredMessage {
            id: log.next_id.get(),
            sender,
            target,
            content,
            sent_at: Timestamp::new(self.clock.now_millis()),
        };
        log.next_id = log.next_id.saturating_add(1);
        log.messages.push(message.clone());

        Ok(message)
    }

    async fn channel_history(
        &self,
        channel_id: ChannelId,
    ) -> Result<Vec<StoredMessage>, RepositoryError> {
        if !self.channels.channel_exists(channel_id).await {
            return Err(RepositoryError::ChannelNotFound(channel_id));
        }
        Ok(self
            .log
            .read()
            .messages
            .iter()
            .filter(|m| m.target == MessageTarget::Channel(channel_id))
            .cloned()
            .collect())
    }

    async fn direct_history(&self, user_id: UserId) -> Vec<StoredMessage> {
        self.log
            .read()
            .messages
            .iter()
            .filter(|m| m.involves(user_id))
            .cloned()
            .collect()
    }
}
