//! UseCase: メッセージ履歴の取得

use std::sync::Arc;

use crate::domain::{ChannelId, MessageRepository, StoredMessage, UserId};

use super::error::ChannelError;

/// チャンネル履歴取得のユースケース
pub struct GetChannelHistoryUseCase {
    messages: Arc<dyn MessageRepository>,
}

impl GetChannelHistoryUseCase {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    /// 送信順の履歴
    pub async fn execute(&self, channel_id: ChannelId) -> Result<Vec<StoredMessage>, ChannelError> {
        Ok(self.messages.channel_history(channel_id).await?)
    }
}

/// ダイレクトメッセージ履歴取得のユースケース
pub struct GetDirectHistoryUseCase {
    messages: Arc<dyn MessageRepository>,
}

impl GetDirectHistoryUseCase {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    /// `user_id` が送信または受信したダイレクトメッセージ（送信順）
    pub async fn execute(&self, user_id: UserId) -> Vec<StoredMessage> {
        self.messages.direct_history(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MockMessageRepository, RepositoryError};

    #[tokio::test]
    async fn test_history_of_unknown_channel() {
        // テスト項目: 存在しないチャンネルの履歴は ChannelNotFound になる
        // given (前提条件):
        let unknown = ChannelId::new(3).unwrap();
        let mut messages = MockMessageRepository::new();
        messages
            .expect_channel_history()
            .returning(|id| Err(RepositoryError::ChannelNotFound(id)));
        let usecase = GetChannelHistoryUseCase::new(Arc::new(messages));

        // when (操作):
        let result = usecase.execute(unknown).await;

        // then (期待する結果):
        assert_eq!(result, Err(ChannelError::ChannelNotFound(unknown)));
    }
}
