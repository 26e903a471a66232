//! UseCase: チャンネルの作成・一覧・検索

use std::sync::Arc;

use crate::domain::{Channel, ChannelRepository, DisplayName, UserId};

use super::error::ChannelError;

/// チャンネル作成のユースケース
pub struct CreateChannelUseCase {
    channels: Arc<dyn ChannelRepository>,
}

impl CreateChannelUseCase {
    pub fn new(channels: Arc<dyn ChannelRepository>) -> Self {
        Self { channels }
    }

    /// チャンネルを作成する。作成者は最初のメンバーになる
    pub async fn execute(
        &self,
        creator: UserId,
        name: DisplayName,
        avatar_url: Option<String>,
    ) -> Result<Channel, ChannelError> {
        Ok(self
            .channels
            .create_channel(name, creator, avatar_url)
            .await?)
    }
}

/// チャンネル一覧取得のユースケース
pub struct ListChannelsUseCase {
    channels: Arc<dyn ChannelRepository>,
}

impl ListChannelsUseCase {
    pub fn new(channels: Arc<dyn ChannelRepository>) -> Self {
        Self { channels }
    }

    pub async fn execute(&self) -> Vec<Channel> {
        self.channels.list_channels().await
    }
}

/// チャンネル検索のユースケース
pub struct SearchChannelsUseCase {
    channels: Arc<dyn ChannelRepository>,
}

impl SearchChannelsUseCase {
    pub fn new(channels: Arc<dyn ChannelRepository>) -> Self {
        Self { channels }
    }

    /// 名前に `query` を含むチャンネル。空のクエリは全件に一致する
    pub async fn execute(&self, query: &str) -> Vec<Channel> {
        self.channels.search_channels(query).await
    }
}
