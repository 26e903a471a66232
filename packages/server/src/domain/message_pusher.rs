//! MessagePusher trait 定義
//!
//! 接続の登録・解除と、解決済みメッセージの配送を抽象化します。
//! UseCase 層はこの trait に依存し、WebSocket などの具体的な実装には依存しません。

use async_trait::async_trait;

use super::{
    ConnectionHandle, ConnectionId, DeliveryReport, OutboundMessage, RegistryError, UserId,
};

/// 接続状況のスナップショット
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSnapshot {
    /// 接続中のユーザー（昇順）
    pub online_users: Vec<UserId>,
    /// 全ユーザーの接続数の合計
    pub connection_count: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// `user_id` の接続としてハンドルを登録する
    fn register(&self, user_id: UserId, handle: ConnectionHandle) -> Result<(), RegistryError>;

    /// 接続を登録解除する
    ///
    /// 戻り値はこの呼び出しで実際に取り除いたかどうか。未登録の接続に対しては何もしない。
    fn unregister(&self, user_id: UserId, connection_id: ConnectionId) -> bool;

    fn is_online(&self, user_id: UserId) -> bool;

    fn presence(&self) -> PresenceSnapshot;

    /// 解決済みの受信者の全接続にメッセージを配送する（ベストエフォート）
    async fn deliver(&self, message: OutboundMessage) -> DeliveryReport;
}
