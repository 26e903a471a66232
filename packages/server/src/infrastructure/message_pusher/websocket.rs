//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続レジストリの管理（register / unregister）
//! - 解決済みの受信者の全接続への配送（deliver）
//!
//! ## 設計ノート
//!
//! WebSocket への実際の書き込みは UI 層の `pusher_loop` が接続ごとに行います。
//! この実装は各接続の送信キューに積むところまでを担当し、レジストリのロックを
//! 保持したまま送信を待つことはありません。
//!
//! 配送はベストエフォートで、接続ごとに最大 1 回です。送信キューが閉じている、
//! またはタイムアウトした接続はその場で登録解除し、切断を通知します。
//! 失敗は他の接続への配送に影響しません。

use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;

use crate::domain::{
    ConnectionHandle, ConnectionId, DeliveryReport, MessagePusher, OutboundMessage,
    PresenceSnapshot, RegistryError, UserId,
};

use super::{lanes::OrderingLanes, registry::ConnectionRegistry};

/// 配送の設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    /// 1 接続あたりの送信待ちの上限
    ///
    /// 順序を保つため、レーンのロックは全接続への送信が終わるまで保持されます。
    /// そのため 1 つの接続が詰まると、同じレーンの次のメッセージは他のメンバー宛ても含めて
    /// 最大この時間だけ遅れます。詰まった接続はその時点で切り離されるので、遅れは 1 回で済みます。
    pub send_timeout: Duration,
    /// プロセス全体の同時接続数の上限
    pub max_connections: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_secs(5),
            max_connections: 10_000,
        }
    }
}

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    registry: ConnectionRegistry,
    lanes: OrderingLanes,
    send_timeout: Duration,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            registry: ConnectionRegistry::new(config.max_connections),
            lanes: OrderingLanes::new(),
            send_timeout: config.send_timeout,
        }
    }

    /// 受信者の接続のうち、送信元の接続を除いたものを集める
    fn collect_targets(
        &self,
        message: &OutboundMessage,
        report: &mut DeliveryReport,
    ) -> Vec<ConnectionHandle> {
        let mut targets = Vec::new();
        for &recipient in &message.recipients {
            let connections = self.registry.connections_for(recipient);
            if connections.is_empty() && recipient != message.sender {
                tracing::debug!("User {} has no live connections, skipping", recipient);
                report.unreachable.push(recipient);
                continue;
            }
            targets.extend(
                connections
                    .into_iter()
                    .filter(|handle| Some(handle.id()) != message.origin),
            );
        }
        targets
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    fn register(&self, user_id: UserId, handle: ConnectionHandle) -> Result<(), RegistryError> {
        self.registry.register(user_id, handle)
    }

    fn unregister(&self, user_id: UserId, connection_id: ConnectionId) -> bool {
        self.registry.unregister(user_id, connection_id)
    }

    fn is_online(&self, user_id: UserId) -> bool {
        self.registry.is_online(user_id)
    }

    fn presence(&self) -> PresenceSnapshot {
        self.registry.presence()
    }

    async fn deliver(&self, message: OutboundMessage) -> DeliveryReport {
        // 同じレーンのメッセージは受理順に 1 件ずつ積む
        let _lane = self.lanes.acquire(message.lane()).await;

        let mut report = DeliveryReport::default();
        let targets = self.collect_targets(&message, &mut report);

        let send_timeout = self.send_timeout;
        let payload = message.payload.as_str();
        let results = join_all(targets.iter().map(|handle| async move {
            handle.send(payload.to_string(), send_timeout).await
        }))
        .await;

        for (handle, result) in targets.iter().zip(results) {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to push message to user {} ({}), evicting connection",
                        handle.user_id(),
                        e
                    );
                    if self.registry.unregister(handle.user_id(), handle.id()) {
                        report.evicted += 1;
                    }
                    handle.evict();
                }
            }
        }

        tracing::debug!(
            "Delivered {:?} from user {}: {} delivered, {} evicted, {} unreachable",
            message.kind,
            message.sender,
            report.delivered,
            report.evicted,
            report.unreachable.len()
        );
        report
    }
}
