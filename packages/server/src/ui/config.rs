//! Server configuration.

use std::time::Duration;

use crate::infrastructure::message_pusher::DispatchConfig;

/// サーバーの設定
///
/// バイナリでは CLI 引数と `KAIRO_*` 環境変数から組み立てます。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 1 接続あたりの送信待ちの上限
    pub send_timeout: Duration,
    /// 接続ごとの送信キューの容量
    pub outbound_buffer: usize,
    /// プロセス全体の同時接続数の上限
    pub max_connections: usize,
    /// 送信者の他の端末にもエコーするか
    pub echo_to_sender: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let dispatch = DispatchConfig::default();
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            send_timeout: dispatch.send_timeout,
            outbound_buffer: 64,
            max_connections: dispatch.max_connections,
            echo_to_sender: true,
        }
    }
}

impl ServerConfig {
    pub fn dispatch(&self) -> DispatchConfig {
        DispatchConfig {
            send_timeout: self.send_timeout,
            max_connections: self.max_connections,
        }
    }
}
