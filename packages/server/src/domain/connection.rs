//! 接続とセッション状態
//!
//! ## 設計ノート
//!
//! 1 つのトランスポート接続は 2 つの半分に分かれます：
//!
//! - [`Connection`]: セッションタスクが排他的に所有する。clone 不可。
//!   送信キューの受信側（[`ConnectionInbox`]）と状態遷移を持つ。
//! - [`ConnectionHandle`]: レジストリに登録される送信側。clone 可能。
//!
//! 受信側が drop されると、以降の送信は `TransportError::Closed` になります。

use std::{sync::Arc, time::Duration};

use tokio::sync::{
    Notify,
    mpsc::{self, error::SendTimeoutError},
};

use super::{
    error::TransportError,
    value_object::{ConnectionId, UserId},
};

/// セッションの状態
///
/// `Connecting → Open → Closed` の順にのみ遷移し、`Closed` は終端状態です。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Closed,
}

/// レジストリに登録される接続の送信側
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    user_id: UserId,
    outbound: mpsc::Sender<String>,
    eviction: Arc<Notify>,
}

impl ConnectionHandle {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// 送信キューに 1 件だけ積む
    ///
    /// キューが満杯の間は `timeout` までしか待たず、リトライもしません。
    pub async fn send(&self, payload: String, timeout: Duration) -> Result<(), TransportError> {
        match self.outbound.send_timeout(payload, timeout).await {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => Err(TransportError::Timeout(self.id)),
            Err(SendTimeoutError::Closed(_)) => Err(TransportError::Closed(self.id)),
        }
    }

    /// 接続を強制的に切断するようセッションタスクに通知する
    pub fn evict(&self) {
        self.eviction.notify_one();
    }

    /// セッション側の受信キューが既に閉じているか
    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }
}

/// 送信キューの受信側
///
/// 書き込みタスク（`pusher_loop`）に move して使います。
#[derive(Debug)]
pub struct ConnectionInbox {
    outbound: mpsc::Receiver<String>,
    eviction: Arc<Notify>,
}

impl ConnectionInbox {
    /// 次に送信すべきペイロードを待つ
    ///
    /// 強制切断が通知された場合、またはキューが閉じた場合は `None` を返します。
    /// 切断通知はキューに残っているメッセージより優先されます。
    pub async fn next(&mut self) -> Option<String> {
        tokio::select! {
            biased;
            _ = self.eviction.notified() => None,
            payload = self.outbound.recv() => payload,
        }
    }

    /// 強制切断が通知されるまで待つ
    ///
    /// ソケットへの書き込みと競わせ、書き込みが詰まっていても切断を取りこぼさないために使います。
    pub async fn evicted(&self) {
        self.eviction.notified().await;
    }
}

/// セッションタスクが所有する接続
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    user_id: UserId,
    state: SessionState,
    inbox: Option<ConnectionInbox>,
}

impl Connection {
    /// 新しい接続を作成し、レジストリ登録用のハンドルと一緒に返す
    ///
    /// `buffer` は送信キューの容量（最低 1）です。
    pub fn new(user_id: UserId, buffer: usize) -> (Self, ConnectionHandle) {
        let id = ConnectionId::generate();
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let eviction = Arc::new(Notify::new());

        let handle = ConnectionHandle {
            id,
            user_id,
            outbound: tx,
            eviction: eviction.clone(),
        };
        let connection = Self {
            id,
            user_id,
            state: SessionState::Connecting,
            inbox: Some(ConnectionInbox {
                outbound: rx,
                eviction,
            }),
        };

        (connection, handle)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// 受信側を取り出す（一度だけ）
    pub fn take_inbox(&mut self) -> Option<ConnectionInbox> {
        self.inbox.take()
    }

    /// `Connecting → Open`。それ以外の状態からは遷移しない
    pub(crate) fn mark_open(&mut self) -> bool {
        if self.state != SessionState::Connecting {
            return false;
        }
        self.state = SessionState::Open;
        true
    }

    /// `Closed` へ遷移し、受信側を破棄する
    ///
    /// 戻り値は「この呼び出しで初めて閉じたか」です。
    pub(crate) fn mark_closed(&mut self) -> bool {
        self.inbox = None;
        if self.state == SessionState::Closed {
            return false;
        }
        self.state = SessionState::Closed;
        true
    }
}
