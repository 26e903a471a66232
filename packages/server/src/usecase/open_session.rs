//! UseCase: セッション開始処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - OpenSessionUseCase::execute() メソッド
//! - 接続の作成とレジストリへの登録（`Connecting → Open`）
//!
//! ### どのような状況を想定しているか
//! - 正常系：接続が Open になり、レジストリから見える
//! - 正常系：同じユーザーの 2 つ目の接続（複数端末）
//! - 異常系：同時接続数の上限

use std::sync::Arc;

use crate::domain::{Connection, MessagePusher, UserId};

use super::error::OpenSessionError;

/// セッション開始のユースケース
pub struct OpenSessionUseCase {
    /// MessagePusher（接続レジストリを含む）
    message_pusher: Arc<dyn MessagePusher>,
    /// 接続ごとの送信キューの容量
    outbound_buffer: usize,
}

impl OpenSessionUseCase {
    /// 新しい OpenSessionUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>, outbound_buffer: usize) -> Self {
        Self {
            message_pusher,
            outbound_buffer,
        }
    }

    /// 認証済みユーザーのセッションを開始する
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 登録済みで `Open` 状態の接続
    /// * `Err(OpenSessionError)` - 登録失敗（接続は作成されなかったものとして扱う）
    pub fn execute(&self, user_id: UserId) -> Result<Connection, OpenSessionError> {
        let (mut connection, handle) = Connection::new(user_id, self.outbound_buffer);

        self.message_pusher.register(user_id, handle)?;
        connection.mark_open();

        tracing::info!(
            "Session {} opened for user {}",
            connection.id(),
            connection.user_id()
        );
        Ok(connection)
    }
}
