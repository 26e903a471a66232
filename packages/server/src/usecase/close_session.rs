//! UseCase: セッション終了処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CloseSessionUseCase::execute() メソッド
//! - 登録解除がちょうど 1 回だけ行われること（`Open → Closed`）
//!
//! ### どのような状況を想定しているか
//! - 正常系：通常の切断
//! - エッジケース：二重の close、配送失敗で既に登録解除された接続の close

use std::sync::Arc;

use crate::domain::{Connection, MessagePusher};

/// セッション終了のユースケース
pub struct CloseSessionUseCase {
    /// MessagePusher（接続レジストリを含む）
    message_pusher: Arc<dyn MessagePusher>,
}

impl CloseSessionUseCase {
    /// 新しい CloseSessionUseCase を作成
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// セッションを終了する
    ///
    /// 2 回目以降の呼び出しは何もしません。戻り値はこの呼び出しで閉じたかどうか。
    pub fn execute(&self, connection: &mut Connection) -> bool {
        if !connection.mark_closed() {
            return false;
        }

        // 配送失敗で既に外されている場合は false が返るが、状態は Closed にする
        let removed = self
            .message_pusher
            .unregister(connection.user_id(), connection.id());

        tracing::info!(
            "Session {} closed for user {} (unregistered here: {})",
            connection.id(),
            connection.user_id(),
            removed
        );
        true
    }
}
