//! 再接続の判断。副作用を持たない。

use std::time::Duration;

use crate::error::ClientError;

/// 再接続の方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// 最初の接続を含めた試行回数の上限
    pub max_attempts: u32,
    /// 試行の間隔
    pub interval: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(5),
        }
    }
}

/// 再試行しても結果が変わらないエラーか。
///
/// 同じトークンでの再認証は失敗し続ける。上限超過はサーバー側の空き待ちなので再試行する。
pub fn is_fatal(error: &ClientError) -> bool {
    matches!(error, ClientError::AuthenticationFailed)
}

impl ReconnectPolicy {
    /// `failed_attempts` 回失敗した後に、もう一度つなぎにいくか
    pub fn should_retry(&self, error: &ClientError, failed_attempts: u32) -> bool {
        !is_fatal(error) && failed_attempts < self.max_attempts
    }
}
