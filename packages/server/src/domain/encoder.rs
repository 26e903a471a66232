//! PayloadEncoder trait 定義
//!
//! 保存済みメッセージと通知をトランスポートに載せるテキストへ変換します。
//! コアはペイロードの中身を解釈しません。

use super::{EncodeError, Notification, StoredMessage};

#[cfg_attr(test, mockall::automock)]
pub trait PayloadEncoder: Send + Sync {
    fn encode(&self, message: &StoredMessage) -> Result<String, EncodeError>;
    fn encode_notification(&self, notification: &Notification) -> Result<String, EncodeError>;
}
