//! JSON を使った PayloadEncoder 実装

use crate::{
    domain::{EncodeError, Notification, PayloadEncoder, StoredMessage},
    infrastructure::dto::websocket::ServerFrame,
};

/// 保存済みメッセージと通知を `ServerFrame` の JSON に変換する
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPayloadEncoder;

impl PayloadEncoder for JsonPayloadEncoder {
    fn encode(&self, message: &StoredMessage) -> Result<String, EncodeError> {
        serde_json::to_string(&ServerFrame::from(message)).map_err(|e| EncodeError(e.to_string()))
    }

    fn encode_notification(&self, notification: &Notification) -> Result<String, EncodeError> {
        serde_json::to_string(&ServerFrame::from(notification))
            .map_err(|e| EncodeError(e.to_string()))
    }
}
