//! WebSocket frame DTOs.
//!
//! 1 テキストフレーム = 1 JSON エンベロープ。`type` フィールドで種別を判別します。

use serde::{Deserialize, Serialize};

/// クライアントから送られるフレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Direct { receiver_id: u64, content: String },
    Channel { channel_id: u64, content: String },
}

/// サーバーから送られるフレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    SessionOpened {
        user_id: u64,
        connection_id: String,
    },
    DirectMessage {
        id: u64,
        sender_id: u64,
        receiver_id: u64,
        content: String,
        sent_at: i64,
    },
    ChannelMessage {
        id: u64,
        channel_id: u64,
        sender_id: u64,
        content: String,
        sent_at: i64,
    },
    /// 宛先ユーザーの全接続に届く通知
    Notification {
        id: u64,
        channel_id: u64,
        message: String,
        created_at: i64,
    },
    /// 送信元の接続にだけ返すエラー
    Error { kind: ErrorKind, message: String },
}

/// エラーフレームの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AuthenticationFailure,
    AuthorizationFailure,
    InvalidMessage,
    NotFound,
    Internal,
}

impl ServerFrame {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_frames() {
        // テスト項目: type フィールドでクライアントフレームが判別される
        // given (前提条件):
        let direct = r#"{"type":"direct","receiver_id":2,"content":"hi"}"#;
        let channel = r#"{"type":"channel","channel_id":1,"content":"hello"}"#;

        // when (操作):
        let direct: ClientFrame = serde_json::from_str(direct).unwrap();
        let channel: ClientFrame = serde_json::from_str(channel).unwrap();

        // then (期待する結果):
        assert_eq!(
            direct,
            ClientFrame::Direct {
                receiver_id: 2,
                content: "hi".to_string()
            }
        );
        assert_eq!(
            channel,
            ClientFrame::Channel {
                channel_id: 1,
                content: "hello".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_client_frame_is_rejected() {
        // テスト項目: 未知の type や欠けたフィールドはパースエラーになる
        // given (前提条件):
        let unknown = r#"{"type":"broadcast","content":"hi"}"#;
        let missing = r#"{"type":"direct","content":"hi"}"#;

        // when (操作):
        let unknown = serde_json::from_str::<ClientFrame>(unknown);
        let missing = serde_json::from_str::<ClientFrame>(missing);

        // then (期待する結果):
        assert!(unknown.is_err());
        assert!(missing.is_err());
    }

    #[test]
    fn test_serialize_error_frame() {
        // テスト項目: エラーフレームが snake_case の kind で直列化される
        // given (前提条件):
        let frame = ServerFrame::error(ErrorKind::AuthorizationFailure, "not a member");

        // when (操作):
        let json: serde_json::Value = serde_json::to_value(&frame).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({
                "type": "error",
                "kind": "authorization_failure",
                "message": "not a member"
            })
        );
    }
}
