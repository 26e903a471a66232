//! Message formatting utilities for client display.

use kairo_server::infrastructure::dto::websocket::{ErrorKind, ServerFrame};
use kairo_shared::time::timestamp_to_jst_rfc3339;

const RULE: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format any frame received from the server
    pub fn format_frame(frame: &ServerFrame, me: Option<u64>) -> String {
        match frame {
            ServerFrame::SessionOpened {
                user_id,
                connection_id,
            } => Self::format_session_opened(*user_id, connection_id),
            ServerFrame::DirectMessage {
                sender_id,
                receiver_id,
                content,
                sent_at,
                ..
            } => Self::format_direct_message(*sender_id, *receiver_id, content, *sent_at, me),
            ServerFrame::ChannelMessage {
                channel_id,
                sender_id,
                content,
                sent_at,
                ..
            } => Self::format_channel_message(*channel_id, *sender_id, content, *sent_at),
            ServerFrame::Notification {
                id,
                channel_id,
                message,
                created_at,
            } => Self::format_notification(*id, *channel_id, message, *created_at),
            ServerFrame::Error { kind, message } => Self::format_error(*kind, message),
        }
    }

    pub fn format_session_opened(user_id: u64, connection_id: &str) -> String {
        format!(
            "\nConnected as user {} (connection {})\n\
             Commands: /dm <user_id> <text>, /ch <channel_id> <text>, /quit\n\n",
            user_id, connection_id
        )
    }

    /// Format a direct message
    ///
    /// Messages sent from another device of the current user are shown as `me -> @receiver`.
    pub fn format_direct_message(
        sender_id: u64,
        receiver_id: u64,
        content: &str,
        sent_at: i64,
        me: Option<u64>,
    ) -> String {
        let header = if Some(sender_id) == me {
            format!("[dm] me -> @{}", receiver_id)
        } else {
            format!("[dm] @{}", sender_id)
        };
        format!(
            "\n\n{}\n{}: {}\nsent at {}\n{}\n",
            RULE,
            header,
            content,
            timestamp_to_jst_rfc3339(sent_at),
            RULE
        )
    }

    /// Format a channel message
    pub fn format_channel_message(
        channel_id: u64,
        sender_id: u64,
        content: &str,
        sent_at: i64,
    ) -> String {
        format!(
            "\n\n{}\n[#{}] @{}: {}\nsent at {}\n{}\n",
            RULE,
            channel_id,
            sender_id,
            content,
            timestamp_to_jst_rfc3339(sent_at),
            RULE
        )
    }

    /// Format a notification addressed to the current user
    pub fn format_notification(id: u64, channel_id: u64, message: &str, created_at: i64) -> String {
        format!(
            "\n* notification {} [#{}]: {}\n  at {}\n",
            id,
            channel_id,
            message,
            timestamp_to_jst_rfc3339(created_at)
        )
    }

    pub fn format_error(kind: ErrorKind, message: &str) -> String {
        let label = match kind {
            ErrorKind::AuthenticationFailure => "not authenticated",
            ErrorKind::AuthorizationFailure => "not allowed",
            ErrorKind::InvalidMessage => "invalid message",
            ErrorKind::NotFound => "not found",
            ErrorKind::Internal => "server error",
        };
        format!("\n! {}: {}\n", label, message)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
