//! Request handlers.

mod http;
mod websocket;

pub use http::{
    add_channel_member, create_channel, create_notification, create_user, get_channel_members,
    get_channel_messages, get_direct_messages, get_presence, get_user, health_check,
    list_channels, list_notifications, mark_notification_read, remove_channel_member,
    search_channels, send_channel_message, send_direct_message, update_member_role, update_user,
};
pub use websocket::websocket_handler;
