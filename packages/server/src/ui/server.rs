//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        add_channel_member, create_channel, create_notification, create_user,
        get_channel_members, get_channel_messages, get_direct_messages, get_presence, get_user,
        health_check, list_channels, list_notifications, mark_notification_read,
        remove_channel_member, search_channels, send_channel_message, send_direct_message,
        update_member_role, update_user, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Messaging server
///
/// # Example
///
/// ```ignore
/// let config = ServerConfig::default();
/// let server = Server::new(Arc::new(AppState::in_memory(&config)));
/// server.run(config.host, config.port).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// ルーティングを組み立てる
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/users", post(create_user))
            .route("/api/users/{user_id}", get(get_user).put(update_user))
            .route("/api/presence", get(get_presence))
            .route("/api/channels", get(list_channels).post(create_channel))
            .route("/api/channels/search", get(search_channels))
            .route(
                "/api/channels/{channel_id}/members",
                get(get_channel_members).post(add_channel_member),
            )
            .route(
                "/api/channels/{channel_id}/members/{user_id}",
                delete(remove_channel_member),
            )
            .route(
                "/api/channels/{channel_id}/members/{user_id}/role",
                put(update_member_role),
            )
            .route(
                "/api/channels/{channel_id}/messages",
                get(get_channel_messages).post(send_channel_message),
            )
            .route(
                "/api/messages/direct",
                get(get_direct_messages).post(send_direct_message),
            )
            .route(
                "/api/notifications",
                get(list_notifications).post(create_notification),
            )
            .route(
                "/api/notifications/{notification_id}/read",
                put(mark_notification_read),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the messaging server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` completes
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!("Messaging server listening on {}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
