//! Kairo messaging server.
//!
//! Tracks live WebSocket connections per user and delivers direct and channel
//! messages to every connection of every recipient.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairo-server
//! cargo run --bin kairo-server -- --host 0.0.0.0 --port 3000
//! KAIRO_MAX_CONNECTIONS=500 cargo run --bin kairo-server
//! ```

use std::{sync::Arc, time::Duration};

use clap::Parser;
use kairo_server::ui::{AppState, Server, ServerConfig};
use kairo_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kairo-server")]
#[command(about = "Kairo messaging server with real-time delivery", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "KAIRO_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "KAIRO_PORT", default_value = "8080")]
    port: u16,

    /// Per-connection send timeout in milliseconds
    #[arg(long, env = "KAIRO_SEND_TIMEOUT_MS", default_value = "5000")]
    send_timeout_ms: u64,

    /// Capacity of each connection's outbound queue
    #[arg(long, env = "KAIRO_OUTBOUND_BUFFER", default_value = "64")]
    outbound_buffer: usize,

    /// Maximum number of simultaneous connections
    #[arg(long, env = "KAIRO_MAX_CONNECTIONS", default_value = "10000")]
    max_connections: usize,

    /// Echo messages to the sender's other devices
    #[arg(
        long,
        env = "KAIRO_ECHO_TO_SENDER",
        default_value = "true",
        action = clap::ArgAction::Set
    )]
    echo_to_sender: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            send_timeout: Duration::from_millis(args.send_timeout_ms),
            outbound_buffer: args.outbound_buffer,
            max_connections: args.max_connections,
            echo_to_sender: args.echo_to_sender,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = ServerConfig::from(Args::parse());
    tracing::info!("Starting with {:?}", config);

    // Repositories, MessagePusher and UseCases are wired in AppState
    let state = Arc::new(AppState::in_memory(&config));

    let server = Server::new(state);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
