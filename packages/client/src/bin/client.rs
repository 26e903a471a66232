//! Interactive CLI client for the Kairo messaging server.
//!
//! Connects with a bearer token, sends direct / channel messages typed at the
//! prompt and prints incoming messages with JST timestamps.
//! Reconnects on disconnection (5 attempts, 5 seconds apart by default),
//! except when the token is rejected.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kairo-client -- --token <token>
//! cargo run --bin kairo-client -- -u ws://127.0.0.1:3000/ws -t <token>
//! ```

use std::time::Duration;

use clap::Parser;

use kairo_client::domain::ReconnectPolicy;
use kairo_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "kairo-client")]
#[command(about = "Interactive WebSocket client for Kairo", long_about = None)]
struct Args {
    /// Bearer token returned by `POST /api/users`
    #[arg(short = 't', long, env = "KAIRO_TOKEN")]
    token: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Connection attempts before giving up
    #[arg(long, default_value_t = 5)]
    max_attempts: u32,

    /// Seconds to wait between attempts
    #[arg(long, default_value_t = 5)]
    retry_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let policy = ReconnectPolicy {
        max_attempts: args.max_attempts,
        interval: Duration::from_secs(args.retry_interval_secs),
    };

    if let Err(e) = kairo_client::run_client(args.url, args.token, policy).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
