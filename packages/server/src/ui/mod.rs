//! HTTP / WebSocket surface of the messaging backend.

mod auth;
pub mod config;
mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use auth::AuthenticatedUser;
pub use config::ServerConfig;
pub use error::ApiError;
pub use server::Server;
pub use state::{AppState, Collaborators};
