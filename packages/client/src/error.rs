//! Error types for the CLI client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the token
    #[error("Authentication failed: the server rejected the token")]
    AuthenticationFailed,

    /// The server has no room for another connection
    #[error("Server is at connection capacity")]
    CapacityExhausted,

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors while parsing a prompt line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}' (use /dm, /ch or /quit)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a valid id")]
    InvalidId(String),
}
