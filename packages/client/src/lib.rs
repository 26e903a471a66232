//! Kairo CLI client.
//!
//! Interactive WebSocket client: reads commands from a readline prompt,
//! sends direct / channel frames and prints incoming messages.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use runner::run_client;
