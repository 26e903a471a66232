//! Kairo messaging server.
//!
//! Real-time connection registry, channel membership and broadcast dispatcher
//! for a chat backend, exposed over HTTP and WebSocket.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
