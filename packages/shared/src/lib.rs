//! Shared utilities for the Kairo server and client.

pub mod logger;
pub mod time;
