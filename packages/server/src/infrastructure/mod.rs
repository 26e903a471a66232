//! Infrastructure layer
//!
//! ドメイン層の trait の具体的な実装（インメモリのデータストア、WebSocket 配送、
//! JSON エンコード）と、プロトコルごとの DTO を提供します。

pub mod dto;
pub mod encoder;
pub mod message_pusher;
pub mod repository;
