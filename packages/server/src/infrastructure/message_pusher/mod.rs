//! メッセージ送信（配送）の実装
//!
//! ## 概要
//!
//! このモジュールは `MessagePusher` trait の具体的な実装を提供します。
//!
//! - `registry`: ユーザーごとの接続を保持する接続レジストリ
//! - `lanes`: チャンネル・会話ごとの順序保証
//! - `websocket`: 上記を組み合わせた WebSocket 向けの配送

pub mod lanes;
pub mod registry;
pub mod websocket;

pub use lanes::OrderingLanes;
pub use registry::ConnectionRegistry;
pub use websocket::{DispatchConfig, WebSocketMessagePusher};
