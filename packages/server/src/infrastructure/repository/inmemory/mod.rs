//! InMemory Repository 実装
//!
//! ドメイン層が定義する Repository trait を、`parking_lot::RwLock` で保護した
//! コレクションで実装します。ロックは `.await` をまたいで保持しません。

pub mod channel;
pub mod message;
pub mod notification;
pub mod user;

pub use channel::InMemoryChannelRepository;
pub use message::InMemoryMessageRepository;
pub use notification::InMemoryNotificationRepository;
pub use user::InMemoryUserRepository;
