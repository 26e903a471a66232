//! InMemory Notification Repository 実装
//!
//! 通知を ID 順に保持します。宛先ユーザーやチャンネルの存在確認は呼び出し側の責務です。

use std::{collections::BTreeMap, num::NonZeroU64, sync::Arc};

use async_trait::async_trait;
use parking_lot::RwLock;

use kairo_shared::time::Clock;

use crate::domain::{
    ChannelId, MessageContent, Notification, NotificationRepository, RepositoryError, Timestamp,
    UserId,
};

struct NotificationTable {
    notifications: BTreeMap<u64, Notification>,
    next_id: NonZeroU64,
}

/// インメモリ Notification Repository 実装
pub struct InMemoryNotificationRepository {
    table: RwLock<NotificationTable>,
    clock: Arc<dyn Clock>,
}

impl InMemoryNotificationRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RwLock::new(NotificationTable {
                notifications: BTreeMap::new(),
                next_id: NonZeroU64::MIN,
            }),
            clock,
        }
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(
        &self,
        user_id: UserId,
        channel_id: ChannelId,
        message: MessageContent,
    ) -> Result<Notification, RepositoryError> {
        let created_at = Timestamp::new(self.clock.now_millis());

        let mut table = self.table.write();
        let id = table.next_id.get();
        table.next_id = table.next_id.saturating_add(1);
        let notification = Notification {
            id,
            user_id,
            channel_id,
            message,
            read: false,
            created_at,
        };
        table.notifications.insert(id, notification.clone());

        Ok(notification)
    }

    async fn list_for(&self, user_id: UserId) -> Vec<Notification> {
        self.table
            .read()
            .notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    async fn mark_read(&self, user_id: UserId, id: u64) -> Result<Notification, RepositoryError> {
        let mut table = self.table.write();
        match table.notifications.get_mut(&id) {
            Some(notification) if notification.user_id == user_id => {
                notification.read = true;
                Ok(notification.clone())
            }
            _ => Err(RepositoryError::NotificationNotFound(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairo_shared::time::FixedClock;

    fn user(id: u64) -> UserId {
        UserId::new(id).unwrap()
    }

    fn text(value: &str) -> MessageContent {
        MessageContent::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_notifications_are_listed_per_user() {
        // テスト項目: 通知は宛先ユーザーごとに作成順で一覧できる
        // given (前提条件):
        let repo = InMemoryNotificationRepository::new(Arc::new(FixedClock::new(10)));
        let channel = ChannelId::new(1).unwrap();

        // when (操作):
        let first = repo.create(user(1), channel, text("a")).await.unwrap();
        repo.create(user(2), channel, text("b")).await.unwrap();
        let third = repo.create(user(1), channel, text("c")).await.unwrap();

        // then (期待する結果):
        assert_eq!(repo.list_for(user(1)).await, vec![first.clone(), third]);
        assert!(!first.read);
        assert_eq!(first.created_at, Timestamp::new(10));
    }

    #[tokio::test]
    async fn test_only_recipient_can_mark_read() {
        // テスト項目: 既読にできるのは宛先ユーザーだけで、他人には存在しないように見える
        // given (前提条件):
        let repo = InMemoryNotificationRepository::new(Arc::new(FixedClock::new(0)));
        let created = repo
            .create(user(1), ChannelId::new(1).unwrap(), text("hello"))
            .await
            .unwrap();

        // when (操作):
        let by_other = repo.mark_read(user(2), created.id).await;
        let by_owner = repo.mark_read(user(1), created.id).await;
        let missing = repo.mark_read(user(1), 999).await;

        // then (期待する結果):
        assert_eq!(
            by_other,
            Err(RepositoryError::NotificationNotFound(created.id))
        );
        assert!(by_owner.unwrap().read);
        assert!(repo.list_for(user(1)).await[0].read);
        assert_eq!(missing, Err(RepositoryError::NotificationNotFound(999)));
    }
}
