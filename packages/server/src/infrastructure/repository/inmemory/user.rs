//! InMemory User Repository 実装
//!
//! ユーザーの保存に加えて、発行したトークンから UserId を引く
//! `IdentityProvider` も実装します。

use std::{collections::HashMap, num::NonZeroU64, sync::Arc};

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use kairo_shared::time::Clock;

use crate::domain::{
    AuthError, DisplayName, IdentityProvider, RepositoryError, Timestamp, User, UserId,
    UserRepository,
};

struct UserTable {
    users: HashMap<UserId, User>,
    tokens: HashMap<String, UserId>,
    next_id: NonZeroU64,
}

impl UserTable {
    fn new() -> Self {
        Self {
            users: HashMap::new(),
            tokens: HashMap::new(),
            next_id: NonZeroU64::MIN,
        }
    }
}

/// インメモリ User Repository 実装
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RwLock::new(UserTable::new()),
            clock,
        }
    }

    fn issue_token() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(
        &self,
        name: DisplayName,
        avatar_url: Option<String>,
    ) -> Result<(User, String), RepositoryError> {
        let created_at = Timestamp::new(self.clock.now_millis());
        let token = Self::issue_token();

        let mut table = self.table.write();
        let id = UserId::from(table.next_id);
        table.next_id = table.next_id.saturating_add(1);
        let user = User {
            id,
            name,
            avatar_url,
            created_at,
        };
        table.users.insert(id, user.clone());
        table.tokens.insert(token.clone(), id);

        tracing::info!("User {} created", id);
        Ok((user, token))
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, RepositoryError> {
        self.table
            .read()
            .users
            .get(&user_id)
            .cloned()
            .ok_or(RepositoryError::UserNotFound(user_id))
    }

    async fn update_user(
        &self,
        user_id: UserId,
        name: DisplayName,
        avatar_url: Option<String>,
    ) -> Result<User, RepositoryError> {
        let mut table = self.table.write();
        let user = table
            .users
            .get_mut(&user_id)
            .ok_or(RepositoryError::UserNotFound(user_id))?;
        user.name = name;
        user.avatar_url = avatar_url;
        Ok(user.clone())
    }
}

#[async_trait]
impl IdentityProvider for InMemoryUserRepository {
    async fn authenticate(&self, token: &str) -> Result<UserId, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        self.table
            .read()
            .tokens
            .get(token)
            .copied()
            .ok_or(AuthError::InvalidCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kairo_shared::time::FixedClock;

    fn create_test_repository() -> InMemoryUserRepository {
        InMemoryUserRepository::new(Arc::new(FixedClock::new(1_000)))
    }

    fn name(value: &str) -> DisplayName {
        DisplayName::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_user_assigns_sequential_ids() {
        // テスト項目: ユーザー ID は 1 から順に採番される
        // given (前提条件):
        let repo = create_test_repository();

        // when (操作):
        let (alice, _) = repo.create_user(name("alice"), None).await.unwrap();
        let (bob, _) = repo.create_user(name("bob"), None).await.unwrap();

        // then (期待する結果):
        assert_eq!(alice.id.value(), 1);
        assert_eq!(bob.id.value(), 2);
        assert_eq!(alice.created_at.value(), 1_000);
    }

    #[tokio::test]
    async fn test_issued_token_authenticates_user() {
        // テスト項目: 発行したトークンでユーザーを認証できる
        // given (前提条件):
        let repo = create_test_repository();
        let (alice, token) = repo.create_user(name("alice"), None).await.unwrap();

        // when (操作):
        let result = repo.authenticate(&token).await;

        // then (期待する結果):
        assert_eq!(result, Ok(alice.id));
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        // テスト項目: 未発行のトークンや空のトークンは拒否される
        // given (前提条件):
        let repo = create_test_repository();
        repo.create_user(name("alice"), None).await.unwrap();

        // when (操作):
        let unknown = repo.authenticate("not-a-token").await;
        let empty = repo.authenticate("").await;

        // then (期待する結果):
        assert_eq!(unknown, Err(AuthError::InvalidCredential));
        assert_eq!(empty, Err(AuthError::MissingCredential));
    }

    #[tokio::test]
    async fn test_update_user() {
        // テスト項目: ユーザーの名前とアバターを更新できる
        // given (前提条件):
        let repo = create_test_repository();
        let (alice, _) = repo.create_user(name("alice"), None).await.unwrap();

        // when (操作):
        let updated = repo
            .update_user(alice.id, name("alice2"), Some("https://example.com/a.png".into()))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(updated.name.as_str(), "alice2");
        assert_eq!(repo.get_user(alice.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        // テスト項目: 存在しないユーザーの取得はエラーになる
        // given (前提条件):
        let repo = create_test_repository();
        let unknown = UserId::new(99).unwrap();

        // when (操作):
        let result = repo.get_user(unknown).await;

        // then (期待する結果):
        assert_eq!(result, Err(RepositoryError::UserNotFound(unknown)));
    }
}
