//! UseCase: 認証処理
//!
//! Bearer トークンを `IdentityProvider` で UserId に解決します。
//! 認証に失敗した接続はレジストリに登録される前に拒否されます。

use std::sync::Arc;

use crate::domain::{AuthError, IdentityProvider, UserId};

/// 認証のユースケース
pub struct AuthenticateUseCase {
    identity_provider: Arc<dyn IdentityProvider>,
}

impl AuthenticateUseCase {
    /// 新しい AuthenticateUseCase を作成
    pub fn new(identity_provider: Arc<dyn IdentityProvider>) -> Self {
        Self { identity_provider }
    }

    pub async fn execute(&self, token: &str) -> Result<UserId, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        self.identity_provider.authenticate(token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockIdentityProvider;

    #[tokio::test]
    async fn test_authenticate_valid_token() {
        // テスト項目: 有効なトークンは UserId に解決される
        // given (前提条件):
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_authenticate()
            .withf(|token| token == "secret")
            .returning(|_| Ok(UserId::new(3).unwrap()));
        let usecase = AuthenticateUseCase::new(Arc::new(provider));

        // when (操作):
        let result = usecase.execute(" secret ").await;

        // then (期待する結果):
        assert_eq!(result, Ok(UserId::new(3).unwrap()));
    }

    #[tokio::test]
    async fn test_authenticate_blank_token() {
        // テスト項目: 空のトークンは IdentityProvider に問い合わせずに拒否される
        // given (前提条件):
        let mut provider = MockIdentityProvider::new();
        provider.expect_authenticate().never();
        let usecase = AuthenticateUseCase::new(Arc::new(provider));

        // when (操作):
        let result = usecase.execute("   ").await;

        // then (期待する結果):
        assert_eq!(result, Err(AuthError::MissingCredential));
    }
}
