//! UseCase: ユーザーの登録・取得・更新と接続状況

use std::sync::Arc;

use crate::domain::{
    DisplayName, MessagePusher, PresenceSnapshot, User, UserId, UserRepository,
};

use super::error::UserError;

/// ユーザー登録のユースケース
pub struct RegisterUserUseCase {
    users: Arc<dyn UserRepository>,
}

impl RegisterUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// ユーザーを作成し、認証トークンと一緒に返す
    pub async fn execute(
        &self,
        name: DisplayName,
        avatar_url: Option<String>,
    ) -> Result<(User, String), UserError> {
        Ok(self.users.create_user(name, avatar_url).await?)
    }
}

/// ユーザー取得のユースケース
pub struct GetUserUseCase {
    users: Arc<dyn UserRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            users,
            message_pusher,
        }
    }

    /// ユーザーと、生きている接続を持つかどうか
    pub async fn execute(&self, user_id: UserId) -> Result<(User, bool), UserError> {
        let user = self.users.get_user(user_id).await?;
        Ok((user, self.message_pusher.is_online(user_id)))
    }
}

/// ユーザー更新のユースケース
pub struct UpdateUserUseCase {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserUseCase {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// 自分自身のプロフィールだけを更新できる
    pub async fn execute(
        &self,
        actor: UserId,
        target: UserId,
        name: DisplayName,
        avatar_url: Option<String>,
    ) -> Result<User, UserError> {
        if actor != target {
            return Err(UserError::AuthorizationFailure { actor, target });
        }
        Ok(self.users.update_user(target, name, avatar_url).await?)
    }
}

/// 接続状況取得のユースケース
pub struct GetPresenceUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl GetPresenceUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub fn execute(&self) -> PresenceSnapshot {
        self.message_pusher.presence()
    }
}
