//! UseCase: チャンネルのメンバーシップとロールの管理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - メンバーの追加・削除・ロール変更の権限ルール
//!   - 追加: 呼び出し元が管理者かモデレーターであること、追加するユーザーが存在すること
//!   - 削除: 自分自身の退出、または相手より強いロールを持つメンバーによる削除
//!   - ロール変更: 管理者だけ
//!
//! ### どのような状況を想定しているか
//! - 正常系：管理者・モデレーターによる追加、自分の退出、管理者によるモデレーターの削除
//! - 異常系：一般メンバー・非メンバーによる追加、モデレーターによるモデレーターの削除、
//!   最後の管理者の降格、存在しないユーザー

use std::sync::Arc;

use crate::domain::{
    ChannelId, ChannelMember, ChannelRepository, MemberRole, UserId, UserRepository,
};

use super::error::ChannelError;

/// メンバーシップ管理のユースケース
pub struct ChannelMemberUseCase {
    channels: Arc<dyn ChannelRepository>,
    users: Arc<dyn UserRepository>,
}

impl ChannelMemberUseCase {
    pub fn new(channels: Arc<dyn ChannelRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { channels, users }
    }

    /// 現在のメンバーとロール
    pub async fn members(&self, channel_id: ChannelId) -> Result<Vec<ChannelMember>, ChannelError> {
        Ok(self.channels.list_members(channel_id).await?)
    }

    /// `actor` のロール。メンバーでなければ権限エラー
    async fn actor_role(
        &self,
        channel_id: ChannelId,
        actor: UserId,
    ) -> Result<MemberRole, ChannelError> {
        self.channels
            .role_of(channel_id, actor)
            .await?
            .ok_or(ChannelError::AuthorizationFailure {
                channel_id,
                user_id: actor,
            })
    }

    /// `actor` が `user_id` をチャンネルに追加する
    pub async fn add(
        &self,
        actor: UserId,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<(), ChannelError> {
        if !self.actor_role(channel_id, actor).await?.can_add_members() {
            return Err(ChannelError::AuthorizationFailure {
                channel_id,
                user_id: actor,
            });
        }
        self.users.get_user(user_id).await?;
        self.channels.add_member(channel_id, user_id).await?;
        Ok(())
    }

    /// `actor` が `user_id` をチャンネルから外す
    ///
    /// 解決済みのメッセージには影響しません。以降に解決されるメッセージから外れます。
    pub async fn remove(
        &self,
        actor: UserId,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<(), ChannelError> {
        if actor != user_id {
            let actor_role = self.actor_role(channel_id, actor).await?;
            let target_role = self.channels.role_of(channel_id, user_id).await?.ok_or(
                ChannelError::NotMember {
                    channel_id,
                    user_id,
                },
            )?;
            if !actor_role.can_remove(target_role) {
                return Err(ChannelError::AuthorizationFailure {
                    channel_id,
                    user_id: actor,
                });
            }
        }
        self.channels.remove_member(channel_id, user_id).await?;
        Ok(())
    }

    /// `actor` が `user_id` のロールを変更する
    pub async fn set_role(
        &self,
        actor: UserId,
        channel_id: ChannelId,
        user_id: UserId,
        role: MemberRole,
    ) -> Result<ChannelMember, ChannelError> {
        if !self.actor_role(channel_id, actor).await?.can_assign_roles() {
            return Err(ChannelError::AuthorizationFailure {
                channel_id,
                user_id: actor,
            });
        }
        Ok(self.channels.set_role(channel_id, user_id, role).await?)
    }
}
