//! InMemory Channel Repository 実装
//!
//! チャンネルとメンバーシップ（役割つき）の正本です。`members_of` は読み取りロック下で
//! コピーを返すので、メンバーシップの変更は完了後に解決されたメッセージにだけ反映されます。
//! 「管理者が最低 1 人残る」という条件は書き込みロック下で確認します。

use std::{
    collections::{BTreeMap, BTreeSet},
    num::NonZeroU64,
    sync::Arc,
};

use async_trait::async_trait;
use parking_lot::RwLock;

use kairo_shared::time::Clock;

use crate::domain::{
    Channel, ChannelId, ChannelMember, ChannelRepository, DisplayName, MemberRole,
    RepositoryError, Timestamp, UserId,
};

type Roster = BTreeMap<UserId, MemberRole>;

struct ChannelTable {
    channels: BTreeMap<ChannelId, Channel>,
    members: BTreeMap<ChannelId, Roster>,
    next_id: NonZeroU64,
}

impl ChannelTable {
    fn roster(&self, channel_id: ChannelId) -> Result<&Roster, RepositoryError> {
        self.members
            .get(&channel_id)
            .ok_or(RepositoryError::ChannelNotFound(channel_id))
    }

    fn roster_mut(&mut self, channel_id: ChannelId) -> Result<&mut Roster, RepositoryError> {
        self.members
            .get_mut(&channel_id)
            .ok_or(RepositoryError::ChannelNotFound(channel_id))
    }
}

/// `user_id` が唯一の管理者か
fn is_sole_admin(roster: &Roster, user_id: UserId) -> bool {
    roster.get(&user_id) == Some(&MemberRole::Admin)
        && roster.values().filter(|r| **r == MemberRole::Admin).count() == 1
}

/// インメモリ Channel Repository 実装
pub struct InMemoryChannelRepository {
    table: RwLock<ChannelTable>,
    clock: Arc<dyn Clock>,
}

impl InMemoryChannelRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: RwLock::new(ChannelTable {
                channels: BTreeMap::new(),
                members: BTreeMap::new(),
                next_id: NonZeroU64::MIN,
            }),
            clock,
        }
    }
}

#[async_trait]
impl ChannelRepository for InMemoryChannelRepository {
    async fn create_channel(
        &self,
        name: DisplayName,
        creator: UserId,
        avatar_url: Option<String>,
    ) -> Result<Channel, RepositoryError> {
        let created_at = Timestamp::new(self.clock.now_millis());

        let mut table = self.table.write();
        let id = ChannelId::from(table.next_id);
        table.next_id = table.next_id.saturating_add(1);
        let channel = Channel {
            id,
            name,
            creator,
            avatar_url,
            created_at,
        };
        table.channels.insert(id, channel.clone());
        table
            .members
            .insert(id, BTreeMap::from([(creator, MemberRole::Admin)]));

        tracing::info!("Channel {} created by user {}", id, creator);
        Ok(channel)
    }

    async fn list_channels(&self) -> Vec<Channel> {
        self.table.read().channels.values().cloned().collect()
    }

    async fn search_channels(&self, query: &str) -> Vec<Channel> {
        let needle = query.trim().to_lowercase();
        self.table
            .read()
            .channels
            .values()
            .filter(|channel| channel.name.as_str().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    async fn get_channel(&self, channel_id: ChannelId) -> Result<Channel, RepositoryError> {
        self.table
            .read()
            .channels
            .get(&channel_id)
            .cloned()
            .ok_or(RepositoryError::ChannelNotFound(channel_id))
    }

    async fn channel_exists(&self, channel_id: ChannelId) -> bool {
        self.table.read().channels.contains_key(&channel_id)
    }

    async fn members_of(
        &self,
        channel_id: ChannelId,
    ) -> Result<BTreeSet<UserId>, RepositoryError> {
        Ok(self.table.read().roster(channel_id)?.keys().copied().collect())
    }

    async fn is_member(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        Ok(self.table.read().roster(channel_id)?.contains_key(&user_id))
    }

    async fn list_members(
        &self,
        channel_id: ChannelId,
    ) -> Result<Vec<ChannelMember>, RepositoryError> {
        Ok(self
            .table
            .read()
            .roster(channel_id)?
            .iter()
            .map(|(&user_id, &role)| ChannelMember { user_id, role })
            .collect())
    }

    async fn role_of(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<Option<MemberRole>, RepositoryError> {
        Ok(self.table.read().roster(channel_id)?.get(&user_id).copied())
    }

    async fn add_member(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let mut table = self.table.write();
        let roster = table.roster_mut(channel_id)?;
        if roster.contains_key(&user_id) {
            return Err(RepositoryError::AlreadyMember {
                channel_id,
                user_id,
            });
        }
        roster.insert(user_id, MemberRole::Member);
        tracing::info!("User {} joined channel {}", user_id, channel_id);
        Ok(())
    }

    async fn remove_member(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<(), RepositoryError> {
        let mut table = self.table.write();
        let roster = table.roster_mut(channel_id)?;
        if !roster.contains_key(&user_id) {
            return Err(RepositoryError::NotMember {
                channel_id,
                user_id,
            });
        }
        // 最後の 1 人なら管理者でも抜けられる
        if roster.len() > 1 && is_sole_admin(roster, user_id) {
            return Err(RepositoryError::LastAdmin(channel_id));
        }
        roster.remove(&user_id);
        tracing::info!("User {} left channel {}", user_id, channel_id);
        Ok(())
    }

    async fn set_role(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
        role: MemberRole,
    ) -> Result<ChannelMember, RepositoryError> {
        let mut table = self.table.write();
        let roster = table.roster_mut(channel_id)?;
        if !roster.contains_key(&user_id) {
            return Err(RepositoryError::NotMember {
                channel_id,
                user_id,
            });
        }
        if role != MemberRole::Admin && is_sole_admin(roster, user_id) {
            return Err(RepositoryError::LastAdmin(channel_id));
        }
        roster.insert(user_id, role);
        tracing::info!(
            "User {} is now {:?} of channel {}",
            user_id,
            role,
            channel_id
        );
        Ok(ChannelMember { user_id, role })
    }
}
