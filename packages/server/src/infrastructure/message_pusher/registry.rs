//! 接続レジストリ
//!
//! `UserId → {ConnectionId → ConnectionHandle}` のマップを保持します。
//!
//! ## 並行性
//!
//! - `DashMap` のシャード単位ロックにより、あるユーザーの変更が無関係なユーザーの
//!   操作をブロックしない
//! - ロックはマップ操作の間だけ保持し、`.await` をまたがない
//! - `connections_for` はシャードの読み取りガード下でコピーを取るので、
//!   変更途中の集合が見えることはない

use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use dashmap::DashMap;

use crate::domain::{ConnectionHandle, ConnectionId, PresenceSnapshot, RegistryError, UserId};

pub struct ConnectionRegistry {
    connections: DashMap<UserId, HashMap<ConnectionId, ConnectionHandle>>,
    connection_count: AtomicUsize,
    max_connections: usize,
}

impl ConnectionRegistry {
    /// 新しい ConnectionRegistry を作成
    ///
    /// `max_connections` はプロセス全体で同時に保持できる接続数の上限です。
    pub fn new(max_connections: usize) -> Self {
        Self {
            connections: DashMap::new(),
            connection_count: AtomicUsize::new(0),
            max_connections,
        }
    }

    /// 接続を登録する
    ///
    /// 同じ接続の二重登録と、所有者以外のユーザーへの登録は不変条件違反として拒否します。
    pub fn register(&self, user_id: UserId, handle: ConnectionHandle) -> Result<(), RegistryError> {
        let connection_id = handle.id();
        if handle.user_id() != user_id {
            return Err(RegistryError::OwnerMismatch {
                connection_id,
                owner: handle.user_id(),
                requested: user_id,
            });
        }

        // 先に枠を確保し、登録できなければ返却する
        let max = self.max_connections;
        self.connection_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < max).then_some(count + 1)
            })
            .map_err(|_| RegistryError::CapacityExhausted { max })?;

        let mut entry = self.connections.entry(user_id).or_default();
        if entry.contains_key(&connection_id) {
            drop(entry);
            self.connection_count.fetch_sub(1, Ordering::AcqRel);
            return Err(RegistryError::AlreadyRegistered(connection_id));
        }
        entry.insert(connection_id, handle);

        tracing::debug!(
            "Connection '{}' registered for user {}",
            connection_id,
            user_id
        );
        Ok(())
    }

    /// 接続を登録解除する
    ///
    /// この呼び出しで取り除いた場合のみ `true`。未登録・解除済みの接続は何もしない。
    pub fn unregister(&self, user_id: UserId, connection_id: ConnectionId) -> bool {
        let removed = match self.connections.get_mut(&user_id) {
            Some(mut set) => set.remove(&connection_id).is_some(),
            None => false,
        };
        if !removed {
            return false;
        }

        self.connection_count.fetch_sub(1, Ordering::AcqRel);
        // 空になったエントリは削除する（判定と削除はシャードロック下で原子的）
        self.connections.remove_if(&user_id, |_, set| set.is_empty());

        tracing::debug!(
            "Connection '{}' unregistered for user {}",
            connection_id,
            user_id
        );
        true
    }

    /// 呼び出し時点の接続のスナップショット
    pub fn connections_for(&self, user_id: UserId) -> Vec<ConnectionHandle> {
        self.connections
            .get(&user_id)
            .map(|set| set.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_online(&self, user_id: UserId) -> bool {
        self.connections
            .get(&user_id)
            .is_some_and(|set| !set.is_empty())
    }

    pub fn connection_count(&self) -> usize {
        self.connection_count.load(Ordering::Acquire)
    }

    pub fn presence(&self) -> PresenceSnapshot {
        let mut online_users: Vec<UserId> = self
            .connections
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| *entry.key())
            .collect();
        online_users.sort();

        PresenceSnapshot {
            online_users,
            connection_count: self.connection_count(),
        }
    }
}
