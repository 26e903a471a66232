//! 順序保証レーン
//!
//! レーン（チャンネル、または 2 ユーザー間の会話）ごとに FIFO の非同期ロックを持ち、
//! 同じレーンのメッセージは受理された順に 1 件ずつ各接続のキューへ積まれます。
//! `tokio::sync::Mutex` は待機順にロックを渡すため、受理順がそのまま配送順になります。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::OrderingLane;

#[derive(Default)]
pub struct OrderingLanes {
    lanes: DashMap<OrderingLane, Arc<Mutex<()>>>,
}

impl OrderingLanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// レーンの順番を待ち、ガードを返す
    ///
    /// ガードを drop すると次の待機者に順番が移ります。
    pub async fn acquire(&self, lane: OrderingLane) -> LaneGuard<'_> {
        // エントリのガードは `.await` の前に手放す
        let mutex = self.lanes.entry(lane).or_default().value().clone();
        let guard = mutex.lock_owned().await;
        LaneGuard {
            lanes: self,
            lane,
            guard: Some(guard),
        }
    }

    /// 使用中・待機中のレーンの数
    pub fn active_lanes(&self) -> usize {
        self.lanes.len()
    }
}

pub struct LaneGuard<'a> {
    lanes: &'a OrderingLanes,
    lane: OrderingLane,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for LaneGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        // 誰も待っていなければレーンを片付ける
        self.lanes
            .lanes
            .remove_if(&self.lane, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}
