//! 時刻の取得と表示。
//!
//! 保存される時刻はすべて Unix エポックからのミリ秒で、表示するときだけ
//! JST に変換する。取得元は [`Clock`] で差し替えられる。

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};

/// JST (UTC+9)
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// 現在時刻の取得元
pub trait Clock: Send + Sync {
    /// Unix エポックからのミリ秒
    fn now_millis(&self) -> i64;
}

/// OS の時計をそのまま読む実装
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        unix_millis_now()
    }
}

/// テスト用の時計。`advance` で明示的に進めない限り止まっている。
#[derive(Debug, Default)]
pub struct FixedClock {
    millis: AtomicI64,
}

impl FixedClock {
    pub fn new(millis: i64) -> Self {
        Self {
            millis: AtomicI64::new(millis),
        }
    }

    /// 時計を `delta_millis` だけ進める
    pub fn advance(&self, delta_millis: i64) {
        self.millis.fetch_add(delta_millis, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.millis.load(Ordering::SeqCst)
    }
}

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// 現在の Unix ミリ秒
pub fn unix_millis_now() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix ミリ秒を JST の RFC 3339 文字列にする。
///
/// 表現できない値はエポックとして表示する。
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    let at = DateTime::<Utc>::from_timestamp_millis(timestamp_millis).unwrap_or_default();
    at.with_timezone(&jst()).to_rfc3339()
}
