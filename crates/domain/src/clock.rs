//! # Clock（時刻プロバイダ）
//!
//! 作成日時（`createdOn`）と履歴参照の基準時刻（as of）を決めるための抽象化。
//! ユースケースは `Utc::now()` を直接呼ばず、注入された [`Clock`] から時刻を得る。

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 手動で進める時計（テスト用）
///
/// 生成時の時刻を返し続け、[`advance`](ManualClock::advance) を呼んだときだけ進む。
/// 履歴の期間境界のように「変更の前後で時刻が異なる」ことを確認するテストで使う。
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// 時刻を `duration` だけ進める
    pub fn advance(&self, duration: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
