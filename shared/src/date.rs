//! 时间类型模块
//!
//! JWT 的 `exp` 声明以秒为单位，因此这里的 `Timestamp` 也以秒存储。
//! 当前时间由 chrono 提供（wasm 目标下走 `Date.now()`）。

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};
use std::time::Duration;

/// 秒级时间戳
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0
    }

    /// 当前时间
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp())
    }
}

impl From<i64> for Timestamp {
    fn from(secs: i64) -> Self {
        Self(secs)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.as_secs() as i64)
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self::Output {
        Self(self.0 - rhs.as_secs() as i64)
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = Duration;

    /// 两个时间戳之间的差值，负数截断为 0
    fn sub(self, rhs: Timestamp) -> Self::Output {
        Duration::from_secs((self.0 - rhs.0).max(0) as u64)
    }
}
