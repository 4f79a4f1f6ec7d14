//! 可注入的时钟，业务代码通过它获取当前时间

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定时钟，用于测试和批处理重放
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    current_time: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(current_time: DateTime<Utc>) -> Self {
        Self { current_time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.current_time
    }
}
