use chrono::{DateTime, Utc};

use crate::ports::Clock;

/// システム時刻を返す時計
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
