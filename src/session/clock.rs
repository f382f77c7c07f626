//! Wall-clock source for token timestamps and expiry checks

use chrono::Utc;

/// Source of the current unix time in whole seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// The real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // Clocks set before 1970 are treated as the epoch
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}
