// Time Provider Port (for testability)

use chrono::{NaiveDateTime, Utc};

use crate::domain::Zone;

/// Clock and process default zone (allows mocking in tests)
#[cfg_attr(test, mockall::automock)]
pub trait TimeProvider: Send + Sync {
    /// Zone used wherever the payload conversions need "the default zone"
    fn default_zone(&self) -> Zone;

    /// Current wall-clock time in the default zone
    fn now_local(&self) -> NaiveDateTime;
}

/// System time provider (production)
pub struct SystemTimeProvider {
    default_zone: Zone,
}

impl SystemTimeProvider {
    pub fn new(default_zone: Zone) -> Self {
        Self { default_zone }
    }
}

impl Default for SystemTimeProvider {
    /// Uses the operating system zone
    fn default() -> Self {
        Self::new(Zone::system())
    }
}

impl TimeProvider for SystemTimeProvider {
    fn default_zone(&self) -> Zone {
        self.default_zone
    }

    fn now_local(&self) -> NaiveDateTime {
        let now = Utc::now().naive_utc();
        now + self.default_zone.offset_at_utc(&now)
    }
}

/// Frozen clock with an explicit default zone (deterministic tests, replays)
#[derive(Debug, Clone)]
pub struct FixedTimeProvider {
    default_zone: Zone,
    now_local: NaiveDateTime,
}

impl FixedTimeProvider {
    pub fn new(default_zone: Zone, now_local: NaiveDateTime) -> Self {
        Self {
            default_zone,
            now_local,
        }
    }
}

impl TimeProvider for FixedTimeProvider {
    fn default_zone(&self) -> Zone {
        self.default_zone
    }

    fn now_local(&self) -> NaiveDateTime {
        self.now_local
    }
}
