//! Time-derived identifiers.
//!
//! Custom pictograms and saved phrases are keyed by the millisecond they were
//! created.  [`IdClock`] hands out strictly increasing millisecond stamps so
//! two entries minted within the same millisecond still get distinct ids.

use chrono::{DateTime, Utc};

/// Stored stamps further than this ahead of the wall clock are not trusted
/// as a floor.
const MAX_SEED_LEAD_MS: i64 = 365 * 24 * 60 * 60 * 1000;

/// Monotonic millisecond stamp source.
#[derive(Debug, Default)]
pub struct IdClock {
    last: i64,
}

impl IdClock {
    /// Create a clock whose next stamp is strictly greater than `floor`.
    ///
    /// Seed with the largest stamp already persisted so reloaded ids are never
    /// reissued.  A floor more than a year in the future comes from corrupt
    /// data and is ignored.
    pub fn starting_after(floor: i64) -> Self {
        let horizon = Utc::now().timestamp_millis().saturating_add(MAX_SEED_LEAD_MS);
        if floor > horizon {
            log::warn!("clock: ignoring implausible stored stamp {floor}");
            return Self::default();
        }
        Self { last: floor }
    }

    /// Next stamp: the current wall-clock millisecond, bumped past the
    /// previous stamp when the clock has not advanced.
    pub fn next(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let millis = now.timestamp_millis().max(self.last.saturating_add(1));
        self.last = millis;
        DateTime::from_timestamp_millis(millis).unwrap_or(now)
    }
}
