//! Commit schedule generation
//!
//! Turns coarse activity parameters into a concrete, ordered stream of commit
//! timestamps. Three pull-based stages:
//!
//! - [`WorkingDayWalker`] picks the active dates of each week
//! - [`DailyTimeSampler`] picks the times of day for one active date
//! - [`CommitSchedule`] flattens the two into one ascending stream
//!
//! All randomness comes from an injected generator, so a fixed seed gives a
//! fixed schedule.
//!
//! # Example
//!
//! ```
//! use backfill::models::{DailyVolumePolicy, DateRange, WeeklyActivityPolicy};
//! use backfill::schedule::ScheduleParams;
//! use chrono::NaiveDate;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let params = ScheduleParams {
//!     range: DateRange::new(
//!         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
//!     )
//!     .unwrap(),
//!     weekly: WeeklyActivityPolicy::new(2, 4, false).unwrap(),
//!     daily: DailyVolumePolicy::new(1, 3, false).unwrap(),
//! };
//!
//! let timestamps: Vec<_> = params.timestamps(ChaCha8Rng::seed_from_u64(7)).collect();
//! assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
//! ```

pub mod daily_times;
pub mod stream;
pub mod working_days;

pub use daily_times::DailyTimeSampler;
pub use stream::CommitSchedule;
pub use working_days::{draw_week, ActiveDays, WorkingDayWalker};

use crate::models::{DailyVolumePolicy, DateRange, WeeklyActivityPolicy};
use rand::Rng;

/// Everything the schedule generator needs for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleParams {
    pub range: DateRange,
    pub weekly: WeeklyActivityPolicy,
    pub daily: DailyVolumePolicy,
}

impl ScheduleParams {
    /// Start a fresh timestamp stream driven by `rng`.
    ///
    /// Each call yields an independent schedule; the stream itself can only be
    /// walked once.
    pub fn timestamps<R: Rng>(&self, rng: R) -> CommitSchedule<R> {
        CommitSchedule::new(self.range, self.weekly, self.daily, rng)
    }
}
