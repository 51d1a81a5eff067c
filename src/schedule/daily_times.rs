//! Time-of-day sampling for a single active day

use crate::models::DailyVolumePolicy;
use chrono::NaiveTime;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Centre of the commit-hour distribution (2pm).
const PEAK_HOUR: f64 = 14.0;

/// Standard deviation of the commit-hour distribution, in hours.
const HOUR_SPREAD: f64 = 2.0;

/// Draws the commit times for one day.
#[derive(Debug, Clone, Copy)]
pub struct DailyTimeSampler {
    policy: DailyVolumePolicy,
}

impl DailyTimeSampler {
    pub fn new(policy: DailyVolumePolicy) -> Self {
        Self { policy }
    }

    /// Draw the commit count for the day and that many times, ascending.
    ///
    /// Identical times are kept.
    pub fn sample_day<R: Rng>(&self, rng: &mut R) -> Vec<NaiveTime> {
        let count = rng.random_range(self.policy.min_per_day()..=self.policy.max_per_day());
        let mut times: Vec<NaiveTime> = (0..count).map(|_| self.sample_time(rng)).collect();
        times.sort_unstable();
        times
    }

    fn sample_time<R: Rng>(&self, rng: &mut R) -> NaiveTime {
        let hour = self.sample_hour(rng);
        let minute = rng.random_range(0..=59);
        let second = rng.random_range(0..=59);
        NaiveTime::from_hms_opt(hour, minute, second).unwrap_or_default()
    }

    /// Normal around early afternoon, truncated then clamped to the allowed hours.
    ///
    /// Out-of-range draws pile up on the boundary hours instead of being redrawn.
    fn sample_hour<R: Rng>(&self, rng: &mut R) -> u32 {
        let z: f64 = StandardNormal.sample(rng);
        clamp_hour(
            PEAK_HOUR + HOUR_SPREAD * z,
            self.policy.earliest_hour(),
            self.policy.latest_hour(),
        )
    }
}

fn clamp_hour(raw: f64, earliest: u32, latest: u32) -> u32 {
    // `as` saturates, and NaN becomes 0
    let truncated = raw.trunc() as i64;
    truncated.clamp(i64::from(earliest), i64::from(latest)) as u32
}
