//! Flattened commit timestamp stream

use super::daily_times::DailyTimeSampler;
use super::working_days::WorkingDayWalker;
use crate::models::{CommitTimestamp, DailyVolumePolicy, DateRange, WeeklyActivityPolicy};
use chrono::{NaiveDate, NaiveTime};
use rand::Rng;
use std::vec;
use tracing::debug;

/// Lazy, ascending stream of commit timestamps over a date range.
///
/// For every active date the sampler is invoked afresh, so daily volumes are
/// independent. The stream owns the generator and lends it to the day walker
/// and the sampler in turn.
#[derive(Debug)]
pub struct CommitSchedule<R> {
    rng: R,
    days: WorkingDayWalker,
    sampler: DailyTimeSampler,
    current: Option<(NaiveDate, vec::IntoIter<NaiveTime>)>,
}

impl<R: Rng> CommitSchedule<R> {
    pub fn new(
        range: DateRange,
        weekly: WeeklyActivityPolicy,
        daily: DailyVolumePolicy,
        rng: R,
    ) -> Self {
        Self {
            rng,
            days: WorkingDayWalker::new(range, weekly),
            sampler: DailyTimeSampler::new(daily),
            current: None,
        }
    }
}

impl<R: Rng> Iterator for CommitSchedule<R> {
    type Item = CommitTimestamp;

    fn next(&mut self) -> Option<CommitTimestamp> {
        loop {
            if let Some((date, times)) = self.current.as_mut() {
                if let Some(time) = times.next() {
                    return Some(CommitTimestamp::new(*date, time));
                }
            }

            let date = self.days.next_date(&mut self.rng)?;
            let times = self.sampler.sample_day(&mut self.rng);
            debug!("Scheduled {} commits on {}", times.len(), date);
            self.current = Some((date, times.into_iter()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn schedule(
        from: NaiveDate,
        to: NaiveDate,
        weekly: WeeklyActivityPolicy,
        daily: DailyVolumePolicy,
        seed: u64,
    ) -> Vec<CommitTimestamp> {
        CommitSchedule::new(
            DateRange::new(from, to).unwrap(),
            weekly,
            daily,
            ChaCha8Rng::seed_from_u64(seed),
        )
        .collect()
    }

    #[test]
    fn test_first_week_of_2024() {
        let weekly = WeeklyActivityPolicy::new(5, 5, false).unwrap();
        let daily = DailyVolumePolicy::new(2, 4, false).unwrap();
        let stamps = schedule(date(2024, 1, 1), date(2024, 1, 7), weekly, daily, 12);

        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for stamp in &stamps {
            *per_day.entry(stamp.date).or_default() += 1;
            assert!((9..=17).contains(&stamp.time.hour()));
        }
        assert_eq!(
            per_day.keys().copied().collect::<Vec<_>>(),
            (1..=5).map(|d| date(2024, 1, d)).collect::<Vec<_>>()
        );
        assert!(per_day.values().all(|n| (2..=4).contains(n)));
    }

    #[test]
    fn test_stream_is_sorted() {
        let weekly = WeeklyActivityPolicy::new(1, 7, true).unwrap();
        let daily = DailyVolumePolicy::new(1, 10, true).unwrap();
        for seed in 0..10 {
            let stamps = schedule(date(2023, 1, 1), date(2023, 12, 31), weekly, daily, seed);
            assert!(!stamps.is_empty());
            assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn test_single_day_shares_date() {
        let weekly = WeeklyActivityPolicy::new(7, 7, true).unwrap();
        let daily = DailyVolumePolicy::new(3, 3, true).unwrap();
        let stamps = schedule(date(2024, 2, 29), date(2024, 2, 29), weekly, daily, 4);
        assert_eq!(stamps.len(), 3);
        assert!(stamps.iter().all(|s| s.date == date(2024, 2, 29)));
    }

    #[test]
    fn test_no_weekend_commits() {
        let weekly = WeeklyActivityPolicy::new(1, 5, false).unwrap();
        let daily = DailyVolumePolicy::new(1, 2, false).unwrap();
        let stamps = schedule(date(2022, 5, 1), date(2022, 8, 1), weekly, daily, 99);
        assert!(stamps
            .iter()
            .all(|s| s.date.weekday().num_days_from_monday() < 5));
    }

    #[test]
    fn test_total_bounded_by_range_and_volume() {
        let weekly = WeeklyActivityPolicy::new(7, 7, true).unwrap();
        let daily = DailyVolumePolicy::new(1, 4, true).unwrap();
        let stamps = schedule(date(2024, 3, 1), date(2024, 3, 10), weekly, daily, 2);
        assert!(stamps.len() >= 10 && stamps.len() <= 40);
    }

    #[test]
    fn test_runs_differ_without_shared_seed() {
        let weekly = WeeklyActivityPolicy::new(1, 5, false).unwrap();
        let daily = DailyVolumePolicy::new(1, 10, false).unwrap();
        let a = schedule(date(2024, 1, 1), date(2024, 6, 30), weekly, daily, 1);
        let b = schedule(date(2024, 1, 1), date(2024, 6, 30), weekly, daily, 2);
        assert_ne!(a, b);
    }
}
