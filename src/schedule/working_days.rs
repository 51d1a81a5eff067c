//! Working-day selection
//!
//! Walks a date range one day at a time. Every Monday (and on the first day
//! walked) a new set of active weekdays is drawn for the week; a walked day is
//! emitted only when its weekday is in that set.

use crate::models::{ActiveWeekdays, DateRange, WeeklyActivityPolicy};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::Rng;
use tracing::trace;

/// Draw the active weekday slots for one week.
///
/// The day count is uniform in `[min, min(max, pool)]`, then that many distinct
/// slots are picked uniformly from `0..pool`.
pub fn draw_week<R: Rng>(policy: &WeeklyActivityPolicy, rng: &mut R) -> ActiveWeekdays {
    let pool = policy.pool_size();
    let count = rng.random_range(policy.min_days_per_week()..=policy.effective_max());
    let slots = rand::seq::index::sample(rng, pool as usize, count as usize);
    ActiveWeekdays::from_slots(slots.into_iter().map(|slot| slot as u32))
}

/// Resumable walk over a date range that yields active days.
///
/// The walker holds no random source of its own; callers lend one on every
/// step so it can share a generator with other stages.
#[derive(Debug, Clone)]
pub struct WorkingDayWalker {
    policy: WeeklyActivityPolicy,
    next: Option<NaiveDate>,
    last: NaiveDate,
    week: Option<ActiveWeekdays>,
}

impl WorkingDayWalker {
    pub fn new(range: DateRange, policy: WeeklyActivityPolicy) -> Self {
        Self {
            policy,
            next: Some(range.from_date()),
            last: range.to_date(),
            week: None,
        }
    }

    /// Advance to the next active day, or `None` once the range is exhausted.
    pub fn next_date<R: Rng>(&mut self, rng: &mut R) -> Option<NaiveDate> {
        while let Some(date) = self.next.filter(|d| *d <= self.last) {
            self.next = date.succ_opt();

            let week = match self.week {
                Some(week) if date.weekday() != Weekday::Mon => week,
                _ => {
                    let week = draw_week(&self.policy, rng);
                    trace!("Week of {}: {} active days", date, week.len());
                    self.week = Some(week);
                    week
                }
            };

            if week.contains(date) {
                return Some(date);
            }
        }
        self.next = None;
        None
    }

    /// Bind a random source, turning the walker into a plain iterator.
    pub fn with_rng<R: Rng>(self, rng: R) -> ActiveDays<R> {
        ActiveDays { walker: self, rng }
    }
}

/// [`WorkingDayWalker`] paired with its own generator.
#[derive(Debug)]
pub struct ActiveDays<R> {
    walker: WorkingDayWalker,
    rng: R,
}

impl<R: Rng> Iterator for ActiveDays<R> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        self.walker.next_date(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn active_days(
        from: NaiveDate,
        to: NaiveDate,
        policy: WeeklyActivityPolicy,
        seed: u64,
    ) -> Vec<NaiveDate> {
        let range = DateRange::new(from, to).unwrap();
        WorkingDayWalker::new(range, policy)
            .with_rng(ChaCha8Rng::seed_from_u64(seed))
            .collect()
    }

    #[test]
    fn test_full_workweek_selects_monday_to_friday() {
        let policy = WeeklyActivityPolicy::new(5, 5, false).unwrap();
        let days = active_days(date(2024, 1, 1), date(2024, 1, 7), policy, 1);
        assert_eq!(
            days,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 2),
                date(2024, 1, 3),
                date(2024, 1, 4),
                date(2024, 1, 5),
            ]
        );
    }

    #[test]
    fn test_full_week_with_weekends_selects_every_day() {
        let policy = WeeklyActivityPolicy::new(7, 7, true).unwrap();
        let days = active_days(date(2024, 1, 3), date(2024, 1, 16), policy, 9);
        assert_eq!(days.len(), 14);
    }

    #[test]
    fn test_weekly_counts_within_bounds() {
        let policy = WeeklyActivityPolicy::new(2, 4, false).unwrap();
        // 2024-01-01 is a Monday, 2024-03-31 a Sunday: 13 whole weeks
        for seed in 0..20 {
            let days = active_days(date(2024, 1, 1), date(2024, 3, 31), policy, seed);
            let mut per_week: BTreeMap<u32, u32> = BTreeMap::new();
            for day in &days {
                *per_week.entry(day.iso_week().week()).or_default() += 1;
                assert!(day.weekday().num_days_from_monday() < 5);
            }
            assert_eq!(per_week.len(), 13);
            assert!(per_week.values().all(|n| (2..=4).contains(n)));
        }
    }

    #[test]
    fn test_max_above_pool_is_clamped() {
        let policy = WeeklyActivityPolicy::new(5, 7, false).unwrap();
        let days = active_days(date(2024, 1, 1), date(2024, 1, 14), policy, 3);
        assert_eq!(days.len(), 10);
        assert!(days
            .iter()
            .all(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn test_partial_week_filtered_by_range() {
        // Thursday to Sunday of one week, every weekday active
        let policy = WeeklyActivityPolicy::new(5, 5, false).unwrap();
        let days = active_days(date(2024, 1, 4), date(2024, 1, 7), policy, 5);
        assert_eq!(days, vec![date(2024, 1, 4), date(2024, 1, 5)]);
    }

    #[test]
    fn test_single_day_range() {
        let policy = WeeklyActivityPolicy::new(7, 7, true).unwrap();
        let days = active_days(date(2024, 1, 6), date(2024, 1, 6), policy, 0);
        assert_eq!(days, vec![date(2024, 1, 6)]);
    }

    #[test]
    fn test_weekend_only_range_without_weekends_is_empty() {
        let policy = WeeklyActivityPolicy::new(5, 5, false).unwrap();
        let days = active_days(date(2024, 1, 6), date(2024, 1, 7), policy, 0);
        assert!(days.is_empty());
    }

    #[test]
    fn test_same_seed_same_days() {
        let policy = WeeklyActivityPolicy::new(1, 3, true).unwrap();
        let a = active_days(date(2023, 6, 1), date(2023, 9, 1), policy, 42);
        let b = active_days(date(2023, 6, 1), date(2023, 9, 1), policy, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_walker_is_exhausted_after_range() {
        let policy = WeeklyActivityPolicy::new(7, 7, true).unwrap();
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        let mut walker = WorkingDayWalker::new(range, policy);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(walker.next_date(&mut rng), Some(date(2024, 1, 1)));
        assert_eq!(walker.next_date(&mut rng), Some(date(2024, 1, 2)));
        assert_eq!(walker.next_date(&mut rng), None);
        assert_eq!(walker.next_date(&mut rng), None);
    }

    #[test]
    fn test_draw_week_respects_pool() {
        let policy = WeeklyActivityPolicy::new(1, 5, false).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..200 {
            let week = draw_week(&policy, &mut rng);
            assert!((1..=5).contains(&week.len()));
            assert!(!week.contains_slot(5));
            assert!(!week.contains_slot(6));
        }
    }
}
