//! Core value types for schedule generation
//!
//! Everything here is an immutable value. Policies validate their invariants
//! on construction so the schedule generators never have to.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Number of weekday slots available when weekends are excluded.
pub const WORKWEEK_DAYS: u32 = 5;

/// Number of weekday slots available when weekends are included.
pub const FULL_WEEK_DAYS: u32 = 7;

/// Invariant violations when building the scheduling inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("from date {from} is after to date {to}")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },

    #[error("{field} must be at least 1")]
    ZeroMinimum { field: &'static str },

    #[error("{min_field} ({min}) must not exceed {max_field} ({max})")]
    MinAboveMax {
        min_field: &'static str,
        min: u32,
        max_field: &'static str,
        max: u32,
    },

    #[error("max_days_per_week ({0}) cannot exceed 7")]
    TooManyDaysPerWeek(u32),

    #[error(
        "min_days_per_week ({min}) exceeds the {pool} eligible days per week; \
         enable include_weekends or lower the minimum"
    )]
    MinExceedsPool { min: u32, pool: u32 },
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, ModelError> {
        if from > to {
            return Err(ModelError::InvertedDateRange { from, to });
        }
        Ok(Self { from, to })
    }

    pub fn from_date(&self) -> NaiveDate {
        self.from
    }

    pub fn to_date(&self) -> NaiveDate {
        self.to
    }

    /// Number of calendar days covered, bounds included.
    pub fn len_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// How many days of each week receive commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyActivityPolicy {
    min_days_per_week: u32,
    max_days_per_week: u32,
    include_weekends: bool,
}

impl WeeklyActivityPolicy {
    /// Build a policy. `max_days_per_week` may exceed the pool size (it is
    /// clamped when sampling), but `min_days_per_week` may not.
    pub fn new(
        min_days_per_week: u32,
        max_days_per_week: u32,
        include_weekends: bool,
    ) -> Result<Self, ModelError> {
        if min_days_per_week == 0 {
            return Err(ModelError::ZeroMinimum {
                field: "min_days_per_week",
            });
        }
        if min_days_per_week > max_days_per_week {
            return Err(ModelError::MinAboveMax {
                min_field: "min_days_per_week",
                min: min_days_per_week,
                max_field: "max_days_per_week",
                max: max_days_per_week,
            });
        }
        if max_days_per_week > FULL_WEEK_DAYS {
            return Err(ModelError::TooManyDaysPerWeek(max_days_per_week));
        }
        let pool = pool_size(include_weekends);
        if min_days_per_week > pool {
            return Err(ModelError::MinExceedsPool {
                min: min_days_per_week,
                pool,
            });
        }
        Ok(Self {
            min_days_per_week,
            max_days_per_week,
            include_weekends,
        })
    }

    pub fn min_days_per_week(&self) -> u32 {
        self.min_days_per_week
    }

    pub fn max_days_per_week(&self) -> u32 {
        self.max_days_per_week
    }

    pub fn include_weekends(&self) -> bool {
        self.include_weekends
    }

    /// Weekday slots eligible for selection (5 or 7).
    pub fn pool_size(&self) -> u32 {
        pool_size(self.include_weekends)
    }

    /// Upper bound actually used when drawing a week's day count.
    pub fn effective_max(&self) -> u32 {
        self.max_days_per_week.min(self.pool_size())
    }
}

fn pool_size(include_weekends: bool) -> u32 {
    if include_weekends {
        FULL_WEEK_DAYS
    } else {
        WORKWEEK_DAYS
    }
}

/// How many commits land on an active day, and at which hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyVolumePolicy {
    min_per_day: u32,
    max_per_day: u32,
    include_out_of_hours: bool,
}

impl DailyVolumePolicy {
    pub fn new(
        min_per_day: u32,
        max_per_day: u32,
        include_out_of_hours: bool,
    ) -> Result<Self, ModelError> {
        if min_per_day == 0 {
            return Err(ModelError::ZeroMinimum {
                field: "min_per_day",
            });
        }
        if min_per_day > max_per_day {
            return Err(ModelError::MinAboveMax {
                min_field: "min_per_day",
                min: min_per_day,
                max_field: "max_per_day",
                max: max_per_day,
            });
        }
        Ok(Self {
            min_per_day,
            max_per_day,
            include_out_of_hours,
        })
    }

    pub fn min_per_day(&self) -> u32 {
        self.min_per_day
    }

    pub fn max_per_day(&self) -> u32 {
        self.max_per_day
    }

    pub fn include_out_of_hours(&self) -> bool {
        self.include_out_of_hours
    }

    /// First hour of the day a commit may fall in.
    pub fn earliest_hour(&self) -> u32 {
        if self.include_out_of_hours {
            0
        } else {
            9
        }
    }

    /// Last hour of the day a commit may fall in (inclusive).
    pub fn latest_hour(&self) -> u32 {
        if self.include_out_of_hours {
            23
        } else {
            17
        }
    }
}

/// Weekday slots chosen as active for one calendar week.
///
/// Slot 0 is Monday, slot 6 is Sunday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveWeekdays(u8);

impl ActiveWeekdays {
    pub fn from_slots<I: IntoIterator<Item = u32>>(slots: I) -> Self {
        let bits = slots
            .into_iter()
            .filter(|slot| *slot < FULL_WEEK_DAYS)
            .fold(0u8, |acc, slot| acc | (1 << slot));
        Self(bits)
    }

    pub fn contains_slot(&self, slot: u32) -> bool {
        slot < FULL_WEEK_DAYS && self.0 & (1 << slot) != 0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.contains_slot(date.weekday().num_days_from_monday())
    }

    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// The moment a single commit is authored and committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CommitTimestamp {
    pub date: NaiveDate,
    pub time: NaiveTime,
}

impl CommitTimestamp {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self { date, time }
    }

    pub fn naive(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

impl fmt::Display for CommitTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time.format("%H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let err = DateRange::new(date(2024, 2, 1), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, ModelError::InvertedDateRange { .. }));
    }

    #[test]
    fn test_date_range_single_day() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(range.len_days(), 1);
        assert!(range.contains(date(2024, 1, 1)));
        assert!(!range.contains(date(2024, 1, 2)));
    }

    #[test]
    fn test_weekly_policy_validation() {
        assert!(WeeklyActivityPolicy::new(0, 3, false).is_err());
        assert!(WeeklyActivityPolicy::new(4, 3, false).is_err());
        assert!(WeeklyActivityPolicy::new(1, 8, true).is_err());
        assert_eq!(
            WeeklyActivityPolicy::new(6, 7, false).unwrap_err(),
            ModelError::MinExceedsPool { min: 6, pool: 5 }
        );
        assert!(WeeklyActivityPolicy::new(6, 7, true).is_ok());
    }

    #[test]
    fn test_weekly_policy_clamps_max_to_pool() {
        let policy = WeeklyActivityPolicy::new(2, 7, false).unwrap();
        assert_eq!(policy.pool_size(), 5);
        assert_eq!(policy.effective_max(), 5);

        let policy = WeeklyActivityPolicy::new(2, 7, true).unwrap();
        assert_eq!(policy.effective_max(), 7);
    }

    #[test]
    fn test_daily_policy_hours() {
        let office = DailyVolumePolicy::new(1, 3, false).unwrap();
        assert_eq!((office.earliest_hour(), office.latest_hour()), (9, 17));

        let anytime = DailyVolumePolicy::new(1, 3, true).unwrap();
        assert_eq!((anytime.earliest_hour(), anytime.latest_hour()), (0, 23));

        assert!(DailyVolumePolicy::new(0, 3, true).is_err());
        assert!(DailyVolumePolicy::new(5, 3, true).is_err());
    }

    #[test]
    fn test_active_weekdays() {
        let set = ActiveWeekdays::from_slots([0, 2, 4]);
        assert_eq!(set.len(), 3);
        // 2024-01-01 is a Monday
        assert!(set.contains(date(2024, 1, 1)));
        assert!(!set.contains(date(2024, 1, 2)));
        assert!(set.contains(date(2024, 1, 3)));
        assert!(!set.contains(date(2024, 1, 6)));
        assert!(ActiveWeekdays::default().is_empty());
    }

    #[test]
    fn test_commit_timestamp_ordering_and_display() {
        let a = CommitTimestamp::new(date(2024, 1, 1), NaiveTime::from_hms_opt(16, 0, 0).unwrap());
        let b = CommitTimestamp::new(date(2024, 1, 2), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert!(a < b);
        assert_eq!(a.to_string(), "2024-01-01 16:00:00");
    }
}
