//! Parameter resolution
//!
//! Each parameter is resolved independently, in order: command-line flag,
//! config file, interactive prompt (offering a default), then parsed and
//! validated by its field parser. Cross-field rules (`from <= to`,
//! `min <= max`) are checked when the typed policies are built. The result is
//! one immutable [`RunParams`] handed to the history driver.

pub mod parsers;
pub mod resolve;

pub use resolve::{DefaultsOnly, Prompter, Resolver, TerminalPrompter, ValueSource};

use crate::git::{configured_email, configured_username, Identity};
use crate::models::{DailyVolumePolicy, DateRange, ModelError, WeeklyActivityPolicy};
use crate::schedule::ScheduleParams;
use chrono::{Months, NaiveDate};
use std::path::PathBuf;
use thiserror::Error;

/// A parameter's config key and the phrase used when prompting for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub description: &'static str,
}

impl Field {
    /// The command-line flag for this field, e.g. `--from-date`.
    pub fn flag(&self) -> String {
        format!("--{}", self.key.replace('_', "-"))
    }
}

pub const NAME: Field = Field {
    key: "name",
    description: "the name of the new repository",
};
pub const DIRECTORY: Field = Field {
    key: "directory",
    description: "the directory where the repository will be created",
};
pub const USERNAME: Field = Field {
    key: "username",
    description: "the commit author name",
};
pub const EMAIL: Field = Field {
    key: "email",
    description: "the commit author email",
};
pub const FROM_DATE: Field = Field {
    key: "from_date",
    description: "the first date of the history (YYYY-MM-DD)",
};
pub const TO_DATE: Field = Field {
    key: "to_date",
    description: "the last date of the history (YYYY-MM-DD)",
};
pub const MIN_DAYS_PER_WEEK: Field = Field {
    key: "min_days_per_week",
    description: "the minimum number of active days per week",
};
pub const MAX_DAYS_PER_WEEK: Field = Field {
    key: "max_days_per_week",
    description: "the maximum number of active days per week",
};
pub const INCLUDE_WEEKENDS: Field = Field {
    key: "include_weekends",
    description: "whether weekends can be active days",
};
pub const MIN_PER_DAY: Field = Field {
    key: "min_per_day",
    description: "the minimum number of commits per active day",
};
pub const MAX_PER_DAY: Field = Field {
    key: "max_per_day",
    description: "the maximum number of commits per active day",
};
pub const INCLUDE_OUT_OF_HOURS: Field = Field {
    key: "include_out_of_hours",
    description: "whether commits can fall outside 9am-6pm",
};

/// Every field a config file may set.
pub const ALL_FIELDS: &[Field] = &[
    NAME,
    DIRECTORY,
    USERNAME,
    EMAIL,
    FROM_DATE,
    TO_DATE,
    MIN_DAYS_PER_WEEK,
    MAX_DAYS_PER_WEEK,
    INCLUDE_WEEKENDS,
    MIN_PER_DAY,
    MAX_PER_DAY,
    INCLUDE_OUT_OF_HOURS,
];

/// Name used when none is given.
pub const DEFAULT_NAME: &str = "bathroom_tiles";

/// Errors raised while resolving parameters, before anything is generated.
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("no value for {key}; pass it on the command line or set it in backfill.toml")]
    Missing { key: &'static str },

    #[error("prompt for {key} failed: {source}")]
    Prompt {
        key: &'static str,
        #[source]
        source: dialoguer::Error,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Unparsed values from the command line; `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    pub name: Option<String>,
    pub directory: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub min_days_per_week: Option<String>,
    pub max_days_per_week: Option<String>,
    pub include_weekends: Option<String>,
    pub min_per_day: Option<String>,
    pub max_per_day: Option<String>,
    pub include_out_of_hours: Option<String>,
}

/// Fully resolved, validated inputs of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    pub name: String,
    pub directory: PathBuf,
    pub identity: Identity,
    pub schedule: ScheduleParams,
}

/// Resolve only what the schedule needs: dates and the two policies.
pub fn resolve_schedule(
    resolver: &mut Resolver<'_>,
    raw: &RawParams,
    today: NaiveDate,
) -> Result<ScheduleParams, ParamError> {
    let a_year_ago = today
        .checked_sub_months(Months::new(12))
        .unwrap_or_else(parsers::epoch)
        .max(parsers::epoch());

    let from_date = resolver.resolve(
        &FROM_DATE,
        raw.from_date.as_deref(),
        Some(a_year_ago.to_string()),
        |v| parsers::parse_date(v, parsers::epoch(), today),
    )?;
    let to_date = resolver.resolve(
        &TO_DATE,
        raw.to_date.as_deref(),
        Some(today.to_string()),
        |v| parsers::parse_date(v, parsers::epoch(), today),
    )?;
    let range = DateRange::new(from_date, to_date)?;

    let min_days = resolver.resolve(
        &MIN_DAYS_PER_WEEK,
        raw.min_days_per_week.as_deref(),
        Some("1".to_string()),
        |v| parsers::parse_int(v, 1, 7),
    )?;
    let max_days = resolver.resolve(
        &MAX_DAYS_PER_WEEK,
        raw.max_days_per_week.as_deref(),
        Some("5".to_string()),
        |v| parsers::parse_int(v, 1, 7),
    )?;
    let include_weekends = resolver.resolve(
        &INCLUDE_WEEKENDS,
        raw.include_weekends.as_deref(),
        Some("false".to_string()),
        parsers::parse_bool,
    )?;
    let weekly = WeeklyActivityPolicy::new(min_days, max_days, include_weekends)?;

    let min_per_day = resolver.resolve(
        &MIN_PER_DAY,
        raw.min_per_day.as_deref(),
        Some("1".to_string()),
        |v| parsers::parse_int(v, 1, 1000),
    )?;
    let max_per_day = resolver.resolve(
        &MAX_PER_DAY,
        raw.max_per_day.as_deref(),
        Some("5".to_string()),
        |v| parsers::parse_int(v, 1, 1000),
    )?;
    let include_out_of_hours = resolver.resolve(
        &INCLUDE_OUT_OF_HOURS,
        raw.include_out_of_hours.as_deref(),
        Some("false".to_string()),
        parsers::parse_bool,
    )?;
    let daily = DailyVolumePolicy::new(min_per_day, max_per_day, include_out_of_hours)?;

    Ok(ScheduleParams {
        range,
        weekly,
        daily,
    })
}

/// Resolve every parameter of a generation run.
pub fn resolve_run(
    resolver: &mut Resolver<'_>,
    raw: &RawParams,
    today: NaiveDate,
) -> Result<RunParams, ParamError> {
    let name = resolver.resolve(
        &NAME,
        raw.name.as_deref(),
        Some(DEFAULT_NAME.to_string()),
        parsers::parse_name,
    )?;
    let directory = resolver.resolve(
        &DIRECTORY,
        raw.directory.as_deref(),
        Some(format!("./{}", name)),
        parsers::parse_directory,
    )?;
    let username = resolver.resolve(
        &USERNAME,
        raw.username.as_deref(),
        configured_username(),
        parsers::parse_username,
    )?;
    let email = resolver.resolve(
        &EMAIL,
        raw.email.as_deref(),
        configured_email(),
        parsers::parse_email,
    )?;
    let schedule = resolve_schedule(resolver, raw, today)?;

    Ok(RunParams {
        name,
        directory,
        identity: Identity::new(username, email),
        schedule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;
    use tempfile::tempdir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
    }

    fn raw_with_identity() -> RawParams {
        RawParams {
            username: Some("Ada".into()),
            email: Some("ada@example.com".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_field_flag() {
        assert_eq!(FROM_DATE.flag(), "--from-date");
        assert_eq!(NAME.flag(), "--name");
    }

    #[test]
    fn test_schedule_defaults() {
        let config = FileConfig::default();
        let mut prompter = DefaultsOnly;
        let mut resolver = Resolver::new(&config, &mut prompter);
        let params = resolve_schedule(&mut resolver, &RawParams::default(), today()).unwrap();

        assert_eq!(params.range.from_date(), NaiveDate::from_ymd_opt(2023, 9, 2).unwrap());
        assert_eq!(params.range.to_date(), today());
        assert_eq!(params.weekly, WeeklyActivityPolicy::new(1, 5, false).unwrap());
        assert_eq!(params.daily, DailyVolumePolicy::new(1, 5, false).unwrap());
    }

    #[test]
    fn test_config_and_flags_combine() {
        let config: FileConfig = r#"
from_date = 2024-01-01
to_date = "2024-01-07"
min_days_per_week = 5
max_days_per_week = 5
include_out_of_hours = true
"#
        .parse()
        .unwrap();
        let raw = RawParams {
            min_per_day: Some("2".into()),
            max_per_day: Some("3".into()),
            include_out_of_hours: Some("no".into()),
            ..Default::default()
        };
        let mut prompter = DefaultsOnly;
        let mut resolver = Resolver::new(&config, &mut prompter);
        let params = resolve_schedule(&mut resolver, &raw, today()).unwrap();

        assert_eq!(params.range.len_days(), 7);
        assert_eq!(params.weekly.min_days_per_week(), 5);
        assert_eq!(params.daily, DailyVolumePolicy::new(2, 3, false).unwrap());
    }

    #[test]
    fn test_future_date_rejected() {
        let config = FileConfig::default();
        let mut prompter = DefaultsOnly;
        let mut resolver = Resolver::new(&config, &mut prompter);
        let raw = RawParams {
            to_date: Some("2024-09-03".into()),
            ..Default::default()
        };
        let err = resolve_schedule(&mut resolver, &raw, today()).unwrap_err();
        assert!(matches!(err, ParamError::Invalid { key: "to_date", .. }));
    }

    #[test]
    fn test_cross_field_violations() {
        let config = FileConfig::default();
        let mut prompter = DefaultsOnly;
        let mut resolver = Resolver::new(&config, &mut prompter);

        let inverted = RawParams {
            from_date: Some("2024-05-01".into()),
            to_date: Some("2024-04-01".into()),
            ..Default::default()
        };
        let err = resolve_schedule(&mut resolver, &inverted, today()).unwrap_err();
        assert!(matches!(err, ParamError::Model(ModelError::InvertedDateRange { .. })));

        let too_many = RawParams {
            min_days_per_week: Some("6".into()),
            max_days_per_week: Some("7".into()),
            ..Default::default()
        };
        let err = resolve_schedule(&mut resolver, &too_many, today()).unwrap_err();
        assert!(matches!(err, ParamError::Model(ModelError::MinExceedsPool { .. })));
    }

    #[test]
    fn test_run_defaults_directory_from_name() {
        let config = FileConfig::default();
        let mut prompter = DefaultsOnly;
        let mut resolver = Resolver::new(&config, &mut prompter);
        let raw = RawParams {
            name: Some("kitchen_sink_unlikely_to_exist_here".into()),
            ..raw_with_identity()
        };
        let params = resolve_run(&mut resolver, &raw, today()).unwrap();
        assert_eq!(
            params.directory,
            PathBuf::from("./kitchen_sink_unlikely_to_exist_here")
        );
        assert_eq!(params.identity, Identity::new("Ada", "ada@example.com"));
    }

    #[test]
    fn test_run_rejects_existing_directory() {
        let dir = tempdir().unwrap();
        let config = FileConfig::default();
        let mut prompter = DefaultsOnly;
        let mut resolver = Resolver::new(&config, &mut prompter);
        let raw = RawParams {
            directory: Some(dir.path().to_string_lossy().into_owned()),
            ..raw_with_identity()
        };
        let err = resolve_run(&mut resolver, &raw, today()).unwrap_err();
        assert!(matches!(err, ParamError::Invalid { key: "directory", .. }));
    }

    #[test]
    fn test_run_rejects_bad_email() {
        let config = FileConfig::default();
        let mut prompter = DefaultsOnly;
        let mut resolver = Resolver::new(&config, &mut prompter);
        let raw = RawParams {
            name: Some("x_unlikely_dir".into()),
            username: Some("Ada".into()),
            email: Some("not-an-email".into()),
            ..Default::default()
        };
        let err = resolve_run(&mut resolver, &raw, today()).unwrap_err();
        assert!(matches!(err, ParamError::Invalid { key: "email", .. }));
    }
}
