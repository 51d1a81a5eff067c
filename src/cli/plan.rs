//! Plan command - preview a commit schedule without writing anything

use super::{load_config, prompter, run_rngs, RunArgs, ScheduleArgs};
use crate::models::CommitTimestamp;
use crate::params::{self, Resolver};
use crate::schedule::ScheduleParams;
use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use console::style;
use serde::Serialize;
use std::path::Path;

/// Machine-readable schedule preview.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub active_days: usize,
    pub total_commits: usize,
    pub timestamps: Vec<CommitTimestamp>,
}

impl PlanReport {
    fn build(params: &ScheduleParams, timestamps: Vec<CommitTimestamp>) -> Self {
        let mut dates: Vec<NaiveDate> = timestamps.iter().map(|t| t.date).collect();
        dates.dedup();
        Self {
            from_date: params.range.from_date(),
            to_date: params.range.to_date(),
            active_days: dates.len(),
            total_commits: timestamps.len(),
            timestamps,
        }
    }
}

/// Run the plan command
pub fn run(
    config_path: Option<&Path>,
    schedule: &ScheduleArgs,
    run: &RunArgs,
    format: &str,
) -> Result<()> {
    let config = load_config(config_path)?;
    let today = Local::now().date_naive();

    let mut prompter = prompter(run.no_input);
    let params = {
        let mut resolver = Resolver::new(&config, prompter.as_mut());
        params::resolve_schedule(&mut resolver, &schedule.raw(), today)?
    };

    let (schedule_rng, _) = run_rngs(run.seed);
    let report = PlanReport::build(&params, params.timestamps(schedule_rng).collect());

    match format {
        "json" => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize plan")?;
            println!("{}", json);
        }
        _ => print_text(&report),
    }
    Ok(())
}

fn print_text(report: &PlanReport) {
    println!(
        "\n{} {} → {}\n",
        style("Schedule").bold(),
        report.from_date,
        report.to_date
    );

    // One line per active day
    let mut index = 0;
    while index < report.timestamps.len() {
        let date = report.timestamps[index].date;
        let times: Vec<String> = report.timestamps[index..]
            .iter()
            .take_while(|t| t.date == date)
            .map(|t| t.time.format("%H:%M:%S").to_string())
            .collect();
        index += times.len();
        println!(
            "  {} {}  {}",
            style(date).cyan(),
            style(date.weekday()).dim(),
            times.join(" ")
        );
    }

    println!(
        "\n{} {} commits over {} active days",
        style("Total:").bold(),
        style(report.total_commits).cyan(),
        style(report.active_days).cyan()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyVolumePolicy, DateRange, WeeklyActivityPolicy};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_report_counts_days_and_commits() {
        let params = ScheduleParams {
            range: DateRange::new(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            )
            .unwrap(),
            weekly: WeeklyActivityPolicy::new(5, 5, false).unwrap(),
            daily: DailyVolumePolicy::new(2, 2, false).unwrap(),
        };
        let timestamps = params.timestamps(ChaCha8Rng::seed_from_u64(1)).collect();
        let report = PlanReport::build(&params, timestamps);

        assert_eq!(report.active_days, 5);
        assert_eq!(report.total_commits, 10);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["from_date"], "2024-01-01");
        assert_eq!(json["timestamps"].as_array().unwrap().len(), 10);
        assert_eq!(json["timestamps"][0]["date"], "2024-01-01");
    }
}
