//! CLI command definitions and handlers

mod generate;
mod init;
mod plan;

use crate::config::FileConfig;
use crate::params::{DefaultsOnly, Prompter, RawParams, TerminalPrompter, ALL_FIELDS};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Backfill - synthesize a plausible git commit history
#[derive(Parser, Debug)]
#[command(name = "backfill")]
#[command(
    version,
    about = "Create a new git repository with a believable commit history over a date range",
    long_about = "Backfill creates a fresh repository, scaffolds a few starter files and \
fills it with commits spread across a date range. Each week gets a random number of \
active days, each active day a random number of commits, clustered around mid-afternoon.\n\n\
Values missing from the command line are read from backfill.toml, then prompted for.\n\n\
Run without a subcommand to generate:\n  \
backfill --name tiles --from-date 2024-01-01",
    after_help = "\
Examples:
  backfill                                     Prompt for everything, then generate
  backfill --name tiles --no-input             Generate with defaults, no prompts
  backfill plan --from-date 2024-01-01         Preview the schedule without writing anything
  backfill plan --format json --seed 7         Machine-readable preview
  backfill init                                Write an example backfill.toml"
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Config file to read instead of ./backfill.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Options for the default generate command
    #[command(flatten)]
    pub generate: GenerateArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the repository and its history (the default command)
    Generate(GenerateArgs),

    /// Print the commit schedule without touching the filesystem
    #[command(after_help = "\
Examples:
  backfill plan                                 Preview with config/prompted values
  backfill plan --seed 42 --no-input            Reproducible preview using defaults
  backfill plan --format json > schedule.json   Export the timestamps")]
    Plan {
        #[command(flatten)]
        schedule: ScheduleArgs,

        #[command(flatten)]
        run: RunArgs,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Write an example backfill.toml into the current directory
    Init,
}

/// Schedule parameters; unset values fall back to config, prompt, then default.
#[derive(Args, Debug, Clone, Default)]
pub struct ScheduleArgs {
    /// First date of the history (YYYY-MM-DD, default: one year ago)
    #[arg(long, value_name = "DATE")]
    pub from_date: Option<String>,

    /// Last date of the history (YYYY-MM-DD, default: today)
    #[arg(long, value_name = "DATE")]
    pub to_date: Option<String>,

    /// Minimum active days per week (1-7, default: 1)
    #[arg(long, value_name = "N")]
    pub min_days_per_week: Option<String>,

    /// Maximum active days per week (1-7, default: 5)
    #[arg(long, value_name = "N")]
    pub max_days_per_week: Option<String>,

    /// Allow Saturdays and Sundays to be active (default: false)
    #[arg(long, value_name = "BOOL")]
    pub include_weekends: Option<String>,

    /// Minimum commits per active day (1-1000, default: 1)
    #[arg(long, value_name = "N")]
    pub min_per_day: Option<String>,

    /// Maximum commits per active day (1-1000, default: 5)
    #[arg(long, value_name = "N")]
    pub max_per_day: Option<String>,

    /// Allow commits outside 9am-6pm (default: false)
    #[arg(long, value_name = "BOOL")]
    pub include_out_of_hours: Option<String>,
}

/// Options shared by every command that draws a schedule.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Seed for the random generator; the same seed gives the same history
    #[arg(long, env = "BACKFILL_SEED")]
    pub seed: Option<u64>,

    /// Never prompt; use config values and defaults only
    #[arg(long)]
    pub no_input: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Repository name (default: bathroom_tiles)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to create (default: ./<name>); must not exist
    #[arg(long, value_name = "DIR")]
    pub directory: Option<String>,

    /// Commit author name (default: git config user.name)
    #[arg(long, env = "BACKFILL_USERNAME")]
    pub username: Option<String>,

    /// Commit author email (default: git config user.email)
    #[arg(long, env = "BACKFILL_EMAIL")]
    pub email: Option<String>,

    /// Render templates from this directory instead of the built-in set
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    #[command(flatten)]
    pub schedule: ScheduleArgs,

    #[command(flatten)]
    pub run: RunArgs,
}

impl ScheduleArgs {
    fn raw(&self) -> RawParams {
        RawParams {
            from_date: self.from_date.clone(),
            to_date: self.to_date.clone(),
            min_days_per_week: self.min_days_per_week.clone(),
            max_days_per_week: self.max_days_per_week.clone(),
            include_weekends: self.include_weekends.clone(),
            min_per_day: self.min_per_day.clone(),
            max_per_day: self.max_per_day.clone(),
            include_out_of_hours: self.include_out_of_hours.clone(),
            ..Default::default()
        }
    }
}

impl GenerateArgs {
    fn raw(&self) -> RawParams {
        RawParams {
            name: self.name.clone(),
            directory: self.directory.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            ..self.schedule.raw()
        }
    }
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Some(Commands::Generate(args)) => generate::run(config_path, &args),
        Some(Commands::Plan {
            schedule,
            run,
            format,
        }) => plan::run(config_path, &schedule, &run, &format),
        Some(Commands::Init) => init::run(Path::new(".")),
        None => generate::run(config_path, &cli.generate),
    }
}

/// Load config files and warn about keys nothing reads.
fn load_config(explicit: Option<&Path>) -> Result<FileConfig> {
    let config = FileConfig::load(explicit).context("Failed to load configuration")?;
    if config.sources().is_empty() {
        debug!("No config files found");
    } else {
        let sources: Vec<String> = config
            .sources()
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        info!("Using config from {}", sources.join(", "));
    }
    let known: Vec<&str> = ALL_FIELDS.iter().map(|field| field.key).collect();
    for key in config.unknown_keys(&known) {
        warn!("Ignoring unknown config key '{}'", key);
    }
    Ok(config)
}

/// Interactive prompts only when allowed and stdin is a terminal.
fn prompter(no_input: bool) -> Box<dyn Prompter> {
    if no_input || !std::io::stdin().is_terminal() {
        Box::new(DefaultsOnly)
    } else {
        Box::new(TerminalPrompter)
    }
}

/// Independent generators for the schedule and the messages.
///
/// Both derive from one seed so `plan` and `generate` agree on the schedule
/// for the same `--seed`.
fn run_rngs(seed: Option<u64>) -> (ChaCha8Rng, ChaCha8Rng) {
    let mut root = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };
    let schedule = ChaCha8Rng::from_rng(&mut root);
    let messages = ChaCha8Rng::from_rng(&mut root);
    (schedule, messages)
}
