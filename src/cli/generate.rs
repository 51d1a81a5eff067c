//! Generate command - create the repository and write its history

use super::{load_config, prompter, run_rngs, GenerateArgs};
use crate::git::{Git2Backend, GitHistory};
use crate::history::{self, Collaborators};
use crate::messages::RandomMessages;
use crate::params::{self, Resolver};
use crate::scaffold::{TemplateScaffolder, TemplateSource, TemplateVars};
use anyhow::{Context, Result};
use chrono::Local;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

/// Run the generate command
pub fn run(config_path: Option<&Path>, args: &GenerateArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let today = Local::now().date_naive();

    let mut prompter = prompter(args.run.no_input);
    let params = {
        let mut resolver = Resolver::new(&config, prompter.as_mut());
        params::resolve_run(&mut resolver, &args.raw(), today)?
    };
    info!(
        "Generating {} in {} from {} to {}",
        params.name,
        params.directory.display(),
        params.schedule.range.from_date(),
        params.schedule.range.to_date()
    );

    let (schedule_rng, message_rng) = run_rngs(args.run.seed);
    let schedule = params.schedule.timestamps(schedule_rng);
    let mut messages = RandomMessages::new(message_rng);
    let mut backend = Git2Backend::new(&params.directory, params.identity.clone());
    let scaffolder = TemplateScaffolder::new(match &args.templates {
        Some(dir) => TemplateSource::Directory(dir.clone()),
        None => TemplateSource::Builtin,
    });
    let vars = TemplateVars::new(&params.name, today);

    println!(
        "\n{} Backfilling {}\n",
        style("⏳").bold(),
        style(&params.name).cyan()
    );

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(spinner_style());
    spinner.set_message("Creating repository...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let start = Instant::now();

    let result = history::synthesize(
        &params.directory,
        &vars,
        schedule,
        Collaborators {
            backend: &mut backend,
            scaffolder: &scaffolder,
            messages: &mut messages,
        },
        |count, at| spinner.set_message(format!("{} commits, at {}", count, at.date)),
    );
    spinner.finish_and_clear();
    let summary = result.with_context(|| {
        format!("Failed to generate history in {}", params.directory.display())
    })?;

    let history = GitHistory::open(&params.directory)
        .with_context(|| format!("Failed to reopen {}", params.directory.display()))?;
    let total = history.commit_count()?;

    println!(
        "{} Created {} commits in {:.1}s",
        style("✓").green(),
        style(total).cyan(),
        start.elapsed().as_secs_f64()
    );
    println!(
        "  {} {} → {}",
        style("Span:").dim(),
        summary.first,
        summary.last
    );
    println!(
        "  {} {}",
        style("Author:").dim(),
        style(format!(
            "{} <{}>",
            params.identity.username, params.identity.email
        ))
        .cyan()
    );
    let files: Vec<String> = summary
        .scaffolded
        .iter()
        .map(|path| path.display().to_string())
        .collect();
    println!("  {} {}", style("Files:").dim(), files.join(", "));
    println!(
        "\n{} {}",
        style("Repository:").bold(),
        style(params.directory.display()).cyan()
    );

    Ok(())
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
