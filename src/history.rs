//! History synthesis driver
//!
//! Consumes a commit schedule and turns it into a repository: the first
//! timestamp becomes the scaffolded initial commit, every later timestamp an
//! empty commit with a generated message. Commits are created one after the
//! other; the first backend failure ends the run and leaves the commits made
//! so far in place.

use crate::git::{BackendError, RepositoryBackend};
use crate::messages::{MessageGenerator, INITIAL_COMMIT_MESSAGE};
use crate::models::CommitTimestamp;
use crate::scaffold::{Scaffold, ScaffoldError, TemplateVars};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Why a synthesis run stopped.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("destination {} already exists; choose a different directory", .0.display())]
    DestinationExists(PathBuf),

    #[error("the schedule produced no commits for the requested range and policies")]
    EmptySchedule,

    #[error("scaffolding failed: {0}")]
    Scaffold(#[from] ScaffoldError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Commits created, the initial commit included
    pub commits: usize,
    pub first: CommitTimestamp,
    pub last: CommitTimestamp,
    /// Files written by scaffolding, relative to the repository root
    pub scaffolded: Vec<PathBuf>,
}

/// Everything a run needs besides the schedule itself.
pub struct Collaborators<'a, B, S, M> {
    pub backend: &'a mut B,
    pub scaffolder: &'a S,
    pub messages: &'a mut M,
}

/// Build the repository at `directory` from `schedule`.
///
/// `on_commit` is called after every successful commit with the running
/// count and the timestamp just written.
pub fn synthesize<I, B, S, M, F>(
    directory: &Path,
    vars: &TemplateVars,
    schedule: I,
    collaborators: Collaborators<'_, B, S, M>,
    mut on_commit: F,
) -> Result<RunSummary, HistoryError>
where
    I: IntoIterator<Item = CommitTimestamp>,
    B: RepositoryBackend,
    S: Scaffold,
    M: MessageGenerator,
    F: FnMut(usize, CommitTimestamp),
{
    let Collaborators {
        backend,
        scaffolder,
        messages,
    } = collaborators;

    if directory.exists() {
        return Err(HistoryError::DestinationExists(directory.to_path_buf()));
    }

    let mut schedule = schedule.into_iter();
    let first = schedule.next().ok_or(HistoryError::EmptySchedule)?;

    backend.init()?;
    let scaffolded = scaffolder.scaffold(directory, vars)?;
    debug!("Scaffolded {} files into {}", scaffolded.len(), directory.display());
    backend.stage_all()?;
    backend.commit(first, INITIAL_COMMIT_MESSAGE)?;
    on_commit(1, first);

    let mut commits = 1;
    let mut last = first;
    for at in schedule {
        let message = messages.next_message();
        backend.commit(at, &message)?;
        commits += 1;
        last = at;
        on_commit(commits, at);
    }

    info!(
        "Created {} commits in {} ({} to {})",
        commits,
        directory.display(),
        first,
        last
    );

    Ok(RunSummary {
        commits,
        first,
        last,
        scaffolded,
    })
}
