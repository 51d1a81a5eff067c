//! Repository backend built on libgit2
//!
//! Creates the target repository, stages the scaffolded tree and appends
//! commits with explicit author/committer signatures, using the git2 crate
//! (Rust bindings to libgit2) rather than shelling out to `git`.

use super::identity::Identity;
use crate::models::CommitTimestamp;
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Timelike};
use git2::{ErrorCode, IndexAddOption, Repository, RepositoryInitOptions, Signature, Time};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Longest DST gap searched past, in minutes.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Which backend step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOperation {
    Init,
    Stage,
    Commit,
}

impl fmt::Display for BackendOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendOperation::Init => write!(f, "init"),
            BackendOperation::Stage => write!(f, "stage"),
            BackendOperation::Commit => write!(f, "commit"),
        }
    }
}

/// A fatal repository failure, tagged with the step that produced it.
#[derive(Error, Debug)]
#[error("git {operation} failed in {}: {source}", path.display())]
pub struct BackendError {
    pub operation: BackendOperation,
    pub path: PathBuf,
    #[source]
    pub source: git2::Error,
}

impl BackendError {
    pub fn new(operation: BackendOperation, path: &Path, source: git2::Error) -> Self {
        Self {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The operations the history driver needs from a repository.
///
/// Calls are made strictly in order: one `init`, one `stage_all`, then commits.
pub trait RepositoryBackend {
    /// Create the repository (and its directory) and record the identity.
    fn init(&mut self) -> Result<(), BackendError>;

    /// Stage every file in the working tree.
    fn stage_all(&mut self) -> Result<(), BackendError>;

    /// Commit the index on top of HEAD at `at`, even if nothing changed.
    fn commit(&mut self, at: CommitTimestamp, message: &str) -> Result<(), BackendError>;
}

/// How naive schedule timestamps are pinned to an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Local,
    Fixed(FixedOffset),
}

/// [`RepositoryBackend`] writing to a real repository on disk.
pub struct Git2Backend {
    path: PathBuf,
    identity: Identity,
    zone: Zone,
    repo: Option<Repository>,
}

impl Git2Backend {
    /// Prepare a backend for `path`. Nothing touches the disk until `init`.
    pub fn new(path: &Path, identity: Identity) -> Self {
        Self {
            path: path.to_path_buf(),
            identity,
            zone: Zone::Local,
            repo: None,
        }
    }

    /// Interpret timestamps in a fixed UTC offset instead of the local zone.
    pub fn with_fixed_offset(mut self, offset: FixedOffset) -> Self {
        self.zone = Zone::Fixed(offset);
        self
    }

    fn repo(&self) -> Result<&Repository, git2::Error> {
        self.repo
            .as_ref()
            .ok_or_else(|| git2::Error::from_str("repository has not been initialized"))
    }

    fn try_init(&self) -> Result<Repository, git2::Error> {
        let mut opts = RepositoryInitOptions::new();
        opts.mkpath(true);
        let repo = Repository::init_opts(&self.path, &opts)?;

        let mut config = repo.config()?;
        config.set_str("user.name", &self.identity.username)?;
        config.set_str("user.email", &self.identity.email)?;

        Ok(repo)
    }

    fn try_stage_all(&self) -> Result<(), git2::Error> {
        let mut index = self.repo()?.index()?;
        index.add_all(["*"], IndexAddOption::DEFAULT, None)?;
        index.write()
    }

    fn try_commit(&self, at: CommitTimestamp, message: &str) -> Result<git2::Oid, git2::Error> {
        let repo = self.repo()?;
        let time = self.git_time(at);
        let signature = Signature::new(&self.identity.username, &self.identity.email, &time)?;

        let tree_id = repo.index()?.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(e),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )
    }

    fn git_time(&self, at: CommitTimestamp) -> Time {
        let naive = at.naive();
        let resolved = match self.zone {
            Zone::Fixed(offset) => resolve_local(&offset, naive),
            Zone::Local => resolve_local(&Local, naive),
        };
        let (seconds, offset_secs) = resolved.unwrap_or((naive.and_utc().timestamp(), 0));
        Time::new(seconds, offset_secs / 60)
    }
}

/// Pin a wall-clock time in `zone` to (unix seconds, UTC offset in seconds).
///
/// Ambiguous times take the earlier instant. Times skipped by a DST transition
/// move to the first valid minute after the gap, so commit order is kept.
fn resolve_local<Tz: TimeZone>(zone: &Tz, naive: NaiveDateTime) -> Option<(i64, i32)> {
    zone.from_local_datetime(&naive)
        .earliest()
        .or_else(|| first_after_gap(zone, naive))
        .map(|dt| (dt.timestamp(), dt.offset().fix().local_minus_utc()))
}

fn first_after_gap<Tz: TimeZone>(zone: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    let minute = naive.with_second(0)?.with_nanosecond(0)?;
    (1..=MAX_GAP_MINUTES)
        .find_map(|m| zone.from_local_datetime(&(minute + Duration::minutes(m))).earliest())
}

impl RepositoryBackend for Git2Backend {
    fn init(&mut self) -> Result<(), BackendError> {
        let repo = self
            .try_init()
            .map_err(|e| BackendError::new(BackendOperation::Init, &self.path, e))?;
        debug!("Initialized git repository at {:?}", repo.path());
        self.repo = Some(repo);
        Ok(())
    }

    fn stage_all(&mut self) -> Result<(), BackendError> {
        self.try_stage_all()
            .map_err(|e| BackendError::new(BackendOperation::Stage, &self.path, e))
    }

    fn commit(&mut self, at: CommitTimestamp, message: &str) -> Result<(), BackendError> {
        let oid = self
            .try_commit(at, message)
            .map_err(|e| BackendError::new(BackendOperation::Commit, &self.path, e))?;
        debug!("Committed {} at {}", oid, at);
        Ok(())
    }
}
