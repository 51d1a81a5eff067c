//! Read back generated history using libgit2
//!
//! Used to report on a finished run and to verify repositories in tests.

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use git2::{Repository, Sort};
use std::path::Path;
use tracing::debug;

/// Information about a git commit.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    /// Short hash (12 characters)
    pub hash: String,
    /// Full commit hash
    pub full_hash: String,
    /// Author name
    pub author: String,
    /// Author email
    pub author_email: String,
    /// Commit timestamp (RFC 3339, UTC)
    pub timestamp: String,
    /// Commit message (first line)
    pub message: String,
}

/// Read-only view of a repository's history.
pub struct GitHistory {
    repo: Repository,
}

impl GitHistory {
    /// Open the repository at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path)
            .with_context(|| format!("Failed to open git repository at {:?}", path))?;
        debug!("Opened git repository at {:?}", repo.path());
        Ok(Self { repo })
    }

    /// Number of commits reachable from HEAD.
    pub fn commit_count(&self) -> Result<usize> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        Ok(revwalk.count())
    }

    /// Most recent commits first, at most `max_commits`.
    pub fn recent_commits(&self, max_commits: usize) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_head()?;

        let mut commits = Vec::new();
        for oid_result in revwalk.take(max_commits) {
            let commit = self.repo.find_commit(oid_result?)?;
            commits.push(extract_commit_info(&commit));
        }
        Ok(commits)
    }

    /// Paths of every file tracked at HEAD.
    pub fn tracked_files(&self) -> Result<Vec<String>> {
        let tree = self.repo.head()?.peel_to_tree()?;

        let mut files = Vec::new();
        tree.walk(git2::TreeWalkMode::PreOrder, |dir, entry| {
            if entry.kind() == Some(git2::ObjectType::Blob) {
                files.push(format!("{}{}", dir, entry.name().unwrap_or("")));
            }
            git2::TreeWalkResult::Ok
        })?;
        files.sort();
        Ok(files)
    }
}

fn extract_commit_info(commit: &git2::Commit) -> CommitInfo {
    let author = commit.author();
    let full_hash = commit.id().to_string();
    CommitInfo {
        hash: full_hash[..12].to_string(),
        full_hash: full_hash.clone(),
        author: author.name().unwrap_or("Unknown").to_string(),
        author_email: author.email().unwrap_or("").to_string(),
        timestamp: format_git_time(&commit.time()),
        message: commit
            .message()
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .to_string(),
    }
}

/// Format a git timestamp as RFC 3339 in UTC.
fn format_git_time(time: &git2::Time) -> String {
    match Utc.timestamp_opt(time.seconds(), 0).single() {
        Some(dt) => dt.to_rfc3339(),
        None => "1970-01-01T00:00:00+00:00".to_string(),
    }
}
