//! Git repository access
//!
//! - [`backend`]: create a repository and append commits with explicit
//!   signatures and timestamps
//! - [`history`]: read a generated history back
//! - [`identity`]: commit identity and defaults from the user's git config
//!
//! # Example
//!
//! ```no_run
//! use backfill::git::{Git2Backend, Identity, RepositoryBackend};
//! use backfill::models::CommitTimestamp;
//! use chrono::{NaiveDate, NaiveTime};
//! use std::path::Path;
//!
//! let mut backend = Git2Backend::new(Path::new("/tmp/demo"), Identity::new("Ada", "ada@example.com"));
//! backend.init().unwrap();
//! backend.stage_all().unwrap();
//! let at = CommitTimestamp::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
//! );
//! backend.commit(at, "feat: initial commit").unwrap();
//! ```

pub mod backend;
pub mod history;
pub mod identity;

pub use backend::{BackendError, BackendOperation, Git2Backend, RepositoryBackend};
pub use history::{CommitInfo, GitHistory};
pub use identity::{configured_email, configured_username, Identity};
