//! Commit identity and git config defaults

use git2::Config;
use tracing::debug;

/// Name and email stamped on every generated commit, as author and committer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub email: String,
}

impl Identity {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}

/// `user.name` from the user's global git configuration, if set.
pub fn configured_username() -> Option<String> {
    read_global("user.name")
}

/// `user.email` from the user's global git configuration, if set.
pub fn configured_email() -> Option<String> {
    read_global("user.email")
}

fn read_global(key: &str) -> Option<String> {
    let config = match Config::open_default() {
        Ok(config) => config,
        Err(e) => {
            debug!("No git configuration available: {}", e);
            return None;
        }
    };
    config
        .get_string(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
