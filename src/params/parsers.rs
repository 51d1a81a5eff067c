//! Per-field parsers
//!
//! Every raw value, whether it came from a flag, a config file or a prompt,
//! goes through one of these before it reaches the schedule generator.

use chrono::NaiveDate;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static NAME: OnceLock<Regex> = OnceLock::new();

fn name_pattern() -> &'static Regex {
    NAME.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_\-.]{1,100}$").unwrap())
}

/// Earliest date accepted anywhere.
pub fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// ISO-8601 calendar date within `[min, max]`.
pub fn parse_date(value: &str, min: NaiveDate, max: NaiveDate) -> Result<NaiveDate, String> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("'{}' is not an ISO-8601 date (YYYY-MM-DD)", value))?;
    if date < min || date > max {
        return Err(format!("date must be between {} and {}", min, max));
    }
    Ok(date)
}

/// Integer within `[min, max]`.
pub fn parse_int(value: &str, min: u32, max: u32) -> Result<u32, String> {
    let n: i64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", value))?;
    if n < i64::from(min) || n > i64::from(max) {
        return Err(format!("value must be between {} and {}", min, max));
    }
    Ok(n as u32)
}

/// `true`/`false`, `1`/`0` or `yes`/`no`, any case.
pub fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(format!("'{}' is not true or false", value)),
    }
}

/// Repository name: 1-100 of letters, digits, `_`, `-`, `.`.
pub fn parse_name(value: &str) -> Result<String, String> {
    if !name_pattern().is_match(value) {
        return Err(format!("must match {}", name_pattern().as_str()));
    }
    Ok(value.to_string())
}

/// Free-form commit author name.
pub fn parse_username(value: &str) -> Result<String, String> {
    if value.is_empty() {
        return Err("username cannot be empty".to_string());
    }
    Ok(value.to_string())
}

/// Commit author email; must contain `@`.
pub fn parse_email(value: &str) -> Result<String, String> {
    if !value.contains('@') {
        return Err(format!("'{}' is not an email address", value));
    }
    Ok(value.to_string())
}

/// Destination directory: ASCII final component, must not exist yet.
pub fn parse_directory(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    let valid_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| !name.is_empty() && name.is_ascii());
    if !valid_name {
        return Err("directory name must be non-empty ASCII".to_string());
    }
    if exists(&path) {
        return Err(format!("{} already exists", path.display()));
    }
    Ok(path)
}

fn exists(path: &Path) -> bool {
    path.exists() || path.symlink_metadata().is_ok()
}
