//! Backfill - synthesize a plausible git commit history
//!
//! Generates a new repository whose commits are spread over a date range
//! with working-day and working-hour irregularity.

pub mod cli;
pub mod config;
pub mod git;
pub mod history;
pub mod messages;
pub mod models;
pub mod params;
pub mod scaffold;
pub mod schedule;
