//! Tracks which application holds focus, logs the time spent in each, and reports how much of it
//! went to studying. A background daemon samples the foreground app into a SQLite log while the
//! cli reads daily, weekly and monthly rollups from the same file.

pub mod cli;
pub mod config;
pub mod daemon;
pub mod report;
pub mod utils;
pub mod window_api;
