use std::fmt::Display;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, ValueEnum};

use crate::utils::time::parse_date;

use super::Args;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct DateArg {
    #[arg(
        long,
        help = "Day to report on. Either 2025-03-15 or a phrase like \"yesterday\", \"3 days ago\", \"15/03/2025\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

impl DateArg {
    /// Resolves the requested local calendar day relative to `now`.
    pub fn resolve(&self, now: DateTime<Local>) -> Result<NaiveDate> {
        match &self.date {
            Some(value) => parse_day(value, now, self.date_style),
            None => Ok(now.date_naive()),
        }
    }
}

/// `YYYY-MM-DD` is taken as is. Anything else goes through chrono-english.
pub fn parse_day(value: &str, now: DateTime<Local>, style: DateStyle) -> Result<NaiveDate> {
    if let Some(date) = parse_date(value) {
        return Ok(date);
    }
    match parse_date_string(value, now, style.into()) {
        Ok(v) => Ok(v.date_naive()),
        Err(e) => Err(Args::command()
            .error(
                clap::error::ErrorKind::ValueValidation,
                format!("Failed to validate date {value:?} {e}"),
            )
            .into()),
    }
}
