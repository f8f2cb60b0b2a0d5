use chrono::{Days, NaiveDate, Weekday};

/// Format used for dates in storage and output. Dates are local calendar days.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const SECONDS_PER_HOUR: f64 = 3600.;

/// This is the standard way of converting a date to a string in studytrack.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses strictly `YYYY-MM-DD`. Anything else is rejected rather than guessed.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Converts seconds into hours rounded to `decimals` places.
pub fn seconds_to_hours(seconds: f64, decimals: i32) -> f64 {
    round_to(seconds / SECONDS_PER_HOUR, decimals)
}

/// Returns `days` consecutive dates ending at `end` (inclusive), oldest first.
pub fn trailing_dates(end: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .rev()
        .filter_map(|offset| end.checked_sub_days(Days::new(offset.into())))
        .collect()
}

/// Whole days between `date` and `reference`. Positive when `date` is in the past.
pub fn days_between(date: NaiveDate, reference: NaiveDate) -> i64 {
    (reference - date).num_days()
}

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
