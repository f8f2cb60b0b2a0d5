//! Text and json rendering of report results.

use std::io::IsTerminal;

use ansi_term::{Colour, Style};
use anyhow::Result;
use serde::Serialize;

use crate::{
    daemon::storage::entities::STUDY_CATEGORY,
    report::daily::AppUsage,
    utils::percentage::Percentage,
};

const BAR_WIDTH: f64 = 40.;

/// Daily usage of an app together with its share of the whole day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppShare {
    #[serde(flatten)]
    pub usage: AppUsage,
    #[serde(skip)]
    pub share: Percentage,
    #[serde(rename = "share_percentage")]
    pub rounded_share: u32,
}

/// Attaches the share of the day to every app and drops those below `min_share`. Returns the
/// total of the whole day, including dropped apps.
pub fn with_shares(apps: Vec<AppUsage>, min_share: Percentage) -> (Vec<AppShare>, i64) {
    let total = apps.iter().map(|v| v.total_seconds).sum::<i64>();
    let shares = apps
        .into_iter()
        .map(|usage| {
            let share = Percentage::of(usage.total_seconds, total);
            AppShare {
                usage,
                share,
                rounded_share: share.rounded(),
            }
        })
        .filter(|v| v.share >= min_share)
        .collect();
    (shares, total)
}

pub fn format_duration(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = seconds / 60 % 60;
    let seconds = seconds % 60;
    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Horizontal bar for `hours` where `max_hours` fills the whole width.
pub fn hours_bar(hours: f64, max_hours: f64) -> String {
    if max_hours <= 0. || hours <= 0. {
        return String::new();
    }
    let width = (hours / max_hours * BAR_WIDTH).round().max(1.) as usize;
    "#".repeat(width)
}

pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Styling for terminal output. Plain when stdout is redirected.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn detect() -> Self {
        Self {
            enabled: std::io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, style: Style, value: &str) -> String {
        if self.enabled {
            style.paint(value).to_string()
        } else {
            value.to_string()
        }
    }

    pub fn heading(&self, value: &str) -> String {
        self.paint(Style::new().bold().underline(), value)
    }

    /// Study time is green, everything else keeps the terminal color.
    pub fn category(&self, category: &str) -> String {
        if category == STUDY_CATEGORY {
            self.paint(Colour::Green.normal(), category)
        } else {
            self.paint(Style::new().dimmed(), category)
        }
    }

    pub fn study(&self, value: &str) -> String {
        self.paint(Colour::Green.bold(), value)
    }

    pub fn warning(&self, value: &str) -> String {
        self.paint(Colour::Yellow.bold(), value)
    }
}

#[cfg(test)]
mod tests {
    use crate::{report::daily::AppUsage, utils::percentage::Percentage};

    use super::{format_duration, hours_bar, with_shares, Painter};

    fn app(name: &str, total_seconds: i64) -> AppUsage {
        AppUsage {
            app_name: name.into(),
            category: "other".into(),
            total_seconds,
        }
    }

    #[test]
    fn format_duration_drops_empty_units() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(61), "1m1s");
        assert_eq!(format_duration(3600), "1h0m0s");
        assert_eq!(format_duration(3 * 3600 + 25 * 60 + 7), "3h25m7s");
    }

    #[test]
    fn shares_are_of_the_whole_day() {
        let apps = vec![app("a", 600), app("b", 300), app("c", 100)];

        let (shares, total) = with_shares(apps, Percentage::new_opt(10.).unwrap());

        assert_eq!(total, 1000);
        assert_eq!(
            shares
                .iter()
                .map(|v| (&*v.usage.app_name, v.rounded_share))
                .collect::<Vec<_>>(),
            vec![("a", 60), ("b", 30), ("c", 10)]
        );
    }

    #[test]
    fn small_shares_are_filtered_but_counted() {
        let apps = vec![app("a", 990), app("b", 10)];

        let (shares, total) = with_shares(apps, Percentage::new_opt(5.).unwrap());

        assert_eq!(total, 1000);
        assert_eq!(shares.len(), 1);
        assert_eq!(&*shares[0].usage.app_name, "a");
    }

    #[test]
    fn empty_day_has_no_shares() {
        let (shares, total) = with_shares(vec![], Percentage::ZERO);
        assert!(shares.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn share_serializes_next_to_usage() {
        let (shares, _) = with_shares(vec![app("a", 10)], Percentage::ZERO);

        let json = serde_json::to_value(&shares[0]).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "app_name": "a",
                "type": "other",
                "total_seconds": 10,
                "share_percentage": 100,
            })
        );
    }

    #[test]
    fn bars_scale_to_maximum() {
        assert_eq!(hours_bar(0., 2.), "");
        assert_eq!(hours_bar(2., 2.).len(), 40);
        assert_eq!(hours_bar(1., 2.).len(), 20);
        assert_eq!(hours_bar(0.001, 2.).len(), 1);
    }

    #[test]
    fn plain_painter_leaves_text_alone() {
        let painter = Painter::plain();
        assert_eq!(painter.category("study"), "study");
        assert_eq!(painter.heading("Today"), "Today");
    }
}
