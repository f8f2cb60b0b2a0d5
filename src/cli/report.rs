use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use clap::Parser;
use serde::Serialize;
use tracing::debug;

use crate::{
    daemon::storage::usage_store::UsageStore,
    report::{
        daily::daily_summary,
        monthly::{monthly_rollup, MonthlyRollup},
        weekly::{weekly_pattern, DayPattern, DEFAULT_WINDOW_DAYS},
    },
    utils::{percentage::Percentage, time::format_date},
};

use super::{
    date::DateArg,
    output::{format_duration, hours_bar, print_json, with_shares, AppShare, Painter},
};

const MAX_WEEK_DAYS: i64 = 366;

#[derive(Debug, Parser)]
pub struct TodayCommand {
    #[command(flatten)]
    date: DateArg,
    #[arg(long, help = "Print json instead of a table")]
    json: bool,
    #[arg(short = 'p', long = "percentage", help = "Only show apps with at least this share of the day", default_value_t = Percentage::ZERO)]
    min_percentage: Percentage,
}

#[derive(Debug, Parser)]
pub struct WeekCommand {
    #[command(flatten)]
    date: DateArg,
    #[arg(
        long,
        default_value_t = DEFAULT_WINDOW_DAYS,
        value_parser = clap::value_parser!(u32).range(1..=MAX_WEEK_DAYS),
        help = "Number of days ending at --date, at most a year"
    )]
    days: u32,
    #[arg(long, help = "Print json instead of a table")]
    json: bool,
}

#[derive(Debug, Parser)]
pub struct MonthCommand {
    #[arg(long, help = "Print json instead of a table")]
    json: bool,
}

#[derive(Debug, Parser)]
pub struct ReportCommand {
    #[arg(long, help = "Print json instead of a table")]
    json: bool,
}

#[derive(Debug, Serialize)]
struct DailyReport {
    date: NaiveDate,
    total_seconds: i64,
    apps: Vec<AppShare>,
}

#[derive(Debug, Serialize)]
struct FullReport {
    today: DailyReport,
    week: Vec<DayPattern>,
    month: MonthlyRollup,
}

pub async fn process_today_command(
    store: &impl UsageStore,
    now: DateTime<Local>,
    TodayCommand {
        date,
        json,
        min_percentage,
    }: TodayCommand,
) -> Result<()> {
    let date = date.resolve(now)?;
    let apps = daily_summary(store, date).await?;
    let (apps, total_seconds) = with_shares(apps, min_percentage);
    let report = DailyReport {
        date,
        total_seconds,
        apps,
    };
    if json {
        print_json(&report)
    } else {
        print_daily(&report, Painter::detect());
        Ok(())
    }
}

pub async fn process_week_command(
    store: &impl UsageStore,
    now: DateTime<Local>,
    WeekCommand { date, days, json }: WeekCommand,
) -> Result<()> {
    let reference = date.resolve(now)?;
    let pattern = weekly_pattern(store, reference, days).await?;
    if json {
        print_json(&pattern)
    } else {
        print_week(&pattern, Painter::detect());
        Ok(())
    }
}

pub async fn process_month_command(
    store: &impl UsageStore,
    now: DateTime<Local>,
    MonthCommand { json }: MonthCommand,
) -> Result<()> {
    let rollup = monthly_rollup(store, now).await?;
    if json {
        print_json(&rollup)
    } else {
        print_month(&rollup, Painter::detect());
        Ok(())
    }
}

/// Today, the last week and the last 28 days in one go. The three queries run concurrently.
pub async fn process_report_command(
    store: &impl UsageStore,
    now: DateTime<Local>,
    ReportCommand { json }: ReportCommand,
) -> Result<()> {
    let today = now.date_naive();
    let (apps, week, month) = futures::try_join!(
        daily_summary(store, today),
        weekly_pattern(store, today, DEFAULT_WINDOW_DAYS),
        monthly_rollup(store, now),
    )?;
    debug!("Collected report for {today}");
    let (apps, total_seconds) = with_shares(apps, Percentage::ZERO);
    let report = FullReport {
        today: DailyReport {
            date: today,
            total_seconds,
            apps,
        },
        week,
        month,
    };

    if json {
        return print_json(&report);
    }
    let painter = Painter::detect();
    print_daily(&report.today, painter);
    println!();
    print_week(&report.week, painter);
    println!();
    print_month(&report.month, painter);
    Ok(())
}

fn print_daily(report: &DailyReport, painter: Painter) {
    println!(
        "{}",
        painter.heading(&format!(
            "{}  {}",
            format_date(report.date),
            format_duration(report.total_seconds)
        ))
    );
    if report.apps.is_empty() {
        println!("Nothing was tracked");
        return;
    }
    for entry in &report.apps {
        println!(
            "{}%\t{}\t{}\t{}",
            entry.rounded_share,
            format_duration(entry.usage.total_seconds),
            painter.category(&entry.usage.category),
            entry.usage.app_name
        );
    }
}

fn print_week(pattern: &[DayPattern], painter: Painter) {
    let max_hours = pattern
        .iter()
        .map(|v| v.study_hours + v.non_study_hours)
        .fold(0., f64::max);
    println!("{}", painter.heading("Day\t\tStudy\tOther"));
    for day in pattern {
        println!(
            "{} {}\t{:.2}h\t{:.2}h\t{}{}",
            day.weekday,
            format_date(day.date),
            day.study_hours,
            day.non_study_hours,
            painter.study(&hours_bar(day.study_hours, max_hours)),
            hours_bar(day.non_study_hours, max_hours),
        );
    }
}

fn print_month(rollup: &MonthlyRollup, painter: Painter) {
    println!("{}", painter.heading("Last 28 days\tStudy\tOther"));
    for bucket in &rollup.buckets {
        println!(
            "{:<15}\t{:.1}h\t{:.1}h",
            bucket.bucket.label(),
            bucket.study_hours,
            bucket.non_study_hours
        );
    }
    let summary = &rollup.summary;
    println!();
    println!("Total study\t{:.1}h", summary.total_study_hours);
    println!("Average day\t{:.1}h", summary.average_study_hours);
    println!("Longest day\t{:.1}h", summary.longest_study_hours);
    println!(
        "Study share\t{}",
        painter.study(&format!("{}%", summary.study_percentage))
    );
    for suggestion in &rollup.suggestions {
        println!();
        println!("{}", painter.warning(&suggestion.title));
        println!("{}", suggestion.description);
    }
}
