pub mod categories;
pub mod date;
pub mod output;
pub mod process;
pub mod report;

use std::path::{Path, PathBuf};

use anyhow::Result;
use categories::{
    process_apps_command, process_categorize_command, process_category_command, AppsCommand,
    CategorizeCommand, CategoryCommand,
};
use clap::{Parser, Subcommand};
use process::{daemon_executables, kill_previous_servers, restart_server};
use report::{
    process_month_command, process_report_command, process_today_command, process_week_command,
    MonthCommand, ReportCommand, TodayCommand, WeekCommand,
};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    daemon::{start_daemon, storage},
    utils::{
        clock::{Clock, DefaultClock},
        dir::resolve_app_dir,
        logging::{enable_logging, CLI_PREFIX, DAEMON_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "studytrack", version, long_about = None)]
#[command(about = "Tracks where your screen time goes and how much of it is study", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Starts a daemon for the application")]
    Init {},
    #[command(
        about = "Run a daemon directly in current console. Used for creating a daemon internally and for debugging"
    )]
    Serve {},
    #[command(about = "Stop currently running daemon.")]
    Stop {},
    #[command(about = "Time per app for one day")]
    Today {
        #[command(flatten)]
        command: TodayCommand,
    },
    #[command(about = "Study and other hours for each of the last days")]
    Week {
        #[command(flatten)]
        command: WeekCommand,
    },
    #[command(about = "Study hours of the last 28 days by week, with suggestions")]
    Month {
        #[command(flatten)]
        command: MonthCommand,
    },
    #[command(about = "Today, week and month together")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(about = "Change the type of an app. Affects its whole history")]
    Categorize {
        #[command(flatten)]
        command: CategorizeCommand,
    },
    #[command(about = "Print the type of an app")]
    Category {
        #[command(flatten)]
        command: CategoryCommand,
    },
    #[command(about = "List every tracked app and its type")]
    Apps {
        #[command(flatten)]
        command: AppsCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = resolve_app_dir(args.dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let prefix = match args.commands {
        Commands::Serve {} => DAEMON_PREFIX,
        _ => CLI_PREFIX,
    };
    enable_logging(prefix, &app_dir.join("logs"), logging_level, args.log)?;

    let now = DefaultClock.local_time();

    match args.commands {
        Commands::Init {} => {
            restart_server(Some(&app_dir))?;
            println!("Started daemon");
            Ok(())
        }
        Commands::Stop {} => {
            let killed = kill_previous_servers(&daemon_executables()?)?;
            info!("Stopped {killed} daemons");
            println!("Stopped {killed} daemon(s)");
            Ok(())
        }
        Commands::Serve {} => {
            start_daemon(app_dir).await?;
            Ok(())
        }
        Commands::Today { command } => {
            process_today_command(&open_store(&app_dir)?, now, command).await
        }
        Commands::Week { command } => {
            process_week_command(&open_store(&app_dir)?, now, command).await
        }
        Commands::Month { command } => {
            process_month_command(&open_store(&app_dir)?, now, command).await
        }
        Commands::Report { command } => {
            process_report_command(&open_store(&app_dir)?, now, command).await
        }
        Commands::Categorize { command } => {
            process_categorize_command(&open_store(&app_dir)?, command).await
        }
        Commands::Category { command } => {
            process_category_command(&open_store(&app_dir)?, command).await
        }
        Commands::Apps { command } => {
            process_apps_command(&open_store(&app_dir)?, command).await
        }
    }
}

fn open_store(app_dir: &Path) -> Result<storage::usage_store::SqliteUsageStore> {
    Ok(storage::open_in_app_dir(app_dir)?)
}
