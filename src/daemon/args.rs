use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

/// Background process that samples the foreground application and logs where the time goes.
#[derive(Parser)]
#[command(version)]
pub struct DaemonArgs {
    /// Run in the foreground instead of detaching.
    #[arg(long)]
    pub force: bool,
    /// Application directory holding the database, config and logs.
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
}
