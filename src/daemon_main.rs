// Keeps the daemon from opening a console window on Windows. Comment out to see stdout while
// debugging.
#![windows_subsystem = "windows"]

use std::{env::args, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use studytrack::{
    daemon::{args::DaemonArgs, start_daemon},
    utils::{
        dir::resolve_app_dir,
        logging::{enable_logging, DAEMON_PREFIX},
        runtime::single_thread_runtime,
    },
};

fn main() -> Result<()> {
    run_service(args().collect::<Vec<_>>())
}

fn run_service(command_args: Vec<String>) -> Result<()> {
    let args = DaemonArgs::parse_from(&command_args);
    // Daemonizing moves the working directory to `/`.
    let app_dir = resolve_app_dir(args.dir.clone())?;

    if !args.force {
        #[cfg(feature = "win")]
        {
            use std::os::windows::process::CommandExt;
            use windows::Win32::System::Threading::DETACHED_PROCESS;

            let mut command_args = command_args;
            command_args.push("--force".into());
            let process_name = std::env::current_exe()?;
            println!("Starting detached {process_name:?}");
            let mut command = std::process::Command::new(process_name);
            command.args(command_args.into_iter().skip(1));
            command.creation_flags(DETACHED_PROCESS.0);
            command.stdin(std::process::Stdio::null());
            command.stdout(std::process::Stdio::null());
            command.stderr(std::process::Stdio::null());
            #[allow(clippy::zombie_processes)]
            command.spawn()?;
            println!("Created daemon");
            return Ok(());
        }
        #[cfg(unix)]
        {
            use daemonize::Daemonize;

            let daemonize = Daemonize::new()
                .stdout(daemonize::Stdio::devnull())
                .stderr(daemonize::Stdio::devnull())
                // stdin is redirected to /dev/null by daemonize by default
                .execute();
            match daemonize {
                daemonize::Outcome::Parent(parent) => {
                    parent.map_err(|e| {
                        anyhow::anyhow!("Failed to create daemon on parent side {e:?}")
                    })?;
                    println!("Created daemon");
                    return Ok(());
                }
                daemonize::Outcome::Child(_) => (),
            }
        }
    }

    run(app_dir, args)
}

fn run(app_dir: PathBuf, args: DaemonArgs) -> Result<()> {
    enable_logging(DAEMON_PREFIX, &app_dir.join("logs"), args.log, args.log_console)?;
    single_thread_runtime()?.block_on(async move { start_daemon(app_dir).await })?;
    Ok(())
}
