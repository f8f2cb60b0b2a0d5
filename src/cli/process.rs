use std::{
    env,
    path::{Path, PathBuf},
    process::Stdio,
};

use anyhow::{anyhow, Context, Result};
use sysinfo::{get_current_pid, Signal, System};
use tracing::info;

const DAEMON_BINARY_NAME: &str = "studytrack-daemon";

/// Executables a running daemon can have: this cli running `serve`, or the standalone daemon
/// binary installed next to it.
pub fn daemon_executables() -> Result<Vec<PathBuf>> {
    let current = env::current_exe().context("Can't operate without an executable")?;
    let mut executables = vec![current.clone()];
    if let Some(dir) = current.parent() {
        executables.push(dir.join(format!("{DAEMON_BINARY_NAME}{}", env::consts::EXE_SUFFIX)));
    }
    Ok(executables)
}

/// Stops every process running one of `executables` except this one and its children. Returns
/// how many were stopped.
pub fn kill_previous_servers(executables: &[PathBuf]) -> Result<usize> {
    let system = System::new_all();
    let current_id = get_current_pid().map_err(|e| anyhow!("Can't resolve own pid {e}"))?;
    let mut killed = 0;
    for (pid, process) in system.processes().iter() {
        if *pid == current_id {
            continue;
        }
        if matches!(process.parent(), Some(p) if p == current_id) {
            continue;
        }

        if process
            .exe()
            .filter(|v| v.exists())
            .filter(|v| executables.iter().any(|name| name.as_path() == *v))
            .is_some()
        {
            info!("Stopping {pid} {:?}", process.exe());
            // Forceful on Windows since detached processes don't get signals.
            if process.kill_with(Signal::Term).is_none() {
                process.kill();
            }
            process.wait();
            killed += 1;
        }
    }
    Ok(killed)
}

/// Shuts down previous daemons and starts a new one as a detached `serve` process.
pub fn restart_server(dir: Option<&Path>) -> Result<()> {
    kill_previous_servers(&daemon_executables()?)?;
    let process_name = env::current_exe().context("Can't operate without an executable")?;
    let mut command = std::process::Command::new(process_name);
    command.arg("serve");
    if let Some(dir) = dir {
        command.arg("--dir").arg(dir);
    }

    #[cfg(feature = "win")]
    {
        use std::os::windows::process::CommandExt;
        use windows::Win32::System::Threading::DETACHED_PROCESS;
        command.creation_flags(DETACHED_PROCESS.0);
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }
    command.stdin(Stdio::null());
    command.stdout(Stdio::null());
    command.stderr(Stdio::null());

    #[allow(clippy::zombie_processes)]
    let child = command.spawn()?;
    info!("Spawned daemon {}", child.id());
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::{daemon_executables, kill_previous_servers};

    #[test]
    fn daemon_binary_sits_next_to_the_cli() -> Result<()> {
        let executables = daemon_executables()?;

        assert_eq!(executables.len(), 2);
        assert_eq!(executables[0].parent(), executables[1].parent());
        assert!(executables[1]
            .file_name()
            .is_some_and(|v| v.to_string_lossy().starts_with("studytrack-daemon")));
        Ok(())
    }

    #[test]
    fn nothing_to_kill_for_missing_executables() -> Result<()> {
        let killed = kill_previous_servers(&["/nonexistent/studytrack".into()])?;
        assert_eq!(killed, 0);
        Ok(())
    }
}
