use anyhow::{anyhow, Result};
use sysinfo::Pid;
use tracing::instrument;
use xcb::{
    x::{Atom, GetProperty, InternAtom, Window, ATOM_ANY},
    Connection, Xid,
};

use super::{ForegroundApp, ForegroundProvider};

fn intern_atom(conn: &Connection, name: &[u8]) -> Result<Atom> {
    let reply = conn.wait_for_reply(conn.send_request(&InternAtom {
        only_if_exists: false,
        name,
    }))?;
    Ok(reply.atom())
}

fn get_pid(conn: &Connection, window: Window, pid_atom: Atom) -> Result<Option<u32>> {
    let result = conn.wait_for_reply(conn.send_request(&GetProperty {
        delete: false,
        window,
        property: pid_atom,
        r#type: ATOM_ANY,
        long_offset: 0,
        long_length: 1,
    }))?;
    Ok(result.value::<u32>().first().copied())
}

fn get_active_window(conn: &Connection, root: Window, active_window_atom: Atom) -> Result<Window> {
    let result = conn.wait_for_reply(conn.send_request(&GetProperty {
        delete: false,
        window: root,
        property: active_window_atom,
        r#type: ATOM_ANY,
        long_offset: 0,
        long_length: 1,
    }))?;
    result
        .value::<Window>()
        .first()
        .copied()
        .ok_or_else(|| anyhow!("_NET_ACTIVE_WINDOW is not set"))
}

fn get_executable(pid: u32) -> Option<String> {
    let system = sysinfo::System::new_all();
    let process = system.process(Pid::from_u32(pid))?;
    process
        .exe()
        .and_then(|v| v.to_str())
        .map(|v| v.to_string())
        .or_else(|| process.name().to_str().map(|v| v.to_string()))
}

/// Reads the focused window through EWMH properties and resolves its owning process.
pub struct X11ForegroundProvider {
    connection: Connection,
    preferred_screen: usize,
    active_window_atom: Atom,
    pid_atom: Atom,
}

impl X11ForegroundProvider {
    pub fn new() -> Result<Self> {
        let (connection, preferred_screen) = xcb::Connection::connect(None)?;
        let active_window_atom = intern_atom(&connection, b"_NET_ACTIVE_WINDOW")?;
        let pid_atom = intern_atom(&connection, b"_NET_WM_PID")?;
        Ok(Self {
            connection,
            preferred_screen: usize::try_from(preferred_screen).unwrap_or(0),
            active_window_atom,
            pid_atom,
        })
    }
}

impl ForegroundProvider for X11ForegroundProvider {
    #[instrument(skip(self))]
    fn query(&mut self) -> Result<ForegroundApp> {
        let setup = self.connection.get_setup();

        // Currently the application only supports 1 x11 screen.
        let root = setup
            .roots()
            .nth(self.preferred_screen)
            .ok_or_else(|| anyhow!("Screen {} is not available", self.preferred_screen))?
            .root();

        let active_window = get_active_window(&self.connection, root, self.active_window_atom)?;
        if active_window.is_none() {
            return Err(anyhow!("No window is focused"));
        }
        let pid = get_pid(&self.connection, active_window, self.pid_atom)?
            .ok_or_else(|| anyhow!("Focused window has no _NET_WM_PID"))?;
        let executable =
            get_executable(pid).ok_or_else(|| anyhow!("Process {pid} could not be resolved"))?;
        Ok(ForegroundApp::from_executable(&executable))
    }
}

