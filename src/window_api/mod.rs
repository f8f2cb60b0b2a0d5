//! Contains logic for asking the desktop which application currently holds focus.
//! [GenericForegroundProvider] is the main artifact of this module that abstracts
//! the operations.

#[cfg(feature = "win")]
pub mod win;
#[cfg(feature = "x11")]
pub mod x11;

#[cfg(feature = "win")]
extern crate windows;

#[cfg(feature = "x11")]
extern crate xcb;

use std::{path::Path, sync::Arc};

use anyhow::Result;

/// The application owning the focused window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundApp {
    /// Short application name, for example `firefox` or `Code`. Used as the key in the category
    /// registry.
    pub owner_process_name: Arc<str>,
}

impl ForegroundApp {
    /// Builds an app from a full executable path such as `/usr/lib/firefox/firefox` or
    /// `C:\Program Files\Code\Code.exe`.
    pub fn from_executable(path: &str) -> Self {
        Self {
            owner_process_name: clean_process_name(path).into(),
        }
    }
}

/// Intended to serve as a contract windows and linux systems must implement.
#[cfg_attr(test, mockall::automock)]
pub trait ForegroundProvider {
    fn query(&mut self) -> Result<ForegroundApp>;
}

/// Serves as a cross-compatible ForegroundProvider implementation.
pub struct GenericForegroundProvider {
    inner: Box<dyn ForegroundProvider>,
}

impl GenericForegroundProvider {
    pub fn new() -> Result<Self> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "win")] {
                use win::WindowsForegroundProvider;
                Ok(Self {
                    inner: Box::new(WindowsForegroundProvider::new()),
                })
            }
            else if #[cfg(feature = "x11")] {
                use x11::X11ForegroundProvider;
                Ok(Self {
                    inner: Box::new(X11ForegroundProvider::new()?),
                })
            }
            else {
                Err(anyhow::anyhow!(
                    "No foreground window backend was compiled in. Enable the `x11` or `win` feature"
                ))
            }
        }
    }
}

impl ForegroundProvider for GenericForegroundProvider {
    fn query(&mut self) -> Result<ForegroundApp> {
        self.inner.query()
    }
}

/// Strips directories and a trailing `.exe` so the same application gets the same name on every
/// platform.
pub fn clean_process_name(value: &str) -> String {
    let name = Path::new(value)
        .file_name()
        .map(|v| v.to_string_lossy().to_string())
        .unwrap_or_else(|| value.to_string());
    // Path only splits on the host separator, Windows paths are also handled here.
    let name = name.rsplit('\\').next().unwrap_or(&name).to_string();
    match name.strip_suffix(".exe") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}
