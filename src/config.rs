//! Daemon settings read from `config.toml` in the application directory. Every key is optional.
//!
//! ```toml
//! sample_interval_ms = 5000
//! self_name = "studytrack"
//! failure_policy = "keep"
//! flush_on_shutdown = true
//! ```

use std::{io, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 5000;

/// What a failed foreground query does to the interval currently being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep tracking. The next successful sample attributes the outage to the last app.
    #[default]
    Keep,
    /// Drop the open interval. Time spent during the outage is not attributed to anyone.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    pub sample_interval_ms: u64,
    /// Name under which the tracker itself shows up as the foreground app. Defaults to the
    /// executable name.
    pub self_name: Option<String>,
    pub failure_policy: FailurePolicy,
    pub flush_on_shutdown: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            self_name: None,
            failure_policy: FailurePolicy::Keep,
            flush_on_shutdown: true,
        }
    }
}

impl TrackerConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: TrackerConfig = toml::from_str(content)?;
        if config.sample_interval_ms == 0 {
            bail!("sample_interval_ms must be greater than zero");
        }
        if matches!(&config.self_name, Some(name) if name.trim().is_empty()) {
            bail!("self_name must not be empty");
        }
        Ok(config)
    }

    /// Loads `config.toml` from `app_dir`. A missing file means defaults.
    pub fn load(app_dir: &Path) -> Result<Self> {
        let path = app_dir.join(CONFIG_FILE_NAME);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let config = Self::parse(&content)
                    .with_context(|| format!("Invalid configuration in {}", path.display()))?;
                info!("Loaded configuration {config:?}");
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::{FailurePolicy, TrackerConfig, CONFIG_FILE_NAME};

    #[test]
    fn missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = TrackerConfig::load(dir.path())?;
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.sample_interval(), Duration::from_secs(5));
        assert!(config.flush_on_shutdown);
        Ok(())
    }

    #[test]
    fn partial_file_overrides_only_given_keys() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "sample_interval_ms = 1000\nfailure_policy = \"reset\"\n",
        )?;
        let config = TrackerConfig::load(dir.path())?;
        assert_eq!(config.sample_interval(), Duration::from_secs(1));
        assert_eq!(config.failure_policy, FailurePolicy::Reset);
        assert_eq!(config.self_name, None);
        assert!(config.flush_on_shutdown);
        Ok(())
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(TrackerConfig::parse("sample_interval_ms = 0").is_err());
        assert!(TrackerConfig::parse("self_name = \"  \"").is_err());
        assert!(TrackerConfig::parse("failure_policy = \"retry\"").is_err());
        assert!(TrackerConfig::parse("unknown_key = 1").is_err());
    }
}
