use std::sync::Arc;

use anyhow::{Context, Result};

use crate::window_api::clean_process_name;

/// Name the tracker itself has when it shows up as the foreground app. Time spent in it is not
/// logged.
pub fn resolve_self_name(configured: Option<&str>) -> Result<Arc<str>> {
    if let Some(name) = configured {
        return Ok(name.trim().into());
    }
    let executable = std::env::current_exe().context("Can't resolve the current executable")?;
    Ok(clean_process_name(&executable.to_string_lossy()).into())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;

    use super::resolve_self_name;

    #[test]
    fn configured_name_wins() -> Result<()> {
        assert_eq!(&*resolve_self_name(Some(" Study Tracker "))?, "Study Tracker");
        Ok(())
    }

    #[test]
    fn defaults_to_executable_name() -> Result<()> {
        let name = resolve_self_name(None)?;
        assert!(!name.is_empty());
        assert!(!name.contains('/'));
        Ok(())
    }
}
