//! Configuration file paths
//!
//! Uses the platform config directory via the `dirs` crate:
//! - Linux: `~/.config/gl-review/`
//! - macOS: `~/Library/Application Support/gl-review/`
//! - Windows: `%APPDATA%\gl-review\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "gl-review";

/// File name of the per-project config in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".gl-review.toml";

/// Get the application config directory.
///
/// The directory is not created; it is only ever read from.
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get path to the user-wide config file
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get path to the per-project config file (in CWD)
pub fn local_config_path() -> Result<PathBuf> {
    Ok(std::env::current_dir()
        .context("Could not determine working directory")?
        .join(LOCAL_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_paths() {
        if let Ok(path) = app_config_path() {
            assert!(path.ends_with("gl-review/config.toml"));
        }

        let local = local_config_path().unwrap();
        assert!(local.ends_with(LOCAL_CONFIG_FILE));
    }
}
