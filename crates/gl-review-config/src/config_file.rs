use crate::paths::{app_config_path, local_config_path};
use std::path::PathBuf;

/// Load config file content from CWD first, then the config directory
///
/// Searches for:
/// 1. `.gl-review.toml` in the current working directory
/// 2. `gl-review/config.toml` in the platform config directory
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    let candidates = [local_config_path(), app_config_path()]
        .into_iter()
        .filter_map(|path| match path {
            Ok(path) => Some(path),
            Err(e) => {
                log::debug!("Skipping config location: {}", e);
                None
            }
        });
    read_first(candidates)
}

/// Content of the first readable file among `candidates`.
fn read_first(candidates: impl IntoIterator<Item = PathBuf>) -> Option<String> {
    candidates.into_iter().find_map(|path| {
        let content = std::fs::read_to_string(&path).ok()?;
        log::debug!("Loaded config from {}", path.display());
        Some(content)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::LOCAL_CONFIG_FILE;

    #[test]
    fn test_first_existing_file_wins() {
        let local = tempfile::TempDir::new().unwrap();
        let user = tempfile::TempDir::new().unwrap();
        let local_file = local.path().join(LOCAL_CONFIG_FILE);
        let user_file = user.path().join("config.toml");
        std::fs::write(&user_file, "address_scheme = \"user\"").unwrap();

        let content = read_first([local_file.clone(), user_file.clone()]).unwrap();
        assert!(content.contains("user"));

        std::fs::write(&local_file, "address_scheme = \"local\"").unwrap();
        let content = read_first([local_file, user_file]).unwrap();
        assert!(content.contains("local"));
    }

    #[test]
    fn test_no_candidate_exists() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(read_first([dir.path().join("missing.toml")]).is_none());
    }
}
