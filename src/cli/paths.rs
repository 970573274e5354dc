use anyhow::{Context, Result};
use std::path::PathBuf;

/// Directory name under the home directory when no data dir is given.
const DEFAULT_DIR_NAME: &str = ".landing";

/// Resolve the data directory: explicit path first, then `~/.landing`.
pub fn resolve_data_dir(data_dir: Option<String>) -> Result<PathBuf> {
    match data_dir {
        Some(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(dirs::home_dir()
            .context("Could not determine home directory")?
            .join(DEFAULT_DIR_NAME)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        let dir = resolve_data_dir(Some("/tmp/landing-test".to_string())).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/landing-test"));
    }

    #[test]
    fn test_blank_dir_falls_back_to_home() {
        if let Some(home) = dirs::home_dir() {
            let dir = resolve_data_dir(Some("  ".to_string())).unwrap();
            assert_eq!(dir, home.join(DEFAULT_DIR_NAME));
        }
    }
}
