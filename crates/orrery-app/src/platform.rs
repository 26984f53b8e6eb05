//! OS-specific directories for config and logs.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,

    #[error("platform I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Platform-appropriate locations (XDG on Linux, Known Folders on Windows,
/// Library on macOS).
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformDirs {
    /// Holds `config.ron`.
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

const APP_NAME: &str = "orrery";

impl PlatformDirs {
    /// Resolves without touching the filesystem.
    pub fn resolve() -> Result<Self, PlatformError> {
        let config_base = dirs::config_dir().ok_or(PlatformError::NoConfigDir)?;
        let app_config = config_base.join(APP_NAME);
        let log_dir = dirs::data_local_dir()
            .map(|d| d.join(APP_NAME).join("logs"))
            .unwrap_or_else(|| app_config.join("logs"));

        Ok(Self {
            config_dir: app_config,
            log_dir,
        })
    }

    pub fn resolve_with_root(root: &Path) -> Self {
        let app_dir = root.join(APP_NAME);
        Self {
            config_dir: app_dir.join("config"),
            log_dir: app_dir.join("logs"),
        }
    }

    /// Replaces the config directory, e.g. from `--config`.
    #[must_use]
    pub fn with_config_dir(mut self, config_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = config_dir {
            self.config_dir = dir;
        }
        self
    }

    pub fn create_dirs(&self) -> Result<(), PlatformError> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_gives_absolute_paths() {
        let Ok(dirs) = PlatformDirs::resolve() else {
            eprintln!("No OS config directory, skipping");
            return;
        };
        assert!(dirs.config_dir.is_absolute());
        assert!(dirs.log_dir.is_absolute());
        assert!(dirs.config_dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_directory_creation() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        dirs.create_dirs().unwrap();
        assert!(dirs.config_dir.is_dir());
        assert!(dirs.log_dir.is_dir());
    }

    #[test]
    fn test_config_dir_override() {
        let tmp = tempfile::tempdir().unwrap();
        let dirs = PlatformDirs::resolve_with_root(tmp.path());
        let log_dir = dirs.log_dir.clone();

        let custom = tmp.path().join("elsewhere");
        let dirs = dirs.with_config_dir(Some(custom.clone()));
        assert_eq!(dirs.config_dir, custom);
        assert_eq!(dirs.log_dir, log_dir);

        let unchanged = dirs.clone().with_config_dir(None);
        assert_eq!(unchanged, dirs);
    }
}
