use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{map_io_err, FixupError, FixupResult};
use crate::replace::{ReplaceOptions, ReplaceStrategy};

/// Run settings. The patch list itself is fixed and never comes from here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixupConfig {
    /// Directory the patch paths are resolved against
    pub root: PathBuf,
    /// How rewritten files are put in place
    pub strategy: ReplaceStrategy,
    /// Copy the original file's permission bits onto the rewritten file
    pub preserve_permissions: bool,
}

impl Default for FixupConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            strategy: ReplaceStrategy::Atomic,
            preserve_permissions: true,
        }
    }
}

impl FixupConfig {
    /// Load settings from a TOML file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> FixupResult<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {}", path.display());

        let config_str = fs::read_to_string(path).map_err(map_io_err(path))?;
        toml::from_str(&config_str).map_err(|e| FixupError::config_error(e.to_string(), path))
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> FixupResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn replace_options(&self) -> ReplaceOptions {
        ReplaceOptions {
            strategy: self.strategy,
            preserve_permissions: self.preserve_permissions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_original_behaviour() {
        let config = FixupConfig::load_or_default(None).unwrap();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.replace_options(), ReplaceOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fixup.toml");
        fs::write(&path, "strategy = \"delete-then-move\"\n").unwrap();

        let config = FixupConfig::load(&path).unwrap();
        assert_eq!(config.strategy, ReplaceStrategy::DeleteThenMove);
        assert!(config.preserve_permissions);
        assert_eq!(config.root, PathBuf::from("."));
    }

    #[test]
    fn test_written_config_loads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fixup.toml");
        let config = FixupConfig {
            root: PathBuf::from("generated/cs"),
            strategy: ReplaceStrategy::DeleteThenMove,
            preserve_permissions: false,
        };
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(FixupConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fixup.toml");

        fs::write(&path, "strategy = \"sideways\"\n").unwrap();
        let err = FixupConfig::load(&path).unwrap_err();
        assert!(matches!(err, FixupError::Config { .. }));

        fs::write(&path, "patches = []\n").unwrap();
        assert!(matches!(FixupConfig::load(&path), Err(FixupError::Config { .. })));

        let missing = dir.path().join("nope.toml");
        assert!(matches!(FixupConfig::load(&missing), Err(FixupError::NotFound { .. })));
    }
}
