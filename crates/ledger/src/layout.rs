use std::fs;
use std::path::{Path, PathBuf};

use xeship_core::{LedgerConfig, LedgerError, SourceKey};

use crate::files;

/// Resolves source keys to ledger paths under the current and legacy directories.
#[derive(Debug, Clone)]
pub struct LedgerLayout {
    state_dir: PathBuf,
    legacy_dir: PathBuf,
}

impl LedgerLayout {
    pub fn new(state_dir: impl Into<PathBuf>, legacy_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
            legacy_dir: legacy_dir.into(),
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.state_path(), config.legacy_path())
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn legacy_dir(&self) -> &Path {
        &self.legacy_dir
    }

    pub fn state_path(&self, key: &SourceKey) -> PathBuf {
        self.state_dir.join(key.state_file_name())
    }

    pub fn legacy_path(&self, prefix: &str, key: &SourceKey) -> PathBuf {
        self.legacy_dir.join(key.legacy_file_name(prefix))
    }

    /// Create the state directory if missing. Returns whether it was created.
    pub fn ensure_state_dir(&self) -> Result<bool, LedgerError> {
        if files::exists(&self.state_dir)? {
            return Ok(false);
        }
        fs::create_dir_all(&self.state_dir).map_err(LedgerError::io("mkdir", &self.state_dir))?;
        Ok(true)
    }
}
