use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("duplicate domain-instance-class-id: {key}")]
    AlreadyClaimed { key: String },

    #[error("corrupt ledger at line {line}: {reason}")]
    CorruptLedger { line: usize, reason: String },

    #[error("{op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("record cannot be stored: {0}")]
    InvalidRecord(String),

    #[error("state file not open")]
    NotOpen,

    #[error("new state file already exists: {}", .path.display())]
    AlreadyMigrated { path: PathBuf },

    #[error("base directory: {0}")]
    BaseDir(String),
}

impl LedgerError {
    /// Build a `map_err` adapter that tags an I/O error with the failing
    /// operation and path.
    pub fn io<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(std::io::Error) -> Self + 'a {
        move |source| Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn corrupt(line: usize, reason: impl Into<String>) -> Self {
        Self::CorruptLedger {
            line,
            reason: reason.into(),
        }
    }
}
