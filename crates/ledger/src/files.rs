//! Small file-system helpers where "not found" is an answer, not an error.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use xeship_core::LedgerError;

use crate::record::ProgressRecord;

/// Suffix of the single backup kept next to a ledger.
pub const BACKUP_SUFFIX: &str = ".0";

/// `<path>.0`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// `Ok(false)` when the path does not exist; any other stat failure is an error.
pub fn exists(path: &Path) -> Result<bool, LedgerError> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(LedgerError::io("stat", path)(e)),
    }
}

/// Remove a file, returning whether there was one to remove.
pub fn remove_if_exists(path: &Path) -> Result<bool, LedgerError> {
    if !exists(path)? {
        return Ok(false);
    }
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(LedgerError::io("remove", path)(e)),
    }
}

pub fn open_append(path: &Path, op: &'static str) -> Result<File, LedgerError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(LedgerError::io(op, path))
}

pub fn write_record(file: &mut File, path: &Path, record: &ProgressRecord) -> Result<(), LedgerError> {
    file.write_all(record.encode().as_bytes())
        .map_err(LedgerError::io("write", path))
}
