use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use xeship_core::LedgerError;

use crate::files::{self, backup_path};
use crate::record::ProgressRecord;

/// Resume point plus the reason it was degraded, if it was.
#[derive(Debug)]
pub struct Resume {
    pub record: ProgressRecord,
    pub error: Option<LedgerError>,
}

impl Resume {
    pub fn is_reset(&self) -> bool {
        self.record.is_reset()
    }
}

/// One source's ledger.
///
/// The file is an append-only sequence of [`ProgressRecord`] lines of which
/// only the last one matters. [`StateFile::open`] reads that record and keeps
/// an append handle for [`StateFile::save`]; [`StateFile::finalize`] rotates
/// the history to `<ledger>.0` and rewrites the ledger with one record.
#[derive(Debug)]
pub struct StateFile {
    path: PathBuf,
    file: Option<File>,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        backup_path(&self.path)
    }

    /// True once `open` has established the append handle.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Read the last recorded position and keep the ledger open for appends.
    ///
    /// A missing ledger is created empty and yields [`ProgressRecord::start`].
    /// On error no append handle is kept.
    pub fn open(&mut self) -> Result<ProgressRecord, LedgerError> {
        if !files::exists(&self.path)? {
            self.file = Some(files::open_append(&self.path, "create")?);
            debug!(path = %self.path.display(), "created new ledger");
            return Ok(ProgressRecord::start());
        }

        let readonly = File::open(&self.path).map_err(LedgerError::io("open_readonly", &self.path))?;
        let last = read_last(BufReader::new(readonly), &self.path)?;

        self.file = Some(files::open_append(&self.path, "open_append")?);

        let record = last.unwrap_or_else(ProgressRecord::start);
        debug!(
            path = %self.path.display(),
            file = %record.file_name,
            offset = record.offset,
            status = %record.status,
            "resuming from ledger"
        );
        Ok(record)
    }

    /// [`open`](Self::open), degrading any failure to a `reset` resume point.
    pub fn resume(&mut self) -> Resume {
        match self.open() {
            Ok(record) => Resume { record, error: None },
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ledger unreadable, resetting position");
                Resume {
                    record: ProgressRecord::reset(),
                    error: Some(e),
                }
            }
        }
    }

    /// Append one record. Not synced; a crash may lose the most recent lines.
    ///
    /// Records whose file name would not read back intact are rejected
    /// before anything is written.
    pub fn save(&mut self, record: &ProgressRecord) -> Result<(), LedgerError> {
        record.validate()?;
        let file = self.file.as_mut().ok_or(LedgerError::NotOpen)?;
        files::write_record(file, &self.path, record)
    }

    /// Record the final position and compact the ledger down to it.
    ///
    /// The previous content survives as `<ledger>.0`, replacing any older
    /// backup. The handle is closed afterwards; further saves need a new `open`.
    pub fn finalize(&mut self, record: &ProgressRecord) -> Result<(), LedgerError> {
        self.save(record)?;
        if let Some(live) = self.file.take() {
            live.sync_all().map_err(LedgerError::io("sync", &self.path))?;
        }

        let backup = self.backup_path();
        files::remove_if_exists(&backup)?;
        fs::rename(&self.path, &backup).map_err(LedgerError::io("rename", &self.path))?;

        let mut fresh = files::open_append(&self.path, "create")?;
        files::write_record(&mut fresh, &self.path, record)?;
        fresh.sync_all().map_err(LedgerError::io("sync", &self.path))?;

        info!(
            path = %self.path.display(),
            file = %record.file_name,
            offset = record.offset,
            "ledger compacted"
        );
        Ok(())
    }
}

fn read_last<R: BufRead>(reader: R, path: &Path) -> Result<Option<ProgressRecord>, LedgerError> {
    let mut last = None;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(LedgerError::io("read", path))?;
        if let Some(record) = ProgressRecord::decode(&line, idx + 1)? {
            last = Some(record);
        }
    }
    Ok(last)
}
