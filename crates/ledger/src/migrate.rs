//! One-time move of ledgers from the legacy `status/` layout.
//!
//! Legacy ledgers were named `<prefix>_<instance>_<class>_<id>.status`. The
//! move refuses to overwrite a ledger that already exists in the current
//! layout and drops the legacy `.0` backup once the ledger is moved.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};
use xeship_core::{LedgerError, SourceKey};

use crate::files::{self, backup_path};
use crate::layout::LedgerLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrateOutcome {
    NoLegacyDir,
    NoLegacyFile,
    Moved { from: PathBuf, to: PathBuf },
}

impl MigrateOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, MigrateOutcome::Moved { .. })
    }
}

/// Move the legacy ledger for `key` into the current layout, if there is one.
///
/// Callers serialize this against other migrations and claims; see
/// [`LedgerStore::migrate`](crate::LedgerStore::migrate).
pub fn migrate_legacy(
    layout: &LedgerLayout,
    worker: usize,
    prefix: &str,
    key: &SourceKey,
) -> Result<MigrateOutcome, LedgerError> {
    if !files::exists(layout.legacy_dir())? {
        return Ok(MigrateOutcome::NoLegacyDir);
    }

    let legacy = layout.legacy_path(prefix, key);
    if !files::exists(&legacy)? {
        return Ok(MigrateOutcome::NoLegacyFile);
    }
    debug!(worker, path = %legacy.display(), "legacy status file");

    if layout.ensure_state_dir()? {
        info!(worker, dir = %layout.state_dir().display(), "made new state directory");
    }

    let target = layout.state_path(key);
    if files::exists(&target)? {
        return Err(LedgerError::AlreadyMigrated { path: target });
    }

    info!(
        worker,
        from = %legacy.display(),
        to = %target.display(),
        "moving legacy ledger"
    );
    fs::rename(&legacy, &target).map_err(LedgerError::io("rename", &legacy))?;

    let stray = backup_path(&legacy);
    if files::remove_if_exists(&stray)? {
        info!(worker, path = %stray.display(), "removed legacy backup");
    }

    Ok(MigrateOutcome::Moved {
        from: legacy,
        to: target,
    })
}
