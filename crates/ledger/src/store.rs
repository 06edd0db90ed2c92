use xeship_core::{LedgerConfig, LedgerError, SourceKey};

use crate::guard::DuplicateGuard;
use crate::layout::LedgerLayout;
use crate::migrate::{migrate_legacy, MigrateOutcome};
use crate::state::StateFile;

/// Process-wide entry point for ledgers.
///
/// Create one at startup, wrap it in an `Arc` and hand it to every worker.
/// Claims and migrations share one lock; state files are owned by the
/// worker that opened them.
#[derive(Debug)]
pub struct LedgerStore {
    layout: LedgerLayout,
    guard: DuplicateGuard,
}

impl LedgerStore {
    pub fn new(layout: LedgerLayout) -> Self {
        Self {
            layout,
            guard: DuplicateGuard::new(),
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(LedgerLayout::from_config(config))
    }

    pub fn layout(&self) -> &LedgerLayout {
        &self.layout
    }

    pub fn guard(&self) -> &DuplicateGuard {
        &self.guard
    }

    pub fn claim(&self, key: &SourceKey) -> Result<(), LedgerError> {
        self.guard.claim(key)
    }

    /// Move a legacy ledger for `key` into place. Must run before the
    /// source's state file is opened.
    pub fn migrate(
        &self,
        worker: usize,
        prefix: &str,
        key: &SourceKey,
    ) -> Result<MigrateOutcome, LedgerError> {
        self.guard
            .exclusive(|| migrate_legacy(&self.layout, worker, prefix, key))
    }

    /// State file handle for `key`, creating the state directory if needed.
    /// The ledger itself is created by [`StateFile::open`].
    pub fn state_file(&self, key: &SourceKey) -> Result<StateFile, LedgerError> {
        self.layout.ensure_state_dir()?;
        Ok(StateFile::new(self.layout.state_path(key)))
    }

    /// Startup sequence for one source: claim, migrate, then hand back its
    /// (unopened) state file.
    pub fn register(
        &self,
        worker: usize,
        prefix: &str,
        key: &SourceKey,
    ) -> Result<StateFile, LedgerError> {
        self.claim(key)?;
        self.migrate(worker, prefix, key)?;
        self.state_file(key)
    }
}
