use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;
use xeship_core::{LedgerError, SourceKey};

/// Registry of claimed sources.
///
/// Two configured sources that resolve to the same ledger name (ignoring
/// case) must not run side by side. Claims are never released; the set only
/// grows for the life of the process.
#[derive(Debug, Default)]
pub struct DuplicateGuard {
    claimed: Mutex<HashSet<String>>,
}

impl DuplicateGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&self, key: &SourceKey) -> Result<(), LedgerError> {
        let name = key.claim_name();
        let mut claimed = self.lock();
        if !claimed.insert(name) {
            warn!(source = %key, "source already claimed");
            return Err(LedgerError::AlreadyClaimed {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    pub fn is_claimed(&self, key: &SourceKey) -> bool {
        self.lock().contains(&key.claim_name())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` while holding the registry lock, serializing it against
    /// claims and other exclusive sections.
    pub(crate) fn exclusive<R>(&self, f: impl FnOnce() -> R) -> R {
        let _held = self.lock();
        f()
    }

    // The set is valid after any panic, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.claimed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
