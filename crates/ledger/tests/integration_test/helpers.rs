use std::fs;
use std::path::Path;

use tempfile::TempDir;

use xeship_core::{LedgerConfig, SourceKey};
use xeship_ledger::LedgerStore;

/// Store rooted in a fresh temp directory. Keep the `TempDir` alive for the
/// duration of the test.
pub fn temp_store() -> (TempDir, LedgerStore) {
    let tmp = tempfile::tempdir().unwrap();
    let store = LedgerStore::from_config(&LedgerConfig::with_base_dir(tmp.path()));
    (tmp, store)
}

/// The source used throughout the scenarios.
pub fn health_key() -> SourceKey {
    SourceKey::xe("DB1", "SRV\\A", "health")
}

/// Write a legacy `status/` ledger for `key`.
pub fn write_legacy(store: &LedgerStore, prefix: &str, key: &SourceKey, content: &str) {
    let path = store.layout().legacy_path(prefix, key);
    fs::create_dir_all(store.layout().legacy_dir()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
