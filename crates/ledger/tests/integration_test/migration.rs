use std::fs;

use xeship_core::{LedgerError, SourceKey};
use xeship_ledger::{MigrateOutcome, ProgressRecord, Status};

use crate::helpers::{health_key, read, temp_store, write_legacy};

#[test]
fn test_migrate_without_legacy_dir() {
    let (tmp, store) = temp_store();

    let outcome = store.migrate(1, "", &health_key()).unwrap();
    assert_eq!(outcome, MigrateOutcome::NoLegacyDir);
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[test]
fn test_migrate_then_resume() {
    let (_tmp, store) = temp_store();
    let key = health_key();
    write_legacy(&store, "prod", &key, "old.xel, 4096\r\n");

    let outcome = store.migrate(2, "prod", &key).unwrap();
    assert!(outcome.moved());

    let mut state = store.state_file(&key).unwrap();
    assert_eq!(
        state.open().unwrap(),
        ProgressRecord::new("old.xel", 4096, Status::Success)
    );

    // Second run: nothing left to move.
    assert_eq!(
        store.migrate(2, "prod", &key).unwrap(),
        MigrateOutcome::NoLegacyFile
    );
}

#[test]
fn test_migrate_refuses_existing_ledger() {
    let (_tmp, store) = temp_store();
    let key = health_key();
    write_legacy(&store, "", &key, "old.xel, 1\r\n");

    let mut state = store.state_file(&key).unwrap();
    state.open().unwrap();
    state
        .save(&ProgressRecord::new("new.xel", 2, Status::Success))
        .unwrap();

    let err = store.migrate(1, "", &key).unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyMigrated { .. }));
    assert_eq!(
        read(&store.layout().legacy_path("", &key)),
        "old.xel, 1\r\n"
    );
    assert_eq!(read(state.path()), "new.xel, 2, good\r\n");
}

#[test]
fn test_migrate_only_moves_matching_source() {
    let (_tmp, store) = temp_store();
    let health = health_key();
    let login = SourceKey::xe("DB1", "SRV\\A", "login");
    write_legacy(&store, "", &health, "h.xel, 1\r\n");
    write_legacy(&store, "", &login, "l.xel, 2\r\n");

    assert!(store.migrate(1, "", &health).unwrap().moved());

    assert!(store.layout().state_path(&health).exists());
    assert!(!store.layout().state_path(&login).exists());
    assert!(store.layout().legacy_path("", &login).exists());
}
