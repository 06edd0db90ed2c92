use std::fs;

use xeship_core::LedgerError;
use xeship_ledger::{ProgressRecord, StateFile, Status};

use crate::helpers::{health_key, read, temp_store};

#[test]
fn test_fresh_source_round_trip() {
    let (_tmp, store) = temp_store();
    let key = health_key();

    let mut state = store.register(0, "", &key).unwrap();
    assert!(state
        .path()
        .ends_with("xestate/DB1_SRV__A_XE_health.state"));

    let resume = state.resume();
    assert!(resume.error.is_none());
    assert_eq!(resume.record, ProgressRecord::start());

    for offset in [512, 1024, 4096] {
        state
            .save(&ProgressRecord::new("system_health_0.xel", offset, Status::Success))
            .unwrap();
    }
    let last = ProgressRecord::new("system_health_1.xel", 128, Status::Success);
    state.finalize(&last).unwrap();

    // Restart: a new handle on the same path resumes at the finalized record.
    let mut restarted = StateFile::new(state.path());
    assert_eq!(restarted.open().unwrap(), last);
}

#[test]
fn test_finalize_leaves_single_backup() {
    let (tmp, store) = temp_store();
    let mut state = store.state_file(&health_key()).unwrap();
    state.open().unwrap();
    state
        .save(&ProgressRecord::new("a.xel", 10, Status::Success))
        .unwrap();
    state
        .finalize(&ProgressRecord::new("a.xel", 20, Status::Reset))
        .unwrap();

    assert_eq!(read(&state.backup_path()), "a.xel, 10, good\r\na.xel, 20, reset\r\n");
    assert_eq!(read(state.path()), "a.xel, 20, reset\r\n");

    let mut names: Vec<String> = fs::read_dir(tmp.path().join("xestate"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "DB1_SRV__A_XE_health.state".to_string(),
            "DB1_SRV__A_XE_health.state.0".to_string(),
        ]
    );
}

#[test]
fn test_repeated_runs_stay_compact() {
    let (_tmp, store) = temp_store();
    let path = store.state_file(&health_key()).unwrap().path().to_path_buf();

    for run in 1..=3i64 {
        let mut state = StateFile::new(&path);
        let resume = state.open().unwrap();
        assert_eq!(resume.offset, (run - 1) * 100);

        state
            .save(&ProgressRecord::new("a.xel", run * 100 - 50, Status::Success))
            .unwrap();
        state
            .finalize(&ProgressRecord::new("a.xel", run * 100, Status::Success))
            .unwrap();
        assert_eq!(read(&path).lines().count(), 1);
    }
}

#[test]
fn test_mixed_legacy_and_current_lines() {
    let (_tmp, store) = temp_store();
    let mut state = store.state_file(&health_key()).unwrap();
    fs::write(state.path(), "app.xel, 1024\r\napp.xel, 2048, good\r\n").unwrap();

    assert_eq!(
        state.open().unwrap(),
        ProgressRecord::new("app.xel", 2048, Status::Success)
    );
}

#[test]
fn test_corrupt_ledger_degrades_to_reset() {
    let (_tmp, store) = temp_store();
    let mut state = store.state_file(&health_key()).unwrap();

    for content in ["a,b,c,d\r\n", "a,notanumber\r\n", "a.xel, 5, maybe\r\n"] {
        fs::write(state.path(), content).unwrap();
        let resume = state.resume();
        assert!(resume.is_reset(), "content {content:?}");
        assert!(matches!(
            resume.error,
            Some(LedgerError::CorruptLedger { .. })
        ));
    }
}

#[test]
fn test_reset_status_is_preserved() {
    let (_tmp, store) = temp_store();
    let mut state = store.state_file(&health_key()).unwrap();
    fs::write(state.path(), "a.xel, 300, reset\r\n").unwrap();

    let resume = state.resume();
    assert!(resume.error.is_none());
    assert_eq!(resume.record, ProgressRecord::new("a.xel", 300, Status::Reset));
}

#[test]
fn test_unreadable_ledger_path_resets_with_io_error() {
    let (_tmp, store) = temp_store();
    let state_path = store.state_file(&health_key()).unwrap().path().to_path_buf();
    // A directory where the ledger should be cannot be read as lines.
    fs::create_dir_all(&state_path).unwrap();

    let mut state = StateFile::new(&state_path);
    let resume = state.resume();
    assert!(resume.is_reset());
    assert!(matches!(resume.error, Some(LedgerError::Io { .. })));
}
