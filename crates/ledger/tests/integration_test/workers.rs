use std::sync::Arc;
use std::thread;

use xeship_core::{LedgerError, SourceKey};
use xeship_ledger::{ProgressRecord, Status};

use crate::helpers::{health_key, temp_store, write_legacy};

#[test]
fn test_duplicate_sources_rejected_across_workers() {
    let (_tmp, store) = temp_store();
    let store = Arc::new(store);

    // Same instance configured twice with different spellings.
    let keys = vec![
        health_key(),
        SourceKey::xe("db1", "srv\\a", "health"),
        SourceKey::xe("DB1", "SRV\\A", "login"),
    ];

    let handles: Vec<_> = keys
        .into_iter()
        .enumerate()
        .map(|(worker, key)| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.register(worker, "", &key).map(|_| ()))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let ok = results.iter().filter(|r| r.is_ok()).count();
    let dup = results
        .iter()
        .filter(|r| matches!(r, Err(LedgerError::AlreadyClaimed { .. })))
        .count();
    assert_eq!(ok, 2);
    assert_eq!(dup, 1);
    assert_eq!(store.guard().len(), 2);
}

#[test]
fn test_parallel_startup_with_legacy_ledgers() {
    let (_tmp, store) = temp_store();
    let sessions: Vec<String> = (0..8).map(|i| format!("session_{i}")).collect();
    for (i, session) in sessions.iter().enumerate() {
        let key = SourceKey::xe("DB1", "SRV\\A", session.as_str());
        write_legacy(&store, "prod", &key, &format!("{session}.xel, {i}\r\n"));
    }
    let store = Arc::new(store);

    let handles: Vec<_> = sessions
        .into_iter()
        .enumerate()
        .map(|(worker, session)| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let key = SourceKey::xe("DB1", "SRV\\A", session.as_str());
                let mut state = store.register(worker, "prod", &key).unwrap();
                let resume = state.open().unwrap();
                assert_eq!(resume.offset, worker as i64);
                state
                    .finalize(&ProgressRecord::new(resume.file_name, 1000, Status::Success))
                    .unwrap();
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.guard().len(), 8);
}
