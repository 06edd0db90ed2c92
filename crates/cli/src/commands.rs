use std::path::Path;
use std::thread;

use anyhow::{bail, Context, Result};
use tracing::{error, info, warn};

use xeship_core::{LedgerError, SourceKey};
use xeship_ledger::{files, LedgerStore, MigrateOutcome};

use crate::config::{ConfiguredSource, SourcesManifest};

/// Claim and migrate every configured source, one worker thread per source.
pub fn migrate(store: &LedgerStore, sources: &Path) -> Result<()> {
    let configured = SourcesManifest::load(sources)?.expand();
    info!(count = configured.len(), "migrating configured sources");

    let results: Vec<(&ConfiguredSource, Result<MigrateOutcome, LedgerError>)> =
        thread::scope(|scope| {
            let handles: Vec<_> = configured
                .iter()
                .enumerate()
                .map(|(worker, source)| {
                    scope.spawn(move || {
                        let outcome = store
                            .claim(&source.key)
                            .and_then(|()| store.migrate(worker, &source.prefix, &source.key));
                        (source, outcome)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

    let mut moved = 0;
    let mut failed = 0;
    for (source, outcome) in results {
        match outcome {
            Ok(MigrateOutcome::Moved { from, to }) => {
                moved += 1;
                println!("moved    {} -> {}", from.display(), to.display());
            }
            Ok(_) => println!("skipped  {}", source.key),
            Err(e) => {
                failed += 1;
                error!(source = %source.key, error = %e, "migration failed");
                println!("FAILED   {}: {}", source.key, e);
            }
        }
    }

    info!(moved, failed, "migration finished");
    if failed > 0 {
        bail!("{} of {} sources failed to migrate", failed, configured.len());
    }
    Ok(())
}

/// Claim every configured source and report the ones that collide.
pub fn check(store: &LedgerStore, sources: &Path) -> Result<()> {
    let configured = SourcesManifest::load(sources)?.expand();

    let mut duplicates = Vec::new();
    for source in &configured {
        match store.claim(&source.key) {
            Ok(()) => {}
            Err(LedgerError::AlreadyClaimed { .. }) => duplicates.push(&source.key),
            Err(e) => return Err(e.into()),
        }
    }

    for key in &duplicates {
        println!("duplicate  {} ({})", key, key.state_file_name());
    }
    if !duplicates.is_empty() {
        bail!("{} duplicate sources in {}", duplicates.len(), sources.display());
    }
    println!("{} sources, no duplicates", configured.len());
    Ok(())
}

pub fn inspect(store: &LedgerStore, key: &SourceKey, json: bool) -> Result<()> {
    let path = store.layout().state_path(key);
    if !path.exists() {
        println!("no ledger at {}", path.display());
        return Ok(());
    }

    let mut state = store.state_file(key)?;
    let resume = state.resume();
    if json {
        let out = serde_json::json!({
            "path": path,
            "record": resume.record,
            "error": resume.error.as_ref().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("ledger:  {}", path.display());
    println!("file:    {}", resume.record.file_name);
    println!("offset:  {}", resume.record.offset);
    println!("status:  {}", resume.record.status);
    if let Some(e) = &resume.error {
        println!("error:   {}", e);
    }
    Ok(())
}

/// Rotate an existing ledger down to its last record. Never creates one.
pub fn compact(store: &LedgerStore, key: &SourceKey) -> Result<()> {
    let mut state = store.state_file(key)?;
    if !files::exists(state.path())? {
        bail!("no ledger to compact at {}", state.path().display());
    }
    let record = state
        .open()
        .with_context(|| format!("refusing to compact unreadable ledger {}", state.path().display()))?;

    if record.file_name.is_empty() && record.offset == 0 {
        warn!(path = %state.path().display(), "ledger holds no progress yet");
    }
    state.finalize(&record)?;
    println!(
        "compacted {} (backup: {})",
        state.path().display(),
        state.backup_path().display()
    );
    Ok(())
}
