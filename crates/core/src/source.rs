use std::fmt;

use serde::{Deserialize, Serialize};

/// Class used for extended-event sessions.
pub const CLASS_XE: &str = "XE";
/// Class used for agent job history.
pub const CLASS_AGENT_JOBS: &str = "JOBS";

/// Extension of a current-scheme ledger.
pub const STATE_EXTENSION: &str = "state";
/// Extension of a legacy-scheme ledger.
pub const LEGACY_EXTENSION: &str = "status";

/// Identity of one ingestion source: the unit of deduplication and of
/// ledger ownership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceKey {
    pub domain: String,
    pub instance: String,
    pub class: String,
    pub id: String,
}

impl SourceKey {
    pub fn new(
        domain: impl Into<String>,
        instance: impl Into<String>,
        class: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            instance: instance.into(),
            class: class.into(),
            id: id.into(),
        }
    }

    pub fn xe(domain: impl Into<String>, instance: impl Into<String>, session: impl Into<String>) -> Self {
        Self::new(domain, instance, CLASS_XE, session)
    }

    /// Base name of this source's ledger:
    /// `<domain>_<instance>_<class>_<id>.state`.
    pub fn state_file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}.{}",
            self.domain,
            safe_instance(&self.instance),
            self.class,
            self.id,
            STATE_EXTENSION
        )
    }

    /// Base name of the ledger the older layout kept for this source. The
    /// old scheme keyed on `prefix` rather than domain and dropped it
    /// entirely when empty.
    pub fn legacy_file_name(&self, prefix: &str) -> String {
        let instance = safe_instance(&self.instance);
        if prefix.is_empty() {
            format!("{}_{}_{}.{}", instance, self.class, self.id, LEGACY_EXTENSION)
        } else {
            format!(
                "{}_{}_{}_{}.{}",
                prefix, instance, self.class, self.id, LEGACY_EXTENSION
            )
        }
    }

    /// Case-folded file name used by the duplicate guard.
    pub fn claim_name(&self) -> String {
        self.state_file_name().to_lowercase()
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.domain, self.instance, self.class, self.id)
    }
}

/// Named instances (`SERVER\INSTANCE`) cannot go into a file name as-is.
fn safe_instance(instance: &str) -> String {
    instance.replace('\\', "__")
}
