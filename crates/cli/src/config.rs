use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

use xeship_core::{SourceKey, CLASS_AGENT_JOBS};

/// Id used for the agent job history source of an instance.
pub const AGENT_JOBS_ID: &str = "history";

/// Sources manifest loaded from TOML.
///
/// ```toml
/// [defaults]
/// domain = "CORP"
/// sessions = ["system_health"]
///
/// [[source]]
/// fqdn = "SRV\\A"
/// agent_jobs = "all"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesManifest {
    #[serde(default)]
    pub defaults: SourceDefaults,

    #[serde(default, rename = "source")]
    pub sources: Vec<SourceEntry>,
}

/// Values every `[[source]]` inherits unless it sets its own.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceDefaults {
    pub domain: String,
    pub prefix: String,
    pub sessions: Vec<String>,
    pub ignore_sessions: bool,
    /// "all", "failed" or "none"; empty means none.
    pub agent_jobs: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    /// Server or `SERVER\INSTANCE` name.
    pub fqdn: String,
    pub domain: Option<String>,
    pub prefix: Option<String>,
    pub sessions: Option<Vec<String>>,
    pub ignore_sessions: Option<bool>,
    pub agent_jobs: Option<String>,
}

/// One ledger-owning source after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredSource {
    pub key: SourceKey,
    /// Prefix the legacy layout used in place of the domain.
    pub prefix: String,
}

impl SourcesManifest {
    pub fn load(path: &Path) -> Result<Self> {
        debug!(?path, "Loading sources manifest");
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read sources: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("failed to parse sources: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        for (i, entry) in manifest.sources.iter().enumerate() {
            if entry.fqdn.trim().is_empty() {
                bail!("source #{} has an empty fqdn", i + 1);
            }
        }
        Ok(manifest)
    }

    /// Expand every `[[source]]` into the ledgers it owns: one per XE
    /// session, plus one for agent job history when enabled.
    pub fn expand(&self) -> Vec<ConfiguredSource> {
        let d = &self.defaults;
        let mut out = Vec::new();
        for entry in &self.sources {
            let domain = entry.domain.as_deref().unwrap_or(&d.domain);
            let prefix = entry.prefix.as_deref().unwrap_or(&d.prefix);
            let sessions = entry.sessions.as_ref().unwrap_or(&d.sessions);
            let ignore_sessions = entry.ignore_sessions.unwrap_or(d.ignore_sessions);
            let agent_jobs = entry.agent_jobs.as_deref().unwrap_or(&d.agent_jobs);

            if !ignore_sessions {
                for session in sessions {
                    out.push(ConfiguredSource {
                        key: SourceKey::xe(domain, &entry.fqdn, session),
                        prefix: prefix.to_string(),
                    });
                }
            }
            if agent_jobs_enabled(agent_jobs) {
                out.push(ConfiguredSource {
                    key: SourceKey::new(domain, &entry.fqdn, CLASS_AGENT_JOBS, AGENT_JOBS_ID),
                    prefix: prefix.to_string(),
                });
            }
        }
        out
    }
}

fn agent_jobs_enabled(setting: &str) -> bool {
    let s = setting.trim();
    !s.is_empty() && !s.eq_ignore_ascii_case("none")
}
