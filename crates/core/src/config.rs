use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

pub const DEFAULT_STATE_DIR: &str = "xestate";
pub const DEFAULT_LEGACY_DIR: &str = "status";

// ── Ledger config ─────────────────────────────────────────────

/// Where ledgers live on disk.
///
/// ```text
/// <base_dir>/
///   xestate/   ← current ledgers (<domain>_<instance>_<class>_<id>.state)
///   status/    ← legacy ledgers, migrated away on startup
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Active profile name (empty = default).
    pub profile: String,
    pub base_dir: PathBuf,
    pub state_dir: String,
    pub legacy_dir: String,
}

impl LedgerConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `XESHIP_PROFILE`; when set, every key is first
    /// looked up as `{PROFILE}_{KEY}`.
    pub fn from_env() -> Result<Self, LedgerError> {
        Self::from_env_with_base(None)
    }

    /// Like [`from_env`](Self::from_env) but with an explicit base directory
    /// taking precedence over `XESHIP_BASE_DIR`.
    pub fn from_env_with_base(base_dir: Option<PathBuf>) -> Result<Self, LedgerError> {
        let profile = env_or("XESHIP_PROFILE", "").to_uppercase();
        Self::for_profile(&profile, base_dir)
    }

    pub fn for_profile(profile: &str, base_dir: Option<PathBuf>) -> Result<Self, LedgerError> {
        let p = profile.to_uppercase();
        let p = p.as_str();
        let base_dir = base_dir
            .or_else(|| profiled_env_opt(p, "XESHIP_BASE_DIR").map(PathBuf::from));
        let base_dir = match base_dir {
            Some(dir) => dir,
            None => executable_dir()?,
        };
        Ok(Self {
            profile: p.to_string(),
            base_dir,
            state_dir: profiled_env_or(p, "XESHIP_STATE_DIR", DEFAULT_STATE_DIR),
            legacy_dir: profiled_env_or(p, "XESHIP_LEGACY_DIR", DEFAULT_LEGACY_DIR),
        })
    }

    /// Config rooted at an explicit directory with default sub-directory names.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            profile: String::new(),
            base_dir: base_dir.into(),
            state_dir: DEFAULT_STATE_DIR.to_string(),
            legacy_dir: DEFAULT_LEGACY_DIR.to_string(),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    pub fn state_path(&self) -> PathBuf {
        self.base_dir.join(&self.state_dir)
    }

    pub fn legacy_path(&self) -> PathBuf {
        self.base_dir.join(&self.legacy_dir)
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Ledger config loaded (profile: {}):", self.profile_label());
        tracing::info!("  base_dir:    {}", self.base_dir.display());
        tracing::info!("  state_dir:   {}", self.state_path().display());
        tracing::info!("  legacy_dir:  {}", self.legacy_path().display());
    }
}

/// Ledgers sit alongside the running program unless configured otherwise.
fn executable_dir() -> Result<PathBuf, LedgerError> {
    let exe = env::current_exe().map_err(|e| LedgerError::BaseDir(e.to_string()))?;
    exe.parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| LedgerError::BaseDir(format!("{} has no parent", exe.display())))
}
