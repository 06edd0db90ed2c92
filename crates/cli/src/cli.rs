use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use xeship_core::{SourceKey, CLASS_XE};

/// Maintenance tool for xeship progress ledgers.
///
/// Moves legacy `status/` ledgers into `xestate/`, checks a sources manifest
/// for duplicate sources, and inspects or compacts single ledgers.
#[derive(Parser, Debug)]
#[command(name = "xeship-ledger", version, about)]
pub struct CliArgs {
    /// Directory holding `xestate/` and `status/` (default: next to the executable)
    #[arg(long, env = "XESHIP_BASE_DIR", global = true)]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Claim every configured source and move its legacy ledger, if any
    Migrate {
        /// Path to the sources manifest
        #[arg(long, default_value = "sources.toml")]
        sources: PathBuf,
    },

    /// Report configured sources that resolve to the same ledger
    Check {
        /// Path to the sources manifest
        #[arg(long, default_value = "sources.toml")]
        sources: PathBuf,
    },

    /// Print the resume point of one ledger
    Inspect {
        #[command(flatten)]
        key: KeyArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Rotate one ledger to `<ledger>.0` and rewrite it with its last record
    Compact {
        #[command(flatten)]
        key: KeyArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    #[arg(long, default_value = "")]
    pub domain: String,

    /// Server or `SERVER\INSTANCE` name
    #[arg(long)]
    pub instance: String,

    #[arg(long, default_value = CLASS_XE)]
    pub class: String,

    /// Session name (or `history` for agent jobs)
    #[arg(long)]
    pub id: String,
}

impl KeyArgs {
    pub fn to_key(&self) -> SourceKey {
        SourceKey::new(&self.domain, &self.instance, &self.class, &self.id)
    }
}
