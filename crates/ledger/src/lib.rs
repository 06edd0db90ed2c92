pub mod files;
pub mod guard;
pub mod layout;
pub mod migrate;
pub mod record;
pub mod state;
pub mod store;

// Re-export key types
pub use guard::DuplicateGuard;
pub use layout::LedgerLayout;
pub use migrate::{migrate_legacy, MigrateOutcome};
pub use record::{ProgressRecord, Status};
pub use state::{Resume, StateFile};
pub use store::LedgerStore;
