pub mod config;
pub mod error;
pub mod source;

pub use config::LedgerConfig;
pub use error::*;
pub use source::*;
