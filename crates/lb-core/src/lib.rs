//! likeboard/crates/lb-core/src/lib.rs
//!
//! The vote ledger, domain models and interface definitions for likeboard.

pub mod error;
pub mod ledger;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use error::*;
pub use ledger::*;
pub use models::*;
pub use traits::*;
