// Path: crates/types/src/app/mod.rs
//! Core application-level data structures for the staking ledger.

/// Fixed-width account and validator addresses.
pub mod identity;
/// The share decimal.
pub mod shares;
/// Persisted staking records.
pub mod staking;

pub use identity::*;
pub use shares::*;
pub use staking::*;
