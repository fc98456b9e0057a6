// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # Staking Ledger Types
//!
//! This crate is the foundational library for the staking ledger, containing the
//! persisted records, the fixed-point share decimal, error enums, the state-key layout and the
//! configuration objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `ledger-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. Every record written to
//! consensus-critical state is defined here together with its canonical encoding,
//! so all replicas agree on the exact bytes stored for a given value.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::StakingError> = std::result::Result<T, E>;

/// Persisted staking records: validators, delegations, unbonding and redelegation entries.
pub mod app;
/// The canonical, deterministic binary codec for consensus-critical state.
pub mod codec;
/// Parameters, logging settings and the TOML loader.
pub mod config;
/// A unified set of all error types used across the ledger.
pub mod error;
/// Constants and builders for the persisted state-key layout.
pub mod keys;
/// A prelude containing useful extension traits like `OptionExt`.
pub mod prelude;
