// Path: crates/test_utils/src/lib.rs
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

//! # Staking Ledger Test Utilities
//!
//! In-memory collaborators and fixtures for testing the staking ledger components.

pub mod assertions;
pub mod custody;
pub mod fixtures;
pub mod hooks;
pub mod state;
