// Path: crates/staking/src/lib.rs
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

//! # Staking Ledger
//!
//! Tracks delegated stake, bonding status and the time-delayed unbonding and
//! redelegation lifecycle. Everything here runs inside one deterministic state
//! transition: no operation reads a clock, blocks, or keeps state outside the
//! `StateAccess` it is handed.
//!
//! The layers, leaf first:
//!
//! - [`shares`]: token/share conversions and exchange-rate checks.
//! - [`validators`]: the state-backed [`ValidatorRegistry`](ledger_api::registry::ValidatorRegistry).
//! - [`delegation`]: delegation records.
//! - [`unbonding`], [`redelegation`], [`unbonding_ops`]: pending entries, their time
//!   queues, the operation-ID space and the hold protocol.
//! - [`keeper`]: the operations that compose the layers above.
//! - [`end_block`]: the epoch-boundary driver that completes matured entries.

pub mod delegation;
pub mod end_block;
pub mod keeper;
mod queue;
pub mod redelegation;
pub mod shares;
mod store;
pub mod unbonding;
pub mod unbonding_ops;
pub mod validators;

pub use end_block::EndBlockReport;
pub use keeper::{BeginInfo, StakingKeeper};
pub use validators::StateValidatorRegistry;
