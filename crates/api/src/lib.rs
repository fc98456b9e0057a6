// Path: crates/api/src/lib.rs

//! # Staking Ledger API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Staking Ledger API
//!
//! The narrow interfaces the staking core consumes: ordered key-value state, token
//! custody, the validator registry, hook listeners and the block lifecycle. The staking
//! crate depends only on these traits; concrete collaborators are supplied by the host.

/// The per-block execution context.
pub mod context;
/// The token custody collaborator.
pub mod custody;
/// Re-exports all core error types from the central `ledger-types` crate.
pub mod error;
/// Ordered listeners notified around delegation changes.
pub mod hooks;
/// Defines traits for components that hook into the block processing lifecycle.
pub mod lifecycle;
/// The validator registry collaborator.
pub mod registry;
/// Core traits for state access and the copy-on-write transaction overlay.
pub mod state;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::context::BlockContext;
    pub use crate::custody::TokenCustody;
    pub use crate::error::{ErrorCode, StakingError, StateError};
    pub use crate::hooks::{HookChain, StakingHooks};
    pub use crate::lifecycle::OnEndBlock;
    pub use crate::registry::ValidatorRegistry;
    pub use crate::state::{apply_in_overlay, StateAccess, StateOverlay};
}
