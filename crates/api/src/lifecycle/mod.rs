// Path: crates/api/src/lifecycle/mod.rs
//! Defines traits for components that hook into the block processing lifecycle.

use crate::context::BlockContext;
use crate::state::StateAccess;

/// A trait for components that need to perform actions at the end of a block.
///
/// The host calls this once per block, after all transactions, in a phase that does not
/// interleave with transaction execution.
pub trait OnEndBlock {
    /// Summary of the work performed.
    type Report;
    /// The error returned when the end-of-block phase fails.
    type Error: std::error::Error;

    /// Called after all transactions in a block have been processed.
    fn on_end_block(
        &self,
        state: &mut dyn StateAccess,
        ctx: &BlockContext,
    ) -> Result<Self::Report, Self::Error>;
}
