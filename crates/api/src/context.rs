// Path: crates/api/src/context.rs
//! Defines the block context passed to every staking operation.

/// The height and time of the block being executed.
///
/// Every replica executes a block with the same context, so operations read time only
/// from here and never from a wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockContext {
    /// The height of the block being executed.
    pub height: u64,
    /// The block timestamp in unix seconds.
    pub time: u64,
}

impl BlockContext {
    /// Creates a context for the given height and time.
    pub fn new(height: u64, time: u64) -> Self {
        Self { height, time }
    }

    /// Returns a context advanced by `blocks` heights and `secs` seconds.
    pub fn advance(&self, blocks: u64, secs: u64) -> Self {
        Self {
            height: self.height.saturating_add(blocks),
            time: self.time.saturating_add(secs),
        }
    }
}
