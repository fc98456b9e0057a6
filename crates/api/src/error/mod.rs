// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use ledger_types::error::{
    ConfigError, CustodyError, ErrorCode, HookError, ShareError, StakingError, StateError,
};
pub use ledger_types::Result;
