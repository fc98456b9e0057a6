// Path: crates/api/src/state/mod.rs
//! Core traits for state access.
//!
//! - `StateAccess`: ordered key-value operations with prefix scans.
//! - `StateOverlay`: a copy-on-write view used to make one operation atomic.
//! - `MemoryState`: a `BTreeMap`-backed store for hosts without a persistent backend.

use ledger_types::error::StateError;
use std::sync::Arc;

/// An atomically reference-counted, owned key slice.
pub type StateKey = Arc<[u8]>;
/// An atomically reference-counted, owned value slice.
pub type StateVal = Arc<[u8]>;
/// An owned key-value pair from the state, using cheap-to-clone Arcs.
pub type StateKVPair = (StateKey, StateVal);
/// A streaming iterator over key-value pairs from the state, in ascending key order.
pub type StateScanIter<'a> = Box<dyn Iterator<Item = Result<StateKVPair, StateError>> + Send + 'a>;

mod accessor;
mod memory;
mod overlay;

pub use accessor::*;
pub use memory::*;
pub use overlay::*;
