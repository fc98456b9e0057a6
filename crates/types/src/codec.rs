// Path: crates/types/src/codec.rs

//! Defines the canonical, deterministic binary codec for all staking state.
//!
//! Every record is stored with `parity-scale-codec` (SCALE). Replicas must produce the
//! exact same bytes for the same logical value, otherwise two honest nodes would compute
//! different state roots from the same block. Centralizing the codec here keeps every
//! reader and writer on one format.

use crate::error::StateError;
use parity_scale_codec::{Decode, DecodeAll, Encode};

/// Encodes a value into its canonical SCALE byte representation.
pub fn to_bytes_canonical<T: Encode>(v: &T) -> Result<Vec<u8>, String> {
    Ok(v.encode())
}

/// Decodes a value from its canonical SCALE byte representation.
///
/// Trailing bytes are rejected: a value that decodes with leftovers is not canonical.
pub fn from_bytes_canonical<T: Decode>(b: &[u8]) -> Result<T, String> {
    T::decode_all(&mut &*b).map_err(|e| format!("canonical decode failed: {}", e))
}

/// Decodes a stored record, mapping failures into a `StateError::Decode`.
///
/// A record that cannot be decoded means the stored bytes are corrupt, so callers
/// propagate this instead of treating the key as absent.
pub fn decode_state<T: Decode>(b: &[u8]) -> Result<T, StateError> {
    from_bytes_canonical(b).map_err(StateError::Decode)
}

/// Encodes a record for storage, mapping failures into a `StateError::InvalidValue`.
pub fn encode_state<T: Encode>(v: &T) -> Result<Vec<u8>, StateError> {
    to_bytes_canonical(v).map_err(StateError::InvalidValue)
}
