// Path: crates/staking/src/store.rs
//! Typed read/write helpers over `StateAccess`.

use ledger_api::state::StateAccess;
use ledger_types::codec::{decode_state, encode_state};
use ledger_types::error::StakingError;
use parity_scale_codec::{Decode, Encode};

pub(crate) fn load<T: Decode>(
    state: &dyn StateAccess,
    key: &[u8],
) -> Result<Option<T>, StakingError> {
    match state.get(key)? {
        Some(bytes) => Ok(Some(decode_state(&bytes)?)),
        None => Ok(None),
    }
}

pub(crate) fn save<T: Encode>(
    state: &mut dyn StateAccess,
    key: &[u8],
    value: &T,
) -> Result<(), StakingError> {
    state.insert(key, &encode_state(value)?)?;
    Ok(())
}

/// Decodes every value under `prefix`, stopping after `max` records if given.
pub(crate) fn scan_values<T: Decode>(
    state: &dyn StateAccess,
    prefix: &[u8],
    max: Option<usize>,
) -> Result<Vec<T>, StakingError> {
    let limit = max.unwrap_or(usize::MAX);
    let mut out = Vec::new();
    for item in state.prefix_scan(prefix)?.take(limit) {
        let (_, value) = item?;
        out.push(decode_state(&value)?);
    }
    Ok(out)
}

/// Collects every key under `prefix`.
pub(crate) fn scan_keys(
    state: &dyn StateAccess,
    prefix: &[u8],
) -> Result<Vec<Vec<u8>>, StakingError> {
    let mut out = Vec::new();
    for item in state.prefix_scan(prefix)? {
        let (key, _) = item?;
        out.push(key.to_vec());
    }
    Ok(out)
}

/// Returns true if at least one key exists under `prefix`.
pub(crate) fn has_prefix(state: &dyn StateAccess, prefix: &[u8]) -> Result<bool, StakingError> {
    match state.prefix_scan(prefix)?.next() {
        Some(item) => item.map(|_| true).map_err(StakingError::from),
        None => Ok(false),
    }
}
