// Path: crates/staking/src/queue.rs
//! Time-bucketed queues of record pointers.
//!
//! Each bucket is stored at `prefix | completion_time (big-endian)` and holds a SCALE
//! `Vec<T>`. Because the time is big-endian, an ascending prefix scan visits buckets
//! in chronological order and can stop at the first bucket past `now`.

use crate::store::{load, save};
use ledger_api::state::StateAccess;
use ledger_types::codec::decode_state;
use ledger_types::error::StakingError;
use ledger_types::keys::parse_queue_time;
use parity_scale_codec::{Decode, Encode};

/// Returns the pointers stored in one bucket, or an empty list.
pub(crate) fn get_time_slice<T: Decode>(
    state: &dyn StateAccess,
    key: &[u8],
) -> Result<Vec<T>, StakingError> {
    Ok(load::<Vec<T>>(state, key)?.unwrap_or_default())
}

/// Overwrites one bucket.
pub(crate) fn set_time_slice<T: Encode>(
    state: &mut dyn StateAccess,
    key: &[u8],
    slice: &[T],
) -> Result<(), StakingError> {
    save(state, key, &slice)
}

/// Appends `item` to the bucket at `key`. Buckets are never deduplicated.
pub(crate) fn push<T: Encode + Decode>(
    state: &mut dyn StateAccess,
    key: &[u8],
    item: T,
) -> Result<(), StakingError> {
    let mut slice: Vec<T> = get_time_slice(state, key)?;
    slice.push(item);
    set_time_slice(state, key, &slice)
}

/// Removes and returns every pointer in buckets with time `<= now`, oldest first.
pub(crate) fn dequeue_mature<T: Decode>(
    state: &mut dyn StateAccess,
    prefix: &[u8],
    now: u64,
) -> Result<Vec<T>, StakingError> {
    let mut mature = Vec::new();
    let mut drained = Vec::new();
    for item in state.prefix_scan(prefix)? {
        let (key, value) = item?;
        let time = parse_queue_time(prefix, &key).ok_or_else(|| {
            StakingError::InvariantViolated(format!(
                "malformed queue key of length {}",
                key.len()
            ))
        })?;
        if time > now {
            break;
        }
        let slice: Vec<T> = decode_state(&value)?;
        mature.extend(slice);
        drained.push(key.to_vec());
    }
    for key in &drained {
        state.delete(key)?;
    }
    Ok(mature)
}
