// Path: crates/staking/src/unbonding_ops.rs
//! The global unbonding operation-ID space and its reverse index.
//!
//! Every unbonding or redelegation entry receives an ID from one persisted counter. The
//! index maps that ID to the primary key of the record holding the entry, so an external
//! subsystem can hold or release a single entry without scanning the store. The index is
//! written in the same state transition that creates the entry and deleted in the one
//! that removes it.

use crate::redelegation::set_redelegation;
use crate::store::load;
use crate::unbonding::set_unbonding_delegation;
use ledger_api::state::StateAccess;
use ledger_types::app::{Redelegation, UnbondingDelegation};
use ledger_types::error::StakingError;
use ledger_types::keys::{
    unbonding_op_index_key, RED_KEY_PREFIX, UBD_KEY_PREFIX, UNBONDING_OP_ID_KEY,
};

/// The record an operation ID resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnbondingOpRecord {
    /// The ID belongs to an entry of this unbonding delegation.
    Unbonding(UnbondingDelegation),
    /// The ID belongs to an entry of this redelegation.
    Redelegation(Redelegation),
}

/// Allocates the next operation ID. The first ID issued is 1.
pub fn increment_unbonding_op_id(state: &mut dyn StateAccess) -> Result<u64, StakingError> {
    let last = match state.get(UNBONDING_OP_ID_KEY)? {
        Some(bytes) => {
            let raw: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
                StakingError::InvariantViolated(format!(
                    "unbonding op counter has {} bytes",
                    bytes.len()
                ))
            })?;
            u64::from_be_bytes(raw)
        }
        None => 0,
    };
    let next = last.wrapping_add(1);
    state.insert(UNBONDING_OP_ID_KEY, &next.to_be_bytes())?;
    Ok(next)
}

/// Points `id` at the primary key of the record that holds its entry.
pub fn set_unbonding_op_index(
    state: &mut dyn StateAccess,
    id: u64,
    record_key: &[u8],
) -> Result<(), StakingError> {
    state.insert(&unbonding_op_index_key(id), record_key)?;
    Ok(())
}

/// Drops the index entry for `id`.
pub fn delete_unbonding_op_index(state: &mut dyn StateAccess, id: u64) -> Result<(), StakingError> {
    state.delete(&unbonding_op_index_key(id))?;
    Ok(())
}

/// Returns the primary key indexed for `id`.
pub fn get_unbonding_op_index(
    state: &dyn StateAccess,
    id: u64,
) -> Result<Option<Vec<u8>>, StakingError> {
    Ok(state.get(&unbonding_op_index_key(id))?)
}

/// Resolves `id` to the record holding it, or `None` if the ID is unknown or the
/// record has since been deleted.
pub fn get_unbonding_op_record(
    state: &dyn StateAccess,
    id: u64,
) -> Result<Option<UnbondingOpRecord>, StakingError> {
    let Some(record_key) = get_unbonding_op_index(state, id)? else {
        return Ok(None);
    };
    if record_key.starts_with(UBD_KEY_PREFIX) {
        Ok(load::<UnbondingDelegation>(state, &record_key)?.map(UnbondingOpRecord::Unbonding))
    } else if record_key.starts_with(RED_KEY_PREFIX) {
        Ok(load::<Redelegation>(state, &record_key)?.map(UnbondingOpRecord::Redelegation))
    } else {
        tracing::error!(target: "staking", id, "unbonding op index points outside staking records");
        Err(StakingError::InvariantViolated(format!(
            "unbonding op {} indexes an unknown record kind",
            id
        )))
    }
}

/// Returns the unbonding delegation holding entry `id` and the entry's position.
pub fn get_unbonding_delegation_by_unbonding_op_id(
    state: &dyn StateAccess,
    id: u64,
) -> Result<Option<(UnbondingDelegation, usize)>, StakingError> {
    Ok(match get_unbonding_op_record(state, id)? {
        Some(UnbondingOpRecord::Unbonding(ubd)) => ubd
            .entries
            .iter()
            .position(|e| e.id == id)
            .map(|i| (ubd, i)),
        _ => None,
    })
}

/// Returns the redelegation holding entry `id` and the entry's position.
pub fn get_redelegation_by_unbonding_op_id(
    state: &dyn StateAccess,
    id: u64,
) -> Result<Option<(Redelegation, usize)>, StakingError> {
    Ok(match get_unbonding_op_record(state, id)? {
        Some(UnbondingOpRecord::Redelegation(red)) => red
            .entries
            .iter()
            .position(|e| e.id == id)
            .map(|i| (red, i)),
        _ => None,
    })
}

/// Marks entry `id` as held. Returns false if no entry carries that ID.
pub fn put_unbonding_op_on_hold(state: &mut dyn StateAccess, id: u64) -> Result<bool, StakingError> {
    if let Some((mut ubd, i)) = get_unbonding_delegation_by_unbonding_op_id(state, id)? {
        if let Some(entry) = ubd.entries.get_mut(i) {
            entry.on_hold = true;
            set_unbonding_delegation(state, &ubd)?;
            tracing::debug!(target: "staking", id, "unbonding entry put on hold");
            return Ok(true);
        }
    }
    if let Some((mut red, i)) = get_redelegation_by_unbonding_op_id(state, id)? {
        if let Some(entry) = red.entries.get_mut(i) {
            entry.on_hold = true;
            set_redelegation(state, &red)?;
            tracing::debug!(target: "staking", id, "redelegation entry put on hold");
            return Ok(true);
        }
    }
    Ok(false)
}
