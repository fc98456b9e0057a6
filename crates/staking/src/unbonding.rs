// Path: crates/staking/src/unbonding.rs
//! Unbonding delegation records, their by-validator index and the unbonding queue.

use crate::queue;
use crate::store::{has_prefix, load, save, scan_keys, scan_values};
use crate::unbonding_ops::{increment_unbonding_op_id, set_unbonding_op_index};
use ledger_api::hooks::StakingHooks;
use ledger_api::state::StateAccess;
use ledger_types::app::{
    AccountId, DvPair, UnbondingDelegation, UnbondingDelegationEntry, ValidatorId,
};
use ledger_types::error::StakingError;
use ledger_types::keys::{
    parse_ubd_by_val_index_key, ubd_by_val_index_key, ubd_by_val_prefix, ubd_key,
    ubd_queue_key, ubds_by_delegator_prefix, UBD_KEY_PREFIX, UBD_QUEUE_PREFIX,
};

/// Loads the unbonding delegation of `delegator` from `validator`.
pub fn get_unbonding_delegation(
    state: &dyn StateAccess,
    delegator: &AccountId,
    validator: &ValidatorId,
) -> Result<Option<UnbondingDelegation>, StakingError> {
    load(state, &ubd_key(delegator, validator))
}

/// Returns at most `max` unbonding delegations of `delegator`.
pub fn get_unbonding_delegations(
    state: &dyn StateAccess,
    delegator: &AccountId,
    max: usize,
) -> Result<Vec<UnbondingDelegation>, StakingError> {
    scan_values(state, &ubds_by_delegator_prefix(delegator), Some(max))
}

/// Returns every unbonding delegation out of `validator`, resolved through the index.
pub fn get_unbonding_delegations_from_validator(
    state: &dyn StateAccess,
    validator: &ValidatorId,
) -> Result<Vec<UnbondingDelegation>, StakingError> {
    let mut out = Vec::new();
    for key in scan_keys(state, &ubd_by_val_prefix(validator))? {
        let (val, del) = parse_ubd_by_val_index_key(&key).ok_or_else(|| {
            StakingError::InvariantViolated("malformed unbonding index key".into())
        })?;
        let ubd = get_unbonding_delegation(state, &del, &val)?.ok_or_else(|| {
            StakingError::InvariantViolated(format!(
                "unbonding index points at missing record {}/{}",
                del, val
            ))
        })?;
        out.push(ubd);
    }
    Ok(out)
}

/// Visits every unbonding delegation in key order until `f` returns `true`.
pub fn iterate_unbonding_delegations<F>(
    state: &dyn StateAccess,
    mut f: F,
) -> Result<(), StakingError>
where
    F: FnMut(usize, &UnbondingDelegation) -> bool,
{
    for (i, ubd) in scan_values::<UnbondingDelegation>(state, UBD_KEY_PREFIX, None)?
        .iter()
        .enumerate()
    {
        if f(i, ubd) {
            break;
        }
    }
    Ok(())
}

/// Returns true if the record for the pair already holds `max_entries` entries.
pub fn has_max_unbonding_delegation_entries(
    state: &dyn StateAccess,
    max_entries: u32,
    delegator: &AccountId,
    validator: &ValidatorId,
) -> Result<bool, StakingError> {
    Ok(get_unbonding_delegation(state, delegator, validator)?
        .is_some_and(|ubd| ubd.entries.len() >= max_entries as usize))
}

/// Writes the record and its by-validator index entry.
pub fn set_unbonding_delegation(
    state: &mut dyn StateAccess,
    ubd: &UnbondingDelegation,
) -> Result<(), StakingError> {
    save(state, &ubd_key(&ubd.delegator, &ubd.validator), ubd)?;
    state.insert(&ubd_by_val_index_key(&ubd.validator, &ubd.delegator), &[])?;
    Ok(())
}

/// Deletes the record and its by-validator index entry.
pub fn remove_unbonding_delegation(
    state: &mut dyn StateAccess,
    ubd: &UnbondingDelegation,
) -> Result<(), StakingError> {
    state.delete(&ubd_key(&ubd.delegator, &ubd.validator))?;
    state.delete(&ubd_by_val_index_key(&ubd.validator, &ubd.delegator))?;
    Ok(())
}

/// Appends a fresh entry to the pair's record, creating the record if needed.
///
/// Allocates the entry's operation ID, indexes it and notifies `hooks`. The caller
/// has already checked the entry limit.
pub fn set_unbonding_delegation_entry(
    state: &mut dyn StateAccess,
    hooks: &dyn StakingHooks,
    delegator: &AccountId,
    validator: &ValidatorId,
    creation_height: u64,
    completion_time: u64,
    balance: u64,
) -> Result<(UnbondingDelegation, u64), StakingError> {
    let id = increment_unbonding_op_id(state)?;
    let entry = UnbondingDelegationEntry {
        id,
        creation_height,
        completion_time,
        initial_balance: balance,
        balance,
        on_hold: false,
    };
    let ubd = match get_unbonding_delegation(state, delegator, validator)? {
        Some(mut ubd) => {
            ubd.add_entry(entry);
            ubd
        }
        None => UnbondingDelegation::new(*delegator, *validator, entry),
    };
    set_unbonding_delegation(state, &ubd)?;
    set_unbonding_op_index(state, id, &ubd_key(delegator, validator))?;
    hooks.after_unbonding_initiated(state, id);
    Ok((ubd, id))
}

/// Returns true if any unbonding delegation out of `validator` exists.
pub fn has_unbonding_delegations_from_validator(
    state: &dyn StateAccess,
    validator: &ValidatorId,
) -> Result<bool, StakingError> {
    has_prefix(state, &ubd_by_val_prefix(validator))
}

/// Returns the pairs queued at exactly `time`.
pub fn get_ubd_queue_time_slice(
    state: &dyn StateAccess,
    time: u64,
) -> Result<Vec<DvPair>, StakingError> {
    queue::get_time_slice(state, &ubd_queue_key(time))
}

/// Overwrites the pairs queued at exactly `time`.
pub fn set_ubd_queue_time_slice(
    state: &mut dyn StateAccess,
    time: u64,
    pairs: &[DvPair],
) -> Result<(), StakingError> {
    queue::set_time_slice(state, &ubd_queue_key(time), pairs)
}

/// Queues the record's pair for `completion_time`.
pub fn insert_ubd_queue(
    state: &mut dyn StateAccess,
    ubd: &UnbondingDelegation,
    completion_time: u64,
) -> Result<(), StakingError> {
    let pair = DvPair {
        delegator: ubd.delegator,
        validator: ubd.validator,
    };
    queue::push(state, &ubd_queue_key(completion_time), pair)
}

/// Removes and returns every pair queued at or before `now`, oldest first.
pub fn dequeue_all_mature_ubd_queue(
    state: &mut dyn StateAccess,
    now: u64,
) -> Result<Vec<DvPair>, StakingError> {
    queue::dequeue_mature(state, UBD_QUEUE_PREFIX, now)
}
