// Path: crates/staking/src/redelegation.rs
//! Redelegation records, their source/destination indexes and the redelegation queue.

use crate::queue;
use crate::store::{has_prefix, load, save, scan_keys, scan_values};
use crate::unbonding_ops::{increment_unbonding_op_id, set_unbonding_op_index};
use ledger_api::hooks::StakingHooks;
use ledger_api::state::StateAccess;
use ledger_types::app::{
    AccountId, DvvTriplet, Redelegation, RedelegationEntry, Shares, ValidatorId,
};
use ledger_types::error::StakingError;
use ledger_types::keys::{
    parse_red_by_src_index_key, red_by_dst_delegator_prefix, red_by_dst_index_key,
    red_by_src_index_key, red_by_src_prefix, red_key, red_queue_key, reds_by_delegator_prefix,
    RED_KEY_PREFIX, RED_QUEUE_PREFIX,
};

/// Loads the redelegation of `delegator` from `src` to `dst`.
pub fn get_redelegation(
    state: &dyn StateAccess,
    delegator: &AccountId,
    src: &ValidatorId,
    dst: &ValidatorId,
) -> Result<Option<Redelegation>, StakingError> {
    load(state, &red_key(delegator, src, dst))
}

/// Returns at most `max` redelegations of `delegator`.
pub fn get_redelegations(
    state: &dyn StateAccess,
    delegator: &AccountId,
    max: usize,
) -> Result<Vec<Redelegation>, StakingError> {
    scan_values(state, &reds_by_delegator_prefix(delegator), Some(max))
}

/// Returns every redelegation out of `src`, resolved through the source index.
pub fn get_redelegations_from_src_validator(
    state: &dyn StateAccess,
    src: &ValidatorId,
) -> Result<Vec<Redelegation>, StakingError> {
    let mut out = Vec::new();
    for key in scan_keys(state, &red_by_src_prefix(src))? {
        let (src, del, dst) = parse_red_by_src_index_key(&key).ok_or_else(|| {
            StakingError::InvariantViolated("malformed redelegation index key".into())
        })?;
        let red = get_redelegation(state, &del, &src, &dst)?.ok_or_else(|| {
            StakingError::InvariantViolated(format!(
                "redelegation index points at missing record {}/{}/{}",
                del, src, dst
            ))
        })?;
        out.push(red);
    }
    Ok(out)
}

/// Returns true if `delegator` has any redelegation whose destination is `dst`.
pub fn has_receiving_redelegation(
    state: &dyn StateAccess,
    delegator: &AccountId,
    dst: &ValidatorId,
) -> Result<bool, StakingError> {
    has_prefix(state, &red_by_dst_delegator_prefix(dst, delegator))
}

/// Returns true if the record for the triplet already holds `max_entries` entries.
pub fn has_max_redelegation_entries(
    state: &dyn StateAccess,
    max_entries: u32,
    delegator: &AccountId,
    src: &ValidatorId,
    dst: &ValidatorId,
) -> Result<bool, StakingError> {
    Ok(get_redelegation(state, delegator, src, dst)?
        .is_some_and(|red| red.entries.len() >= max_entries as usize))
}

/// Writes the record and both of its index entries.
pub fn set_redelegation(state: &mut dyn StateAccess, red: &Redelegation) -> Result<(), StakingError> {
    let (del, src, dst) = (&red.delegator, &red.validator_src, &red.validator_dst);
    save(state, &red_key(del, src, dst), red)?;
    state.insert(&red_by_src_index_key(src, del, dst), &[])?;
    state.insert(&red_by_dst_index_key(dst, del, src), &[])?;
    Ok(())
}

/// Deletes the record and both of its index entries.
pub fn remove_redelegation(
    state: &mut dyn StateAccess,
    red: &Redelegation,
) -> Result<(), StakingError> {
    let (del, src, dst) = (&red.delegator, &red.validator_src, &red.validator_dst);
    state.delete(&red_key(del, src, dst))?;
    state.delete(&red_by_src_index_key(src, del, dst))?;
    state.delete(&red_by_dst_index_key(dst, del, src))?;
    Ok(())
}

/// Appends a fresh entry to the triplet's record, creating the record if needed.
///
/// Allocates the entry's operation ID, indexes it and notifies `hooks`. The caller
/// has already checked the entry limit.
#[allow(clippy::too_many_arguments)]
pub fn set_redelegation_entry(
    state: &mut dyn StateAccess,
    hooks: &dyn StakingHooks,
    delegator: &AccountId,
    src: &ValidatorId,
    dst: &ValidatorId,
    creation_height: u64,
    completion_time: u64,
    balance: u64,
    shares_dst: Shares,
) -> Result<(Redelegation, u64), StakingError> {
    let id = increment_unbonding_op_id(state)?;
    let entry = RedelegationEntry {
        id,
        creation_height,
        completion_time,
        initial_balance: balance,
        shares_dst,
        on_hold: false,
    };
    let red = match get_redelegation(state, delegator, src, dst)? {
        Some(mut red) => {
            red.add_entry(entry);
            red
        }
        None => Redelegation::new(*delegator, *src, *dst, entry),
    };
    set_redelegation(state, &red)?;
    set_unbonding_op_index(state, id, &red_key(delegator, src, dst))?;
    hooks.after_unbonding_initiated(state, id);
    Ok((red, id))
}

/// Visits every redelegation in key order until `f` returns `true`.
pub fn iterate_redelegations<F>(state: &dyn StateAccess, mut f: F) -> Result<(), StakingError>
where
    F: FnMut(usize, &Redelegation) -> bool,
{
    for (i, red) in scan_values::<Redelegation>(state, RED_KEY_PREFIX, None)?
        .iter()
        .enumerate()
    {
        if f(i, red) {
            break;
        }
    }
    Ok(())
}

/// Returns the triplets queued at exactly `time`.
pub fn get_redelegation_queue_time_slice(
    state: &dyn StateAccess,
    time: u64,
) -> Result<Vec<DvvTriplet>, StakingError> {
    queue::get_time_slice(state, &red_queue_key(time))
}

/// Overwrites the triplets queued at exactly `time`.
pub fn set_redelegation_queue_time_slice(
    state: &mut dyn StateAccess,
    time: u64,
    triplets: &[DvvTriplet],
) -> Result<(), StakingError> {
    queue::set_time_slice(state, &red_queue_key(time), triplets)
}

/// Queues the record's triplet for `completion_time`.
pub fn insert_redelegation_queue(
    state: &mut dyn StateAccess,
    red: &Redelegation,
    completion_time: u64,
) -> Result<(), StakingError> {
    let triplet = DvvTriplet {
        delegator: red.delegator,
        validator_src: red.validator_src,
        validator_dst: red.validator_dst,
    };
    queue::push(state, &red_queue_key(completion_time), triplet)
}

/// Removes and returns every triplet queued at or before `now`, oldest first.
pub fn dequeue_all_mature_redelegation_queue(
    state: &mut dyn StateAccess,
    now: u64,
) -> Result<Vec<DvvTriplet>, StakingError> {
    queue::dequeue_mature(state, RED_QUEUE_PREFIX, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unbonding_ops::get_redelegation_by_unbonding_op_id;
    use ledger_test_utils::fixtures::{account, validator_id};
    use ledger_test_utils::hooks::RecordingHooks;
    use ledger_test_utils::state::{keys_under, MemoryState};
    use ledger_types::keys::{RED_BY_VAL_DST_INDEX_PREFIX, RED_BY_VAL_SRC_INDEX_PREFIX};

    fn add(state: &mut MemoryState, d: u8, src: u8, dst: u8) -> (Redelegation, u64) {
        let hooks = RecordingHooks::new();
        set_redelegation_entry(
            state,
            &hooks,
            &account(d),
            &validator_id(src),
            &validator_id(dst),
            1,
            100,
            25,
            Shares::from_int(25),
        )
        .unwrap()
    }

    #[test]
    fn receiving_check_is_scoped_to_delegator_and_destination() {
        let mut state = MemoryState::new();
        add(&mut state, 1, 10, 11);

        assert!(has_receiving_redelegation(&state, &account(1), &validator_id(11)).unwrap());
        assert!(!has_receiving_redelegation(&state, &account(1), &validator_id(10)).unwrap());
        assert!(!has_receiving_redelegation(&state, &account(2), &validator_id(11)).unwrap());
    }

    #[test]
    fn entries_carry_their_operation_ids() {
        let mut state = MemoryState::new();
        add(&mut state, 1, 10, 11);
        let (red, id) = add(&mut state, 1, 10, 11);

        assert_eq!(red.entries.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
        assert!(has_max_redelegation_entries(&state, 2, &account(1), &validator_id(10), &validator_id(11)).unwrap());
        let (found, _) = get_redelegation_by_unbonding_op_id(&state, id).unwrap().unwrap();
        assert_eq!(found, red);
    }

    #[test]
    fn removal_clears_both_indexes() {
        let mut state = MemoryState::new();
        let (red, _) = add(&mut state, 1, 10, 11);
        add(&mut state, 2, 10, 12);

        assert_eq!(get_redelegations_from_src_validator(&state, &validator_id(10)).unwrap().len(), 2);
        remove_redelegation(&mut state, &red).unwrap();

        assert_eq!(keys_under(&state, RED_BY_VAL_SRC_INDEX_PREFIX).len(), 1);
        assert_eq!(keys_under(&state, RED_BY_VAL_DST_INDEX_PREFIX).len(), 1);
        assert!(get_redelegations(&state, &account(1), 10).unwrap().is_empty());

        let mut count = 0;
        iterate_redelegations(&state, |_, _| {
            count += 1;
            false
        })
        .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn queue_drains_matured_triplets() {
        let mut state = MemoryState::new();
        let (red, _) = add(&mut state, 1, 10, 11);
        insert_redelegation_queue(&mut state, &red, 100).unwrap();
        assert_eq!(get_redelegation_queue_time_slice(&state, 100).unwrap().len(), 1);

        let due = dequeue_all_mature_redelegation_queue(&mut state, 100).unwrap();
        assert_eq!(due.len(), 1);
        assert!(get_redelegation_queue_time_slice(&state, 100).unwrap().is_empty());

        set_redelegation_queue_time_slice(&mut state, 200, &due).unwrap();
        assert_eq!(dequeue_all_mature_redelegation_queue(&mut state, 300).unwrap(), due);
    }
}
