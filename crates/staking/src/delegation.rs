// Path: crates/staking/src/delegation.rs
//! The delegation ledger: one record per (delegator, validator) pair.

use crate::store::{load, save, scan_values};
use ledger_api::hooks::StakingHooks;
use ledger_api::state::StateAccess;
use ledger_types::app::{AccountId, Delegation, ValidatorId};
use ledger_types::error::StakingError;
use ledger_types::keys::{delegation_key, delegations_by_delegator_prefix, DELEGATION_KEY_PREFIX};

/// Loads the delegation of `delegator` to `validator`.
pub fn get_delegation(
    state: &dyn StateAccess,
    delegator: &AccountId,
    validator: &ValidatorId,
) -> Result<Option<Delegation>, StakingError> {
    load(state, &delegation_key(delegator, validator))
}

/// Writes a delegation, overwriting any existing record for the pair.
pub fn set_delegation(
    state: &mut dyn StateAccess,
    delegation: &Delegation,
) -> Result<(), StakingError> {
    save(
        state,
        &delegation_key(&delegation.delegator, &delegation.validator),
        delegation,
    )
}

/// Deletes a delegation after notifying `hooks`.
///
/// Callers only remove delegations whose shares reached zero; this is not checked here.
pub fn remove_delegation(
    state: &mut dyn StateAccess,
    hooks: &dyn StakingHooks,
    delegation: &Delegation,
) -> Result<(), StakingError> {
    hooks.before_delegation_removed(state, &delegation.delegator, &delegation.validator)?;
    state.delete(&delegation_key(&delegation.delegator, &delegation.validator))?;
    Ok(())
}

/// Returns every delegation in key order.
pub fn get_all_delegations(state: &dyn StateAccess) -> Result<Vec<Delegation>, StakingError> {
    scan_values(state, DELEGATION_KEY_PREFIX, None)
}

/// Returns every delegation to `validator`.
///
/// Delegations are keyed by delegator first, so this is a full scan.
pub fn get_validator_delegations(
    state: &dyn StateAccess,
    validator: &ValidatorId,
) -> Result<Vec<Delegation>, StakingError> {
    Ok(get_all_delegations(state)?
        .into_iter()
        .filter(|d| &d.validator == validator)
        .collect())
}

/// Returns at most `max` delegations made by `delegator`.
///
/// Fewer than `max` results is not an error.
pub fn get_delegator_delegations(
    state: &dyn StateAccess,
    delegator: &AccountId,
    max: usize,
) -> Result<Vec<Delegation>, StakingError> {
    scan_values(state, &delegations_by_delegator_prefix(delegator), Some(max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_test_utils::fixtures::{account, validator_id};
    use ledger_test_utils::hooks::{HookEvent, RecordingHooks};
    use ledger_test_utils::state::MemoryState;
    use ledger_types::app::Shares;

    fn seed(state: &mut MemoryState) {
        for (d, v) in [(1, 10), (1, 11), (1, 12), (2, 10)] {
            set_delegation(
                state,
                &Delegation::new(account(d), validator_id(v), Shares::from_int(5)),
            )
            .unwrap();
        }
    }

    #[test]
    fn delegator_query_is_bounded() {
        let mut state = MemoryState::new();
        seed(&mut state);

        assert_eq!(get_delegator_delegations(&state, &account(1), 2).unwrap().len(), 2);
        assert_eq!(get_delegator_delegations(&state, &account(1), 10).unwrap().len(), 3);
        assert!(get_delegator_delegations(&state, &account(3), 10).unwrap().is_empty());
    }

    #[test]
    fn validator_query_filters_across_delegators() {
        let mut state = MemoryState::new();
        seed(&mut state);

        let delegators: Vec<AccountId> = get_validator_delegations(&state, &validator_id(10))
            .unwrap()
            .into_iter()
            .map(|d| d.delegator)
            .collect();
        assert_eq!(delegators, vec![account(1), account(2)]);
        assert_eq!(get_all_delegations(&state).unwrap().len(), 4);
    }

    #[test]
    fn removal_notifies_before_deleting() {
        let mut state = MemoryState::new();
        seed(&mut state);
        let hooks = RecordingHooks::new();
        let d = get_delegation(&state, &account(2), &validator_id(10)).unwrap().unwrap();

        remove_delegation(&mut state, &hooks, &d).unwrap();
        assert_eq!(
            hooks.events(),
            vec![HookEvent::DelegationRemoved(account(2), validator_id(10))]
        );
        assert_eq!(get_delegation(&state, &account(2), &validator_id(10)).unwrap(), None);
    }

    #[test]
    fn rejected_removal_keeps_the_record() {
        let mut state = MemoryState::new();
        seed(&mut state);
        let hooks = RecordingHooks::new();
        hooks.reject_before_hooks(true);
        let d = get_delegation(&state, &account(1), &validator_id(10)).unwrap().unwrap();

        assert!(matches!(
            remove_delegation(&mut state, &hooks, &d),
            Err(StakingError::Hook(_))
        ));
        assert!(get_delegation(&state, &account(1), &validator_id(10)).unwrap().is_some());
    }
}
