// Path: crates/staking/tests/lifecycle_e2e.rs

mod common;

use anyhow::Result;
use common::{params, Harness, PERIOD};
use ledger_api::hooks::StakingHooks;
use ledger_api::state::{apply_in_overlay, StateAccess};
use ledger_staking::delegation::set_delegation;
use ledger_staking::unbonding::{get_unbonding_delegation, get_ubd_queue_time_slice};
use ledger_staking::unbonding_ops::get_unbonding_op_index;
use ledger_test_utils::fixtures::{account, validator, validator_id};
use ledger_test_utils::hooks::HookEvent;
use ledger_test_utils::{assert_err, assert_err_unchanged, assert_ok};
use ledger_types::app::{BondStatus, Delegation, ModulePool, Shares};
use ledger_types::error::{CustodyError, HookError, StakingError};
use std::sync::Arc;

#[test]
fn delegate_undelegate_and_complete() -> Result<()> {
    let mut h = Harness::new();
    h.add_validator(9, BondStatus::Bonded)?;

    let issued = h.delegate(1, 9, 1_000)?;
    assert_eq!(issued, Shares::from_int(1_000));
    assert_eq!(h.pool(ModulePool::Bonded), 1_000);

    let start = h.ctx.time;
    let completion = h.keeper.undelegate(
        &mut h.state,
        &h.ctx,
        &account(1),
        &validator_id(9),
        Shares::from_int(400),
    )?;
    assert_eq!(completion, start + PERIOD);
    assert_eq!(h.delegation(1, 9)?.map(|d| d.shares), Some(Shares::from_int(600)));
    assert_eq!(h.pool(ModulePool::Bonded), 600);
    assert_eq!(h.pool(ModulePool::NotBonded), 400);

    let ubd = get_unbonding_delegation(&h.state, &account(1), &validator_id(9))?
        .ok_or_else(|| anyhow::anyhow!("unbonding record missing"))?;
    let entry = &ubd.entries[0];
    assert_eq!((entry.balance, entry.initial_balance), (400, 400));
    assert_eq!(entry.completion_time, completion);
    assert_eq!(entry.creation_height, h.ctx.height);
    let id = entry.id;
    assert_eq!(h.hooks.initiated_ids(), vec![id]);
    assert_eq!(get_ubd_queue_time_slice(&h.state, completion)?.len(), 1);

    // Not yet mature: nothing moves.
    h.advance(PERIOD - 1);
    let early = h
        .keeper
        .complete_unbonding(&mut h.state, &h.ctx, &account(1), &validator_id(9))?;
    assert_eq!(early.amount, 0);
    assert_eq!(h.balance(1), 0);

    h.advance(1);
    let coin = h
        .keeper
        .complete_unbonding(&mut h.state, &h.ctx, &account(1), &validator_id(9))?;
    assert_eq!((coin.denom.as_str(), coin.amount), ("stake", 400));
    assert_eq!(h.balance(1), 400);
    assert_eq!(h.pool(ModulePool::NotBonded), 0);
    assert!(get_unbonding_delegation(&h.state, &account(1), &validator_id(9))?.is_none());
    assert!(get_unbonding_op_index(&h.state, id)?.is_none());

    let err = assert_err!(h
        .keeper
        .complete_unbonding(&mut h.state, &h.ctx, &account(1), &validator_id(9)));
    assert!(matches!(err, StakingError::NoUnbondingDelegation));
    Ok(())
}

#[test]
fn unbonding_everything_removes_the_delegation() -> Result<()> {
    let mut h = Harness::new();
    h.add_validator(9, BondStatus::Bonded)?;
    h.delegate(1, 9, 500)?;
    h.hooks.clear();

    h.keeper.undelegate(
        &mut h.state,
        &h.ctx,
        &account(1),
        &validator_id(9),
        Shares::from_int(500),
    )?;

    assert!(h.delegation(1, 9)?.is_none());
    let v = h.validator(9)?;
    assert_eq!((v.tokens, v.delegator_shares), (0, Shares::ZERO));
    assert_eq!(
        h.hooks.events()[..2],
        [
            HookEvent::SharesModified(account(1), validator_id(9)),
            HookEvent::DelegationRemoved(account(1), validator_id(9)),
        ]
    );
    Ok(())
}

#[test]
fn unbond_rejects_missing_or_oversized_requests() -> Result<()> {
    let mut h = Harness::new();
    h.add_validator(9, BondStatus::Bonded)?;
    h.delegate(1, 9, 100)?;

    let err = assert_err_unchanged!(
        h.state,
        h.keeper
            .unbond(&mut h.state, &account(2), &validator_id(9), Shares::from_int(1))
    );
    assert!(matches!(err, StakingError::NoDelegatorForAddress));

    let err = assert_err_unchanged!(
        h.state,
        h.keeper
            .unbond(&mut h.state, &account(1), &validator_id(9), Shares::from_int(101))
    );
    assert!(matches!(err, StakingError::NotEnoughDelegationShares));

    let err = assert_err_unchanged!(
        h.state,
        h.keeper
            .unbond(&mut h.state, &account(1), &validator_id(9), Shares::ZERO)
    );
    assert!(matches!(err, StakingError::InvalidRequest(_)));
    Ok(())
}

#[test]
fn entry_limit_leaves_state_untouched() -> Result<()> {
    let mut h = Harness::with_params(params(2));
    h.add_validator(9, BondStatus::Bonded)?;
    h.delegate(1, 9, 100)?;

    for _ in 0..2 {
        h.keeper.undelegate(
            &mut h.state,
            &h.ctx,
            &account(1),
            &validator_id(9),
            Shares::from_int(10),
        )?;
    }
    let err = assert_err_unchanged!(
        h.state,
        h.keeper.undelegate(
            &mut h.state,
            &h.ctx,
            &account(1),
            &validator_id(9),
            Shares::from_int(10),
        )
    );
    assert!(matches!(err, StakingError::MaxUnbondingDelegationEntries));
    assert_eq!(h.delegation(1, 9)?.map(|d| d.shares), Some(Shares::from_int(80)));
    Ok(())
}

#[test]
fn entries_maturing_together_all_complete() -> Result<()> {
    let mut h = Harness::new();
    h.add_validator(9, BondStatus::Bonded)?;
    h.delegate(1, 9, 100)?;

    for amount in [10, 20, 30] {
        h.keeper.undelegate(
            &mut h.state,
            &h.ctx,
            &account(1),
            &validator_id(9),
            Shares::from_int(amount),
        )?;
    }
    h.advance(PERIOD / 2);
    h.keeper.undelegate(
        &mut h.state,
        &h.ctx,
        &account(1),
        &validator_id(9),
        Shares::from_int(5),
    )?;

    h.advance(PERIOD / 2);
    let coin = h
        .keeper
        .complete_unbonding(&mut h.state, &h.ctx, &account(1), &validator_id(9))?;
    assert_eq!(coin.amount, 60);
    assert_eq!(h.balance(1), 60);

    let ubd = get_unbonding_delegation(&h.state, &account(1), &validator_id(9))?
        .ok_or_else(|| anyhow::anyhow!("later entry should remain"))?;
    assert_eq!(ubd.entries.len(), 1);
    assert_eq!(ubd.entries[0].balance, 5);
    Ok(())
}

#[test]
fn end_blocker_settles_only_matured_buckets() -> Result<()> {
    let mut h = Harness::new();
    h.add_validator(9, BondStatus::Bonded)?;
    h.delegate(1, 9, 100)?;
    h.delegate(2, 9, 100)?;

    h.keeper.undelegate(
        &mut h.state,
        &h.ctx,
        &account(1),
        &validator_id(9),
        Shares::from_int(40),
    )?;
    h.advance(10);
    h.keeper.undelegate(
        &mut h.state,
        &h.ctx,
        &account(2),
        &validator_id(9),
        Shares::from_int(70),
    )?;

    let before = h.state.clone();
    let report = h.keeper.end_blocker(&mut h.state, &h.ctx)?;
    assert_eq!(report, Default::default());
    assert_eq!(h.state, before);

    h.advance(PERIOD - 10);
    let report = h.keeper.end_blocker(&mut h.state, &h.ctx)?;
    assert_eq!(report.unbondings.len(), 1);
    assert_eq!(report.unbondings[0].delegator, account(1));
    assert_eq!(report.tokens_released, 40);

    h.advance(10);
    let report = h.keeper.end_blocker(&mut h.state, &h.ctx)?;
    assert_eq!(report.unbondings[0].delegator, account(2));
    assert_eq!((h.balance(1), h.balance(2)), (40, 70));
    Ok(())
}

#[test]
fn operator_falling_below_minimum_is_jailed() -> Result<()> {
    let mut h = Harness::new();
    let mut v = validator(9, 9, BondStatus::Bonded);
    v.min_self_delegation = 500;
    h.put_validator(v)?;
    h.delegate(9, 9, 1_000)?;

    h.keeper.undelegate(
        &mut h.state,
        &h.ctx,
        &account(9),
        &validator_id(9),
        Shares::from_int(400),
    )?;
    assert!(!h.validator(9)?.jailed);

    h.keeper.undelegate(
        &mut h.state,
        &h.ctx,
        &account(9),
        &validator_id(9),
        Shares::from_int(200),
    )?;
    let v = h.validator(9)?;
    assert!(v.jailed);
    assert_eq!(v.tokens, 400);
    Ok(())
}

#[test]
fn others_unbonding_never_jail() -> Result<()> {
    let mut h = Harness::new();
    let mut v = validator(9, 9, BondStatus::Bonded);
    v.min_self_delegation = 500;
    h.put_validator(v)?;
    h.delegate(1, 9, 1_000)?;

    h.keeper.undelegate(
        &mut h.state,
        &h.ctx,
        &account(1),
        &validator_id(9),
        Shares::from_int(900),
    )?;
    assert!(!h.validator(9)?.jailed);
    Ok(())
}

#[test]
fn empty_unbonded_validator_is_removed() -> Result<()> {
    let mut h = Harness::new();
    h.add_validator(9, BondStatus::Unbonded)?;
    h.add_validator(8, BondStatus::Unbonding)?;
    h.delegate(1, 9, 50)?;
    h.delegate(1, 8, 50)?;
    assert_eq!(h.pool(ModulePool::NotBonded), 100);

    for val in [9, 8] {
        h.keeper.undelegate(
            &mut h.state,
            &h.ctx,
            &account(1),
            &validator_id(val),
            Shares::from_int(50),
        )?;
    }

    assert!(h.keeper.get_validator(&h.state, &validator_id(9))?.is_none());
    assert!(h.keeper.get_validator(&h.state, &validator_id(8))?.is_some());
    assert_eq!(h.pool(ModulePool::NotBonded), 100);
    Ok(())
}

#[test]
fn poisoned_exchange_rate_blocks_delegation() -> Result<()> {
    let mut h = Harness::new();
    let mut v = validator(9, 9, BondStatus::Bonded);
    v.delegator_shares = Shares::from_int(100);
    h.put_validator(v)?;
    h.fund(1, 10)?;

    let err = assert_err_unchanged!(
        h.state,
        h.keeper.delegate(
            &mut h.state,
            &account(1),
            10,
            BondStatus::Unbonded,
            &validator_id(9),
            true,
        )
    );
    assert!(matches!(err, StakingError::ExchangeRateInvalid));
    Ok(())
}

#[test]
fn unbond_amount_is_capped_at_the_delegation() -> Result<()> {
    let mut h = Harness::new();
    let mut v = validator(9, 9, BondStatus::Bonded);
    v.tokens = 3;
    v.delegator_shares = Shares::from_int(1);
    h.put_validator(v)?;

    let held: Shares = "0.666666666666666666".parse()?;
    set_delegation(&mut h.state, &Delegation::new(account(1), validator_id(9), held))?;

    // Two tokens price at 0.666...667 shares, one unit more than held.
    let shares = h
        .keeper
        .validate_unbond_amount(&h.state, &account(1), &validator_id(9), 2)?;
    assert_eq!(shares, held);

    let err = assert_err!(h
        .keeper
        .validate_unbond_amount(&h.state, &account(1), &validator_id(9), 3));
    assert!(matches!(err, StakingError::InvalidRequest(_)));

    let err = assert_err!(h
        .keeper
        .validate_unbond_amount(&h.state, &account(2), &validator_id(9), 1));
    assert!(matches!(err, StakingError::NoDelegation));
    let err = assert_err!(h
        .keeper
        .validate_unbond_amount(&h.state, &account(1), &validator_id(7), 1));
    assert!(matches!(err, StakingError::NoValidatorFound));
    Ok(())
}

#[test]
fn unbond_amount_rejects_poisoned_rates_both_ways() -> Result<()> {
    let mut h = Harness::new();
    let mut slashed = validator(9, 9, BondStatus::Bonded);
    slashed.delegator_shares = Shares::from_int(5);
    h.put_validator(slashed)?;
    let mut shareless = validator(8, 8, BondStatus::Bonded);
    shareless.tokens = 10;
    h.put_validator(shareless)?;
    for n in [9, 8] {
        set_delegation(
            &mut h.state,
            &Delegation::new(account(1), validator_id(n), Shares::from_int(5)),
        )?;
        let err = assert_err!(h
            .keeper
            .validate_unbond_amount(&h.state, &account(1), &validator_id(n), 5));
        assert!(matches!(err, StakingError::ExchangeRateInvalid));
    }
    Ok(())
}

struct MarkerHook;

impl StakingHooks for MarkerHook {
    fn before_delegation_created(
        &self,
        state: &mut dyn StateAccess,
        _delegator: &ledger_types::app::AccountId,
        _validator: &ledger_types::app::ValidatorId,
    ) -> Result<(), HookError> {
        state
            .insert(b"marker::created", &[1])
            .map_err(|e| HookError::new("marker", e.to_string()))
    }
}

#[test]
fn overlay_discards_writes_of_a_failed_operation() -> Result<()> {
    let marker: Arc<dyn StakingHooks> = Arc::new(MarkerHook);
    let mut h = Harness::with_hooks(params(7), vec![marker]);
    h.add_validator(9, BondStatus::Bonded)?;
    h.fund(1, 50)?;
    let before = h.state.clone();

    let result = apply_in_overlay(&mut h.state, |s| {
        h.keeper
            .delegate(s, &account(1), 100, BondStatus::Unbonded, &validator_id(9), true)
    });
    assert!(matches!(
        result,
        Err(StakingError::Custody(CustodyError::InsufficientFunds { have: 50, need: 100 }))
    ));
    assert_eq!(h.state, before);

    let shares = assert_ok!(apply_in_overlay(&mut h.state, |s| {
        h.keeper
            .delegate(s, &account(1), 50, BondStatus::Unbonded, &validator_id(9), true)
    }));
    assert_eq!(shares, Shares::from_int(50));
    assert_eq!(h.raw(b"marker::created")?, Some(vec![1]));
    Ok(())
}

#[test]
fn rejecting_listener_aborts_before_any_write() -> Result<()> {
    let mut h = Harness::new();
    h.add_validator(9, BondStatus::Bonded)?;
    h.fund(1, 50)?;
    h.hooks.reject_before_hooks(true);

    let err = assert_err_unchanged!(
        h.state,
        h.keeper.delegate(
            &mut h.state,
            &account(1),
            50,
            BondStatus::Unbonded,
            &validator_id(9),
            true,
        )
    );
    assert!(matches!(err, StakingError::Hook(_)));
    Ok(())
}
