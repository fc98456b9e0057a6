// Path: crates/staking/src/keeper.rs
//! The staking keeper: compound operations over shares, delegations and pending entries.
//!
//! Each public operation validates everything it can before its first write. What it
//! cannot pre-validate (custody balances, before-hook vetoes) is covered by running the
//! operation inside [`apply_in_overlay`](ledger_api::state::apply_in_overlay), which
//! discards every write on error.

use crate::delegation::{get_delegation, remove_delegation, set_delegation};
use crate::redelegation::{
    get_redelegation, has_max_redelegation_entries, has_receiving_redelegation,
    insert_redelegation_queue, remove_redelegation, set_redelegation, set_redelegation_entry,
};
use crate::shares;
use crate::store::{load, save};
use crate::unbonding::{
    get_unbonding_delegation, has_max_unbonding_delegation_entries, insert_ubd_queue,
    remove_unbonding_delegation, set_unbonding_delegation, set_unbonding_delegation_entry,
};
use crate::unbonding_ops::{
    delete_unbonding_op_index, get_redelegation_by_unbonding_op_id,
    get_unbonding_delegation_by_unbonding_op_id,
};
use crate::validators::StateValidatorRegistry;
use ledger_api::context::BlockContext;
use ledger_api::custody::TokenCustody;
use ledger_api::hooks::{HookChain, StakingHooks};
use ledger_api::registry::ValidatorRegistry;
use ledger_api::state::StateAccess;
use ledger_telemetry::staking_metrics;
use ledger_types::app::{
    AccountId, BondStatus, Coin, Delegation, ModulePool, Redelegation, Shares,
    UnbondingDelegation, UnbondingDelegationEntry, Validator, ValidatorId,
};
use ledger_types::config::StakingParams;
use ledger_types::error::{CustodyError, StakingError};
use ledger_types::keys::STAKING_PARAMS_KEY;
use ledger_types::prelude::OptionExt;
use std::fmt;
use std::sync::Arc;

/// When and where a new redelegation entry completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeginInfo {
    /// Unix time at which the entry matures.
    pub completion_time: u64,
    /// Height recorded as the entry's creation height.
    pub height: u64,
    /// True if the source is already unbonded and no entry is needed.
    pub complete_now: bool,
}

/// Runs the staking operations against a caller-supplied state.
///
/// The keeper holds no ledger state of its own: parameters are an in-memory copy and
/// every record lives in the `StateAccess` passed to each call.
pub struct StakingKeeper {
    params: StakingParams,
    registry: Arc<dyn ValidatorRegistry>,
    custody: Arc<dyn TokenCustody>,
    hooks: HookChain,
}

impl fmt::Debug for StakingKeeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StakingKeeper")
            .field("params", &self.params)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

fn invariant_violation(msg: String) -> StakingError {
    tracing::error!(target: "staking", error = %msg, "staking invariant violated");
    StakingError::InvariantViolated(msg)
}

impl StakingKeeper {
    /// Creates a keeper that stores validators in state and notifies no listeners.
    pub fn new(params: StakingParams, custody: Arc<dyn TokenCustody>) -> Self {
        Self {
            params,
            registry: Arc::new(StateValidatorRegistry),
            custody,
            hooks: HookChain::new(),
        }
    }

    /// Replaces the validator registry.
    pub fn with_registry(mut self, registry: Arc<dyn ValidatorRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the listener chain.
    pub fn with_hooks(mut self, hooks: HookChain) -> Self {
        self.hooks = hooks;
        self
    }

    /// The parameters in effect.
    pub fn params(&self) -> &StakingParams {
        &self.params
    }

    /// The validator registry in use.
    pub fn registry(&self) -> &dyn ValidatorRegistry {
        self.registry.as_ref()
    }

    /// Validates and persists `params`, then makes them the parameters in effect.
    pub fn set_params(
        &mut self,
        state: &mut dyn StateAccess,
        params: StakingParams,
    ) -> Result<(), StakingError> {
        params
            .validate()
            .map_err(|e| StakingError::InvalidRequest(e.to_string()))?;
        save(state, STAKING_PARAMS_KEY, &params)?;
        tracing::info!(
            target: "staking",
            unbonding_time_secs = params.unbonding_time_secs,
            max_entries = params.max_entries,
            bond_denom = %params.bond_denom,
            "staking params updated"
        );
        self.params = params;
        Ok(())
    }

    /// Reads the parameters persisted by [`set_params`](Self::set_params).
    pub fn load_params(state: &dyn StateAccess) -> Result<Option<StakingParams>, StakingError> {
        load(state, STAKING_PARAMS_KEY)
    }

    /// Loads a validator through the registry.
    pub fn get_validator(
        &self,
        state: &dyn StateAccess,
        address: &ValidatorId,
    ) -> Result<Option<Validator>, StakingError> {
        self.registry.get_validator(state, address)
    }

    fn move_pool_to_pool(
        &self,
        state: &mut dyn StateAccess,
        from: ModulePool,
        to: ModulePool,
        amount: u64,
    ) -> Result<(), StakingError> {
        if amount == 0 {
            return Ok(());
        }
        self.custody
            .move_pool_to_pool(state, from, to, &self.params.bond_denom, amount)?;
        Ok(())
    }

    fn bonded_tokens_to_not_bonded(
        &self,
        state: &mut dyn StateAccess,
        amount: u64,
    ) -> Result<(), StakingError> {
        self.move_pool_to_pool(state, ModulePool::Bonded, ModulePool::NotBonded, amount)
    }

    fn not_bonded_tokens_to_bonded(
        &self,
        state: &mut dyn StateAccess,
        amount: u64,
    ) -> Result<(), StakingError> {
        self.move_pool_to_pool(state, ModulePool::NotBonded, ModulePool::Bonded, amount)
    }

    fn release_to_delegator(
        &self,
        state: &mut dyn StateAccess,
        delegator: &AccountId,
        amount: u64,
    ) -> Result<(), StakingError> {
        if amount == 0 {
            return Ok(());
        }
        self.custody.move_pool_to_account(
            state,
            ModulePool::NotBonded,
            delegator,
            &self.params.bond_denom,
            amount,
        )?;
        Ok(())
    }

    /// Delegates `amount` tokens from `delegator` to `validator` and returns the shares
    /// issued.
    ///
    /// With `subtract_account` the tokens are debited from the delegator's account into
    /// the pool matching the validator's status. Without it the tokens are already in
    /// custody under `token_src` and only move between pools when the bonded-ness of
    /// source and validator differ.
    pub fn delegate(
        &self,
        state: &mut dyn StateAccess,
        delegator: &AccountId,
        amount: u64,
        token_src: BondStatus,
        validator: &ValidatorId,
        subtract_account: bool,
    ) -> Result<Shares, StakingError> {
        if amount == 0 {
            return Err(StakingError::InvalidRequest(
                "delegation amount must be positive".into(),
            ));
        }
        let val = self
            .registry
            .get_validator(state, validator)?
            .required(StakingError::NoValidatorFound)?;
        if val.invalid_ex_rate() {
            return Err(StakingError::ExchangeRateInvalid);
        }
        if subtract_account && token_src == BondStatus::Bonded {
            return Err(invariant_violation(
                "delegation debited from an account cannot have a bonded source".into(),
            ));
        }

        let existing = get_delegation(state, delegator, validator)?;
        match existing {
            Some(_) => self
                .hooks
                .before_delegation_shares_modified(state, delegator, validator)?,
            None => self
                .hooks
                .before_delegation_created(state, delegator, validator)?,
        }

        if subtract_account {
            self.custody.move_account_to_pool(
                state,
                delegator,
                ModulePool::for_status(val.status),
                &self.params.bond_denom,
                amount,
            )?;
        } else {
            match (token_src.is_bonded(), val.is_bonded()) {
                (true, true) | (false, false) => {}
                (false, true) => self.not_bonded_tokens_to_bonded(state, amount)?,
                (true, false) => self.bonded_tokens_to_not_bonded(state, amount)?,
            }
        }

        let (_, issued) = self.registry.add_tokens_and_shares(state, val, amount)?;
        let mut delegation =
            existing.unwrap_or_else(|| Delegation::new(*delegator, *validator, Shares::ZERO));
        delegation.shares = delegation
            .shares
            .checked_add(issued)
            .ok_or_else(|| invariant_violation("delegation shares overflow".into()))?;
        set_delegation(state, &delegation)?;
        self.hooks.after_delegation_modified(state, delegator, validator);

        tracing::debug!(
            target: "staking",
            delegator = %delegator,
            validator = %validator,
            amount,
            shares = %issued,
            "delegated"
        );
        Ok(issued)
    }

    /// Checks that `delegator` can remove `shares` from its delegation to `validator`.
    fn ensure_unbondable(
        &self,
        state: &dyn StateAccess,
        delegator: &AccountId,
        validator: &ValidatorId,
        shares: Shares,
    ) -> Result<(Validator, Delegation), StakingError> {
        let delegation = get_delegation(state, delegator, validator)?
            .required(StakingError::NoDelegatorForAddress)?;
        if shares.is_zero() {
            return Err(StakingError::InvalidRequest(
                "unbond shares must be positive".into(),
            ));
        }
        if delegation.shares < shares {
            return Err(StakingError::NotEnoughDelegationShares);
        }
        let val = self
            .registry
            .get_validator(state, validator)?
            .required(StakingError::NoValidatorFound)?;
        Ok((val, delegation))
    }

    /// Removes `shares` from the delegation and returns the tokens they released.
    ///
    /// Tokens stay in whichever custody pool held them; callers move them on.
    pub fn unbond(
        &self,
        state: &mut dyn StateAccess,
        delegator: &AccountId,
        validator: &ValidatorId,
        shares: Shares,
    ) -> Result<u64, StakingError> {
        let (mut val, mut delegation) =
            self.ensure_unbondable(state, delegator, validator, shares)?;
        self.hooks
            .before_delegation_shares_modified(state, delegator, validator)?;

        let remaining = delegation
            .shares
            .checked_sub(shares)
            .required(StakingError::NotEnoughDelegationShares)?;

        if *delegator == val.operator && !val.jailed {
            let self_bond =
                shares::truncate_to_tokens(shares::tokens_from_shares(&val, remaining)?)?;
            if self_bond < val.min_self_delegation {
                val = self.registry.jail(state, val)?;
                staking_metrics().inc_validators_jailed();
                tracing::info!(
                    target: "staking",
                    validator = %validator,
                    self_bond,
                    min_self_delegation = val.min_self_delegation,
                    "validator jailed below minimum self-delegation"
                );
            }
        }

        delegation.shares = remaining;
        if remaining.is_zero() {
            remove_delegation(state, &self.hooks, &delegation)?;
        } else {
            set_delegation(state, &delegation)?;
            self.hooks.after_delegation_modified(state, delegator, validator);
        }

        let (val, amount) = self.registry.remove_tokens_and_shares(state, val, shares)?;
        if val.delegator_shares.is_zero() && val.status == BondStatus::Unbonded {
            self.registry.remove_validator(state, validator)?;
            tracing::debug!(target: "staking", validator = %validator, "removed empty unbonded validator");
        }
        Ok(amount)
    }

    /// Starts withdrawing `shares` and returns the time at which the tokens unlock.
    pub fn undelegate(
        &self,
        state: &mut dyn StateAccess,
        ctx: &BlockContext,
        delegator: &AccountId,
        validator: &ValidatorId,
        shares: Shares,
    ) -> Result<u64, StakingError> {
        let val = self
            .registry
            .get_validator(state, validator)?
            .required(StakingError::NoDelegatorForAddress)?;
        if has_max_unbonding_delegation_entries(state, self.params.max_entries, delegator, validator)? {
            return Err(StakingError::MaxUnbondingDelegationEntries);
        }

        let amount = self.unbond(state, delegator, validator, shares)?;
        if val.is_bonded() {
            self.bonded_tokens_to_not_bonded(state, amount)?;
        }

        let completion_time = ctx.time.saturating_add(self.params.unbonding_time_secs);
        let (ubd, id) = set_unbonding_delegation_entry(
            state,
            &self.hooks,
            delegator,
            validator,
            ctx.height,
            completion_time,
            amount,
        )?;
        insert_ubd_queue(state, &ubd, completion_time)?;

        tracing::info!(
            target: "staking",
            delegator = %delegator,
            validator = %validator,
            id,
            balance = amount,
            completion_time,
            "unbonding started"
        );
        Ok(completion_time)
    }

    /// Pays out every matured, unheld entry of the pair's unbonding record.
    ///
    /// Returns the total released. The record is deleted once it has no entries left.
    pub fn complete_unbonding(
        &self,
        state: &mut dyn StateAccess,
        ctx: &BlockContext,
        delegator: &AccountId,
        validator: &ValidatorId,
    ) -> Result<Coin, StakingError> {
        let ubd = get_unbonding_delegation(state, delegator, validator)?
            .required(StakingError::NoUnbondingDelegation)?;

        let (matured, kept): (Vec<UnbondingDelegationEntry>, Vec<UnbondingDelegationEntry>) = ubd
            .entries
            .iter()
            .cloned()
            .partition(|e| e.is_mature(ctx.time) && !e.on_hold);
        if matured.is_empty() {
            return Ok(Coin::new(self.params.bond_denom.clone(), 0));
        }

        let mut released: u64 = 0;
        for entry in &matured {
            delete_unbonding_op_index(state, entry.id)?;
            self.release_to_delegator(state, delegator, entry.balance)?;
            released = released
                .checked_add(entry.balance)
                .ok_or(StakingError::Custody(CustodyError::Overflow))?;
            tracing::info!(
                target: "staking",
                delegator = %delegator,
                validator = %validator,
                id = entry.id,
                balance = entry.balance,
                "unbonding entry completed"
            );
        }

        let ubd = UnbondingDelegation {
            entries: kept,
            ..ubd
        };
        if ubd.entries.is_empty() {
            remove_unbonding_delegation(state, &ubd)?;
        } else {
            set_unbonding_delegation(state, &ubd)?;
        }

        staking_metrics().inc_unbonding_entries_completed(matured.len() as u64);
        staking_metrics().inc_tokens_released(released);
        Ok(Coin::new(self.params.bond_denom.clone(), released))
    }

    /// Computes when a redelegation out of `src` completes.
    ///
    /// A bonded or missing source waits a full unbonding period, an unbonding source
    /// shares its own completion, and an unbonded source completes immediately.
    pub fn get_begin_info(
        &self,
        state: &dyn StateAccess,
        ctx: &BlockContext,
        src: &ValidatorId,
    ) -> Result<BeginInfo, StakingError> {
        let val = self.registry.get_validator(state, src)?;
        Ok(self.begin_info_for(ctx, val.as_ref()))
    }

    fn begin_info_for(&self, ctx: &BlockContext, src: Option<&Validator>) -> BeginInfo {
        match src.map(|v| v.status) {
            None | Some(BondStatus::Bonded) => BeginInfo {
                completion_time: ctx.time.saturating_add(self.params.unbonding_time_secs),
                height: ctx.height,
                complete_now: false,
            },
            Some(BondStatus::Unbonded) => BeginInfo {
                completion_time: ctx.time,
                height: ctx.height,
                complete_now: true,
            },
            Some(BondStatus::Unbonding) => BeginInfo {
                completion_time: src.map_or(ctx.time, |v| v.unbonding_time),
                height: src.map_or(ctx.height, |v| v.unbonding_height),
                complete_now: false,
            },
        }
    }

    /// Moves `shares` of stake from `src` to `dst` and returns the completion time.
    ///
    /// The tokens are re-delegated to `dst` immediately; the entry only tracks the
    /// period during which the stake can still be slashed at `src`.
    pub fn begin_redelegation(
        &self,
        state: &mut dyn StateAccess,
        ctx: &BlockContext,
        delegator: &AccountId,
        src: &ValidatorId,
        dst: &ValidatorId,
        shares: Shares,
    ) -> Result<u64, StakingError> {
        if src == dst {
            return Err(StakingError::SelfRedelegation);
        }
        let dst_val = self
            .registry
            .get_validator(state, dst)?
            .required(StakingError::BadRedelegationDst)?;
        let src_val = self
            .registry
            .get_validator(state, src)?
            .required(StakingError::BadRedelegationDst)?;
        if has_receiving_redelegation(state, delegator, src)? {
            return Err(StakingError::TransitiveRedelegation);
        }
        if has_max_redelegation_entries(state, self.params.max_entries, delegator, src, dst)? {
            return Err(StakingError::MaxRedelegationEntries);
        }
        if dst_val.invalid_ex_rate() {
            return Err(StakingError::ExchangeRateInvalid);
        }
        self.ensure_unbondable(state, delegator, src, shares)?;
        if shares::preview_remove_del_shares(&src_val, shares)? == 0 {
            return Err(StakingError::TinyRedelegationAmount);
        }

        let amount = self.unbond(state, delegator, src, shares)?;
        if amount == 0 {
            return Err(StakingError::TinyRedelegationAmount);
        }
        let shares_dst = self.delegate(state, delegator, amount, src_val.status, dst, false)?;

        let info = self.begin_info_for(ctx, Some(&src_val));
        if info.complete_now {
            tracing::debug!(
                target: "staking",
                delegator = %delegator,
                src = %src,
                dst = %dst,
                amount,
                "redelegation from unbonded validator completed immediately"
            );
            return Ok(info.completion_time);
        }

        let (red, id) = set_redelegation_entry(
            state,
            &self.hooks,
            delegator,
            src,
            dst,
            info.height,
            info.completion_time,
            amount,
            shares_dst,
        )?;
        insert_redelegation_queue(state, &red, info.completion_time)?;

        tracing::info!(
            target: "staking",
            delegator = %delegator,
            src = %src,
            dst = %dst,
            id,
            balance = amount,
            completion_time = info.completion_time,
            "redelegation started"
        );
        Ok(info.completion_time)
    }

    /// Retires every matured, unheld entry of the triplet's redelegation record.
    ///
    /// Moves no funds. Returns the total initial balance of the retired entries.
    pub fn complete_redelegation(
        &self,
        state: &mut dyn StateAccess,
        ctx: &BlockContext,
        delegator: &AccountId,
        src: &ValidatorId,
        dst: &ValidatorId,
    ) -> Result<Coin, StakingError> {
        let red = get_redelegation(state, delegator, src, dst)?
            .required(StakingError::NoRedelegation)?;

        let (matured, kept): (Vec<_>, Vec<_>) = red
            .entries
            .iter()
            .cloned()
            .partition(|e| e.is_mature(ctx.time) && !e.on_hold);
        if matured.is_empty() {
            return Ok(Coin::new(self.params.bond_denom.clone(), 0));
        }

        let mut balance: u64 = 0;
        for entry in &matured {
            delete_unbonding_op_index(state, entry.id)?;
            balance = balance
                .checked_add(entry.initial_balance)
                .ok_or(StakingError::Custody(CustodyError::Overflow))?;
        }

        let red = Redelegation {
            entries: kept,
            ..red
        };
        if red.entries.is_empty() {
            remove_redelegation(state, &red)?;
        } else {
            set_redelegation(state, &red)?;
        }

        tracing::info!(
            target: "staking",
            delegator = %delegator,
            src = %src,
            dst = %dst,
            entries = matured.len(),
            balance,
            "redelegation entries completed"
        );
        staking_metrics().inc_redelegation_entries_completed(matured.len() as u64);
        Ok(Coin::new(self.params.bond_denom.clone(), balance))
    }

    /// Converts a token amount into the shares to unbond, capped at the shares held.
    ///
    /// Fails if even the truncated conversion exceeds the delegation, which means the
    /// caller asked for more tokens than the delegation is worth.
    pub fn validate_unbond_amount(
        &self,
        state: &dyn StateAccess,
        delegator: &AccountId,
        validator: &ValidatorId,
        amount: u64,
    ) -> Result<Shares, StakingError> {
        let val = self
            .registry
            .get_validator(state, validator)?
            .required(StakingError::NoValidatorFound)?;
        let delegation = get_delegation(state, delegator, validator)?
            .required(StakingError::NoDelegation)?;

        let shares = shares::shares_from_tokens(&val, amount)?;
        let truncated = shares::shares_from_tokens_truncated(&val, amount)?;
        if truncated > delegation.shares {
            return Err(StakingError::InvalidRequest("invalid shares amount".into()));
        }
        Ok(shares.min(delegation.shares))
    }

    /// Marks entry `id` as held. Returns false if no entry carries that ID.
    pub fn put_unbonding_op_on_hold(
        &self,
        state: &mut dyn StateAccess,
        id: u64,
    ) -> Result<bool, StakingError> {
        crate::unbonding_ops::put_unbonding_op_on_hold(state, id)
    }

    /// Settles entry `id` if it has matured, otherwise lifts its hold.
    ///
    /// A matured entry completes regardless of its hold: the caller invoking this is
    /// the subsystem that placed it. Returns false if no entry carries that ID.
    pub fn unbonding_op_can_complete(
        &self,
        state: &mut dyn StateAccess,
        ctx: &BlockContext,
        id: u64,
    ) -> Result<bool, StakingError> {
        if let Some((ubd, i)) = get_unbonding_delegation_by_unbonding_op_id(state, id)? {
            return self.unbonding_delegation_can_complete(state, ctx, ubd, i);
        }
        if let Some((red, i)) = get_redelegation_by_unbonding_op_id(state, id)? {
            return self.redelegation_can_complete(state, ctx, red, i);
        }
        Ok(false)
    }

    fn unbonding_delegation_can_complete(
        &self,
        state: &mut dyn StateAccess,
        ctx: &BlockContext,
        mut ubd: UnbondingDelegation,
        i: usize,
    ) -> Result<bool, StakingError> {
        let Some(entry) = ubd.entries.get_mut(i) else {
            return Err(invariant_violation(format!("unbonding entry {} out of range", i)));
        };
        if !entry.is_mature(ctx.time) {
            entry.on_hold = false;
            tracing::debug!(target: "staking", id = entry.id, "unbonding entry hold released");
            set_unbonding_delegation(state, &ubd)?;
            return Ok(true);
        }

        let entry = ubd.entries.remove(i);
        delete_unbonding_op_index(state, entry.id)?;
        self.release_to_delegator(state, &ubd.delegator, entry.balance)?;
        if ubd.entries.is_empty() {
            remove_unbonding_delegation(state, &ubd)?;
        } else {
            set_unbonding_delegation(state, &ubd)?;
        }

        staking_metrics().inc_unbonding_entries_completed(1);
        staking_metrics().inc_tokens_released(entry.balance);
        tracing::info!(
            target: "staking",
            delegator = %ubd.delegator,
            validator = %ubd.validator,
            id = entry.id,
            balance = entry.balance,
            "held unbonding entry completed"
        );
        Ok(true)
    }

    fn redelegation_can_complete(
        &self,
        state: &mut dyn StateAccess,
        ctx: &BlockContext,
        mut red: Redelegation,
        i: usize,
    ) -> Result<bool, StakingError> {
        let Some(entry) = red.entries.get_mut(i) else {
            return Err(invariant_violation(format!("redelegation entry {} out of range", i)));
        };
        if !entry.is_mature(ctx.time) {
            entry.on_hold = false;
            tracing::debug!(target: "staking", id = entry.id, "redelegation entry hold released");
            set_redelegation(state, &red)?;
            return Ok(true);
        }

        let entry = red.entries.remove(i);
        delete_unbonding_op_index(state, entry.id)?;
        if red.entries.is_empty() {
            remove_redelegation(state, &red)?;
        } else {
            set_redelegation(state, &red)?;
        }

        staking_metrics().inc_redelegation_entries_completed(1);
        tracing::info!(
            target: "staking",
            delegator = %red.delegator,
            src = %red.validator_src,
            dst = %red.validator_dst,
            id = entry.id,
            "held redelegation entry completed"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_test_utils::custody::StateCustody;
    use ledger_test_utils::fixtures::{account, validator, validator_id};
    use ledger_test_utils::state::MemoryState;
    use ledger_types::config::StakingParams;

    const DENOM: &str = "stake";

    fn keeper() -> StakingKeeper {
        StakingKeeper::new(StakingParams::default(), Arc::new(StateCustody))
    }

    fn setup(status: BondStatus) -> (StakingKeeper, MemoryState) {
        let keeper = keeper();
        let mut state = MemoryState::new();
        keeper
            .registry()
            .set_validator(&mut state, &validator(9, 9, status))
            .unwrap();
        (keeper, state)
    }

    #[test]
    fn account_debit_lands_in_the_pool_matching_status() {
        for (status, pool) in [
            (BondStatus::Bonded, ModulePool::Bonded),
            (BondStatus::Unbonding, ModulePool::NotBonded),
            (BondStatus::Unbonded, ModulePool::NotBonded),
        ] {
            let (keeper, mut state) = setup(status);
            StateCustody::fund(&mut state, &account(1), DENOM, 100).unwrap();

            keeper
                .delegate(&mut state, &account(1), 100, BondStatus::Unbonded, &validator_id(9), true)
                .unwrap();
            assert_eq!(StateCustody::pool_balance(&state, pool, DENOM), 100);
            assert_eq!(StateCustody::balance(&state, &account(1), DENOM), 0);
        }
    }

    #[test]
    fn custody_source_moves_only_across_bonded_boundary() {
        let cases = [
            (BondStatus::Bonded, BondStatus::Bonded, 50, 0),
            (BondStatus::Unbonding, BondStatus::Unbonded, 0, 50),
            (BondStatus::Unbonded, BondStatus::Bonded, 50, 0),
            (BondStatus::Bonded, BondStatus::Unbonding, 0, 50),
        ];
        for (src, status, bonded, not_bonded) in cases {
            let (keeper, mut state) = setup(status);
            let seed = ModulePool::for_status(src);
            StateCustody::fund(&mut state, &account(0), DENOM, 50).unwrap();
            StateCustody
                .move_account_to_pool(&mut state, &account(0), seed, DENOM, 50)
                .unwrap();

            keeper
                .delegate(&mut state, &account(1), 50, src, &validator_id(9), false)
                .unwrap();
            assert_eq!(StateCustody::pool_balance(&state, ModulePool::Bonded, DENOM), bonded);
            assert_eq!(StateCustody::pool_balance(&state, ModulePool::NotBonded, DENOM), not_bonded);
        }
    }

    #[test]
    fn bonded_source_with_account_debit_is_fatal() {
        let (keeper, mut state) = setup(BondStatus::Bonded);
        let before = state.clone();
        let err = keeper
            .delegate(&mut state, &account(1), 10, BondStatus::Bonded, &validator_id(9), true)
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(state, before);
    }

    #[test]
    fn begin_info_follows_source_status() {
        let keeper = keeper();
        let ctx = BlockContext::new(10, 1_000);
        let period = keeper.params().unbonding_time_secs;

        let bonded = validator(1, 1, BondStatus::Bonded);
        let mut unbonding = validator(2, 2, BondStatus::Unbonding);
        unbonding.unbonding_time = 5_000;
        unbonding.unbonding_height = 4;
        let unbonded = validator(3, 3, BondStatus::Unbonded);

        assert_eq!(
            keeper.begin_info_for(&ctx, Some(&bonded)),
            BeginInfo { completion_time: 1_000 + period, height: 10, complete_now: false }
        );
        assert_eq!(
            keeper.begin_info_for(&ctx, None),
            keeper.begin_info_for(&ctx, Some(&bonded))
        );
        assert_eq!(
            keeper.begin_info_for(&ctx, Some(&unbonding)),
            BeginInfo { completion_time: 5_000, height: 4, complete_now: false }
        );
        assert!(keeper.begin_info_for(&ctx, Some(&unbonded)).complete_now);
    }

    #[test]
    fn params_are_validated_and_persisted() {
        let mut keeper = keeper();
        let mut state = MemoryState::new();
        assert!(StakingKeeper::load_params(&state).unwrap().is_none());

        let bad = StakingParams { max_entries: 0, ..StakingParams::default() };
        assert!(matches!(
            keeper.set_params(&mut state, bad),
            Err(StakingError::InvalidRequest(_))
        ));

        let params = StakingParams { max_entries: 3, ..StakingParams::default() };
        keeper.set_params(&mut state, params.clone()).unwrap();
        assert_eq!(keeper.params(), &params);
        assert_eq!(StakingKeeper::load_params(&state).unwrap(), Some(params));
    }
}
