// Path: crates/staking/src/validators.rs
//! The default, state-backed validator registry.

use crate::shares;
use crate::store::{load, save};
use ledger_api::registry::ValidatorRegistry;
use ledger_api::state::StateAccess;
use ledger_types::app::{Shares, Validator, ValidatorId};
use ledger_types::error::StakingError;
use ledger_types::keys::validator_key;

/// Stores validators under `staking::validator::` and prices shares with the
/// [`shares`](crate::shares) engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateValidatorRegistry;

impl ValidatorRegistry for StateValidatorRegistry {
    fn get_validator(
        &self,
        state: &dyn StateAccess,
        address: &ValidatorId,
    ) -> Result<Option<Validator>, StakingError> {
        load(state, &validator_key(address))
    }

    fn set_validator(
        &self,
        state: &mut dyn StateAccess,
        validator: &Validator,
    ) -> Result<(), StakingError> {
        save(state, &validator_key(&validator.address), validator)
    }

    fn remove_validator(
        &self,
        state: &mut dyn StateAccess,
        address: &ValidatorId,
    ) -> Result<(), StakingError> {
        state.delete(&validator_key(address))?;
        Ok(())
    }

    fn add_tokens_and_shares(
        &self,
        state: &mut dyn StateAccess,
        mut validator: Validator,
        amount: u64,
    ) -> Result<(Validator, Shares), StakingError> {
        let issued = shares::add_tokens_from_del(&mut validator, amount)?;
        self.set_validator(state, &validator)?;
        Ok((validator, issued))
    }

    fn remove_tokens_and_shares(
        &self,
        state: &mut dyn StateAccess,
        mut validator: Validator,
        shares_to_remove: Shares,
    ) -> Result<(Validator, u64), StakingError> {
        let released = shares::remove_del_shares(&mut validator, shares_to_remove)?;
        self.set_validator(state, &validator)?;
        Ok((validator, released))
    }

    fn jail(
        &self,
        state: &mut dyn StateAccess,
        mut validator: Validator,
    ) -> Result<Validator, StakingError> {
        validator.jailed = true;
        self.set_validator(state, &validator)?;
        Ok(validator)
    }
}
