// Path: crates/api/src/registry.rs
//! Defines the `ValidatorRegistry` trait for validator aggregates.

use crate::state::StateAccess;
use ledger_types::app::{Shares, Validator, ValidatorId};
use ledger_types::error::StakingError;

/// Reads and mutates validator aggregates.
///
/// Token and share mutations take the validator by value and return the persisted
/// result so callers never act on a stale copy.
pub trait ValidatorRegistry: Send + Sync {
    /// Loads a validator, or `None` if it does not exist.
    fn get_validator(
        &self,
        state: &dyn StateAccess,
        address: &ValidatorId,
    ) -> Result<Option<Validator>, StakingError>;

    /// Writes a validator, overwriting any existing record.
    fn set_validator(
        &self,
        state: &mut dyn StateAccess,
        validator: &Validator,
    ) -> Result<(), StakingError>;

    /// Deletes a validator.
    fn remove_validator(
        &self,
        state: &mut dyn StateAccess,
        address: &ValidatorId,
    ) -> Result<(), StakingError>;

    /// Adds `amount` tokens to the validator and returns it with the shares issued.
    fn add_tokens_and_shares(
        &self,
        state: &mut dyn StateAccess,
        validator: Validator,
        amount: u64,
    ) -> Result<(Validator, Shares), StakingError>;

    /// Removes `shares` from the validator and returns it with the tokens released.
    fn remove_tokens_and_shares(
        &self,
        state: &mut dyn StateAccess,
        validator: Validator,
        shares: Shares,
    ) -> Result<(Validator, u64), StakingError>;

    /// Marks the validator as jailed and returns the persisted record.
    fn jail(
        &self,
        state: &mut dyn StateAccess,
        validator: Validator,
    ) -> Result<Validator, StakingError>;
}
