//! Deterministic addresses and validators for tests

use ledger_types::app::{AccountId, BondStatus, Validator, ValidatorId};

/// An account whose address bytes are all `n`.
pub fn account(n: u8) -> AccountId {
    AccountId([n; 32])
}

/// A validator address whose bytes are all `n`.
pub fn validator_id(n: u8) -> ValidatorId {
    ValidatorId([n; 32])
}

/// A validator with no stake, operated by `account(operator)`.
pub fn validator(n: u8, operator: u8, status: BondStatus) -> Validator {
    Validator::new(validator_id(n), account(operator), status)
}
