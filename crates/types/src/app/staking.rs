// Path: crates/types/src/app/staking.rs

//! Persisted staking records.

use super::{AccountId, Shares, ValidatorId};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// The bonding status of a validator.
///
/// The encoded discriminants are fixed; any other byte fails to decode and is treated
/// as corrupted state.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BondStatus {
    /// Not in the active set and not waiting out an unbonding period.
    #[codec(index = 0)]
    Unbonded,
    /// Leaving the active set; stake remains slashable until `unbonding_time`.
    #[codec(index = 1)]
    Unbonding,
    /// In the active set.
    #[codec(index = 2)]
    Bonded,
}

impl BondStatus {
    /// Returns true for `Bonded`.
    pub fn is_bonded(&self) -> bool {
        matches!(self, Self::Bonded)
    }
}

/// A validator as seen by the staking ledger.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Validator {
    /// The validator's address.
    pub address: ValidatorId,
    /// The account that operates the validator and owns its self-delegation.
    pub operator: AccountId,
    /// Current bonding status.
    pub status: BondStatus,
    /// Whether the validator has been jailed.
    pub jailed: bool,
    /// Total tokens backing the validator.
    pub tokens: u64,
    /// Total shares issued to delegators.
    pub delegator_shares: Shares,
    /// Minimum tokens the operator must keep self-delegated.
    pub min_self_delegation: u64,
    /// Height at which the validator began unbonding.
    pub unbonding_height: u64,
    /// Time at which the validator's unbonding completes.
    pub unbonding_time: u64,
}

impl Validator {
    /// Creates a validator holding no stake.
    pub fn new(address: ValidatorId, operator: AccountId, status: BondStatus) -> Self {
        Self {
            address,
            operator,
            status,
            jailed: false,
            tokens: 0,
            delegator_shares: Shares::ZERO,
            min_self_delegation: 0,
            unbonding_height: 0,
            unbonding_time: 0,
        }
    }

    /// Returns true if the validator's exchange rate is poisoned.
    ///
    /// A validator with shares but no tokens (fully slashed) or tokens but no shares
    /// cannot price new delegations.
    pub fn invalid_ex_rate(&self) -> bool {
        (self.tokens == 0 && !self.delegator_shares.is_zero())
            || (self.delegator_shares.is_zero() && self.tokens > 0)
    }

    /// Returns true if the validator is in the bonded set.
    pub fn is_bonded(&self) -> bool {
        self.status.is_bonded()
    }
}

/// A delegator's stake in one validator.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Delegation {
    /// The delegating account.
    pub delegator: AccountId,
    /// The validator delegated to.
    pub validator: ValidatorId,
    /// Shares held by the delegator.
    pub shares: Shares,
}

impl Delegation {
    /// Creates a delegation record.
    pub fn new(delegator: AccountId, validator: ValidatorId, shares: Shares) -> Self {
        Self {
            delegator,
            validator,
            shares,
        }
    }
}

/// One pending withdrawal inside an [`UnbondingDelegation`].
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UnbondingDelegationEntry {
    /// Globally unique unbonding operation ID.
    pub id: u64,
    /// Height at which the unbonding began.
    pub creation_height: u64,
    /// Unix time at which the tokens may be released.
    pub completion_time: u64,
    /// Tokens initially scheduled for release.
    pub initial_balance: u64,
    /// Tokens to release on completion, after any slashing.
    pub balance: u64,
    /// Set while an external subsystem blocks settlement.
    pub on_hold: bool,
}

impl UnbondingDelegationEntry {
    /// Returns true once `now` has reached the completion time.
    pub fn is_mature(&self, now: u64) -> bool {
        self.completion_time <= now
    }
}

/// All pending withdrawals of one delegator from one validator.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UnbondingDelegation {
    /// The withdrawing account.
    pub delegator: AccountId,
    /// The validator being withdrawn from.
    pub validator: ValidatorId,
    /// Entries in creation order.
    pub entries: Vec<UnbondingDelegationEntry>,
}

impl UnbondingDelegation {
    /// Creates a record holding a single entry.
    pub fn new(
        delegator: AccountId,
        validator: ValidatorId,
        entry: UnbondingDelegationEntry,
    ) -> Self {
        Self {
            delegator,
            validator,
            entries: vec![entry],
        }
    }

    /// Appends an entry.
    pub fn add_entry(&mut self, entry: UnbondingDelegationEntry) {
        self.entries.push(entry);
    }
}

/// One pending stake move inside a [`Redelegation`].
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RedelegationEntry {
    /// Globally unique unbonding operation ID.
    pub id: u64,
    /// Height at which the redelegation began.
    pub creation_height: u64,
    /// Unix time at which the entry matures.
    pub completion_time: u64,
    /// Tokens moved from the source validator.
    pub initial_balance: u64,
    /// Shares issued by the destination validator.
    pub shares_dst: Shares,
    /// Set while an external subsystem blocks settlement.
    pub on_hold: bool,
}

impl RedelegationEntry {
    /// Returns true once `now` has reached the completion time.
    pub fn is_mature(&self, now: u64) -> bool {
        self.completion_time <= now
    }
}

/// All pending stake moves of one delegator between two validators.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Redelegation {
    /// The redelegating account.
    pub delegator: AccountId,
    /// The validator stake is moved out of.
    pub validator_src: ValidatorId,
    /// The validator stake is moved into.
    pub validator_dst: ValidatorId,
    /// Entries in creation order.
    pub entries: Vec<RedelegationEntry>,
}

impl Redelegation {
    /// Creates a record holding a single entry.
    pub fn new(
        delegator: AccountId,
        validator_src: ValidatorId,
        validator_dst: ValidatorId,
        entry: RedelegationEntry,
    ) -> Self {
        Self {
            delegator,
            validator_src,
            validator_dst,
            entries: vec![entry],
        }
    }

    /// Appends an entry.
    pub fn add_entry(&mut self, entry: RedelegationEntry) {
        self.entries.push(entry);
    }
}

/// A (delegator, validator) pointer stored in the unbonding time queue.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DvPair {
    /// The withdrawing account.
    pub delegator: AccountId,
    /// The validator being withdrawn from.
    pub validator: ValidatorId,
}

/// A (delegator, src, dst) pointer stored in the redelegation time queue.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DvvTriplet {
    /// The redelegating account.
    pub delegator: AccountId,
    /// The source validator.
    pub validator_src: ValidatorId,
    /// The destination validator.
    pub validator_dst: ValidatorId,
}

/// An amount of a single token denomination.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Coin {
    /// The token denomination.
    pub denom: String,
    /// The amount in base units.
    pub amount: u64,
}

impl Coin {
    /// Creates a coin.
    pub fn new(denom: impl Into<String>, amount: u64) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

/// The two custody pools holding staked tokens.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModulePool {
    /// Tokens backing bonded validators.
    Bonded,
    /// Tokens backing unbonded or unbonding validators and pending withdrawals.
    NotBonded,
}

impl ModulePool {
    /// The stable name of the pool.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bonded => "bonded_tokens_pool",
            Self::NotBonded => "not_bonded_tokens_pool",
        }
    }

    /// The pool holding tokens for a validator with the given status.
    pub fn for_status(status: BondStatus) -> Self {
        match status {
            BondStatus::Bonded => Self::Bonded,
            BondStatus::Unbonding | BondStatus::Unbonded => Self::NotBonded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_state, encode_state};

    #[test]
    fn unknown_bond_status_fails_to_decode() {
        assert!(decode_state::<BondStatus>(&[3]).is_err());
        assert_eq!(decode_state::<BondStatus>(&[2]).unwrap(), BondStatus::Bonded);
    }

    #[test]
    fn exchange_rate_poisoning() {
        let mut v = Validator::new(ValidatorId([1; 32]), AccountId([1; 32]), BondStatus::Bonded);
        assert!(!v.invalid_ex_rate());

        v.tokens = 10;
        assert!(v.invalid_ex_rate());

        v.delegator_shares = Shares::from_int(10);
        assert!(!v.invalid_ex_rate());

        v.tokens = 0;
        assert!(v.invalid_ex_rate());
    }

    #[test]
    fn maturity_is_inclusive() {
        let entry = UnbondingDelegationEntry {
            id: 1,
            creation_height: 1,
            completion_time: 100,
            initial_balance: 5,
            balance: 5,
            on_hold: false,
        };
        assert!(!entry.is_mature(99));
        assert!(entry.is_mature(100));
    }

    #[test]
    fn validator_record_survives_storage() {
        let mut v = Validator::new(ValidatorId([4; 32]), AccountId([5; 32]), BondStatus::Unbonding);
        v.tokens = 77;
        v.delegator_shares = Shares::from_int(70);
        v.unbonding_time = 1_000;
        let stored = encode_state(&v).unwrap();
        assert_eq!(decode_state::<Validator>(&stored).unwrap(), v);
    }
}
