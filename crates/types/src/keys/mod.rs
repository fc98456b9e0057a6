// Path: crates/types/src/keys/mod.rs
//! Defines constants and builders for the staking state-key layout.
//!
//! Every record the ledger persists lives under one of the prefixes below. Addresses are
//! fixed-width (32 bytes) so composite keys can be split without separators, and every
//! integer component is big-endian so lexicographic key order equals numeric order. The
//! queue scans in the staking crate depend on that property.

use crate::app::{AccountId, ValidatorId};

/// The state key for the persisted staking parameters.
pub const STAKING_PARAMS_KEY: &[u8] = b"staking::params";

/// The state key prefix for validator records, keyed by validator address.
pub const VALIDATOR_KEY_PREFIX: &[u8] = b"staking::validator::";

/// The state key prefix for delegations: `prefix | delegator | validator`.
pub const DELEGATION_KEY_PREFIX: &[u8] = b"staking::delegation::";

/// The state key prefix for unbonding delegations: `prefix | delegator | validator`.
pub const UBD_KEY_PREFIX: &[u8] = b"staking::ubd::";
/// The state key prefix for the by-validator unbonding index: `prefix | validator | delegator`.
pub const UBD_BY_VAL_INDEX_PREFIX: &[u8] = b"staking::ubd_by_val::";

/// The state key prefix for redelegations: `prefix | delegator | src | dst`.
pub const RED_KEY_PREFIX: &[u8] = b"staking::red::";
/// The state key prefix for the by-source redelegation index: `prefix | src | delegator | dst`.
pub const RED_BY_VAL_SRC_INDEX_PREFIX: &[u8] = b"staking::red_by_src::";
/// The state key prefix for the by-destination redelegation index: `prefix | dst | delegator | src`.
pub const RED_BY_VAL_DST_INDEX_PREFIX: &[u8] = b"staking::red_by_dst::";

/// The state key prefix for the unbonding time queue, keyed by big-endian completion time.
pub const UBD_QUEUE_PREFIX: &[u8] = b"staking::ubd_queue::";
/// The state key prefix for the redelegation time queue, keyed by big-endian completion time.
pub const RED_QUEUE_PREFIX: &[u8] = b"staking::red_queue::";

/// The state key prefix for the operation-ID reverse index, keyed by big-endian ID.
pub const UNBONDING_OP_INDEX_PREFIX: &[u8] = b"staking::unbonding_op::";
/// The state key for the last issued unbonding operation ID.
pub const UNBONDING_OP_ID_KEY: &[u8] = b"staking::unbonding_op_id";

const ADDR_LEN: usize = 32;

/// Returns the state key for a validator record.
pub fn validator_key(validator: &ValidatorId) -> Vec<u8> {
    [VALIDATOR_KEY_PREFIX, validator.as_ref()].concat()
}

/// Returns the state key for a delegation record.
pub fn delegation_key(delegator: &AccountId, validator: &ValidatorId) -> Vec<u8> {
    [DELEGATION_KEY_PREFIX, delegator.as_ref(), validator.as_ref()].concat()
}

/// Returns the prefix covering every delegation made by `delegator`.
pub fn delegations_by_delegator_prefix(delegator: &AccountId) -> Vec<u8> {
    [DELEGATION_KEY_PREFIX, delegator.as_ref()].concat()
}

/// Returns the state key for an unbonding delegation record.
pub fn ubd_key(delegator: &AccountId, validator: &ValidatorId) -> Vec<u8> {
    [UBD_KEY_PREFIX, delegator.as_ref(), validator.as_ref()].concat()
}

/// Returns the prefix covering every unbonding delegation of `delegator`.
pub fn ubds_by_delegator_prefix(delegator: &AccountId) -> Vec<u8> {
    [UBD_KEY_PREFIX, delegator.as_ref()].concat()
}

/// Returns the by-validator index key for an unbonding delegation.
pub fn ubd_by_val_index_key(validator: &ValidatorId, delegator: &AccountId) -> Vec<u8> {
    [UBD_BY_VAL_INDEX_PREFIX, validator.as_ref(), delegator.as_ref()].concat()
}

/// Returns the prefix covering every unbonding delegation from `validator`.
pub fn ubd_by_val_prefix(validator: &ValidatorId) -> Vec<u8> {
    [UBD_BY_VAL_INDEX_PREFIX, validator.as_ref()].concat()
}

/// Returns the state key for a redelegation record.
pub fn red_key(delegator: &AccountId, src: &ValidatorId, dst: &ValidatorId) -> Vec<u8> {
    [RED_KEY_PREFIX, delegator.as_ref(), src.as_ref(), dst.as_ref()].concat()
}

/// Returns the prefix covering every redelegation of `delegator`.
pub fn reds_by_delegator_prefix(delegator: &AccountId) -> Vec<u8> {
    [RED_KEY_PREFIX, delegator.as_ref()].concat()
}

/// Returns the by-source index key for a redelegation.
pub fn red_by_src_index_key(src: &ValidatorId, delegator: &AccountId, dst: &ValidatorId) -> Vec<u8> {
    [
        RED_BY_VAL_SRC_INDEX_PREFIX,
        src.as_ref(),
        delegator.as_ref(),
        dst.as_ref(),
    ]
    .concat()
}

/// Returns the prefix covering every redelegation out of `src`.
pub fn red_by_src_prefix(src: &ValidatorId) -> Vec<u8> {
    [RED_BY_VAL_SRC_INDEX_PREFIX, src.as_ref()].concat()
}

/// Returns the by-destination index key for a redelegation.
pub fn red_by_dst_index_key(dst: &ValidatorId, delegator: &AccountId, src: &ValidatorId) -> Vec<u8> {
    [
        RED_BY_VAL_DST_INDEX_PREFIX,
        dst.as_ref(),
        delegator.as_ref(),
        src.as_ref(),
    ]
    .concat()
}

/// Returns the prefix covering every redelegation by `delegator` into `dst`.
pub fn red_by_dst_delegator_prefix(dst: &ValidatorId, delegator: &AccountId) -> Vec<u8> {
    [RED_BY_VAL_DST_INDEX_PREFIX, dst.as_ref(), delegator.as_ref()].concat()
}

/// Returns the unbonding queue bucket key for `time`.
pub fn ubd_queue_key(time: u64) -> Vec<u8> {
    [UBD_QUEUE_PREFIX, &time.to_be_bytes()].concat()
}

/// Returns the redelegation queue bucket key for `time`.
pub fn red_queue_key(time: u64) -> Vec<u8> {
    [RED_QUEUE_PREFIX, &time.to_be_bytes()].concat()
}

/// Returns the reverse-index key for an unbonding operation ID.
pub fn unbonding_op_index_key(id: u64) -> Vec<u8> {
    [UNBONDING_OP_INDEX_PREFIX, &id.to_be_bytes()].concat()
}

fn take_addr(rest: &[u8]) -> Option<([u8; ADDR_LEN], &[u8])> {
    let head = rest.get(..ADDR_LEN)?;
    let tail = rest.get(ADDR_LEN..)?;
    Some((head.try_into().ok()?, tail))
}

/// Splits a by-validator unbonding index key into `(validator, delegator)`.
pub fn parse_ubd_by_val_index_key(key: &[u8]) -> Option<(ValidatorId, AccountId)> {
    let rest = key.strip_prefix(UBD_BY_VAL_INDEX_PREFIX)?;
    let (val, rest) = take_addr(rest)?;
    let (del, rest) = take_addr(rest)?;
    rest.is_empty()
        .then_some((ValidatorId(val), AccountId(del)))
}

/// Splits a by-source redelegation index key into `(src, delegator, dst)`.
pub fn parse_red_by_src_index_key(key: &[u8]) -> Option<(ValidatorId, AccountId, ValidatorId)> {
    let rest = key.strip_prefix(RED_BY_VAL_SRC_INDEX_PREFIX)?;
    let (src, rest) = take_addr(rest)?;
    let (del, rest) = take_addr(rest)?;
    let (dst, rest) = take_addr(rest)?;
    rest.is_empty()
        .then_some((ValidatorId(src), AccountId(del), ValidatorId(dst)))
}

/// Extracts the big-endian timestamp from a queue bucket key under `prefix`.
pub fn parse_queue_time(prefix: &[u8], key: &[u8]) -> Option<u64> {
    let rest = key.strip_prefix(prefix)?;
    let bytes: [u8; 8] = rest.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}
