// Path: crates/staking/src/shares.rs
//! Share accounting: conversions between tokens and a validator's shares.
//!
//! A validator's exchange rate is `tokens / delegator_shares`. Every conversion is a
//! single exact multiply-then-divide on [`Dec`], rounded once to [`SHARE_PRECISION`]
//! digits with one of three policies:
//!
//! - precise: round half to even, for informational values.
//! - truncated: toward zero, on every path that pays tokens out.
//! - round up: away from zero, when the pool must be over-charged rather than drained.
//!
//! Withdrawals always truncate, so repeated small unbonds can never extract more than
//! the pool holds.
//!
//! [`SHARE_PRECISION`]: ledger_types::app::SHARE_PRECISION

use ledger_types::app::{Dec, Rounding, Shares, Validator};
use ledger_types::error::ShareError;

fn tokens_for(v: &Validator, shares: Shares, rounding: Rounding) -> Result<Dec, ShareError> {
    if v.delegator_shares.is_zero() {
        return Err(ShareError::ExchangeRateInvalid);
    }
    shares
        .checked_mul_div(Dec::from_int(v.tokens), v.delegator_shares, rounding)
        .ok_or(ShareError::Overflow)
}

fn shares_for(v: &Validator, amount: u64, rounding: Rounding) -> Result<Shares, ShareError> {
    if v.invalid_ex_rate() {
        return Err(ShareError::ExchangeRateInvalid);
    }
    if v.tokens == 0 {
        return Err(ShareError::ZeroTokens);
    }
    v.delegator_shares
        .checked_mul_div(Dec::from_int(amount), Dec::from_int(v.tokens), rounding)
        .ok_or(ShareError::Overflow)
}

/// Tokens worth `shares`, rounded half to even.
pub fn tokens_from_shares(v: &Validator, shares: Shares) -> Result<Dec, ShareError> {
    tokens_for(v, shares, Rounding::HalfEven)
}

/// Tokens worth `shares`, truncated toward zero.
pub fn tokens_from_shares_truncated(v: &Validator, shares: Shares) -> Result<Dec, ShareError> {
    tokens_for(v, shares, Rounding::Down)
}

/// Tokens worth `shares`, rounded away from zero.
pub fn tokens_from_shares_round_up(v: &Validator, shares: Shares) -> Result<Dec, ShareError> {
    tokens_for(v, shares, Rounding::Up)
}

/// Shares worth `amount` tokens, rounded half to even.
///
/// Fails with `ExchangeRateInvalid` if the validator has tokens without shares or
/// shares without tokens.
pub fn shares_from_tokens(v: &Validator, amount: u64) -> Result<Shares, ShareError> {
    shares_for(v, amount, Rounding::HalfEven)
}

/// Shares worth `amount` tokens, truncated toward zero.
pub fn shares_from_tokens_truncated(v: &Validator, amount: u64) -> Result<Shares, ShareError> {
    shares_for(v, amount, Rounding::Down)
}

/// Converts a decimal to whole tokens, discarding the fraction.
pub fn truncate_to_tokens(value: Dec) -> Result<u64, ShareError> {
    value.trunc_to_u64().ok_or(ShareError::Overflow)
}

/// Adds `amount` delegated tokens to `v` and returns the shares issued for them.
///
/// The first delegation to a validator without shares is issued 1:1. `v` is left
/// untouched on error.
pub fn add_tokens_from_del(v: &mut Validator, amount: u64) -> Result<Shares, ShareError> {
    let issued = if v.delegator_shares.is_zero() {
        Shares::from_int(amount)
    } else {
        shares_from_tokens(v, amount)?
    };
    let tokens = v.tokens.checked_add(amount).ok_or(ShareError::Overflow)?;
    let delegator_shares = v
        .delegator_shares
        .checked_add(issued)
        .ok_or(ShareError::Overflow)?;
    v.tokens = tokens;
    v.delegator_shares = delegator_shares;
    Ok(issued)
}

/// Removes `shares` from `v` and returns the whole tokens they release.
///
/// Removing the last shares releases every remaining token so nothing is stranded by
/// rounding; otherwise the released amount is truncated. `v` is left untouched on error.
pub fn remove_del_shares(v: &mut Validator, shares: Shares) -> Result<u64, ShareError> {
    let remaining = v
        .delegator_shares
        .checked_sub(shares)
        .ok_or(ShareError::InsufficientShares)?;
    let issued = if remaining.is_zero() {
        v.tokens
    } else {
        truncate_to_tokens(tokens_from_shares(v, shares)?)?
    };
    let tokens = v
        .tokens
        .checked_sub(issued)
        .ok_or(ShareError::InsufficientShares)?;
    v.tokens = tokens;
    v.delegator_shares = remaining;
    Ok(issued)
}

/// Returns what [`remove_del_shares`] would release, without mutating `v`.
pub fn preview_remove_del_shares(v: &Validator, shares: Shares) -> Result<u64, ShareError> {
    let mut scratch = v.clone();
    remove_del_shares(&mut scratch, shares)
}
