//! A `TokenCustody` that keeps balances in state.

use ledger_api::custody::TokenCustody;
use ledger_api::state::StateAccess;
use ledger_types::app::{AccountId, ModulePool};
use ledger_types::codec::{decode_state, encode_state};
use ledger_types::error::{CustodyError, StateError};

const BALANCE_PREFIX: &[u8] = b"bank::balance::";
const POOL_PREFIX: &[u8] = b"bank::pool::";

fn balance_key(account: &AccountId, denom: &str) -> Vec<u8> {
    [BALANCE_PREFIX, account.as_ref(), b"::", denom.as_bytes()].concat()
}

fn pool_key(pool: ModulePool, denom: &str) -> Vec<u8> {
    [POOL_PREFIX, pool.name().as_bytes(), b"::", denom.as_bytes()].concat()
}

fn read(state: &dyn StateAccess, key: &[u8]) -> Result<u64, StateError> {
    match state.get(key)? {
        Some(bytes) => decode_state(&bytes),
        None => Ok(0),
    }
}

fn write(state: &mut dyn StateAccess, key: &[u8], amount: u64) -> Result<(), StateError> {
    if amount == 0 {
        return state.delete(key);
    }
    state.insert(key, &encode_state(&amount)?)
}

fn transfer(
    state: &mut dyn StateAccess,
    from: &[u8],
    to: &[u8],
    amount: u64,
) -> Result<(), CustodyError> {
    let have = read(state, from)?;
    let rest = have
        .checked_sub(amount)
        .ok_or(CustodyError::InsufficientFunds { have, need: amount })?;
    let credited = read(state, to)?
        .checked_add(amount)
        .ok_or(CustodyError::Overflow)?;
    write(state, from, rest)?;
    write(state, to, credited)?;
    Ok(())
}

/// Account and pool balances stored under `bank::` keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct StateCustody;

impl StateCustody {
    /// Credits `amount` to `account` out of thin air.
    pub fn fund(
        state: &mut dyn StateAccess,
        account: &AccountId,
        denom: &str,
        amount: u64,
    ) -> Result<(), CustodyError> {
        let key = balance_key(account, denom);
        let next = read(state, &key)?
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        Ok(write(state, &key, next)?)
    }

    /// Returns the balance of `account`.
    pub fn balance(state: &dyn StateAccess, account: &AccountId, denom: &str) -> u64 {
        read(state, &balance_key(account, denom)).unwrap_or(0)
    }

    /// Returns the balance held by `pool`.
    pub fn pool_balance(state: &dyn StateAccess, pool: ModulePool, denom: &str) -> u64 {
        read(state, &pool_key(pool, denom)).unwrap_or(0)
    }
}

impl TokenCustody for StateCustody {
    fn move_account_to_pool(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        pool: ModulePool,
        denom: &str,
        amount: u64,
    ) -> Result<(), CustodyError> {
        transfer(state, &balance_key(from, denom), &pool_key(pool, denom), amount)
    }

    fn move_pool_to_account(
        &self,
        state: &mut dyn StateAccess,
        pool: ModulePool,
        to: &AccountId,
        denom: &str,
        amount: u64,
    ) -> Result<(), CustodyError> {
        transfer(state, &pool_key(pool, denom), &balance_key(to, denom), amount)
    }

    fn move_pool_to_pool(
        &self,
        state: &mut dyn StateAccess,
        from: ModulePool,
        to: ModulePool,
        denom: &str,
        amount: u64,
    ) -> Result<(), CustodyError> {
        transfer(state, &pool_key(from, denom), &pool_key(to, denom), amount)
    }
}
