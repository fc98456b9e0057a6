// Path: crates/api/src/custody.rs
//! Defines the `TokenCustody` trait through which staking moves funds.

use crate::state::StateAccess;
use ledger_types::app::{AccountId, ModulePool};
use ledger_types::error::CustodyError;

/// Moves tokens between user accounts and the two staking custody pools.
///
/// Implementations keep their balances in the same `StateAccess` the staking core
/// writes to, so a failed transaction discards custody and staking writes together.
pub trait TokenCustody: Send + Sync {
    /// Debits `amount` from `from` and credits `pool`.
    fn move_account_to_pool(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        pool: ModulePool,
        denom: &str,
        amount: u64,
    ) -> Result<(), CustodyError>;

    /// Debits `pool` and credits `amount` to `to`.
    fn move_pool_to_account(
        &self,
        state: &mut dyn StateAccess,
        pool: ModulePool,
        to: &AccountId,
        denom: &str,
        amount: u64,
    ) -> Result<(), CustodyError>;

    /// Moves `amount` from one pool to the other.
    fn move_pool_to_pool(
        &self,
        state: &mut dyn StateAccess,
        from: ModulePool,
        to: ModulePool,
        denom: &str,
        amount: u64,
    ) -> Result<(), CustodyError>;
}
