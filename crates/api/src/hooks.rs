// Path: crates/api/src/hooks.rs
//! Defines the listener interface notified around delegation changes.
//!
//! Before-hooks run ahead of a mutation and may abort it by returning a [`HookError`];
//! the error propagates out of the staking operation like any other failure. After-hooks
//! are notifications: they return nothing and cannot affect the operation's outcome.

use crate::state::StateAccess;
use ledger_types::app::{AccountId, ValidatorId};
use ledger_types::error::HookError;
use std::sync::Arc;

/// A listener for staking lifecycle events. Every method defaults to a no-op.
pub trait StakingHooks: Send + Sync {
    /// Called before a new delegation record is created.
    fn before_delegation_created(
        &self,
        _state: &mut dyn StateAccess,
        _delegator: &AccountId,
        _validator: &ValidatorId,
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Called before the shares of an existing delegation change.
    fn before_delegation_shares_modified(
        &self,
        _state: &mut dyn StateAccess,
        _delegator: &AccountId,
        _validator: &ValidatorId,
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Called before a delegation record is deleted.
    fn before_delegation_removed(
        &self,
        _state: &mut dyn StateAccess,
        _delegator: &AccountId,
        _validator: &ValidatorId,
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Called after a delegation record was written.
    fn after_delegation_modified(
        &self,
        _state: &mut dyn StateAccess,
        _delegator: &AccountId,
        _validator: &ValidatorId,
    ) {
    }

    /// Called after an unbonding or redelegation entry was created with operation `id`.
    fn after_unbonding_initiated(&self, _state: &mut dyn StateAccess, _id: u64) {}
}

/// An ordered list of listeners invoked synchronously in registration order.
#[derive(Clone, Default)]
pub struct HookChain {
    listeners: Vec<Arc<dyn StakingHooks>>,
}

impl HookChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener to the end of the chain.
    pub fn register(&mut self, listener: Arc<dyn StakingHooks>) {
        self.listeners.push(listener);
    }

    /// Returns a chain with `listener` appended.
    pub fn with(mut self, listener: Arc<dyn StakingHooks>) -> Self {
        self.register(listener);
        self
    }

    /// Returns the number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns true if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for HookChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookChain")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// The first failing before-hook stops the chain; later listeners are not called.
impl StakingHooks for HookChain {
    fn before_delegation_created(
        &self,
        state: &mut dyn StateAccess,
        delegator: &AccountId,
        validator: &ValidatorId,
    ) -> Result<(), HookError> {
        for listener in &self.listeners {
            listener.before_delegation_created(state, delegator, validator)?;
        }
        Ok(())
    }

    fn before_delegation_shares_modified(
        &self,
        state: &mut dyn StateAccess,
        delegator: &AccountId,
        validator: &ValidatorId,
    ) -> Result<(), HookError> {
        for listener in &self.listeners {
            listener.before_delegation_shares_modified(state, delegator, validator)?;
        }
        Ok(())
    }

    fn before_delegation_removed(
        &self,
        state: &mut dyn StateAccess,
        delegator: &AccountId,
        validator: &ValidatorId,
    ) -> Result<(), HookError> {
        for listener in &self.listeners {
            listener.before_delegation_removed(state, delegator, validator)?;
        }
        Ok(())
    }

    fn after_delegation_modified(
        &self,
        state: &mut dyn StateAccess,
        delegator: &AccountId,
        validator: &ValidatorId,
    ) {
        for listener in &self.listeners {
            listener.after_delegation_modified(state, delegator, validator);
        }
    }

    fn after_unbonding_initiated(&self, state: &mut dyn StateAccess, id: u64) {
        for listener in &self.listeners {
            listener.after_unbonding_initiated(state, id);
        }
    }
}
