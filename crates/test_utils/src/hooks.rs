//! A hook listener that records every notification.

use ledger_api::hooks::StakingHooks;
use ledger_api::state::StateAccess;
use ledger_types::app::{AccountId, ValidatorId};
use ledger_types::error::HookError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A single recorded hook notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    /// `before_delegation_created`
    DelegationCreated(AccountId, ValidatorId),
    /// `before_delegation_shares_modified`
    SharesModified(AccountId, ValidatorId),
    /// `before_delegation_removed`
    DelegationRemoved(AccountId, ValidatorId),
    /// `after_delegation_modified`
    AfterModified(AccountId, ValidatorId),
    /// `after_unbonding_initiated`
    UnbondingInitiated(u64),
}

/// Records hook calls in order and can be told to reject before-hooks.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    events: Mutex<Vec<HookEvent>>,
    reject: AtomicBool,
}

impl RecordingHooks {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent before-hook fail.
    pub fn reject_before_hooks(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<HookEvent> {
        self.lock().clone()
    }

    /// Returns the IDs passed to `after_unbonding_initiated`, in order.
    pub fn initiated_ids(&self) -> Vec<u64> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                HookEvent::UnbondingInitiated(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Forgets all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HookEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn before(&self, event: HookEvent) -> Result<(), HookError> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(HookError::new("recording", format!("rejected {:?}", event)));
        }
        self.lock().push(event);
        Ok(())
    }
}

impl StakingHooks for RecordingHooks {
    fn before_delegation_created(
        &self,
        _state: &mut dyn StateAccess,
        delegator: &AccountId,
        validator: &ValidatorId,
    ) -> Result<(), HookError> {
        self.before(HookEvent::DelegationCreated(*delegator, *validator))
    }

    fn before_delegation_shares_modified(
        &self,
        _state: &mut dyn StateAccess,
        delegator: &AccountId,
        validator: &ValidatorId,
    ) -> Result<(), HookError> {
        self.before(HookEvent::SharesModified(*delegator, *validator))
    }

    fn before_delegation_removed(
        &self,
        _state: &mut dyn StateAccess,
        delegator: &AccountId,
        validator: &ValidatorId,
    ) -> Result<(), HookError> {
        self.before(HookEvent::DelegationRemoved(*delegator, *validator))
    }

    fn after_delegation_modified(
        &self,
        _state: &mut dyn StateAccess,
        delegator: &AccountId,
        validator: &ValidatorId,
    ) {
        self.lock()
            .push(HookEvent::AfterModified(*delegator, *validator));
    }

    fn after_unbonding_initiated(&self, _state: &mut dyn StateAccess, id: u64) {
        self.lock().push(HookEvent::UnbondingInitiated(id));
    }
}
