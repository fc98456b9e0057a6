// Path: crates/staking/tests/common/mod.rs
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use ledger_api::context::BlockContext;
use ledger_api::hooks::{HookChain, StakingHooks};
use ledger_api::state::StateAccess;
use ledger_staking::delegation::get_delegation;
use ledger_staking::StakingKeeper;
use ledger_test_utils::custody::StateCustody;
use ledger_test_utils::fixtures::{account, validator, validator_id};
use ledger_test_utils::hooks::RecordingHooks;
use ledger_test_utils::state::MemoryState;
use ledger_types::app::{BondStatus, Delegation, ModulePool, Shares, Validator, ValidatorId};
use ledger_types::config::StakingParams;
use std::sync::Arc;

pub const DENOM: &str = "stake";
pub const PERIOD: u64 = 1_000;
pub const GENESIS_TIME: u64 = 1_700_000_000;

/// A keeper wired to in-memory state, state-backed custody and a recording listener.
pub struct Harness {
    pub state: MemoryState,
    pub keeper: StakingKeeper,
    pub hooks: Arc<RecordingHooks>,
    pub ctx: BlockContext,
}

pub fn params(max_entries: u32) -> StakingParams {
    StakingParams {
        unbonding_time_secs: PERIOD,
        max_entries,
        bond_denom: DENOM.to_string(),
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_params(params(7))
    }

    pub fn with_params(params: StakingParams) -> Self {
        Self::with_hooks(params, Vec::new())
    }

    /// Builds a harness whose chain runs `extra` listeners after the recorder.
    pub fn with_hooks(params: StakingParams, extra: Vec<Arc<dyn StakingHooks>>) -> Self {
        let hooks = Arc::new(RecordingHooks::new());
        let mut chain = HookChain::new().with(hooks.clone());
        for listener in extra {
            chain.register(listener);
        }
        let keeper = StakingKeeper::new(params, Arc::new(StateCustody)).with_hooks(chain);
        Self {
            state: MemoryState::new(),
            keeper,
            hooks,
            ctx: BlockContext::new(1, GENESIS_TIME),
        }
    }

    pub fn add_validator(&mut self, n: u8, status: BondStatus) -> Result<ValidatorId> {
        self.put_validator(validator(n, n, status))
    }

    pub fn put_validator(&mut self, v: Validator) -> Result<ValidatorId> {
        self.keeper.registry().set_validator(&mut self.state, &v)?;
        Ok(v.address)
    }

    pub fn validator(&self, n: u8) -> Result<Validator> {
        self.keeper
            .get_validator(&self.state, &validator_id(n))?
            .ok_or_else(|| anyhow!("validator {n} missing"))
    }

    pub fn fund(&mut self, n: u8, amount: u64) -> Result<()> {
        StateCustody::fund(&mut self.state, &account(n), DENOM, amount)?;
        Ok(())
    }

    /// Funds `del` and delegates `amount` from its account.
    pub fn delegate(&mut self, del: u8, val: u8, amount: u64) -> Result<Shares> {
        self.fund(del, amount)?;
        Ok(self.keeper.delegate(
            &mut self.state,
            &account(del),
            amount,
            BondStatus::Unbonded,
            &validator_id(val),
            true,
        )?)
    }

    pub fn delegation(&self, del: u8, val: u8) -> Result<Option<Delegation>> {
        Ok(get_delegation(&self.state, &account(del), &validator_id(val))?)
    }

    pub fn balance(&self, n: u8) -> u64 {
        StateCustody::balance(&self.state, &account(n), DENOM)
    }

    pub fn pool(&self, pool: ModulePool) -> u64 {
        StateCustody::pool_balance(&self.state, pool, DENOM)
    }

    pub fn advance(&mut self, secs: u64) {
        self.ctx = self.ctx.advance(1, secs);
    }

    pub fn raw(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.state.get(key)?)
    }
}
