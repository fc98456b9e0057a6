// Path: crates/staking/src/end_block.rs
//! The end-of-block driver that settles matured unbondings and redelegations.

use crate::keeper::StakingKeeper;
use crate::redelegation::dequeue_all_mature_redelegation_queue;
use crate::unbonding::dequeue_all_mature_ubd_queue;
use ledger_api::context::BlockContext;
use ledger_api::lifecycle::OnEndBlock;
use ledger_api::state::StateAccess;
use ledger_telemetry::time::Timer;
use ledger_telemetry::{error_metrics, staking_metrics};
use ledger_types::app::{DvPair, DvvTriplet};
use ledger_types::error::{ErrorCode, StakingError};

/// What one end-of-block pass settled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndBlockReport {
    /// Unbonding pairs dequeued and processed, in queue order.
    pub unbondings: Vec<DvPair>,
    /// Redelegation triplets dequeued and processed, in queue order.
    pub redelegations: Vec<DvvTriplet>,
    /// Tokens paid out to delegators.
    pub tokens_released: u64,
    /// Initial balance of the redelegation entries retired.
    pub redelegated: u64,
    /// Queue pointers whose record was already gone.
    pub skipped: usize,
}

fn record_error(err: StakingError) -> StakingError {
    error_metrics().inc_error("staking", err.code());
    tracing::error!(target: "end_block", error = %err, fatal = err.is_fatal(), "end block failed");
    err
}

impl StakingKeeper {
    /// Dequeues every pointer that matured by `ctx.time` and completes it.
    ///
    /// A pointer whose record no longer exists was settled through the hold protocol and
    /// is skipped. Any other failure aborts the pass.
    pub fn end_blocker(
        &self,
        state: &mut dyn StateAccess,
        ctx: &BlockContext,
    ) -> Result<EndBlockReport, StakingError> {
        let _timer = Timer::new(staking_metrics());
        let mut report = EndBlockReport::default();

        let pairs = dequeue_all_mature_ubd_queue(state, ctx.time).map_err(record_error)?;
        staking_metrics().set_queue_pointers_dequeued("unbonding", pairs.len() as u64);
        for pair in pairs {
            match self.complete_unbonding(state, ctx, &pair.delegator, &pair.validator) {
                Ok(coin) => {
                    report.tokens_released = report.tokens_released.saturating_add(coin.amount);
                    report.unbondings.push(pair);
                }
                Err(StakingError::NoUnbondingDelegation) => {
                    tracing::debug!(
                        target: "end_block",
                        delegator = %pair.delegator,
                        validator = %pair.validator,
                        "queued unbonding already settled"
                    );
                    report.skipped += 1;
                }
                Err(e) => return Err(record_error(e)),
            }
        }

        let triplets =
            dequeue_all_mature_redelegation_queue(state, ctx.time).map_err(record_error)?;
        staking_metrics().set_queue_pointers_dequeued("redelegation", triplets.len() as u64);
        for t in triplets {
            match self.complete_redelegation(
                state,
                ctx,
                &t.delegator,
                &t.validator_src,
                &t.validator_dst,
            ) {
                Ok(coin) => {
                    report.redelegated = report.redelegated.saturating_add(coin.amount);
                    report.redelegations.push(t);
                }
                Err(StakingError::NoRedelegation) => {
                    tracing::debug!(
                        target: "end_block",
                        delegator = %t.delegator,
                        src = %t.validator_src,
                        dst = %t.validator_dst,
                        "queued redelegation already settled"
                    );
                    report.skipped += 1;
                }
                Err(e) => return Err(record_error(e)),
            }
        }

        if !report.unbondings.is_empty() || !report.redelegations.is_empty() {
            tracing::info!(
                target: "end_block",
                height = ctx.height,
                unbondings = report.unbondings.len(),
                redelegations = report.redelegations.len(),
                tokens_released = report.tokens_released,
                "matured staking entries settled"
            );
        }
        Ok(report)
    }
}

impl OnEndBlock for StakingKeeper {
    type Report = EndBlockReport;
    type Error = StakingError;

    fn on_end_block(
        &self,
        state: &mut dyn StateAccess,
        ctx: &BlockContext,
    ) -> Result<EndBlockReport, StakingError> {
        self.end_blocker(state, ctx)
    }
}
