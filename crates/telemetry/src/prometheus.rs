// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_int_counter, register_int_counter_vec,
    register_int_gauge_vec, Histogram, IntCounter, IntCounterVec, IntGaugeVec,
};

// --- Metric Statics ---
// We use OnceCell to hold the metric collectors. They will be initialized
// exactly once by the `install` function.

static UNBONDING_ENTRIES_COMPLETED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static REDELEGATION_ENTRIES_COMPLETED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static TOKENS_RELEASED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static VALIDATORS_JAILED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static QUEUE_POINTERS_DEQUEUED: OnceCell<IntGaugeVec> = OnceCell::new();
static END_BLOCK_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

/// Runs `$body` with the collector if `install()` has been called; otherwise does nothing.
macro_rules! with_metric {
    ($metric:ident, |$m:ident| $body:expr) => {
        if let Some($m) = $metric.get() {
            $body;
        }
    };
}

impl StakingMetricsSink for PrometheusSink {
    fn inc_unbonding_entries_completed(&self, count: u64) {
        with_metric!(UNBONDING_ENTRIES_COMPLETED_TOTAL, |m| m.inc_by(count));
    }
    fn inc_redelegation_entries_completed(&self, count: u64) {
        with_metric!(REDELEGATION_ENTRIES_COMPLETED_TOTAL, |m| m.inc_by(count));
    }
    fn inc_tokens_released(&self, amount: u64) {
        with_metric!(TOKENS_RELEASED_TOTAL, |m| m.inc_by(amount));
    }
    fn inc_validators_jailed(&self) {
        with_metric!(VALIDATORS_JAILED_TOTAL, |m| m.inc());
    }
    fn set_queue_pointers_dequeued(&self, queue: &'static str, count: u64) {
        let count = i64::try_from(count).unwrap_or(i64::MAX);
        with_metric!(QUEUE_POINTERS_DEQUEUED, |m| m
            .with_label_values(&[queue])
            .set(count));
    }
    fn observe_end_block_duration(&self, duration_secs: f64) {
        with_metric!(END_BLOCK_DURATION_SECONDS, |m| m.observe(duration_secs));
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, variant: &'static str) {
        with_metric!(ERRORS_TOTAL, |m| m.with_label_values(&[kind, variant]).inc());
    }
}

fn already_initialized<T>(_: T) -> prometheus::Error {
    prometheus::Error::Msg("prometheus sink already installed".into())
}

/// Initializes all Prometheus metrics collectors and returns a static reference to the sink.
/// This function must be called only once at application startup.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    UNBONDING_ENTRIES_COMPLETED_TOTAL
        .set(register_int_counter!(
            "ledger_staking_unbonding_entries_completed_total",
            "Total unbonding entries paid out to delegators."
        )?)
        .map_err(already_initialized)?;
    REDELEGATION_ENTRIES_COMPLETED_TOTAL
        .set(register_int_counter!(
            "ledger_staking_redelegation_entries_completed_total",
            "Total redelegation entries retired after maturity."
        )?)
        .map_err(already_initialized)?;
    TOKENS_RELEASED_TOTAL
        .set(register_int_counter!(
            "ledger_staking_tokens_released_total",
            "Total tokens released from the not-bonded pool to delegators."
        )?)
        .map_err(already_initialized)?;
    VALIDATORS_JAILED_TOTAL
        .set(register_int_counter!(
            "ledger_staking_validators_jailed_total",
            "Total validators jailed for falling below their minimum self-delegation."
        )?)
        .map_err(already_initialized)?;
    QUEUE_POINTERS_DEQUEUED
        .set(register_int_gauge_vec!(
            "ledger_staking_queue_pointers_dequeued",
            "Queue pointers dequeued in the last end-of-block pass.",
            &["queue"]
        )?)
        .map_err(already_initialized)?;
    END_BLOCK_DURATION_SECONDS
        .set(register_histogram!(
            "ledger_staking_end_block_duration_seconds",
            "Latency of the staking end-of-block pass.",
            exponential_buckets(0.0001, 2.0, 16)?
        )?)
        .map_err(already_initialized)?;
    ERRORS_TOTAL
        .set(register_int_counter_vec!(
            "ledger_errors_total",
            "Total number of errors, categorized by type and variant.",
            &["kind", "variant"]
        )?)
        .map_err(already_initialized)?;

    static SINK: PrometheusSink = PrometheusSink;
    Ok(&SINK)
}
