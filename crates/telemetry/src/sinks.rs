// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured error metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns a static reference to the configured staking metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn staking_metrics() -> &'static dyn StakingMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

// --- Trait Definitions ---

/// A sink for metrics related to the staking lifecycle.
pub trait StakingMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of unbonding entries paid out.
    fn inc_unbonding_entries_completed(&self, count: u64);
    /// Increments the counter of redelegation entries retired.
    fn inc_redelegation_entries_completed(&self, count: u64);
    /// Increments the total tokens released to delegators.
    fn inc_tokens_released(&self, amount: u64);
    /// Increments the counter of validators jailed for insufficient self-delegation.
    fn inc_validators_jailed(&self);
    /// Sets the number of queue pointers dequeued in the last block, labeled by queue.
    fn set_queue_pointers_dequeued(&self, queue: &'static str, count: u64);
    /// Observes the duration of one end-of-block pass.
    fn observe_end_block_duration(&self, duration_secs: f64);
}
impl StakingMetricsSink for NopSink {
    fn inc_unbonding_entries_completed(&self, _count: u64) {}
    fn inc_redelegation_entries_completed(&self, _count: u64) {}
    fn inc_tokens_released(&self, _amount: u64) {}
    fn inc_validators_jailed(&self) {}
    fn set_queue_pointers_dequeued(&self, _queue: &'static str, _count: u64) {}
    fn observe_end_block_duration(&self, _duration_secs: f64) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and variant.
    fn inc_error(&self, kind: &'static str, variant: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _variant: &'static str) {}
}

/// A unified sink that implements all domain-specific traits, providing a single
/// point of implementation for metrics backends like Prometheus.
pub trait MetricsSink: StakingMetricsSink + ErrorMetricsSink {}

// Blanket implementation to allow any type that implements all sub-traits
// to be used as a `MetricsSink`.
impl<T> MetricsSink for T where T: StakingMetricsSink + ErrorMetricsSink {}
