//! Cumulative update counters for an adapter session.
//!
//! [`UpdateMetrics`] is reset at every `initialize()` and lets drivers
//! and tests see exactly how a requested update was decomposed into
//! solver steps.

/// Counters collected while advancing the model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateMetrics {
    /// Total successful calls to the model's `advance()`.
    pub advance_calls: u64,
    /// Advances taken with the model's native step.
    pub whole_steps: u64,
    /// Advances taken with a scaled (fractional) step.
    pub fractional_steps: u64,
    /// Wall-clock time of the most recent `update*` call, in microseconds.
    pub last_update_us: u64,
}
