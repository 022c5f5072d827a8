//! Tunable constants for the rules core.
//!
//! Balance *data* (boost magnitudes, status durations, functor dice) lives
//! in the source text files loaded through [`crate::registry`]. This module
//! holds the handful of implementation constants the spec leaves as prose
//! (the condition evaluator's numeric epsilon, default stacking/tick
//! policy) the same way the teacher crate centralizes bounds in
//! `stats::bonus::StatBounds`.

/// Epsilon used for numeric comparisons in condition expressions.
pub const NUMERIC_EPSILON: f64 = 1e-4;

/// Default duration-stacking policy for statuses that don't specify one.
pub const DEFAULT_STACK_POLICY: crate::status::StackPolicy =
    crate::status::StackPolicy::ReplaceIfLonger;

/// Default tick timing for statuses that don't specify one.
pub const DEFAULT_TICK_TIMING: crate::status::TickTiming = crate::status::TickTiming::OwnerTurnEnd;

/// Leveled action resources (spell slots) index levels `1..=MAX_SPELL_LEVEL`.
pub const MAX_SPELL_LEVEL: u8 = 9;

/// Runtime-wide tunables, overridable from `config.toml` by `ddrc-content`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DdrcConfig {
    /// Base hit/miss rule: a natural roll at or below this always misses.
    pub auto_miss_at_or_below: u32,
    /// A natural roll at or above this always hits and is a critical.
    pub auto_crit_at_or_above: u32,
    /// Tolerance used when comparing condition-expression numeric operands
    /// for equality (spec.md §4.D).
    pub numeric_epsilon: f64,
}

impl Default for DdrcConfig {
    fn default() -> Self {
        Self {
            auto_miss_at_or_below: 1,
            auto_crit_at_or_above: 20,
            numeric_epsilon: NUMERIC_EPSILON,
        }
    }
}
