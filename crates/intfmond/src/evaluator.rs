//! Threshold evaluation for one (interface, error class) observation.
//!
//! `evaluate` is pure and total: it never fails, touches no I/O, and owns
//! the full classification policy — baseline seeding, reset-on-clear
//! detection, degrade-vs-error banding, and the consecutive-interval
//! failure confirmation that gates the disable action.

use crate::types::{Classification, CounterState, Thresholds};

/// Outcome of evaluating one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// How the observation classified against the stored baseline.
    pub classification: Classification,
    /// State to persist for the next cycle.
    pub next: CounterState,
    /// True exactly when the error streak reaches the configured interval
    /// count this cycle. Edge-triggered: a streak that keeps climbing past
    /// the count does not fire again.
    pub confirmed_failure: bool,
}

/// Classifies `observed` against the prior state for this pair.
///
/// With no prior state the observation seeds the baseline and nothing is
/// compared. Otherwise the bands are an else-if chain, severe first:
///
/// - `observed < base`: counters were cleared externally; the baseline is
///   re-seeded and the failure streak forgotten.
/// - `observed > base + error_tolerance`: `Error`; the baseline moves to
///   the observed value and the failure streak grows.
/// - `observed > base + degrade_tolerance`: `Degraded`; the baseline moves
///   to the observed value and the failure streak resets.
/// - otherwise `Ok`; the baseline stays put so slow growth still
///   accumulates toward the tolerances.
pub fn evaluate(
    prior: Option<CounterState>,
    observed: u64,
    thresholds: &Thresholds,
) -> Evaluation {
    let state = match prior {
        Some(state) => state,
        None => {
            return Evaluation {
                classification: Classification::Baseline,
                next: CounterState::first_observation(observed),
                confirmed_failure: false,
            }
        }
    };

    // Saturating sums keep the bands total at the top of the counter range.
    let degrade_limit = state.base.saturating_add(thresholds.degrade_tolerance());
    let error_limit = state.base.saturating_add(thresholds.error_tolerance());

    let (classification, next) = if observed < state.base {
        (
            Classification::Cleared,
            CounterState {
                base: observed,
                consecutive_failures: 0,
            },
        )
    } else if observed > error_limit {
        (
            Classification::Error,
            CounterState {
                base: observed,
                consecutive_failures: state.consecutive_failures + 1,
            },
        )
    } else if observed > degrade_limit {
        (
            Classification::Degraded,
            CounterState {
                base: observed,
                consecutive_failures: 0,
            },
        )
    } else {
        (
            Classification::Ok,
            CounterState {
                base: state.base,
                consecutive_failures: 0,
            },
        )
    };

    let confirmed_failure = classification == Classification::Error
        && next.consecutive_failures == thresholds.fail_interval_count();

    Evaluation {
        classification,
        next,
        confirmed_failure,
    }
}
