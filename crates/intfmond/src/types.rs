//! Core types for interface error tracking.

use std::collections::HashMap;

use crate::error::{MonitorError, MonitorResult};

/// Error counter class tracked per interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Frame check sequence errors (corrupted frames on the wire).
    Fcs,
    /// Physical-layer symbol encoding errors.
    Symbol,
}

impl ErrorClass {
    /// All tracked classes, in evaluation order.
    pub const ALL: [ErrorClass; 2] = [ErrorClass::Fcs, ErrorClass::Symbol];

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fcs" => Some(Self::Fcs),
            "symbol" => Some(Self::Symbol),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fcs => "fcs",
            Self::Symbol => "symbol",
        }
    }
}

/// One interface's raw error counters as reported by the agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorCounters {
    pub fcs: u64,
    pub symbol: u64,
}

impl ErrorCounters {
    pub fn get(&self, class: ErrorClass) -> u64 {
        match class {
            ErrorClass::Fcs => self.fcs,
            ErrorClass::Symbol => self.symbol,
        }
    }
}

/// Tracking state for one (interface, error class) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterState {
    /// Last counter value used as the comparison baseline.
    pub base: u64,
    /// Consecutive polling intervals above the error tolerance without an
    /// intervening reset.
    pub consecutive_failures: u32,
}

impl CounterState {
    /// Seeds tracking from the first observed raw counter value.
    pub fn first_observation(observed: u64) -> Self {
        Self {
            base: observed,
            consecutive_failures: 0,
        }
    }
}

/// Per-interface tracking entry, one `CounterState` per error class.
#[derive(Debug, Clone, Default)]
pub struct TrackedInterface {
    pub classes: HashMap<ErrorClass, CounterState>,
}

/// How one observation classified against the stored baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// First observation for the pair; baseline recorded, nothing compared.
    Baseline,
    /// Growth within the degrade tolerance.
    Ok,
    /// Counter decreased; hardware reset or wrap, baseline re-seeded.
    Cleared,
    /// Growth above the degrade tolerance but within the error tolerance.
    Degraded,
    /// Growth above the error tolerance.
    Error,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Ok => "ok",
            Self::Cleared => "cleared",
            Self::Degraded => "degraded",
            Self::Error => "error",
        }
    }
}

/// Delta tolerances and the failure confirmation window.
///
/// Validated at construction: the degrade tolerance must be strictly below
/// the error tolerance, and at least one interval is required to confirm a
/// failure. The evaluator relies on these invariants and does not re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    degrade_tolerance: u64,
    error_tolerance: u64,
    fail_interval_count: u32,
}

impl Thresholds {
    pub fn new(
        degrade_tolerance: u64,
        error_tolerance: u64,
        fail_interval_count: u32,
    ) -> MonitorResult<Self> {
        if degrade_tolerance >= error_tolerance {
            return Err(MonitorError::invalid_config(
                "degrade_tolerance",
                format!(
                    "degrade tolerance {} must be below error tolerance {}",
                    degrade_tolerance, error_tolerance
                ),
            ));
        }
        if fail_interval_count < 1 {
            return Err(MonitorError::invalid_config(
                "fail_interval_count",
                "at least one interval is required to confirm a failure",
            ));
        }
        Ok(Self {
            degrade_tolerance,
            error_tolerance,
            fail_interval_count,
        })
    }

    pub fn degrade_tolerance(&self) -> u64 {
        self.degrade_tolerance
    }

    pub fn error_tolerance(&self) -> u64 {
        self.error_tolerance
    }

    pub fn fail_interval_count(&self) -> u32 {
        self.fail_interval_count
    }
}
