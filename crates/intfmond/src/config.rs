//! Deploy-time constants and monitor configuration.
//!
//! Thresholds, the poll interval, and the mail recipient are fixed at
//! deploy time; the CLI only toggles verbosity and email alerting.

use std::time::Duration;

use crate::error::MonitorResult;
use crate::types::Thresholds;

/// Default unix socket path of the control-plane agent.
pub const DEFAULT_AGENT_SOCKET: &str = "/var/run/sonic/intfmon-agent.sock";

/// Seconds between poll cycles.
pub const POLL_INTERVAL_SECS: u64 = 5;

/// Counter growth per interval tolerated before a degradation alert.
pub const DEGRADE_TOLERANCE: u64 = 100;

/// Counter growth per interval tolerated before an error alert.
pub const ERROR_TOLERANCE: u64 = 200;

/// Consecutive error intervals before the interface is disabled.
pub const FAIL_INTERVAL_COUNT: u32 = 3;

/// Recipient of email alerts when `--email` is given.
pub const EMAIL_RECIPIENT: &str = "admin@localhost";

/// Runtime configuration of the monitor.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    pub thresholds: Thresholds,
}

impl MonitorConfig {
    /// Builds the configuration from the compiled-in constants.
    pub fn from_defaults() -> MonitorResult<Self> {
        Ok(Self {
            poll_interval: Duration::from_secs(POLL_INTERVAL_SECS),
            thresholds: Thresholds::new(DEGRADE_TOLERANCE, ERROR_TOLERANCE, FAIL_INTERVAL_COUNT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MonitorConfig::from_defaults().unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.thresholds.degrade_tolerance(), 100);
        assert_eq!(config.thresholds.error_tolerance(), 200);
        assert_eq!(config.thresholds.fail_interval_count(), 3);
    }
}
