//! Error types for the interface monitor.
//!
//! All errors implement `std::error::Error` via `thiserror`. The evaluator
//! itself never fails; every variant here belongs to an I/O boundary
//! (agent transport, shell, alert sinks).

use std::io;
use thiserror::Error;

/// Result type alias for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Errors that can occur while monitoring interfaces.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Control-plane agent unreachable. Fatal at startup; the poll loop
    /// is never entered without a working connection.
    #[error("Failed to connect to control-plane agent at '{endpoint}': {message}")]
    Connection {
        /// The socket path or address that was dialed.
        endpoint: String,
        /// The underlying failure.
        message: String,
    },

    /// A single poll cycle's fetch from the agent failed.
    #[error("Fetch from control-plane agent failed: {operation}: {message}")]
    Fetch {
        /// The RPC that failed (e.g., "intf.list_connected").
        operation: String,
        /// Error message.
        message: String,
    },

    /// The agent rejected or failed an administrative disable.
    #[error("Administrative shutdown of '{interface}' failed: {message}")]
    DisableCommand {
        /// The interface the command targeted.
        interface: String,
        /// Error message.
        message: String,
    },

    /// An alert sink failed to deliver a message.
    #[error("Alert delivery via {sink} failed: {message}")]
    AlertDelivery {
        /// The sink name (e.g., "email").
        sink: String,
        /// Error message.
        message: String,
    },

    /// Failed to spawn a shell command.
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to spawn.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Shell command returned non-zero exit code.
    #[error("Shell command failed: '{command}' (exit code {exit_code}): {output}")]
    ShellCommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },
}

impl MonitorError {
    /// Creates a connection error.
    pub fn connection(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Creates a fetch error.
    pub fn fetch(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Creates a disable-command error.
    pub fn disable_command(interface: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DisableCommand {
            interface: interface.into(),
            message: message.into(),
        }
    }

    /// Creates an alert-delivery error.
    pub fn alert_delivery(sink: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AlertDelivery {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient condition that the
    /// poll loop should absorb and retry on the next interval.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MonitorError::Fetch { .. }
                | MonitorError::AlertDelivery { .. }
                | MonitorError::ShellCommandFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MonitorError::disable_command("Ethernet4", "agent returned busy");
        assert_eq!(
            err.to_string(),
            "Administrative shutdown of 'Ethernet4' failed: agent returned busy"
        );
    }

    #[test]
    fn test_fetch_error() {
        let err = MonitorError::fetch("intf.error_counters", "broken pipe");
        assert_eq!(
            err.to_string(),
            "Fetch from control-plane agent failed: intf.error_counters: broken pipe"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(MonitorError::fetch("intf.list_connected", "timeout").is_retryable());
        assert!(MonitorError::alert_delivery("email", "mail exited 1").is_retryable());
        assert!(!MonitorError::connection("/var/run/agent.sock", "refused").is_retryable());
        assert!(!MonitorError::invalid_config("thresholds", "bad").is_retryable());
    }
}
