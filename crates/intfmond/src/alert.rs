//! Alert sinks and the action dispatcher.
//!
//! Maps a classification to its observable effects: a structured log
//! record (always), an optional email notification, and on a confirmed
//! failure the administrative shutdown of the interface. Sink delivery is
//! best-effort and isolated per sink; a failing mail pipeline never costs
//! the log record or aborts the poll loop.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::agent::CounterSource;
use crate::error::{MonitorError, MonitorResult};
use crate::evaluator::Evaluation;
use crate::shell::{self, shellquote, ECHO_CMD, MAIL_CMD};
use crate::types::{Classification, ErrorClass, Thresholds};

/// Target used for alert log records so they can be routed like syslog.
pub const ALERT_LOG_TARGET: &str = "intfmond::alert";

/// Destination for alert messages.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Sink name used when reporting delivery failures.
    fn name(&self) -> &'static str;

    /// Delivers one alert message. Must not block indefinitely.
    async fn deliver(&self, message: &str) -> MonitorResult<()>;
}

/// Always-on sink writing a structured log record per alert.
pub struct LogSink;

#[async_trait]
impl AlertSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, message: &str) -> MonitorResult<()> {
        warn!(target: ALERT_LOG_TARGET, "{}", message);
        Ok(())
    }
}

/// Optional sink piping the alert body to the system mail utility.
/// The subject line is the first token of the message.
pub struct EmailSink {
    recipient: String,
}

impl EmailSink {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }
}

/// Extracts the email subject from an alert message: its first token.
pub fn email_subject(message: &str) -> &str {
    message.split_whitespace().next().unwrap_or("INTFMON")
}

#[async_trait]
impl AlertSink for EmailSink {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn deliver(&self, message: &str) -> MonitorResult<()> {
        let subject = email_subject(message);
        let cmd = format!(
            "{} {} | {} -s {} {}",
            ECHO_CMD,
            shellquote(message),
            MAIL_CMD,
            shellquote(subject),
            shellquote(&self.recipient)
        );
        shell::exec_or_throw(&cmd)
            .await
            .map(|_| ())
            .map_err(|e| MonitorError::alert_delivery("email", e.to_string()))
    }
}

/// What one dispatch produced, for the monitor's statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Alert messages emitted (to all sinks).
    pub alerts_emitted: u64,
    /// True when the interface was administratively disabled this cycle.
    pub interface_disabled: bool,
}

/// Turns evaluations into alerts and, on a confirmed failure, the disable
/// command.
pub struct ActionDispatcher {
    thresholds: Thresholds,
    sinks: Vec<Box<dyn AlertSink>>,
}

impl ActionDispatcher {
    /// Creates a dispatcher with the always-on log sink.
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            sinks: vec![Box::new(LogSink)],
        }
    }

    /// Adds the email sink for the given recipient.
    pub fn with_email(mut self, recipient: impl Into<String>) -> Self {
        self.sinks.push(Box::new(EmailSink::new(recipient)));
        self
    }

    /// Adds an arbitrary sink.
    pub fn push_sink(&mut self, sink: Box<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    /// Delivers one message to every sink, isolating failures per sink.
    async fn send_alert(&self, message: &str) {
        for sink in &self.sinks {
            if let Err(e) = sink.deliver(message).await {
                warn!(sink = sink.name(), error = %e, "Alert delivery failed");
            }
        }
    }

    /// Applies the effects for one evaluated observation.
    pub async fn dispatch(
        &self,
        source: &dyn CounterSource,
        interface: &str,
        class: ErrorClass,
        old_base: u64,
        observed: u64,
        evaluation: &Evaluation,
    ) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        match evaluation.classification {
            Classification::Baseline | Classification::Ok => {}
            Classification::Cleared => {
                // Silent baseline reset; trace only.
                debug!(
                    interface = interface,
                    class = class.as_str(),
                    old_base = old_base,
                    observed = observed,
                    "Counters cleared, baseline re-seeded"
                );
            }
            Classification::Degraded => {
                self.send_alert(&format!(
                    "INTFMON-DEGRADED: {} {} errors increased from {} to {}",
                    interface,
                    class.as_str(),
                    old_base,
                    observed
                ))
                .await;
                summary.alerts_emitted += 1;
            }
            Classification::Error => {
                self.send_alert(&format!(
                    "INTFMON-ERROR: {} {} errors increased from {} to {}",
                    interface,
                    class.as_str(),
                    old_base,
                    observed
                ))
                .await;
                summary.alerts_emitted += 1;
            }
        }

        if evaluation.confirmed_failure {
            self.send_alert(&format!(
                "INTFMON-FAILURE: {} {} errors exceeded tolerance for {} consecutive intervals, disabling interface",
                interface,
                class.as_str(),
                self.thresholds.fail_interval_count()
            ))
            .await;
            summary.alerts_emitted += 1;

            match source.disable_interface(interface).await {
                Ok(()) => {
                    summary.interface_disabled = true;
                }
                Err(e) => {
                    self.send_alert(&format!(
                        "INTFMON-DISABLE-FAILED: {} administrative shutdown failed: {}",
                        interface, e
                    ))
                    .await;
                    summary.alerts_emitted += 1;
                }
            }
        }

        summary
    }
}
