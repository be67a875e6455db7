//! Poll loop orchestration.
//!
//! Drives the steady-state cycle: fetch the connected set and its error
//! counters, evaluate every (interface, class) pair, apply the resulting
//! actions, persist the new state, prune departed interfaces, sleep,
//! repeat until the process is terminated.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::agent::CounterSource;
use crate::alert::ActionDispatcher;
use crate::config::MonitorConfig;
use crate::error::MonitorResult;
use crate::evaluator::evaluate;
use crate::state::InterfaceStateStore;
use crate::types::ErrorClass;

/// Running counters for the monitor.
#[derive(Debug, Clone, Default)]
pub struct MonitorStats {
    /// Completed poll cycles.
    pub cycles: u64,
    /// Alert messages emitted across all sinks.
    pub alerts_emitted: u64,
    /// Interfaces administratively disabled.
    pub interfaces_disabled: u64,
    /// Poll cycles abandoned because a fetch failed.
    pub fetch_failures: u64,
    /// Interfaces pruned after leaving the connected set.
    pub interfaces_pruned: u64,
}

/// The interface health monitor.
pub struct InterfaceMonitor {
    config: MonitorConfig,
    source: Arc<dyn CounterSource>,
    dispatcher: ActionDispatcher,
    store: InterfaceStateStore,
    stats: MonitorStats,
}

impl InterfaceMonitor {
    pub fn new(
        config: MonitorConfig,
        source: Arc<dyn CounterSource>,
        dispatcher: ActionDispatcher,
    ) -> Self {
        Self {
            config,
            source,
            dispatcher,
            store: InterfaceStateStore::new(),
            stats: MonitorStats::default(),
        }
    }

    pub fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    pub fn store(&self) -> &InterfaceStateStore {
        &self.store
    }

    /// Runs one poll cycle. A fetch failure propagates with the store
    /// untouched, so the caller can retry at the next interval.
    pub async fn poll_once(&mut self) -> MonitorResult<()> {
        let connected = self.source.list_connected_interfaces().await?;
        let counters = self.source.read_error_counters(&connected).await?;

        for name in &connected {
            let Some(observed) = counters.get(name) else {
                // Connected but not recognized by the agent this cycle.
                debug!(interface = %name, "No counters reported, skipping");
                continue;
            };

            for class in ErrorClass::ALL {
                let prior = self.store.get(name, class);
                let value = observed.get(class);
                let old_base = prior.map(|s| s.base).unwrap_or(value);

                let evaluation = evaluate(prior, value, &self.config.thresholds);
                debug!(
                    interface = %name,
                    class = class.as_str(),
                    observed = value,
                    classification = evaluation.classification.as_str(),
                    consecutive_failures = evaluation.next.consecutive_failures,
                    "Evaluated counters"
                );

                let summary = self
                    .dispatcher
                    .dispatch(
                        self.source.as_ref(),
                        name,
                        class,
                        old_base,
                        value,
                        &evaluation,
                    )
                    .await;
                self.stats.alerts_emitted += summary.alerts_emitted;
                if summary.interface_disabled {
                    self.stats.interfaces_disabled += 1;
                }

                self.store.set(name, class, evaluation.next);
            }
        }

        let pruned = self.store.retain_connected(&connected);
        for name in &pruned {
            info!(interface = %name, "Interface disconnected, tracking state dropped");
        }
        self.stats.interfaces_pruned += pruned.len() as u64;

        self.stats.cycles += 1;
        Ok(())
    }

    /// Runs poll cycles forever. Fetch failures are absorbed and retried
    /// at the next interval; only process termination ends the loop.
    pub async fn run(&mut self) {
        info!(
            interval_secs = self.config.poll_interval.as_secs(),
            "Entering poll loop"
        );
        loop {
            if let Err(e) = self.poll_once().await {
                self.stats.fetch_failures += 1;
                warn!(error = %e, "Poll cycle failed, retrying at next interval");
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}
