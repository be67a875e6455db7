//! Interface error counter monitor daemon for SONiC.
//!
//! This crate implements the `intfmond` daemon, which polls per-interface
//! error counters from the local control-plane agent, classifies their
//! growth against configured tolerances, alerts on degradation, and
//! administratively disables an interface whose error rate stays above the
//! error tolerance for several consecutive polling intervals.
//!
//! # Responsibilities
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`evaluator`] | Pure threshold classification of one observation |
//! | [`state`] | Per-interface base counters and failure streaks |
//! | [`agent`] | Counter source trait + control-plane agent client |
//! | [`alert`] | Log/email alert sinks and the action dispatcher |
//! | [`monitor`] | Poll loop: fetch, evaluate, act, prune, sleep |
//!
//! # Example
//!
//! ```ignore
//! use sonic_intfmond::{ActionDispatcher, AgentClient, InterfaceMonitor, MonitorConfig};
//!
//! let config = MonitorConfig::from_defaults()?;
//! let agent = AgentClient::connect(socket_path).await?;
//! let dispatcher = ActionDispatcher::new(config.thresholds);
//! let mut monitor = InterfaceMonitor::new(config, Arc::new(agent), dispatcher);
//! monitor.run().await;
//! ```

pub mod agent;
pub mod alert;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod monitor;
pub mod shell;
pub mod state;
pub mod types;

pub use agent::{AgentClient, CounterSource};
pub use alert::{ActionDispatcher, AlertSink, EmailSink, LogSink};
pub use config::MonitorConfig;
pub use error::{MonitorError, MonitorResult};
pub use evaluator::{evaluate, Evaluation};
pub use monitor::{InterfaceMonitor, MonitorStats};
pub use state::InterfaceStateStore;
pub use types::{Classification, CounterState, ErrorClass, ErrorCounters, Thresholds};
