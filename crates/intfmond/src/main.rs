//! intfmond daemon entry point.
//!
//! Initializes logging, connects to the control-plane agent (fatal on
//! failure), and runs the poll loop until the process is terminated.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use sonic_intfmond::config::{DEFAULT_AGENT_SOCKET, EMAIL_RECIPIENT};
use sonic_intfmond::{ActionDispatcher, AgentClient, InterfaceMonitor, MonitorConfig};

/// SONiC interface error counter monitor
#[derive(Parser, Debug)]
#[command(name = "intfmond")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose tracing output
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Enable email alerting in addition to the log
    #[arg(short = 'e', long)]
    email: bool,

    /// Control-plane agent socket path
    #[arg(long, default_value = DEFAULT_AGENT_SOCKET)]
    agent_socket: PathBuf,
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose);

    info!("--- Starting intfmond (Rust) ---");

    let config = match MonitorConfig::from_defaults() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid monitor configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // The agent must be reachable before the poll loop is entered.
    let agent = match AgentClient::connect(&args.agent_socket).await {
        Ok(agent) => agent,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(endpoint = agent.endpoint(), "Control-plane agent connected");

    let mut dispatcher = ActionDispatcher::new(config.thresholds);
    if args.email {
        info!(recipient = EMAIL_RECIPIENT, "Email alerting enabled");
        dispatcher = dispatcher.with_email(EMAIL_RECIPIENT);
    }

    let mut monitor = InterfaceMonitor::new(config, Arc::new(agent), dispatcher);
    monitor.run().await;

    ExitCode::SUCCESS
}
