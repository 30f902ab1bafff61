use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use poll_agent::config::{AgentConfig, DEFAULT_SERVER_URL};
use poll_agent::session::Session;
use poll_agent::shutdown::install_shutdown_handler;
use poll_agent::transport::HttpTransport;
use poll_agent::worker::TaskExecutor;

#[derive(Parser, Debug)]
#[command(name = "poll-agent")]
#[command(version)]
#[command(about = "Polls a coordinator for shell commands, runs them, and reports the output")]
struct Args {
    /// Coordinator base URL
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    /// Seconds to wait between heartbeats
    #[arg(long, default_value = "5")]
    poll_interval_secs: u64,

    /// Timeout for each request to the coordinator, in seconds
    #[arg(long, default_value = "30")]
    request_timeout_secs: u64,

    /// Response buffer size in bytes for register and heartbeat calls
    #[arg(long, default_value = "128")]
    response_limit: usize,

    /// Shell used to run commands
    #[arg(long, default_value = "sh")]
    shell: String,
}

/// HTTP client could not be built
const EXIT_CLIENT_INIT: u8 = 1;
/// Registration with the coordinator failed
const EXIT_REGISTRATION: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AgentConfig::new(args.server_url)
        .with_poll_interval(Duration::from_secs(args.poll_interval_secs))
        .with_request_timeout(Duration::from_secs(args.request_timeout_secs))
        .with_response_limit(args.response_limit)
        .with_shell(args.shell);

    let shutdown = match install_shutdown_handler() {
        Ok(token) => token,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install signal handlers");
            return ExitCode::FAILURE;
        }
    };

    let transport = match HttpTransport::new(&config) {
        Ok(transport) => transport,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize HTTP client");
            return ExitCode::from(EXIT_CLIENT_INIT);
        }
    };

    tracing::info!(
        server_url = %config.server_url,
        poll_interval = ?config.poll_interval,
        shell = %config.executor.shell,
        "Starting poll-agent"
    );

    let executor = TaskExecutor::new(config.executor.clone());
    let session = match Session::register(transport, executor, config.poll_interval).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register with coordinator");
            return ExitCode::from(EXIT_REGISTRATION);
        }
    };

    session.run(shutdown).await;
    ExitCode::SUCCESS
}
