// Standard library
use std::collections::HashMap;
use std::error::Error;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

// Project imports
use resource_checker::aggregator::Aggregator;
use resource_checker::checker::{CheckOutcome, ResourceChecker, ResourceDescriptor};
use resource_checker::notifier::SlackNotifier;
use resource_checker::server::{self, AppState};
use resource_checker::settings::{ConfigManager, Settings};

/// Exit status of a one-shot check whose resource is unhealthy.
const EXIT_UNHEALTHY: u8 = 2;
/// Exit status for usage and configuration problems.
const EXIT_MISCONFIGURED: u8 = 1;

#[derive(Debug, Parser)]
#[command(name = "resource-checker", version, about = "Res0urce Checker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check one resource and exit with its status.
    Check {
        /// Resource url (eg: tcp://localhost:1234)
        #[arg(long)]
        url: String,
        /// Timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Serve /check and /healthcheck (default).
    Server {
        /// Server address
        #[arg(long)]
        addr: Option<SocketAddr>,
        /// Timeout in seconds for every resource
        #[arg(long)]
        timeout: Option<u64>,
    },
}

/// Entry point of the resource checker.
///
/// `check` probes one resource and exits 0 when it is healthy, 2 when it is
/// not and 1 when the url or the configuration is unusable. `server` (the
/// default) answers health requests until Ctrl+C.
#[tokio::main]
async fn main() -> ExitCode {
    // loads the .env file from the current directory or parents.
    dotenvy::dotenv_override().ok();

    let cli: Cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print().ok();
            return ExitCode::from(usage_exit_status(e.kind()));
        }
    };

    let env: HashMap<String, String> = std::env::vars().collect();
    let config: ConfigManager = match ConfigManager::new(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to initialize configuration: {}", e);
            return ExitCode::from(EXIT_MISCONFIGURED);
        }
    };

    if let Err(e) = init_logging(&config.get_log_level()) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::from(EXIT_MISCONFIGURED);
    }

    info!("Res0urce Checker {}", env!("CARGO_PKG_VERSION"));

    let settings: &Settings = config.get_settings();
    let command: Command = cli.command.unwrap_or(Command::Server {
        addr: None,
        timeout: None,
    });

    match command {
        Command::Check { url, timeout } => match resolve_timeout(settings, timeout) {
            Ok(timeout) => ExitCode::from(run_check(settings, &url, timeout).await),
            Err(e) => {
                error!("{}", e);
                ExitCode::from(EXIT_MISCONFIGURED)
            }
        },
        Command::Server { addr, timeout } => {
            let result = match resolve_timeout(settings, timeout) {
                Ok(timeout) => run_server(settings, addr, timeout).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    info!("Shutdown complete.");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("Application error: {}", e);
                    ExitCode::from(EXIT_MISCONFIGURED)
                }
            }
        }
    }
}

fn init_logging(log_level: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::ERROR.into())
        .parse_lossy(log_level)
        .add_directive("hyper_util=error".parse()?)
        .add_directive("reqwest=error".parse()?)
        .add_directive("hyper=error".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .try_init()
}

/// Help and version requests succeed; every other parse failure is a usage
/// error and must not look like an unhealthy resource.
fn usage_exit_status(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => EXIT_MISCONFIGURED,
    }
}

fn exit_status(outcome: &CheckOutcome) -> u8 {
    if outcome.healthy {
        0
    } else {
        EXIT_UNHEALTHY
    }
}

/// The command line timeout wins over the configured one.
fn resolve_timeout(settings: &Settings, seconds: Option<u64>) -> Result<Duration, Box<dyn Error>> {
    match seconds {
        Some(0) => Err("Timeout must be greater than 0".into()),
        Some(seconds) => Ok(Duration::from_secs(seconds)),
        None => Ok(settings.timeout()),
    }
}

/// Checks one resource and returns the process exit status.
async fn run_check(settings: &Settings, url: &str, timeout: Duration) -> u8 {
    let descriptor: ResourceDescriptor = match ResourceDescriptor::parse(url) {
        Ok(descriptor) => descriptor,
        Err(e) => {
            error!("{}", e);
            return EXIT_MISCONFIGURED;
        }
    };

    info!(
        "Connecting to: {}://{} (timeout: {}s)",
        descriptor.scheme(),
        descriptor.port().map_or_else(
            || descriptor.host().to_string(),
            |port| format!("{}:{}", descriptor.host(), port)
        ),
        timeout.as_secs()
    );

    let checker: ResourceChecker = ResourceChecker::new(settings.checker_options(false));
    let outcome: CheckOutcome = checker.check(&descriptor, timeout).await;

    match &outcome.detail {
        None => info!("Connection successfully"),
        Some(detail) => error!("{}", detail),
    }
    exit_status(&outcome)
}

async fn run_server(
    settings: &Settings,
    addr: Option<SocketAddr>,
    timeout: Duration,
) -> Result<(), Box<dyn Error>> {
    let address: SocketAddr = match addr {
        Some(address) => address,
        None => settings.listen_address()?,
    };

    let resources: Vec<ResourceDescriptor> = settings.resource_descriptors()?;
    info!(
        "Resources: [{}]",
        resources
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let checker: ResourceChecker = ResourceChecker::new(settings.checker_options(true));
    let mut aggregator: Aggregator =
        Aggregator::new(checker.clone(), resources, settings.failure_policy());
    if let Some(webhook_url) = settings.slack_webhook_url()? {
        info!("Slack notifications enabled");
        aggregator = aggregator.with_notifier(Arc::new(SlackNotifier::new(webhook_url)));
    }

    let state = AppState {
        checker: Arc::new(checker),
        aggregator: Arc::new(aggregator),
        auth_token: Arc::from(settings.server.auth_token.as_str()),
        timeout,
    };

    server::serve(address, state).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use super::*;

    fn settings() -> Settings {
        ConfigManager::load_settings(None, &HashMap::new()).unwrap()
    }

    #[test]
    fn usage_errors_are_misconfiguration() {
        let missing_url = Cli::try_parse_from(["resource-checker", "check"]).unwrap_err();
        assert_eq!(usage_exit_status(missing_url.kind()), EXIT_MISCONFIGURED);

        let bad_timeout = Cli::try_parse_from([
            "resource-checker",
            "check",
            "--url",
            "tcp://db:5432",
            "--timeout",
            "abc",
        ])
        .unwrap_err();
        assert_eq!(usage_exit_status(bad_timeout.kind()), EXIT_MISCONFIGURED);
        assert_ne!(EXIT_MISCONFIGURED, EXIT_UNHEALTHY);
    }

    #[test]
    fn help_and_version_exit_cleanly() {
        let help = Cli::try_parse_from(["resource-checker", "--help"]).unwrap_err();
        assert_eq!(usage_exit_status(help.kind()), 0);

        let version = Cli::try_parse_from(["resource-checker", "--version"]).unwrap_err();
        assert_eq!(usage_exit_status(version.kind()), 0);
    }

    #[test]
    fn no_subcommand_parses() {
        let cli = Cli::try_parse_from(["resource-checker"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn outcome_maps_to_exit_status() {
        assert_eq!(exit_status(&CheckOutcome::healthy()), 0);
        assert_eq!(exit_status(&CheckOutcome::unhealthy("down")), EXIT_UNHEALTHY);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let settings = settings();

        assert!(resolve_timeout(&settings, Some(0)).is_err());
        assert_eq!(
            resolve_timeout(&settings, Some(5)).unwrap(),
            Duration::from_secs(5)
        );
        assert_eq!(
            resolve_timeout(&settings, None).unwrap(),
            Duration::from_secs(30)
        );
    }

    #[tokio::test]
    async fn check_command_exit_statuses() {
        let settings = settings();
        let timeout = Duration::from_secs(2);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("tcp://{}", listener.local_addr().unwrap());

        assert_eq!(run_check(&settings, &url, timeout).await, 0);

        drop(listener);
        assert_eq!(run_check(&settings, &url, timeout).await, EXIT_UNHEALTHY);

        assert_eq!(
            run_check(&settings, "not a url", timeout).await,
            EXIT_MISCONFIGURED
        );
    }
}
