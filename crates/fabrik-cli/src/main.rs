//! Fabrik CLI - Operator interface for fleet operations
//!
//! This CLI lets operators:
//! - Push the broker catalog and register resource definitions
//! - Generate randomized maintenance schedules
//! - Encode and decode deployment and task names
//! - Extract broker-agent credentials from manifests
//! - Resolve the platform behind a request context

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

use commands::{catalog, crds, manifest, name, platform, schedule};
use config::{FabrikConfig, LoggingConfig};
use error::CliResult;

/// Fabrik CLI application
#[derive(Parser)]
#[command(name = "fabrikctl")]
#[command(about = "Fabrik - fleet operations for the service broker", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "FABRIK_CONFIG")]
    config: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "json")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Catalog synchronization
    Catalog {
        #[command(subcommand)]
        command: catalog::CatalogCommands,
    },

    /// Resource definitions
    Crds {
        #[command(subcommand)]
        command: crds::CrdCommands,
    },

    /// Cron schedule generation
    Schedule {
        #[command(subcommand)]
        command: schedule::ScheduleCommands,
    },

    /// Deployment and task names
    Name {
        #[command(subcommand)]
        command: name::NameCommands,
    },

    /// Deployment manifests
    Manifest {
        #[command(subcommand)]
        command: manifest::ManifestCommands,
    },

    /// Platform resolution
    Platform {
        #[command(subcommand)]
        command: platform::PlatformCommands,
    },

    /// Show effective configuration
    Config,
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries command output
    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn run(cli: Cli, config: FabrikConfig) -> CliResult<()> {
    let format = cli.output;

    match cli.command {
        Commands::Catalog { command } => catalog::execute(command, &config, format).await,
        Commands::Crds { command } => crds::execute(command, &config).await,
        Commands::Schedule { command } => schedule::execute(command, format),
        Commands::Name { command } => name::execute(command, &config, format),
        Commands::Manifest { command } => manifest::execute(command, format),
        Commands::Platform { command } => platform::execute(command, format),
        Commands::Config => output::print_single(&config, format),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match FabrikConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            output::print_error(&format!("Cannot load configuration: {}", e));
            std::process::exit(2);
        }
    };
    init_tracing(&config.logging, cli.verbose);

    if let Err(e) = run(cli, config).await {
        tracing::debug!(error = ?e, "Command failed");
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_schedule_interval() {
        let cli = Cli::try_parse_from([
            "fabrikctl",
            "schedule",
            "interval",
            "8 hours",
            "--after-minutes",
            "90",
        ])
        .unwrap();
        match cli.command {
            Commands::Schedule {
                command:
                    schedule::ScheduleCommands::Interval {
                        interval,
                        after_minutes,
                    },
            } => {
                assert_eq!(interval, "8 hours");
                assert_eq!(after_minutes, Some(90));
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn test_parse_name_encode_rejects_bad_guid() {
        assert!(Cli::try_parse_from(["fabrikctl", "name", "encode", "1", "not-a-guid"]).is_err());
    }

    #[test]
    fn test_default_output_is_json() {
        let cli = Cli::try_parse_from(["fabrikctl", "config"]).unwrap();
        assert_eq!(cli.output, output::OutputFormat::Json);
    }
}
