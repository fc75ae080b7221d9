//! Deployment manifest commands

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use clap::Subcommand;
use fabrik_fleet::{broker_agent_creds_from_manifest, parse_manifest};
use serde::Serialize;

#[derive(Subcommand)]
pub enum ManifestCommands {
    /// Show broker-agent credentials found in a manifest
    Creds {
        /// Manifest file (YAML or JSON)
        file: String,

        /// Print the password in clear text
        #[arg(long)]
        reveal: bool,
    },
}

#[derive(Debug, Serialize)]
struct CredentialsView {
    username: String,
    password: String,
}

pub fn execute(command: ManifestCommands, format: OutputFormat) -> CliResult<()> {
    match command {
        ManifestCommands::Creds { file, reveal } => {
            let contents = std::fs::read_to_string(&file)?;
            let manifest = parse_manifest(&contents)?;
            let creds = broker_agent_creds_from_manifest(&manifest)?;

            let view = CredentialsView {
                username: creds.username,
                password: if reveal {
                    creds.password
                } else {
                    "********".to_string()
                },
            };
            output::print_single(&view, format)
        }
    }
}
