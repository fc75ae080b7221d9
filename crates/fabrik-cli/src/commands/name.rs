//! Deployment and task name commands

use crate::config::FabrikConfig;
use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use fabrik_fleet::{decode_task_id, encode_task_id, DeploymentNameCodec};
use fabrik_types::TaskIdentity;
use uuid::Uuid;

/// Prefix and subnet overrides shared by the name commands
#[derive(Args)]
pub struct NamingArgs {
    /// Deployment prefix, overrides deployment.prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Subnet, overrides deployment.subnet
    #[arg(long)]
    subnet: Option<String>,
}

impl NamingArgs {
    fn codec(&self, config: &FabrikConfig) -> DeploymentNameCodec {
        let prefix = self
            .prefix
            .clone()
            .unwrap_or_else(|| config.deployment.prefix.clone());
        let subnet = self.subnet.as_deref().or(config.deployment.subnet.as_deref());
        DeploymentNameCodec::new(prefix, subnet)
    }
}

/// Name subcommands
#[derive(Subcommand)]
pub enum NameCommands {
    /// Build a deployment name
    Encode {
        /// Network segment index
        index: u32,

        /// Service instance id
        guid: Uuid,

        #[command(flatten)]
        naming: NamingArgs,
    },

    /// Split a deployment name into its parts
    Decode {
        /// Deployment name
        name: String,

        #[command(flatten)]
        naming: NamingArgs,
    },

    /// Build a task id, or split one when `--id` is omitted
    Task {
        /// Deployment name, or a full task id to decode
        value: String,

        /// Director task id
        #[arg(long)]
        id: Option<u64>,
    },
}

/// Execute a name command
pub fn execute(command: NameCommands, config: &FabrikConfig, format: OutputFormat) -> CliResult<()> {
    match command {
        NameCommands::Encode {
            index,
            guid,
            naming,
        } => {
            println!("{}", naming.codec(config).encode(index, &guid));
            Ok(())
        }

        NameCommands::Decode { name, naming } => {
            let decoded = naming.codec(config).decode(&name)?;
            output::print_single(&decoded, format)
        }

        NameCommands::Task { value, id: Some(id) } => {
            println!("{}", encode_task_id(&value, id));
            Ok(())
        }

        NameCommands::Task { value, id: None } => {
            let task: TaskIdentity = decode_task_id(&value)?;
            output::print_single(&task, format)
        }
    }
}
