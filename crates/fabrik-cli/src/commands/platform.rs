//! Platform resolution commands

use crate::error::CliResult;
use crate::output::{self, OutputFormat};
use clap::Subcommand;
use fabrik_fleet::{platform_from_context, platform_manager};
use fabrik_types::PlatformContext;
use serde::Serialize;

#[derive(Subcommand)]
pub enum PlatformCommands {
    /// Resolve the platform of a request context
    Resolve {
        /// Platform id as sent by the caller (e.g. cloudfoundry, kubernetes, sapcp)
        platform: String,

        /// Originating platform, for delegated requests
        #[arg(long)]
        origin: Option<String>,

        /// Cloud Foundry organization guid
        #[arg(long)]
        org: Option<String>,

        /// Cloud Foundry space guid
        #[arg(long)]
        space: Option<String>,

        /// Kubernetes namespace
        #[arg(long)]
        namespace: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct Resolution {
    platform: String,
    kind: String,
    resource_type: &'static str,
    delegating: bool,
    quota_key: String,
}

pub fn execute(command: PlatformCommands, format: OutputFormat) -> CliResult<()> {
    match command {
        PlatformCommands::Resolve {
            platform,
            origin,
            org,
            space,
            namespace,
        } => {
            let context = PlatformContext {
                platform,
                origin,
                organization_guid: org,
                space_guid: space,
                namespace,
            };
            let manager = platform_manager(&context)?;
            let resolution = Resolution {
                platform: platform_from_context(&context).to_string(),
                kind: manager.kind().to_string(),
                resource_type: manager.resource_type(),
                delegating: manager.is_delegating(),
                quota_key: manager.quota_key(&context)?,
            };
            output::print_single(&resolution, format)
        }
    }
}
