//! Resource definition commands

use super::synchronizer;
use crate::config::FabrikConfig;
use crate::error::CliResult;
use crate::output::print_success;
use clap::Subcommand;
use fabrik_apiserver::REGISTERED_KINDS;
use fabrik_types::Catalog;

#[derive(Subcommand)]
pub enum CrdCommands {
    /// Register or update the broker's resource definitions
    Register,
}

pub async fn execute(command: CrdCommands, config: &FabrikConfig) -> CliResult<()> {
    match command {
        CrdCommands::Register => {
            synchronizer(config, Catalog::default())?.register_crds().await?;
            for kind in REGISTERED_KINDS.iter() {
                print_success(&format!("Registered {}", kind.crd_name()));
            }
            Ok(())
        }
    }
}
