//! Catalog commands

use super::{load_catalog, synchronizer};
use crate::config::FabrikConfig;
use crate::error::CliResult;
use crate::output::{self, print_success, OutputFormat};
use clap::Subcommand;
use fabrik_types::{Catalog, CatalogEntry, PlanSpec, ServiceSpec};
use serde::Serialize;
use tabled::Tabled;

/// Catalog subcommands
#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Push the local catalog to the API server
    Push {
        /// Catalog file (YAML or JSON), overrides catalog.path
        #[arg(short, long)]
        file: Option<String>,
    },

    /// List services stored in the API server
    Services,

    /// List stored plans of a service
    Plans {
        /// Service ID
        service_id: String,
    },
}

/// Table row for catalog display
#[derive(Debug, Serialize, Tabled)]
struct CatalogRow {
    /// Entry type
    #[tabled(rename = "type")]
    kind: String,
    id: String,
    name: String,
    /// Owning service, for plans
    service: String,
}

impl From<ServiceSpec> for CatalogRow {
    fn from(service: ServiceSpec) -> Self {
        Self {
            kind: "service".into(),
            id: service.id,
            name: service.name,
            service: String::new(),
        }
    }
}

impl From<PlanSpec> for CatalogRow {
    fn from(plan: PlanSpec) -> Self {
        Self {
            kind: "plan".into(),
            id: plan.id,
            name: plan.name,
            service: plan.service_id,
        }
    }
}

impl From<CatalogEntry> for CatalogRow {
    fn from(entry: CatalogEntry) -> Self {
        match entry {
            CatalogEntry::Service(s) => s.into(),
            CatalogEntry::Plan(p) => p.into(),
        }
    }
}

/// Execute a catalog command
pub async fn execute(
    command: CatalogCommands,
    config: &FabrikConfig,
    format: OutputFormat,
) -> CliResult<()> {
    match command {
        CatalogCommands::Push { file } => {
            let catalog = load_catalog(config, file.as_deref())?;
            let entries = synchronizer(config, catalog)?.push_service_plans().await?;
            let count = entries.len();
            output::print_output(entries.into_iter().map(CatalogRow::from).collect(), format)?;
            print_success(&format!(
                "Pushed {} catalog entries to namespace {}",
                count, config.apiserver.namespace
            ));
            Ok(())
        }

        CatalogCommands::Services => {
            let services = synchronizer(config, Catalog::default())?
                .get_all_services()
                .await?;
            output::print_output(services.into_iter().map(CatalogRow::from).collect(), format)
        }

        CatalogCommands::Plans { service_id } => {
            let plans = synchronizer(config, Catalog::default())?
                .get_all_plans_for_service(&service_id)
                .await?;
            output::print_output(plans.into_iter().map(CatalogRow::from).collect(), format)
        }
    }
}
