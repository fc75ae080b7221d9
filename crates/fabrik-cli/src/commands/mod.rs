//! CLI command implementations

pub mod catalog;
pub mod crds;
pub mod manifest;
pub mod name;
pub mod platform;
pub mod schedule;

use crate::config::FabrikConfig;
use crate::error::{CliError, CliResult};
use fabrik_apiserver::{CatalogSynchronizer, HttpApiServer};
use fabrik_types::Catalog;
use std::sync::Arc;

/// Synchronizer bound to the configured API server
pub(crate) fn synchronizer(config: &FabrikConfig, catalog: Catalog) -> CliResult<CatalogSynchronizer> {
    let client = HttpApiServer::new(&config.apiserver)?;
    Ok(CatalogSynchronizer::new(
        Arc::new(client),
        catalog,
        config.apiserver.namespace.clone(),
    ))
}

/// Load the catalog from `file`, falling back to the configured path
pub(crate) fn load_catalog(config: &FabrikConfig, file: Option<&str>) -> CliResult<Catalog> {
    let path = file
        .or(config.catalog.path.as_deref())
        .ok_or_else(|| CliError::Config("no catalog file given and catalog.path is not set".into()))?;
    Ok(Catalog::load(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_catalog_requires_a_path() {
        let err = load_catalog(&FabrikConfig::default(), None).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_load_catalog_prefers_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "services:\n  - id: s1\n    name: blueprint\n    plans:\n      - id: p1\n        name: small").unwrap();

        let mut config = FabrikConfig::default();
        config.catalog.path = Some("/nonexistent/catalog.yaml".into());

        let catalog = load_catalog(&config, file.path().to_str()).unwrap();
        assert_eq!(catalog.entry_count(), 2);
        assert_eq!(catalog.services[0].plans[0].service_id, "s1");
    }

    #[test]
    fn test_synchronizer_uses_configured_namespace() {
        let mut config = FabrikConfig::default();
        config.apiserver.namespace = "fabrik".into();
        let sync = synchronizer(&config, Catalog::default()).unwrap();
        assert_eq!(sync.namespace(), "fabrik");
    }
}
