pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "server")]
pub mod server;
pub mod utils;

pub use adapters::{GbifClient, LocalStorage, PlantNetClient};
#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;
pub use self::core::{
    engine::IdentificationEngine, reference::ReferenceTables, resolver::TaxonomyResolver,
};
pub use utils::error::{PlantError, Result};

use domain::ports::ConfigProvider;
use std::sync::Arc;

/// Engine wired to the Pl@ntNet and GBIF clients described by `config`.
pub fn engine_from_config<C: ConfigProvider>(
    config: &C,
    references: ReferenceTables,
) -> IdentificationEngine<PlantNetClient, GbifClient> {
    let resolver = TaxonomyResolver::with_occurrence_limit(
        GbifClient::from_config(config),
        config.occurrence_limit(),
    );
    IdentificationEngine::new(
        PlantNetClient::from_config(config),
        resolver,
        Arc::new(references),
    )
}
