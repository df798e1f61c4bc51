//! # Nemesis Engine
//!
//! Front end for the Nemesis crafting advisor. This crate ties the
//! recommendation engine to the outside world:
//! - Catalog loading from TOML, with a built-in Archnemesis catalog
//! - Inventory and drop-queue persistence
//! - Configuration
//! - Commands, output formatting and the interactive session

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog_loader;
pub mod config;
pub mod output;
pub mod session;
pub mod store;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog_loader::*;
    pub use crate::config::*;
    pub use crate::output::*;
    pub use crate::session::*;
    pub use crate::store::*;
}

pub use prelude::*;

use nemesis_advisor::catalog::Catalog;
use tracing::info;

/// Loads the catalog named by the config, or the built-in one.
pub fn load_catalog(config: &AdvisorConfig) -> CatalogLoadResult<Catalog> {
    match &config.catalog_path {
        Some(path) => CatalogLoader::new(path).load(),
        None => {
            let catalog = builtin_catalog()?;
            info!("Using built-in catalog with {} items", catalog.len());
            Ok(catalog)
        },
    }
}

/// Opens a session over the configured catalog and data directory.
pub fn open_session(config: &AdvisorConfig, format: OutputFormat) -> anyhow::Result<Session> {
    let catalog = load_catalog(config)?;
    let store = InventoryStore::new(&config.data_dir);
    let advisor = store.load_advisor(catalog)?;

    Ok(Session::new(advisor, Some(store))
        .with_auto_save(config.auto_save)
        .with_show_counts(config.show_counts)
        .with_format(format))
}
