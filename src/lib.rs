pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::http::{router, serve, AppState};
pub use config::{toml_config::TomlConfig, ServerSettings};
pub use crate::core::{
    calculator::PackCalculator, catalog::InMemoryCatalog, optimizer::Optimizer, CatalogStore,
};
pub use domain::model::{CatalogEntry, EntryId, FulfillmentPlan, PackageSize};
pub use utils::error::{CalcError, Result};
