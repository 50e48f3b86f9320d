#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::calculator::DEFAULT_MAX_CONCURRENT_SEARCHES;
use crate::core::optimizer::DEFAULT_MAX_TABLE_ENTRIES;
use crate::core::PackageSize;
use crate::utils::error::{CalcError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_positive_number, validate_range,
    Validate,
};
use toml_config::TomlConfig;

/// Searches beyond this would each hold a table of up to
/// `max_table_entries`; keep the product within memory.
pub const MAX_CONCURRENT_SEARCHES: usize = 256;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Resolved server configuration: defaults, then the file, then CLI/env.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub json_logs: bool,
    pub default_packages: Vec<i64>,
    pub max_table_entries: usize,
    pub max_concurrent_searches: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            json_logs: false,
            default_packages: Vec::new(),
            max_table_entries: DEFAULT_MAX_TABLE_ENTRIES,
            max_concurrent_searches: DEFAULT_MAX_CONCURRENT_SEARCHES,
        }
    }
}

impl ServerSettings {
    pub fn merge_file(mut self, file: &TomlConfig) -> Self {
        if let Some(host) = file.host() {
            self.host = host.to_string();
        }
        if let Some(port) = file.port() {
            self.port = port;
        }
        if let Some(level) = file.log_level() {
            self.log_level = level.to_lowercase();
        }
        if let Some(json) = file.json_logs() {
            self.json_logs = json;
        }
        if let Some(packages) = file.default_packages() {
            self.default_packages = packages.to_vec();
        }
        if let Some(limit) = file.max_table_entries() {
            self.max_table_entries = limit;
        }
        if let Some(searches) = file.max_concurrent_searches() {
            self.max_concurrent_searches = searches;
        }
        self
    }
}

impl Validate for ServerSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("server.host", &self.host)?;
        validate_positive_number("server.port", u64::from(self.port), 1)?;
        validate_one_of("logging.level", &self.log_level, &LOG_LEVELS)?;
        validate_range(
            "optimizer.max_table_entries",
            self.max_table_entries as u64,
            1,
            u64::from(u32::MAX),
        )?;
        validate_range(
            "optimizer.max_concurrent_searches",
            self.max_concurrent_searches,
            1,
            MAX_CONCURRENT_SEARCHES,
        )?;

        for size in &self.default_packages {
            PackageSize::new(*size).map_err(|_| CalcError::InvalidConfigValueError {
                field: "catalog.default_packages".to_string(),
                value: size.to_string(),
                reason: "Package sizes must be positive integers".to_string(),
            })?;
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
