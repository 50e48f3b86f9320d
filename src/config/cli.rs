use crate::config::ServerSettings;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "pack-calc")]
#[command(about = "Package size catalog and order fulfillment calculator")]
pub struct CliConfig {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// trace, debug, info, warn or error
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Package sizes loaded at startup, comma separated
    #[arg(long, env = "PACKAGES", value_delimiter = ',', allow_negative_numbers = true)]
    pub packages: Option<Vec<i64>>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Largest optimizer table a single calculation may allocate
    #[arg(long)]
    pub max_table_entries: Option<usize>,

    /// Calculations allowed to search at the same time
    #[arg(long)]
    pub max_concurrent_searches: Option<usize>,
}

impl CliConfig {
    /// Flags and environment variables win over the file.
    pub fn apply(&self, mut settings: ServerSettings) -> ServerSettings {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.port = port;
        }
        if let Some(level) = &self.log_level {
            settings.log_level = level.to_lowercase();
        }
        if self.verbose {
            settings.log_level = "debug".to_string();
        }
        if self.json_logs {
            settings.json_logs = true;
        }
        if let Some(packages) = &self.packages {
            settings.default_packages = packages.clone();
        }
        if let Some(limit) = self.max_table_entries {
            settings.max_table_entries = limit;
        }
        if let Some(searches) = self.max_concurrent_searches {
            settings.max_concurrent_searches = searches;
        }
        settings
    }
}
