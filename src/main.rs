use clap::Parser;
use pack_calc::utils::error::{CalcError, ErrorSeverity};
use pack_calc::utils::{logger, validation::Validate};
use pack_calc::{
    router, serve, AppState, CliConfig, InMemoryCatalog, Optimizer, PackCalculator,
    ServerSettings, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let file = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let mut settings = ServerSettings::default();
    if let Some(file) = &file {
        settings = settings.merge_file(file);
    }
    let settings = cli.apply(settings);

    logger::init_cli_logger(&settings.log_level, settings.json_logs);

    tracing::info!("Starting pack-calc");
    tracing::debug!("Resolved settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    if let Err(e) = run(settings).await {
        tracing::error!(
            "❌ Server failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(exit_code(&e));
    }

    Ok(())
}

async fn run(settings: ServerSettings) -> pack_calc::Result<()> {
    let catalog = InMemoryCatalog::with_sizes(settings.default_packages.iter().copied())?;
    tracing::info!("Catalog seeded with {} package sizes", catalog.len());

    let calculator = PackCalculator::with_optimizer(
        catalog,
        Optimizer::with_max_table_entries(settings.max_table_entries),
    )
    .with_search_limit(settings.max_concurrent_searches);
    let app = router(AppState::new(calculator));

    let listener = tokio::net::TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    serve(listener, app, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn exit_code(e: &CalcError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
