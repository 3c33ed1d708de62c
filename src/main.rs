use clap::Parser;
use watch_stock_sync::config::env::load_sync_config;
use watch_stock_sync::core::report::write_report;
use watch_stock_sync::utils::error::ErrorSeverity;
use watch_stock_sync::utils::{logger, validation::Validate};
use watch_stock_sync::{
    CliArgs, LocalStorage, OzonClient, RemnantsFetcher, SyncEngine, SyncError, SyncOptions,
};

fn exit_code(e: &SyncError) -> i32 {
    match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn report_failure(e: &SyncError) {
    if e.is_timeout() {
        tracing::error!("⏱️ Timed out waiting for the server: {}", e);
    } else if e.is_connection() {
        tracing::error!("🔌 Connection error: {}", e);
    } else {
        tracing::error!(
            "❌ Sync failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
    }
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting watch-stock-sync");

    let config = match load_sync_config(args.config.as_deref()).and_then(|c| {
        c.validate()?;
        Ok(c)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    tracing::debug!("Config: {:?}", config);

    let catalog = OzonClient::new(&config)?;
    let remnants = RemnantsFetcher::new(&config)?;
    let options = SyncOptions::from_config(&config).with_dry_run(args.dry_run);
    let engine = SyncEngine::new(catalog, remnants, options);

    match engine.run().await {
        Ok(report) => {
            tracing::info!(
                "✅ Sync finished: {} stocks ({} in stock) in {} batches, {} prices in {} batches",
                report.stocks.len(),
                report.in_stock().count(),
                report.stock_batches,
                report.prices.len(),
                report.price_batches
            );

            if let Some(dir) = args.report_dir {
                let storage = LocalStorage::new(dir);
                for path in write_report(&storage, &report).await? {
                    tracing::info!("📁 Report saved to: {}", path);
                }
            }
        }
        Err(e) => {
            report_failure(&e);
            std::process::exit(exit_code(&e));
        }
    }

    Ok(())
}
