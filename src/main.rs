use br_indicators::utils::{logger, validation::Validate};
use br_indicators::{AppConfig, CliArgs, EtlEngine, EtlError};
use clap::Parser;

fn load_config(args: &CliArgs) -> Result<AppConfig, EtlError> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            AppConfig::from_file(path)?
        }
        None => AppConfig::default(),
    };
    args.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

fn report_failure(e: &EtlError) -> ! {
    tracing::error!(
        "Run failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ An error occurred: {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    if std::env::var("BR_INDICATORS_LOG_FORMAT").as_deref() == Ok("json") {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting br-indicators");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    let config = load_config(&args).unwrap_or_else(|e| report_failure(&e));
    tracing::debug!(
        "Reference year {}, retry {:?}",
        config.reference_year(),
        config.retry_policy()
    );

    let engine = EtlEngine::from_config(&config).unwrap_or_else(|e| report_failure(&e));

    match engine.run().await {
        Ok(report) => {
            println!(
                "✅ All indicator data fetched and saved successfully ({} files).",
                report.csv_files.len()
            );
            if !report.table_files.is_empty() {
                println!(
                    "All indicator tables saved as SVG files ({} files).",
                    report.table_files.len()
                );
            }
            if !report.empty_indicators.is_empty() {
                tracing::warn!("No data for: {}", report.empty_indicators.join(", "));
                println!("No data for: {}", report.empty_indicators.join(", "));
            }
        }
        Err(e) => report_failure(&e),
    }
}
