use clap::Parser;
use prospekt_crawler::cli::Cli;
use prospekt_crawler::config::CrawlerConfig;
use prospekt_crawler::outputs::json;
use std::error::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("prospekt_crawler starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let base_config = match &args.config {
        Some(path) => CrawlerConfig::from_yaml_file(path)?,
        None => CrawlerConfig::default(),
    };
    let config = args.apply(base_config);
    info!(base_url = %config.base_url, output = %config.output.display(), "Configuration ready");

    let output = prospekt_crawler::crawl(&config).await?;
    info!(count = output.records.len(), "Unique brochures found");

    if !json::save_results(&output.records, &config.output).await {
        warn!("Results were not saved");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        summary = ?output.summary,
        "Execution complete"
    );

    Ok(())
}
