//! Command-line interface definitions.
//!
//! With no arguments the crawler runs against the default site and writes
//! `prospekty.json` in the working directory. Flags override values from the
//! optional config file.

use crate::config::CrawlerConfig;
use clap::Parser;
use std::path::PathBuf;

/// Crawl brochure listings and save them as JSON.
///
/// # Examples
///
/// ```sh
/// prospekt_crawler
/// prospekt_crawler -o data/prospekty.json --timeout-secs 5
/// prospekt_crawler -c crawler.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output JSON file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Optional path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Site root to crawl
    #[arg(long, env = "PROSPEKT_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    /// Overlay flags that were given onto `config`.
    pub fn apply(&self, mut config: CrawlerConfig) -> CrawlerConfig {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        config
    }
}
