//! # Prospekt Crawler
//!
//! Crawls a retail brochure listing site, extracts every advertised brochure
//! (shop, title, validity range, thumbnail), deduplicates them and saves the
//! result as JSON.
//!
//! ## Architecture
//!
//! 1. **Listing scan**: fetch the listing page, build records from its
//!    brochure tiles, collect shop page links ([`crawler`])
//! 2. **Shop scan**: fetch each shop page and build its brochures
//! 3. **Output**: write the aggregated list ([`outputs::json`])
//!
//! Record building ([`extract`]) leans on date parsing ([`dates`]), shop name
//! inference ([`shop_name`]) and a per-run identity index ([`dedup`]).

pub mod cli;
pub mod clock;
pub mod config;
pub mod crawler;
pub mod dates;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod shop_name;
pub mod utils;

use clock::LocalClock;
use config::CrawlerConfig;
use crawler::{CrawlOutput, Crawler};
use extract::BrochureRecordBuilder;
use fetch::HttpFetcher;
use std::error::Error;
use tracing::instrument;

/// Crawl the site described by `config` over HTTP.
///
/// # Errors
///
/// Only configuration problems (bad base URL, unbuildable HTTP client) are
/// returned. Fetch and extraction failures during the crawl are logged and
/// absorbed.
#[instrument(level = "info", skip_all, fields(base_url = %config.base_url))]
pub async fn crawl(config: &CrawlerConfig) -> Result<CrawlOutput, Box<dyn Error>> {
    let base = config.base()?;
    let listing_url = config.listing_url()?;
    let fetcher = HttpFetcher::new(config.timeout(), &config.user_agent)?;
    let builder = BrochureRecordBuilder::new(base, LocalClock);

    Ok(Crawler::new(fetcher, builder, listing_url).run().await)
}
