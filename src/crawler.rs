//! Two-phase crawl of the brochure listing site.
//!
//! 1. **Listing scan**: fetch the listing page, build a record from each
//!    brochure tile, and collect links to shop pages.
//! 2. **Shop scan**: visit each shop page once and build its brochures under
//!    that shop's name.
//!
//! Phases run strictly in order and every fetch is awaited before the next
//! one starts. A failed listing fetch ends the run with no records. A failed
//! shop fetch only skips that shop.

use crate::clock::Clock;
use crate::dedup::DeduplicationIndex;
use crate::extract::{BROCHURE_SELECTOR, BrochureRecordBuilder, Extraction};
use crate::fetch::PageFetcher;
use crate::models::{BrochureRecord, CrawlSummary, ShopLink};
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, error, info, instrument, warn};

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Path fragments that mark a link as pointing at a shop page.
const SHOP_PATH_MARKERS: [&str; 2] = ["/prospekte/", "/kataloge/"];

/// Records and counters produced by one run.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutput {
    pub records: Vec<BrochureRecord>,
    pub summary: CrawlSummary,
}

/// Owns the per-run state: result list and identity index.
pub struct Crawler<F, C> {
    fetcher: F,
    builder: BrochureRecordBuilder<C>,
    listing_url: String,
    index: DeduplicationIndex,
    records: Vec<BrochureRecord>,
    summary: CrawlSummary,
}

impl<F: PageFetcher, C: Clock> Crawler<F, C> {
    /// `listing_url` is the absolute URL of the top-level listing page.
    pub fn new(fetcher: F, builder: BrochureRecordBuilder<C>, listing_url: String) -> Self {
        Self {
            fetcher,
            builder,
            listing_url,
            index: DeduplicationIndex::new(),
            records: Vec::new(),
            summary: CrawlSummary::default(),
        }
    }

    /// Run both phases and hand back everything collected.
    #[instrument(level = "info", skip_all, fields(listing_url = %self.listing_url))]
    pub async fn run(mut self) -> CrawlOutput {
        let shops = match self.fetcher.fetch(&self.listing_url).await {
            Ok(html) => self.scan_listing(&html),
            Err(e) => {
                error!(error = %e, "Listing page fetch failed; nothing to crawl");
                return self.finish();
            }
        };

        let total = shops.len();
        for (i, shop) in shops.into_iter().enumerate() {
            info!(shop = %shop.shop_name, n = i + 1, total, "Processing shop");
            self.visit_shop(&shop).await;
        }

        self.finish()
    }

    /// Phase 1: build listing brochures and return unique shop links.
    fn scan_listing(&mut self, html: &str) -> Vec<ShopLink> {
        let document = Html::parse_document(html);

        let elements: Vec<_> = document.select(&BROCHURE_SELECTOR).collect();
        info!(count = elements.len(), "Found brochures on listing page");
        for element in elements {
            let extraction = self.builder.build(element, None, &mut self.index);
            if self.push(extraction) {
                self.summary.listing_records += 1;
            }
        }

        let shops = self.shop_links(&document);
        self.summary.shops_discovered = shops.len();
        info!(count = shops.len(), "Found shop links");
        shops
    }

    /// Shop links on the listing page, deduplicated in first-seen order.
    fn shop_links(&self, document: &Html) -> Vec<ShopLink> {
        document
            .select(&ANCHOR_SELECTOR)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| SHOP_PATH_MARKERS.iter().any(|m| href.contains(m)))
            .filter_map(|href| match self.builder.base_url().join(href) {
                Ok(url) => Some(url.to_string()),
                Err(e) => {
                    warn!(%href, error = %e, "Ignoring unresolvable shop link");
                    None
                }
            })
            .map(|url| ShopLink {
                shop_name: self.builder.resolver().resolve(&url),
                url,
            })
            .unique()
            .collect()
    }

    /// Phase 2, one shop. Fetch failures are logged and swallowed.
    #[instrument(level = "info", skip_all, fields(shop = %shop.shop_name, url = %shop.url))]
    async fn visit_shop(&mut self, shop: &ShopLink) {
        let html = match self.fetcher.fetch(&shop.url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(error = %e, "Shop page fetch failed; skipping shop");
                self.summary.shops_failed += 1;
                return;
            }
        };
        self.summary.shops_visited += 1;
        self.scan_shop(&html, &shop.shop_name);
    }

    fn scan_shop(&mut self, html: &str, shop_name: &str) {
        let document = Html::parse_document(html);
        let elements: Vec<_> = document.select(&BROCHURE_SELECTOR).collect();
        info!(count = elements.len(), shop = %shop_name, "Found brochures for shop");
        for element in elements {
            let extraction = self.builder.build(element, Some(shop_name), &mut self.index);
            self.push(extraction);
        }
    }

    /// Append a built record. Returns whether anything was added.
    fn push(&mut self, extraction: Extraction) -> bool {
        match extraction {
            Extraction::Record(record) => {
                info!(shop = %record.shop_name, "Added brochure");
                self.records.push(record);
                true
            }
            Extraction::Skip(reason) => {
                debug!(%reason, "Element skipped");
                self.summary.skipped_elements += 1;
                false
            }
        }
    }

    fn finish(mut self) -> CrawlOutput {
        self.summary.total_records = self.records.len();
        info!(
            total = self.summary.total_records,
            shops_visited = self.summary.shops_visited,
            shops_failed = self.summary.shops_failed,
            skipped = self.summary.skipped_elements,
            "Crawl complete"
        );
        CrawlOutput {
            records: self.records,
            summary: self.summary,
        }
    }
}
