//! Data models for crawled brochures.
//!
//! - [`BrochureRecord`]: one advertised brochure, as written to the output file
//! - [`ShopLink`]: a shop sub-page discovered on the listing page
//! - [`CrawlSummary`]: counters reported at the end of a run
//!
//! Field order of [`BrochureRecord`] is the serialized order, so do not
//! reorder the struct.

use serde::{Deserialize, Serialize};

/// Layout of [`BrochureRecord::parsed_time`].
pub const PARSED_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single brochure with its inferred validity range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BrochureRecord {
    /// Display text for the brochure, or `"Prospekt"` when none was found.
    pub title: String,
    /// Absolute URL of the preview image, empty if the element had none.
    pub thumbnail: String,
    /// Normalized shop display name.
    pub shop_name: String,
    /// Start of validity, `YYYY-MM-DD`.
    pub valid_from: String,
    /// End of validity, `YYYY-MM-DD`.
    pub valid_to: String,
    /// Local time the record was built, `YYYY-MM-DD HH:MM:SS`.
    pub parsed_time: String,
}

impl BrochureRecord {
    /// Identity used for deduplication.
    pub fn identity_key(&self) -> String {
        identity_key(&self.shop_name, &self.valid_from, &self.valid_to)
    }
}

/// Two brochures of the same shop with the same validity range are the same brochure.
pub fn identity_key(shop_name: &str, valid_from: &str, valid_to: &str) -> String {
    format!("{shop_name}_{valid_from}_{valid_to}")
}

/// A shop page to visit in the second crawl phase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShopLink {
    pub url: String,
    pub shop_name: String,
}

/// What happened during one crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub listing_records: usize,
    pub shops_discovered: usize,
    pub shops_visited: usize,
    pub shops_failed: usize,
    pub skipped_elements: usize,
    pub total_records: usize,
}
