//! Output sinks for crawl results.
//!
//! - [`json`]: writes the brochure list to a pretty-printed JSON file
//!   (`prospekty.json` by default)

pub mod json;
