//! Turning one listing element into a [`BrochureRecord`].
//!
//! Shop pages differ in markup, so a malformed element never aborts the
//! page. It comes back as [`Extraction::Skip`] with the reason attached.

use crate::clock::Clock;
use crate::dates::parse_date_range;
use crate::dedup::DeduplicationIndex;
use crate::error::SkipReason;
use crate::models::{BrochureRecord, PARSED_TIME_FORMAT};
use crate::shop_name::ShopNameResolver;
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use tracing::{debug, warn};
use url::Url;

/// Title used when neither the link nor its children carry one.
pub const DEFAULT_TITLE: &str = "Prospekt";

/// Brochure tiles, on both the listing page and shop pages.
pub static BROCHURE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".brochure-thumb").expect("valid selector"));
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.brochure-title").expect("valid selector"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("valid selector"));

/// Outcome of building one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Record(BrochureRecord),
    Skip(SkipReason),
}

/// Resolve `href` against `base` unless it already looks absolute.
pub fn absolutize(base: &Url, href: &str) -> Result<String, SkipReason> {
    if href.starts_with("http") {
        return Ok(href.to_string());
    }
    base.join(href)
        .map(|u| u.to_string())
        .map_err(|e| SkipReason::InvalidUrl {
            href: href.to_string(),
            reason: e.to_string(),
        })
}

/// Builds records from `.brochure-thumb` elements.
#[derive(Debug, Clone)]
pub struct BrochureRecordBuilder<C> {
    base_url: Url,
    resolver: ShopNameResolver,
    clock: C,
}

impl<C: Clock> BrochureRecordBuilder<C> {
    pub fn new(base_url: Url, clock: C) -> Self {
        let resolver = ShopNameResolver::new(&base_url);
        Self {
            base_url,
            resolver,
            clock,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn resolver(&self) -> &ShopNameResolver {
        &self.resolver
    }

    /// Build a record from `element`, registering its identity in `index`.
    ///
    /// Nothing here fails loudly: malformed markup and duplicates come back as
    /// [`Extraction::Skip`] and are logged.
    ///
    /// # Arguments
    ///
    /// * `element` - A `.brochure-thumb` element
    /// * `shop_name` - Overrides URL-based inference; shop pages pass the name
    ///   of the shop they belong to
    /// * `index` - Identities emitted so far in this run
    ///
    /// # Returns
    ///
    /// [`Extraction::Record`] for a new brochure, otherwise
    /// [`Extraction::Skip`] carrying the [`SkipReason`].
    ///
    /// # Examples
    ///
    /// ```
    /// use prospekt_crawler::clock::LocalClock;
    /// use prospekt_crawler::dedup::DeduplicationIndex;
    /// use prospekt_crawler::extract::{BROCHURE_SELECTOR, BrochureRecordBuilder, Extraction};
    /// use scraper::Html;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://www.prospektmaschine.de").unwrap();
    /// let builder = BrochureRecordBuilder::new(base, LocalClock);
    /// let doc = Html::parse_document(
    ///     r#"<div class="brochure-thumb"><a href="/hypermarkte/lidl/p1" title="12.06.2024"></a></div>"#,
    /// );
    /// let element = doc.select(&BROCHURE_SELECTOR).next().unwrap();
    ///
    /// let mut index = DeduplicationIndex::new();
    /// let Extraction::Record(record) = builder.build(element, None, &mut index) else {
    ///     panic!("expected a record");
    /// };
    /// assert_eq!(record.shop_name, "Lidl");
    /// assert_eq!(record.valid_from, "2024-06-12");
    /// assert!(matches!(builder.build(element, None, &mut index), Extraction::Skip(_)));
    /// ```
    pub fn build(
        &self,
        element: ElementRef<'_>,
        shop_name: Option<&str>,
        index: &mut DeduplicationIndex,
    ) -> Extraction {
        match self.try_build(element, shop_name, index) {
            Ok(record) => {
                debug!(shop = %record.shop_name, from = %record.valid_from, to = %record.valid_to, "Built brochure record");
                Extraction::Record(record)
            }
            Err(reason @ SkipReason::Duplicate { .. }) => {
                debug!(%reason, "Skipping brochure");
                Extraction::Skip(reason)
            }
            Err(reason) => {
                warn!(%reason, "Skipping malformed brochure element");
                Extraction::Skip(reason)
            }
        }
    }

    fn try_build(
        &self,
        element: ElementRef<'_>,
        shop_name: Option<&str>,
        index: &mut DeduplicationIndex,
    ) -> Result<BrochureRecord, SkipReason> {
        let link = element
            .select(&LINK_SELECTOR)
            .next()
            .ok_or(SkipReason::MissingLink)?;
        let href = link
            .value()
            .attr("href")
            .filter(|h| !h.is_empty())
            .ok_or(SkipReason::MissingHref)?;
        let href = absolutize(&self.base_url, href)?;

        let title = link_title(link);
        let now = self.clock.now();
        let range = parse_date_range(&title, now.date());

        let thumbnail = self.thumbnail(element);

        let shop_name = match shop_name {
            Some(name) => name.to_string(),
            None => self.resolver.resolve(&href),
        };

        debug!(title = %truncate_for_log(&title, 80), %href, "Resolved brochure link");
        let record = BrochureRecord {
            title,
            thumbnail,
            shop_name,
            valid_from: range.from,
            valid_to: range.to,
            parsed_time: now.format(PARSED_TIME_FORMAT).to_string(),
        };

        let key = record.identity_key();
        if !index.insert(key.clone()) {
            return Err(SkipReason::Duplicate { key });
        }
        Ok(record)
    }

    fn thumbnail(&self, element: ElementRef<'_>) -> String {
        let Some(src) = element
            .select(&IMG_SELECTOR)
            .next()
            .and_then(|img| img.value().attr("src"))
            .filter(|s| !s.is_empty())
        else {
            return String::new();
        };
        absolutize(&self.base_url, src).unwrap_or_else(|reason| {
            warn!(%reason, "Dropping unresolvable thumbnail");
            String::new()
        })
    }
}

/// The link's `title` attribute, else its `div.brochure-title` text, else [`DEFAULT_TITLE`].
///
/// A present but blank `div.brochure-title` yields an empty title; the
/// placeholder is only used when the div is missing altogether.
fn link_title(link: ElementRef<'_>) -> String {
    if let Some(title) = link.value().attr("title").filter(|t| !t.is_empty()) {
        return title.to_string();
    }
    link.select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;
    use scraper::Html;

    fn builder() -> BrochureRecordBuilder<FixedClock> {
        let at = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap();
        BrochureRecordBuilder::new(
            Url::parse("https://www.prospektmaschine.de").unwrap(),
            FixedClock(at),
        )
    }

    fn build_all(html: &str, shop: Option<&str>, index: &mut DeduplicationIndex) -> Vec<Extraction> {
        let doc = Html::parse_document(html);
        let b = builder();
        doc.select(&BROCHURE_SELECTOR)
            .map(|el| b.build(el, shop, index))
            .collect()
    }

    fn record(extraction: &Extraction) -> &BrochureRecord {
        match extraction {
            Extraction::Record(r) => r,
            Extraction::Skip(reason) => panic!("expected record, got skip: {reason}"),
        }
    }

    #[test]
    fn test_full_element() {
        let html = r#"
            <div class="brochure-thumb">
              <a href="/hypermarkte/lidl/prospekt-1" title="Lidl gültig ab dem 05.06.2024">
                <img src="/img/lidl.jpg">
              </a>
            </div>"#;
        let mut index = DeduplicationIndex::new();
        let out = build_all(html, None, &mut index);
        assert_eq!(out.len(), 1);
        let r = record(&out[0]);
        assert_eq!(r.title, "Lidl gültig ab dem 05.06.2024");
        assert_eq!(r.thumbnail, "https://www.prospektmaschine.de/img/lidl.jpg");
        assert_eq!(r.shop_name, "Lidl");
        assert_eq!(r.valid_from, "2024-06-05");
        assert_eq!(r.valid_to, "2024-06-05");
        assert_eq!(r.parsed_time, "2024-06-03 09:15:00");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_title_from_nested_div() {
        let html = r#"
            <div class="brochure-thumb">
              <a href="https://cdn.example.test/x">
                <div class="brochure-title"> Angebote 01.06.2024 - 15.06.2024 </div>
              </a>
            </div>"#;
        let mut index = DeduplicationIndex::new();
        let out = build_all(html, Some("Kaufland"), &mut index);
        let r = record(&out[0]);
        assert_eq!(r.title, "Angebote 01.06.2024 - 15.06.2024");
        assert_eq!(r.valid_from, "2024-06-01");
        assert_eq!(r.valid_to, "2024-06-15");
        assert_eq!(r.shop_name, "Kaufland");
        assert_eq!(r.thumbnail, "");
    }

    #[test]
    fn test_placeholder_title_and_today() {
        let html = r#"<div class="brochure-thumb"><a href="/prospekte/netto/"></a></div>"#;
        let mut index = DeduplicationIndex::new();
        let out = build_all(html, None, &mut index);
        let r = record(&out[0]);
        assert_eq!(r.title, DEFAULT_TITLE);
        assert_eq!(r.valid_from, "2024-06-03");
        assert_eq!(r.valid_to, "2024-06-03");
        assert_eq!(r.shop_name, "Netto");
    }

    #[test]
    fn test_missing_link_and_href() {
        let html = r#"
            <div class="brochure-thumb"><img src="/img/a.jpg"></div>
            <div class="brochure-thumb"><a title="no target">x</a></div>"#;
        let mut index = DeduplicationIndex::new();
        let out = build_all(html, None, &mut index);
        assert_eq!(
            out,
            vec![
                Extraction::Skip(SkipReason::MissingLink),
                Extraction::Skip(SkipReason::MissingHref),
            ]
        );
        assert!(index.is_empty());
    }

    #[test]
    fn test_same_brochure_twice_yields_one_record() {
        let html = r#"
            <div class="brochure-thumb"><a href="/hypermarkte/lidl/a" title="01.06.2024 - 15.06.2024"></a></div>
            <div class="brochure-thumb"><a href="/hypermarkte/lidl/b" title="Neu: 01.06.2024 - 15.06.2024"></a></div>"#;
        let mut index = DeduplicationIndex::new();
        let out = build_all(html, None, &mut index);
        assert!(matches!(out[0], Extraction::Record(_)));
        assert_eq!(
            out[1],
            Extraction::Skip(SkipReason::Duplicate {
                key: "Lidl_2024-06-01_2024-06-15".to_string()
            })
        );
    }

    #[test]
    fn test_shop_override_beats_url() {
        let html = r#"<div class="brochure-thumb"><a href="/hypermarkte/lidl/a" title="12.06.2024"></a></div>"#;
        let mut index = DeduplicationIndex::new();
        let out = build_all(html, Some("Lidl Plus"), &mut index);
        assert_eq!(record(&out[0]).shop_name, "Lidl Plus");
    }

    #[test]
    fn test_blank_title_div_gives_empty_title() {
        let html = r#"
            <div class="brochure-thumb">
              <a href="/prospekte/penny/p1"><div class="brochure-title">   </div></a>
            </div>"#;
        let mut index = DeduplicationIndex::new();
        let out = build_all(html, None, &mut index);
        let r = record(&out[0]);
        assert_eq!(r.title, "");
        assert_eq!(r.valid_from, "2024-06-03");
        assert_eq!(r.valid_to, "2024-06-03");
    }

    #[test]
    fn test_umlaut_slug_in_listing_tile() {
        let html = r#"
            <div class="brochure-thumb">
              <a href="/hypermarkte/müller/p1" title="12.06.2024"><img src="/img/müller.jpg"></a>
            </div>"#;
        let mut index = DeduplicationIndex::new();
        let out = build_all(html, None, &mut index);
        let r = record(&out[0]);
        assert_eq!(r.shop_name, "Müller");
        assert!(!index.insert("Müller_2024-06-12_2024-06-12".to_string()));
        // The thumbnail stays a valid, percent-encoded URL.
        assert_eq!(r.thumbnail, "https://www.prospektmaschine.de/img/m%C3%BCller.jpg");
    }

    #[test]
    fn test_absolutize() {
        let base = Url::parse("https://www.prospektmaschine.de").unwrap();
        assert_eq!(
            absolutize(&base, "/kataloge/ikea/").unwrap(),
            "https://www.prospektmaschine.de/kataloge/ikea/"
        );
        assert_eq!(
            absolutize(&base, "https://img.test/a.jpg").unwrap(),
            "https://img.test/a.jpg"
        );
    }
}
