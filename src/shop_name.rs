//! Shop name inference from brochure and shop-page URLs.
//!
//! The listing site files shop pages under `/hypermarkte/<shop>/`,
//! `/prospekte/<shop>/` or `/kataloge/<shop>/`. The resolver follows those
//! conventions positionally, so a slug that happens to equal one of the
//! reserved tokens (e.g. a shop literally called "de") is never picked up.
//! That gap is accepted; the URL layout is the only signal available for
//! brochures found on the listing page.

use crate::utils::title_case;
use std::borrow::Cow;
use url::{Position, Url};
use urlencoding::decode;

/// Returned when no path segment looks like a shop slug.
pub const UNKNOWN_SHOP: &str = "unknown shop";

/// Path tokens that name site sections rather than shops.
const RESERVED: [&str; 4] = ["hypermarkte", "prospekte", "de", "kataloge"];

/// Sections whose next segment is a shop slug.
const SHOP_PARENTS: [&str; 3] = ["hypermarkte", "prospekte", "kataloge"];

/// Index of the first path segment when `scheme://authority/...` is split on `/`.
const FIRST_PATH_SEGMENT: usize = 3;

/// Derives display names like `"Rewe Center"` from `…/prospekte/rewe-center/`.
#[derive(Debug, Clone)]
pub struct ShopNameResolver {
    site_authority: String,
}

impl ShopNameResolver {
    /// Build a resolver that also treats the base URL's `host[:port]` as reserved.
    pub fn new(base_url: &Url) -> Self {
        Self {
            site_authority: base_url[Position::BeforeHost..Position::AfterPort].to_string(),
        }
    }

    fn is_reserved(&self, segment: &str) -> bool {
        RESERVED.contains(&segment) || segment == self.site_authority
    }

    /// Derive a display name from a brochure or shop-page URL.
    ///
    /// Segments are percent-decoded first, so `/prospekte/m%C3%BCller/` and
    /// `/prospekte/müller/` both give `"Müller"`.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL as produced by `Url::join`, or as found in markup
    ///
    /// # Returns
    ///
    /// The first qualifying slug with `-` turned into spaces and title-cased,
    /// or [`UNKNOWN_SHOP`] when no segment qualifies.
    ///
    /// # Examples
    ///
    /// ```
    /// use prospekt_crawler::shop_name::ShopNameResolver;
    /// use url::Url;
    ///
    /// let base = Url::parse("https://www.prospektmaschine.de").unwrap();
    /// let resolver = ShopNameResolver::new(&base);
    /// assert_eq!(resolver.resolve("https://example.test/hypermarkte/lidl/"), "Lidl");
    /// assert_eq!(resolver.resolve("https://www.prospektmaschine.de/"), "unknown shop");
    /// ```
    pub fn resolve(&self, url: &str) -> String {
        let parts: Vec<Cow<'_, str>> = url
            .trim_end_matches('/')
            .split('/')
            .map(|part| decode(part).unwrap_or(Cow::Borrowed(part)))
            .collect();

        parts
            .iter()
            .enumerate()
            .find(|&(i, part)| {
                !part.is_empty()
                    && !self.is_reserved(part)
                    && ((i > 0 && SHOP_PARENTS.contains(&&*parts[i - 1])) || i == FIRST_PATH_SEGMENT)
            })
            .map(|(_, slug)| title_case(&slug.replace('-', " ")))
            .unwrap_or_else(|| UNKNOWN_SHOP.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ShopNameResolver {
        ShopNameResolver::new(&Url::parse("https://www.prospektmaschine.de").unwrap())
    }

    #[test]
    fn test_shop_after_section() {
        let r = resolver();
        assert_eq!(r.resolve("https://example.test/hypermarkte/lidl/"), "Lidl");
        assert_eq!(
            r.resolve("https://www.prospektmaschine.de/prospekte/rewe-center/"),
            "Rewe Center"
        );
        assert_eq!(
            r.resolve("https://www.prospektmaschine.de/kataloge/dm-drogerie/prospekt-123"),
            "Dm Drogerie"
        );
    }

    #[test]
    fn test_first_path_segment_qualifies() {
        let r = resolver();
        assert_eq!(
            r.resolve("https://www.prospektmaschine.de/kaufland/angebote"),
            "Kaufland"
        );
    }

    #[test]
    fn test_reserved_segments_are_skipped() {
        let r = resolver();
        // "de" at the first path position is reserved; "netto" follows it but
        // "de" is not a shop parent.
        assert_eq!(
            r.resolve("https://www.prospektmaschine.de/de/netto"),
            UNKNOWN_SHOP
        );
    }

    #[test]
    fn test_no_qualifying_segment() {
        let r = resolver();
        assert_eq!(r.resolve("https://www.prospektmaschine.de/"), UNKNOWN_SHOP);
        assert_eq!(r.resolve("https://www.prospektmaschine.de/hypermarkte/"), UNKNOWN_SHOP);
        assert_eq!(r.resolve(""), UNKNOWN_SHOP);
    }

    #[test]
    fn test_percent_encoded_umlaut_slug() {
        let r = resolver();
        assert_eq!(
            r.resolve("https://www.prospektmaschine.de/prospekte/m%C3%BCller/"),
            "Müller"
        );
        assert_eq!(r.resolve("https://www.prospektmaschine.de/prospekte/müller/"), "Müller");
        assert_eq!(
            r.resolve("https://www.prospektmaschine.de/hypermarkte/h%C3%B6ffner-m%C3%B6bel/p1"),
            "Höffner Möbel"
        );
    }

    #[test]
    fn test_undecodable_segment_is_kept_verbatim() {
        // %FF is not valid UTF-8 on its own.
        let r = resolver();
        assert_eq!(r.resolve("https://www.prospektmaschine.de/prospekte/a%FFb/"), "A%Ffb");
    }

    #[test]
    fn test_site_authority_with_port_is_reserved() {
        let r = ShopNameResolver::new(&Url::parse("http://127.0.0.1:8080").unwrap());
        assert_eq!(r.site_authority, "127.0.0.1:8080");
        assert_eq!(r.resolve("http://127.0.0.1:8080/prospekte/aldi-sued/"), "Aldi Sued");
    }
}
