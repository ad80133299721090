//! Validity date extraction from brochure titles.
//!
//! Titles on the listing site carry their validity period as free text, in
//! one of a handful of German phrasings. [`parse_date_range`] runs an ordered
//! list of [`DateRule`]s against the title and returns the first match. Order
//! matters: a title such as `gültig ab dem 05.06.2024 - 09.06.2024` matches
//! both the "starting from" rule and the range rule, and the former wins.
//!
//! Matched `DD.MM.YYYY` groups are reordered to `YYYY-MM-DD` positionally.
//! No calendar validation happens, so `31.02.2024` becomes `2024-02-31`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Normalized validity period, both ends formatted as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub from: String,
    pub to: String,
}

impl DateRange {
    fn single(date: String) -> Self {
        Self {
            from: date.clone(),
            to: date,
        }
    }
}

/// One pattern in the precedence list.
pub struct DateRule {
    pub name: &'static str,
    pattern: &'static Lazy<Regex>,
    extract: fn(&Captures<'_>) -> DateRange,
}

impl DateRule {
    fn apply(&self, text: &str) -> Option<DateRange> {
        self.pattern.captures(text).map(|caps| (self.extract)(&caps))
    }
}

static VALID_FROM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"gültig ab dem (\d{2}\.\d{2}\.\d{4})").expect("valid regex"));
static RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}\.\d{2}\.\d{4})\s*-\s*(\d{2}\.\d{2}\.\d{4})").expect("valid regex")
});
static FROM_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"von\s+\w+\s+(\d{2}\.\d{2}\.\d{4})").expect("valid regex"));
static BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2}\.\d{2}\.\d{4})").expect("valid regex"));

fn single_date(caps: &Captures<'_>) -> DateRange {
    DateRange::single(to_iso(&caps[1]))
}

fn date_pair(caps: &Captures<'_>) -> DateRange {
    DateRange {
        from: to_iso(&caps[1]),
        to: to_iso(&caps[2]),
    }
}

/// Rules in precedence order. The first one that matches decides the range.
pub static DATE_RULES: [DateRule; 4] = [
    DateRule {
        name: "valid_from",
        pattern: &VALID_FROM,
        extract: single_date,
    },
    DateRule {
        name: "range",
        pattern: &RANGE,
        extract: date_pair,
    },
    DateRule {
        name: "from_word",
        pattern: &FROM_WORD,
        extract: single_date,
    },
    DateRule {
        name: "bare",
        pattern: &BARE,
        extract: single_date,
    },
];

/// Reorder a `DD.MM.YYYY` string into `YYYY-MM-DD`.
fn to_iso(dotted: &str) -> String {
    let mut parts = dotted.splitn(3, '.');
    let day = parts.next().unwrap_or_default();
    let month = parts.next().unwrap_or_default();
    let year = parts.next().unwrap_or_default();
    format!("{year}-{month}-{day}")
}

/// Parse a brochure title into its validity range.
///
/// Rules from [`DATE_RULES`] are tried in order and the first match wins.
///
/// # Arguments
///
/// * `title` - Free-form brochure title
/// * `today` - Fallback date when the title carries none
///
/// # Returns
///
/// A [`DateRange`] with both ends as `YYYY-MM-DD`. Never fails; without a
/// match both ends are `today`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use prospekt_crawler::dates::parse_date_range;
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
/// let range = parse_date_range("Angebote 01.06.2024 - 15.06.2024", today);
/// assert_eq!((range.from.as_str(), range.to.as_str()), ("2024-06-01", "2024-06-15"));
///
/// let fallback = parse_date_range("Prospekt", today);
/// assert_eq!(fallback.from, "2024-06-03");
/// ```
pub fn parse_date_range(title: &str, today: NaiveDate) -> DateRange {
    DATE_RULES
        .iter()
        .find_map(|rule| {
            let range = rule.apply(title)?;
            tracing::trace!(rule = rule.name, from = %range.from, to = %range.to, "Matched date rule");
            Some(range)
        })
        .unwrap_or_else(|| DateRange::single(today.format("%Y-%m-%d").to_string()))
}
