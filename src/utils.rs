//! Small string and file system helpers.
//!
//! - Title casing for shop slugs
//! - String truncation for log fields
//! - Output directory preparation

use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// Title-case a string the way Python's `str.title` does.
///
/// Every letter that follows a non-letter is uppercased, every other letter
/// lowercased. `"rewe center"` becomes `"Rewe Center"`, `"3d-druck"` becomes
/// `"3D-Druck"`.
///
/// # Examples
///
/// ```
/// use prospekt_crawler::utils::title_case;
/// assert_eq!(title_case("aldi süd"), "Aldi Süd");
/// ```
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Create the parent directory of `path` if it does not exist yet.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).await?;
            debug!(dir = %dir.display(), "Output directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("lidl"), "Lidl");
        assert_eq!(title_case("rewe center"), "Rewe Center");
        assert_eq!(title_case("KAUFLAND"), "Kaufland");
        assert_eq!(title_case("3d druck"), "3D Druck");
        assert_eq!(title_case("müller"), "Müller");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Prospekt", 100), "Prospekt");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundary() {
        // 'ü' is two bytes; cutting at 2 would split it.
        let result = truncate_for_log("gültig", 2);
        assert_eq!(result, "g…(+6 bytes)");
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_creates_missing_dirs() {
        let root = std::env::temp_dir().join(format!("prospekt_utils_{}", std::process::id()));
        let file = root.join("nested").join("out.json");
        ensure_parent_dir(&file).await.unwrap();
        assert!(root.join("nested").is_dir());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_bare_filename() {
        ensure_parent_dir(Path::new("prospekty.json")).await.unwrap();
    }
}
