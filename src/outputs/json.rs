//! JSON output for crawled brochures.
//!
//! The document is a pretty-printed array (2-space indent) of
//! [`BrochureRecord`] objects. Non-ASCII text such as `gültig` is written
//! verbatim, not escaped.

use crate::error::PersistError;
use crate::models::BrochureRecord;
use crate::utils::ensure_parent_dir;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "prospekty.json";

/// Serialize `records` and write them to `path`, creating parent directories.
///
/// # Errors
///
/// [`PersistError::Serialize`] if serialization fails, [`PersistError::Io`]
/// if the directory or file cannot be written.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = records.len()))]
pub async fn write_brochures(records: &[BrochureRecord], path: &Path) -> Result<(), PersistError> {
    let json = serde_json::to_string_pretty(records)?;

    let io_err = |source: std::io::Error| PersistError::Io {
        path: path.display().to_string(),
        source,
    };
    ensure_parent_dir(path).await.map_err(io_err)?;
    fs::write(path, json).await.map_err(io_err)?;

    Ok(())
}

/// Write `records` to `path`, reporting success as a boolean.
///
/// Failures are logged here, so callers only need the flag.
///
/// # Arguments
///
/// * `records` - Brochures in output order
/// * `path` - Destination file, usually [`DEFAULT_OUTPUT`]
///
/// # Returns
///
/// `true` if the file was written, `false` on any [`PersistError`].
///
/// # Examples
///
/// ```no_run
/// # async fn demo() {
/// use prospekt_crawler::outputs::json::{DEFAULT_OUTPUT, save_results};
/// use std::path::Path;
///
/// let saved = save_results(&[], Path::new(DEFAULT_OUTPUT)).await;
/// assert!(saved);
/// # }
/// ```
pub async fn save_results(records: &[BrochureRecord], path: &Path) -> bool {
    match write_brochures(records, path).await {
        Ok(()) => {
            info!(path = %path.display(), count = records.len(), "Saved brochures");
            true
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to save brochures");
            false
        }
    }
}
