//! Error types for every stage of a crawl.
//!
//! Only [`ConfigError`] is fatal, and it is raised before any page is fetched.
//! The crawler recovers from the others locally: [`FetchError`] at page
//! granularity, [`SkipReason`] at element granularity. [`PersistError`] becomes
//! a boolean at the sink boundary.

use thiserror::Error;

/// Failure to retrieve a page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

/// Why a single listing element did not produce a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("element has no link")]
    MissingLink,

    #[error("link has no href")]
    MissingHref,

    #[error("cannot resolve \"{href}\" against the base URL: {reason}")]
    InvalidUrl { href: String, reason: String },

    #[error("duplicate brochure {key}")]
    Duplicate { key: String },
}

/// Failure to write the output document.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize brochures: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Invalid or unreadable runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid base URL \"{url}\": {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
