//! Error types for site inspection

use std::time::Duration;
use thiserror::Error;

/// The target URL could not be accepted. Raised before any network I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Malformed URL '{input}': {reason}")]
    Malformed { input: String, reason: String },

    #[error("Unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("URL has no host: {0}")]
    MissingHost(String),
}

/// A transport-level failure of the plain fetch or the redirect check.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl NetworkError {
    /// Classifies a `reqwest` error raised while sending a request to `url`.
    pub fn from_request(url: &str, timeout: Duration, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            NetworkError::Timeout { url: url.to_string(), timeout }
        } else if source.is_connect() {
            NetworkError::Connect { url: url.to_string(), source }
        } else {
            NetworkError::Request { url: url.to_string(), source }
        }
    }
}

/// The mandatory fetch failed, so no report can be produced.
#[derive(Error, Debug)]
#[error("Inspection of {url} failed")]
pub struct InspectionError {
    pub url: String,
    #[source]
    pub source: NetworkError,
}

/// A serialized report whose stored score disagrees with its own fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Stored score {stored} does not match the computed score {computed}")]
pub struct ScoreMismatch {
    pub stored: u8,
    pub computed: u8,
}

/// Everything [`inspect`](crate::core::scanner::inspect) can fail with.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Inspection(#[from] InspectionError),
}

impl Error {
    /// A message safe to show to callers: no transport detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            Error::Validation(_) => "Please enter a valid URL",
            Error::Inspection(_) => "The site could not be reached. Please try again.",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
