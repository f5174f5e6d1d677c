// src/core/target.rs

use crate::core::error::ValidationError;
use url::Url;

/// A validated inspection target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    raw: String,
    url: Url,
}

impl Target {
    /// Parses `input` as an absolute `http`/`https` URL with a host.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let url = Url::parse(trimmed).map_err(|e| ValidationError::Malformed {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(ValidationError::UnsupportedScheme(other.to_string())),
        }

        match url.host_str() {
            Some(host) if !host.is_empty() => {}
            _ => return Err(ValidationError::MissingHost(input.to_string())),
        }

        Ok(Self { raw: trimmed.to_string(), url })
    }

    /// The URL as the caller supplied it.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether the declared scheme uses encrypted transport.
    pub fn is_secure(&self) -> bool {
        self.url.scheme() == "https"
    }

    /// Host name without brackets or port, suitable for SNI.
    pub fn host(&self) -> &str {
        let host = self.url.host_str().unwrap_or_default();
        host.trim_start_matches('[').trim_end_matches(']')
    }

    /// The same target with its scheme forced to `http`.
    pub fn plain_http_url(&self) -> Url {
        let mut plain = self.url.clone();
        if plain.scheme() != "http" {
            // Both schemes are "special" in the URL standard, so the swap cannot fail.
            let _ = plain.set_scheme("http");
        }
        plain
    }
}
