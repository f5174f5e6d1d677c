// src/config.rs

use lazy_static::lazy_static;
use rustls::pki_types::CertificateDer;
use std::time::Duration;
use tracing::warn;

use crate::logging::PROJECT_NAME;

lazy_static! {
    pub static ref TIMEOUT_ENV: String = format!("{}_TIMEOUT_MS", PROJECT_NAME.clone());
    pub static ref TLS_PORT_ENV: String = format!("{}_TLS_PORT", PROJECT_NAME.clone());
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_TLS_PORT: u16 = 443;

/// Per-inspection transport settings. Every sub-check gets its own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectorConfig {
    /// Applied to each network operation individually.
    pub timeout: Duration,
    /// Port the TLS version probes connect to.
    pub tls_port: u16,
    pub user_agent: String,
    /// Trust anchors accepted in addition to the built-in roots, e.g. a private CA.
    /// Shared by the plain fetch and every TLS probe.
    pub extra_roots: Vec<CertificateDer<'static>>,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            tls_port: DEFAULT_TLS_PORT,
            user_agent: format!("SiteCheckRS/{}", env!("CARGO_PKG_VERSION")),
            extra_roots: Vec::new(),
        }
    }
}

impl InspectorConfig {
    /// Defaults overridden by `SITECHECK_RS_TIMEOUT_MS` and `SITECHECK_RS_TLS_PORT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(&TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => config.timeout = Duration::from_millis(ms),
                _ => warn!(var = TIMEOUT_ENV.as_str(), value = %raw, "Ignoring invalid timeout."),
            }
        }

        if let Some(raw) = lookup(&TLS_PORT_ENV) {
            match raw.trim().parse::<u16>() {
                Ok(port) if port > 0 => config.tls_port = port,
                _ => warn!(var = TLS_PORT_ENV.as_str(), value = %raw, "Ignoring invalid TLS port."),
            }
        }

        config
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tls_port(mut self, tls_port: u16) -> Self {
        self.tls_port = tls_port;
        self
    }

    /// Adds a DER-encoded trust anchor.
    pub fn with_extra_root(mut self, der: impl Into<CertificateDer<'static>>) -> Self {
        self.extra_roots.push(der.into());
        self
    }
}
