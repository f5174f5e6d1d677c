// src/core/scanner/mod.rs

// This file acts as the public interface for the `scanner` module.
// It declares the sub-checks and the orchestrator that joins them.
pub mod fetch_scanner;
pub mod redirect_scanner;
pub mod tls_prober;

use tracing::{info, warn};

use crate::config::InspectorConfig;
use crate::core::error::{InspectionError, Result};
use crate::core::models::{Report, TlsAcceptance, TlsVersion};
use crate::core::target::Target;
use self::fetch_scanner::run_fetch;
use self::redirect_scanner::checks_https_redirect;
use self::tls_prober::probe_with_roots;

/// Runs inspections with a fixed transport configuration.
#[derive(Debug, Clone, Default)]
pub struct Inspector {
    config: InspectorConfig,
}

impl Inspector {
    pub fn new(config: InspectorConfig) -> Self {
        Self { config }
    }

    /// Inspects `url` and returns its finished [`Report`].
    ///
    /// The URL is validated before anything touches the network. The plain
    /// fetch, the redirect check and the four TLS probes then run concurrently
    /// via `tokio::join!`, and all six are awaited before the report is built.
    /// Only a failed plain fetch aborts the inspection; a failed redirect
    /// check or probe is recorded as `false`.
    ///
    /// # Errors
    ///
    /// * [`Error::Validation`](crate::core::error::Error::Validation) for a malformed URL.
    /// * [`Error::Inspection`](crate::core::error::Error::Inspection) when the plain fetch fails.
    pub async fn inspect(&self, url: &str) -> Result<Report> {
        let target = Target::parse(url)?;
        let config = &self.config;
        let host = target.host();
        let port = config.tls_port;
        let roots = config.extra_roots.as_slice();

        info!(url = target.as_str(), "Starting site inspection.");

        let (fetch, redirect, tls1_0, tls1_1, tls1_2, tls1_3) = tokio::join!(
            run_fetch(target.url(), config),
            checks_https_redirect(&target, config),
            probe_with_roots(host, port, TlsVersion::Tls10, config.timeout, roots),
            probe_with_roots(host, port, TlsVersion::Tls11, config.timeout, roots),
            probe_with_roots(host, port, TlsVersion::Tls12, config.timeout, roots),
            probe_with_roots(host, port, TlsVersion::Tls13, config.timeout, roots)
        );

        let fetch = fetch.map_err(|source| {
            warn!(url = target.as_str(), error = %source, "Plain fetch failed, no report produced.");
            InspectionError { url: target.as_str().to_string(), source }
        })?;

        let http_redirect = redirect.unwrap_or_else(|e| {
            warn!(error = %e, "Redirect check failed, recording no redirect.");
            false
        });

        let report = Report::new(
            target.as_str().to_string(),
            target.is_secure(),
            http_redirect,
            fetch.status_code,
            fetch.headers,
            fetch.certificate,
            TlsAcceptance { tls1_0, tls1_1, tls1_2, tls1_3 },
        );

        info!(score = report.score(), "Site inspection finished.");
        Ok(report)
    }
}

/// Inspects `url` with configuration taken from the environment.
pub async fn inspect(url: &str) -> Result<Report> {
    Inspector::new(InspectorConfig::from_env()).inspect(url).await
}
