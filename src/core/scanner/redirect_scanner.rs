// src/core/scanner/redirect_scanner.rs

use tracing::{debug, info};

use crate::config::InspectorConfig;
use crate::core::error::NetworkError;
use crate::core::scanner::fetch_scanner::{send_get, single_use_client};
use crate::core::target::Target;
use reqwest::header::LOCATION;

/// Requests the plain-HTTP form of `target` and reports whether it answers
/// with a 3xx pointing at an `https://` location.
///
/// Only transport failures are errors; any other response is a valid `false`.
pub async fn checks_https_redirect(target: &Target, config: &InspectorConfig) -> Result<bool, NetworkError> {
    let plain = target.plain_http_url();
    info!(url = %plain, "Starting HTTP to HTTPS redirect check.");

    let client = single_use_client(config)?;
    let response = send_get(&client, &plain, config).await?;

    let status_code = response.status().as_u16();
    let location = response
        .headers()
        .get(LOCATION)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let redirects = is_https_redirect(status_code, location.as_deref());
    debug!(status = status_code, location = ?location, redirects, "Redirect check response.");
    info!(redirects, "Redirect check finished.");
    Ok(redirects)
}

/// A 3xx status with a `Location` starting with `https://`.
pub fn is_https_redirect(status_code: u16, location: Option<&str>) -> bool {
    let is_redirect = (300..=399).contains(&status_code);
    let location_is_secure = location.is_some_and(|l| l.starts_with("https://"));
    is_redirect && location_is_secure
}
