// src/core/scanner/fetch_scanner.rs

use tracing::{debug, info, warn};

use crate::config::InspectorConfig;
use crate::core::error::NetworkError;
use crate::core::models::{Certificate, RawHeaders};
use chrono::{DateTime, Utc};
use reqwest::header::{CONNECTION, HeaderMap, SET_COOKIE};
use reqwest::redirect::Policy;
use reqwest::tls::TlsInfo;
use reqwest::{Client, Response};
use url::Url;
use x509_parser::prelude::{ASN1Time, parse_x509_certificate};

/// What the mandatory fetch observed.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status_code: u16,
    pub headers: RawHeaders,
    pub certificate: Option<Certificate>,
}

/// Builds a client for exactly one request: no redirect following, no idle
/// connections kept around, and the per-operation timeout applied.
pub(crate) fn single_use_client(config: &InspectorConfig) -> Result<Client, NetworkError> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(Policy::none())
        .pool_max_idle_per_host(0)
        .timeout(config.timeout)
        .connect_timeout(config.timeout)
        .tls_info(true);
    for der in &config.extra_roots {
        let root = reqwest::Certificate::from_der(&der[..]).map_err(NetworkError::Client)?;
        builder = builder.add_root_certificate(root);
    }
    builder.build().map_err(NetworkError::Client)
}

/// Sends one `GET` with `Connection: close` and returns the raw response.
pub(crate) async fn send_get(client: &Client, url: &Url, config: &InspectorConfig) -> Result<Response, NetworkError> {
    client
        .get(url.clone())
        .header(CONNECTION, "close")
        .send()
        .await
        .map_err(|e| NetworkError::from_request(url.as_str(), config.timeout, e))
}

/// Fetches `url` once and captures status, headers and, for HTTPS, the peer certificate.
pub async fn run_fetch(url: &Url, config: &InspectorConfig) -> Result<FetchResponse, NetworkError> {
    info!(url = %url, "Starting plain fetch.");

    let client = single_use_client(config)?;
    let response = send_get(&client, url, config).await?;

    let status_code = response.status().as_u16();
    info!(status = status_code, "Received HTTP response for plain fetch.");

    let headers = collect_headers(response.headers());
    debug!(count = headers.len(), "Captured response headers.");

    let certificate = if url.scheme() == "https" {
        extract_certificate(&response)
    } else {
        None
    };

    Ok(FetchResponse { status_code, headers, certificate })
}

/// Copies a `HeaderMap` into [`RawHeaders`], keeping repeated values in order.
/// `set-cookie` is always reported as a sequence.
pub fn collect_headers(map: &HeaderMap) -> RawHeaders {
    let mut headers = RawHeaders::new();
    for (name, value) in map.iter() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        if *name == SET_COOKIE {
            headers.append_multi(name.as_str(), value);
        } else {
            headers.append(name.as_str(), value);
        }
    }
    headers
}

fn extract_certificate(response: &Response) -> Option<Certificate> {
    let der = match response.extensions().get::<TlsInfo>().and_then(|info| info.peer_certificate()) {
        Some(der) => der,
        None => {
            debug!("Transport exposed no peer certificate.");
            return None;
        }
    };
    parse_certificate(der)
}

/// Reads issuer CN and validity window from a DER certificate.
pub fn parse_certificate(der: &[u8]) -> Option<Certificate> {
    let (_, x509) = match parse_x509_certificate(der) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Failed to parse X.509 certificate");
            return None;
        }
    };

    let issuer_cn = x509
        .issuer()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(String::from);

    let validity = x509.validity();
    let certificate = Certificate {
        issuer_cn,
        valid_from: asn1_time_to_chrono_utc(&validity.not_before),
        valid_to: asn1_time_to_chrono_utc(&validity.not_after),
    };
    info!(issuer = ?certificate.issuer_cn, valid_to = %certificate.valid_to, "Parsed peer certificate.");
    Some(certificate)
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}
