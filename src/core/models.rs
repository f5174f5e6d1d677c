// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

use crate::core::error::ScoreMismatch;
use crate::core::score;

// --- Modelli Dati Core ---
// Core Data Models

// An enumeration representing the severity level of a finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

// A struct representing an analysis finding, containing a severity level and a string code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisFinding {
    pub severity: Severity,
    pub code: String,
}

impl AnalysisFinding {
    pub fn new(severity: Severity, code: &str) -> Self {
        Self { severity, code: code.to_string() }
    }
}

// --- Modelli TLS ---
// TLS Models

/// The four protocol versions the prober knows how to pin.
///
/// The string forms (`TLSv1`, `TLSv1.1`, ...) are part of the report's JSON
/// contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
pub enum TlsVersion {
    #[strum(serialize = "TLSv1")]
    Tls10,
    #[strum(serialize = "TLSv1.1")]
    Tls11,
    #[strum(serialize = "TLSv1.2")]
    Tls12,
    #[strum(serialize = "TLSv1.3")]
    Tls13,
}

impl TlsVersion {
    /// All versions in ascending order.
    pub fn all() -> impl Iterator<Item = TlsVersion> {
        TlsVersion::iter()
    }
}

/// Which protocol versions the server accepted. Every version always has an entry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TlsAcceptance {
    #[serde(rename = "TLSv1")]
    pub tls1_0: bool,
    #[serde(rename = "TLSv1.1")]
    pub tls1_1: bool,
    #[serde(rename = "TLSv1.2")]
    pub tls1_2: bool,
    #[serde(rename = "TLSv1.3")]
    pub tls1_3: bool,
}

impl TlsAcceptance {
    pub fn get(&self, version: TlsVersion) -> bool {
        match version {
            TlsVersion::Tls10 => self.tls1_0,
            TlsVersion::Tls11 => self.tls1_1,
            TlsVersion::Tls12 => self.tls1_2,
            TlsVersion::Tls13 => self.tls1_3,
        }
    }
}

// --- Modelli Certificato ---
// Certificate Models

/// Peer certificate fields captured from the plain fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Certificate {
    #[serde(rename = "issuerCN", skip_serializing_if = "Option::is_none", default)]
    pub issuer_cn: Option<String>,
    #[serde(rename = "validFrom")]
    pub valid_from: DateTime<Utc>,
    #[serde(rename = "validTo")]
    pub valid_to: DateTime<Utc>,
}

impl Certificate {
    /// Whole days left before `valid_to`, rounded down. Negative once expired.
    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        let seconds = self.valid_to.signed_duration_since(now).num_seconds();
        seconds.div_euclid(86_400)
    }
}

// --- Modelli Header HTTP ---
// HTTP Header Models

/// A response header value. Repeated headers keep every value, in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum HeaderValue {
    Single(String),
    Multiple(Vec<String>),
}

impl HeaderValue {
    /// Iterates over every value carried by this header.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            HeaderValue::Single(value) => std::slice::from_ref(value),
            HeaderValue::Multiple(values) => values,
        };
        slice.iter().map(String::as_str)
    }
}

/// Response headers keyed by lower-cased name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RawHeaders(BTreeMap<String, HeaderValue>);

impl RawHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `name`, promoting the entry to `Multiple` on repeats.
    pub fn append(&mut self, name: &str, value: String) {
        let key = name.to_ascii_lowercase();
        match self.0.remove(&key) {
            None => {
                self.0.insert(key, HeaderValue::Single(value));
            }
            Some(HeaderValue::Single(first)) => {
                self.0.insert(key, HeaderValue::Multiple(vec![first, value]));
            }
            Some(HeaderValue::Multiple(mut values)) => {
                values.push(value);
                self.0.insert(key, HeaderValue::Multiple(values));
            }
        }
    }

    /// Inserts a header that is always reported as a sequence (e.g. `set-cookie`).
    pub fn append_multi(&mut self, name: &str, value: String) {
        let key = name.to_ascii_lowercase();
        let mut values: Vec<String> = match self.0.remove(&key) {
            Some(HeaderValue::Single(first)) => vec![first],
            Some(HeaderValue::Multiple(values)) => values,
            None => Vec::new(),
        };
        values.push(value);
        self.0.insert(key, HeaderValue::Multiple(values));
    }

    /// Case-insensitive presence check.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.0.get(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RawHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = RawHeaders::new();
        for (name, value) in iter {
            headers.append(name.as_ref(), value.into());
        }
        headers
    }
}

// --- Report Principale ---
// Main Report

/// The finished result of one inspection.
///
/// Fields are private: a report is built once by [`Report::new`], which also
/// computes the score, and is read-only afterwards. Deserializing goes through
/// the same constructor and fails when the stored score disagrees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", try_from = "ReportRepr")]
pub struct Report {
    url: String,
    is_secure: bool,
    score: u8,
    http_redirect: bool,
    status_code: u16,
    raw_headers: RawHeaders,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    certificate: Option<Certificate>,
    tls: TlsAcceptance,
}

impl Report {
    pub fn new(
        url: String,
        is_secure: bool,
        http_redirect: bool,
        status_code: u16,
        raw_headers: RawHeaders,
        certificate: Option<Certificate>,
        tls: TlsAcceptance,
    ) -> Self {
        let mut report = Self {
            url,
            is_secure,
            score: 0,
            http_redirect,
            status_code,
            raw_headers,
            certificate,
            tls,
        };
        report.score = score::calculate_score(&report);
        report
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_secure(&self) -> bool {
        self.is_secure
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn http_redirect(&self) -> bool {
        self.http_redirect
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn raw_headers(&self) -> &RawHeaders {
        &self.raw_headers
    }

    pub fn certificate(&self) -> Option<&Certificate> {
        self.certificate.as_ref()
    }

    pub fn tls(&self) -> &TlsAcceptance {
        &self.tls
    }
}

/// Wire shape of a [`Report`], validated before it becomes one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRepr {
    url: String,
    is_secure: bool,
    score: u8,
    http_redirect: bool,
    status_code: u16,
    raw_headers: RawHeaders,
    #[serde(default)]
    certificate: Option<Certificate>,
    tls: TlsAcceptance,
}

impl TryFrom<ReportRepr> for Report {
    type Error = ScoreMismatch;

    fn try_from(repr: ReportRepr) -> Result<Self, Self::Error> {
        let report = Report::new(
            repr.url,
            repr.is_secure,
            repr.http_redirect,
            repr.status_code,
            repr.raw_headers,
            repr.certificate,
            repr.tls,
        );
        if report.score != repr.score {
            return Err(ScoreMismatch { stored: repr.score, computed: report.score });
        }
        Ok(report)
    }
}

// --- Classificazioni ---
// Classifications used by the presentation side.

/// Coarse bucket of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StatusClass {
    Success,
    Redirection,
    ClientError,
    ServerError,
}

impl StatusClass {
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            200..=299 => StatusClass::Success,
            300..=399 => StatusClass::Redirection,
            400..=499 => StatusClass::ClientError,
            _ => StatusClass::ServerError,
        }
    }
}
