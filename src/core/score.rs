// src/core/score.rs

//! Scoring and finding derivation. Everything here is a pure function of a
//! [`Report`]'s observed fields; the stored score itself is never read back.

use crate::core::knowledge_base;
use crate::core::models::{AnalysisFinding, Report, Severity};
use std::fmt;

// Point table. Sums to 100.
pub const POINTS_HTTPS: u8 = 20;
pub const POINTS_HTTP_REDIRECT: u8 = 10;
pub const POINTS_TLS1_0_REJECTED: u8 = 10;
pub const POINTS_TLS1_2_ACCEPTED: u8 = 10;
pub const POINTS_HSTS: u8 = 20;
pub const POINTS_CSP: u8 = 10;
pub const POINTS_XCTO: u8 = 10;
pub const POINTS_XFO: u8 = 10;

pub const HEADER_HSTS: &str = "strict-transport-security";
pub const HEADER_CSP: &str = "content-security-policy";
pub const HEADER_XCTO: &str = "x-content-type-options";
pub const HEADER_XFO: &str = "x-frame-options";

/// Security headers in the order they are reported as missing.
pub const SECURITY_HEADERS: [&str; 4] = [HEADER_CSP, HEADER_XCTO, HEADER_XFO, HEADER_HSTS];

/// Computes the 0-100 score of a report from its observed fields.
pub fn calculate_score(report: &Report) -> u8 {
    let tls = report.tls();
    let headers = report.raw_headers();

    let awards = [
        (report.is_secure(), POINTS_HTTPS),
        (report.http_redirect(), POINTS_HTTP_REDIRECT),
        (!tls.tls1_0, POINTS_TLS1_0_REJECTED),
        (tls.tls1_2, POINTS_TLS1_2_ACCEPTED),
        (headers.contains(HEADER_HSTS), POINTS_HSTS),
        (headers.contains(HEADER_CSP), POINTS_CSP),
        (headers.contains(HEADER_XCTO), POINTS_XCTO),
        (headers.contains(HEADER_XFO), POINTS_XFO),
    ];

    awards
        .iter()
        .filter(|(applies, _)| *applies)
        .map(|(_, points)| *points)
        .sum()
}

/// Security headers absent from the report.
pub fn missing_security_headers(report: &Report) -> Vec<&'static str> {
    SECURITY_HEADERS
        .iter()
        .copied()
        .filter(|name| !report.raw_headers().contains(name))
        .collect()
}

/// Derives the findings shown next to the score. Severities come from the
/// knowledge base.
pub fn analyze(report: &Report) -> Vec<AnalysisFinding> {
    let tls = report.tls();
    let mut codes = Vec::new();

    if !report.is_secure() {
        codes.push("HTTPS_NOT_USED");
    }
    if !report.http_redirect() {
        codes.push("HTTP_REDIRECT_MISSING");
    }
    if tls.tls1_0 {
        codes.push("TLS_1_0_ACCEPTED");
    }
    if tls.tls1_1 {
        codes.push("TLS_1_1_ACCEPTED");
    }
    if !tls.tls1_2 {
        codes.push("TLS_1_2_NOT_ACCEPTED");
    }
    if !tls.tls1_3 {
        codes.push("TLS_1_3_NOT_ACCEPTED");
    }
    for header in missing_security_headers(report) {
        codes.push(match header {
            HEADER_CSP => "HEADERS_CSP_MISSING",
            HEADER_XCTO => "HEADERS_X_CONTENT_TYPE_OPTIONS_MISSING",
            HEADER_XFO => "HEADERS_X_FRAME_OPTIONS_MISSING",
            _ => "HEADERS_HSTS_MISSING",
        });
    }

    codes
        .into_iter()
        .map(|code| {
            let severity = knowledge_base::get_finding_detail(code)
                .map(|detail| detail.severity)
                .unwrap_or(Severity::Info);
            AnalysisFinding::new(severity, code)
        })
        .collect()
}

/// Coarse band of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Good,
    Fair,
    Poor,
}

impl Rating {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => Rating::Good,
            50..=79 => Rating::Fair,
            _ => Rating::Poor,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rating::Good => write!(f, "Good"),
            Rating::Fair => write!(f, "Needs Improvement"),
            Rating::Poor => write!(f, "Poor"),
        }
    }
}
