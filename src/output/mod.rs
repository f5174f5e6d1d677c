// src/output/mod.rs

//! Rendering of a finished [`Report`] for the command line.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::core::knowledge_base;
use crate::core::models::{Report, StatusClass, TlsVersion};
use crate::core::score::{analyze, Rating};

/// The JSON contract consumed by other components.
pub fn render_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Plain-text summary: score, transport, certificate, TLS table, headers and findings.
pub fn render_text(report: &Report, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, report, now);
    out
}

fn write_text(out: &mut String, report: &Report, now: DateTime<Utc>) -> std::fmt::Result {
    writeln!(out, "Report for {}", report.url())?;
    writeln!(out)?;
    writeln!(out, "Score:        {}/100 ({})", report.score(), Rating::from_score(report.score()))?;
    writeln!(
        out,
        "Status code:  {} ({})",
        report.status_code(),
        StatusClass::from_status(report.status_code())
    )?;
    writeln!(out, "HTTPS:        {}", yes_no(report.is_secure()))?;
    writeln!(out, "HTTP->HTTPS:  {}", yes_no(report.http_redirect()))?;

    if let Some(cert) = report.certificate() {
        let issuer = cert.issuer_cn.as_deref().unwrap_or("unknown issuer");
        writeln!(
            out,
            "Certificate:  issued by {} and is valid for {} days",
            issuer,
            cert.days_until_expiry(now)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "TLS versions:")?;
    for version in TlsVersion::all() {
        writeln!(out, "  {:<8} {}", version.as_ref(), yes_no(report.tls().get(version)))?;
    }

    if !report.raw_headers().is_empty() {
        writeln!(out)?;
        writeln!(out, "Headers:")?;
        for (name, value) in report.raw_headers().iter() {
            for line in value.values() {
                writeln!(out, "  {}: {}", name, line)?;
            }
        }
    }

    let findings = analyze(report);
    if !findings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Findings:")?;
        for finding in findings {
            match knowledge_base::get_finding_detail(&finding.code) {
                Some(detail) => {
                    writeln!(out, "  [{:?}] {} ({})", detail.severity, detail.title, detail.category)?;
                    writeln!(out, "      {}", detail.remediation)?;
                }
                None => writeln!(out, "  [{:?}] {}", finding.severity, finding.code)?,
            }
        }
    }

    Ok(())
}
