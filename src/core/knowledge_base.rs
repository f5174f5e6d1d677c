//! Static, read-only catalogue of every finding the analysis can raise,
//! with a human-readable explanation and remediation for each code.

use crate::core::models::Severity;
use std::fmt;

/// Groups findings for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FindingCategory {
    /// HTTPS usage and the HTTP to HTTPS redirect.
    Transport,
    /// Accepted TLS protocol versions.
    Tls,
    /// HTTP security headers.
    Http,
}

impl fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingCategory::Transport => write!(f, "HTTPS"),
            FindingCategory::Tls => write!(f, "TLS Protocol Versions"),
            FindingCategory::Http => write!(f, "HTTP Security Headers"),
        }
    }
}

/// Everything needed to present one finding to a user.
pub struct FindingDetail {
    /// Machine-readable identifier, e.g. "HEADERS_CSP_MISSING".
    pub code: &'static str,
    pub title: &'static str,
    pub category: FindingCategory,
    pub severity: Severity,
    pub description: &'static str,
    pub remediation: &'static str,
}

static FINDINGS: &[FindingDetail] = &[
    // --- Transport ---
    FindingDetail {
        code: "HTTPS_NOT_USED",
        title: "Site Not Served Over HTTPS",
        category: FindingCategory::Transport,
        severity: Severity::Critical,
        description: "The inspected URL uses plain HTTP. Everything exchanged with visitors, including cookies and form data, travels unencrypted and can be read or altered on the way.",
        remediation: "Install a certificate (Let's Encrypt issues them for free) and serve the site over https://.",
    },
    FindingDetail {
        code: "HTTP_REDIRECT_MISSING",
        title: "No HTTP to HTTPS Redirect",
        category: FindingCategory::Transport,
        severity: Severity::Warning,
        description: "Requests to the http:// address are not redirected to an https:// location. Visitors typing the bare domain stay on an unencrypted connection.",
        remediation: "Answer every plain HTTP request with a 301 redirect to the same path on https://.",
    },

    // --- TLS ---
    FindingDetail {
        code: "TLS_1_0_ACCEPTED",
        title: "TLS 1.0 Accepted",
        category: FindingCategory::Tls,
        severity: Severity::Critical,
        description: "The server completes handshakes using TLS 1.0, a protocol version deprecated by RFC 8996 and affected by known attacks such as BEAST.",
        remediation: "Disable TLS 1.0 in the web server or load balancer configuration.",
    },
    FindingDetail {
        code: "TLS_1_1_ACCEPTED",
        title: "TLS 1.1 Accepted",
        category: FindingCategory::Tls,
        severity: Severity::Warning,
        description: "The server completes handshakes using TLS 1.1, which is deprecated and no longer supported by modern browsers.",
        remediation: "Disable TLS 1.1 and keep TLS 1.2 and TLS 1.3 enabled.",
    },
    FindingDetail {
        code: "TLS_1_2_NOT_ACCEPTED",
        title: "TLS 1.2 Not Available",
        category: FindingCategory::Tls,
        severity: Severity::Critical,
        description: "A trusted handshake pinned to TLS 1.2 did not complete. TLS 1.2 is still required by a large share of clients.",
        remediation: "Enable TLS 1.2 and make sure the certificate chain is trusted and matches the host name.",
    },
    FindingDetail {
        code: "TLS_1_3_NOT_ACCEPTED",
        title: "TLS 1.3 Not Available",
        category: FindingCategory::Tls,
        severity: Severity::Info,
        description: "A trusted handshake pinned to TLS 1.3 did not complete. TLS 1.3 is faster and removes legacy cipher suites.",
        remediation: "Enable TLS 1.3 where the server software supports it.",
    },

    // --- HTTP Headers ---
    FindingDetail {
        code: "HEADERS_CSP_MISSING",
        title: "Content-Security-Policy Missing",
        category: FindingCategory::Http,
        severity: Severity::Warning,
        description: "Content Security Policy (CSP) is an added layer of security that helps detect and mitigate certain types of attacks, including cross-site scripting and data injection.",
        remediation: "Send a Content-Security-Policy header listing the sources scripts, styles and other resources may load from. See https://developer.mozilla.org/en-US/docs/Web/HTTP/CSP",
    },
    FindingDetail {
        code: "HEADERS_X_CONTENT_TYPE_OPTIONS_MISSING",
        title: "X-Content-Type-Options Missing",
        category: FindingCategory::Http,
        severity: Severity::Warning,
        description: "Without this header browsers may sniff the MIME type of a response instead of using the advertised Content-Type.",
        remediation: "Send 'X-Content-Type-Options: nosniff', the only value available.",
    },
    FindingDetail {
        code: "HEADERS_X_FRAME_OPTIONS_MISSING",
        title: "X-Frame-Options Missing",
        category: FindingCategory::Http,
        severity: Severity::Warning,
        description: "Sites use this header to avoid click-jacking by making sure their content is not embedded into other sites.",
        remediation: "Send 'X-Frame-Options: SAMEORIGIN' (or 'DENY' if the site is never framed).",
    },
    FindingDetail {
        code: "HEADERS_HSTS_MISSING",
        title: "Strict-Transport-Security Missing",
        category: FindingCategory::Http,
        severity: Severity::Critical,
        description: "HTTP Strict-Transport-Security (HSTS) tells browsers that the site should only be accessed over HTTPS, blocking protocol downgrade and cookie hijacking.",
        remediation: "Send 'Strict-Transport-Security: max-age=31536000; includeSubDomains' on HTTPS responses.",
    },
];

/// Looks up the detail for a finding code.
pub fn get_finding_detail(code: &str) -> Option<&'static FindingDetail> {
    FINDINGS.iter().find(|f| f.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<&str> = FINDINGS.iter().map(|f| f.code).collect();
        assert_eq!(codes.len(), FINDINGS.len());
    }

    #[test]
    fn lookup_by_code() {
        let detail = get_finding_detail("HEADERS_HSTS_MISSING").unwrap();
        assert_eq!(detail.category, FindingCategory::Http);
        assert!(get_finding_detail("NOPE").is_none());
    }
}
