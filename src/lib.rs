//! Website security posture inspection.
//!
//! One call to [`inspect`] validates a URL, concurrently fetches it, checks the
//! HTTP to HTTPS redirect and probes four pinned TLS versions, then returns a
//! scored, immutable [`Report`].

pub mod config;
pub mod core;
pub mod logging;
pub mod output;

pub use crate::config::InspectorConfig;
pub use crate::core::error::{Error, InspectionError, NetworkError, ScoreMismatch, ValidationError};
pub use crate::core::models::{Certificate, HeaderValue, RawHeaders, Report, TlsAcceptance, TlsVersion};
pub use crate::core::scanner::{Inspector, inspect};
