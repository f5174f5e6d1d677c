// src/core/mod.rs

/// Data structures shared by the engine: `Report`, `Certificate`,
/// `TlsAcceptance`, `RawHeaders` and the finding types.
pub mod models;

/// Validation of the inspection target.
pub mod target;

/// Error taxonomy: validation, network and inspection failures.
pub mod error;

/// The sub-checks (plain fetch, redirect check, TLS version probes) and the
/// `Inspector` that runs them concurrently.
pub mod scanner;

/// Scoring, findings and rating.
pub mod score;

/// Descriptions and remediation for every finding code.
pub mod knowledge_base;
