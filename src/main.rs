// src/main.rs

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Result, WrapErr};
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

use sitecheck_rs::output::{render_json, render_text};
use sitecheck_rs::{Inspector, InspectorConfig, logging};

static RE_HAS_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap());

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "sitecheck-rs", version)]
#[command(about = "Analyze a website's HTTPS, TLS versions and security headers", long_about = None)]
struct Cli {
    /// Website to check, e.g. https://example.org (https:// is assumed when omitted)
    #[arg(value_name = "URL")]
    url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Timeout applied to each network operation, in milliseconds
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Port used by the TLS version probes
    #[arg(long, value_name = "PORT")]
    tls_port: Option<u16>,

    /// Also log to stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Prefixes `https://` when the input carries no scheme, as typed into a search box.
fn normalize_input(raw: &str) -> String {
    let trimmed = raw.trim();
    if RE_HAS_SCHEME.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

fn build_config(cli: &Cli) -> InspectorConfig {
    let mut config = InspectorConfig::from_env();
    if let Some(ms) = cli.timeout_ms.filter(|ms| *ms > 0) {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    if let Some(port) = cli.tls_port.filter(|port| *port > 0) {
        config = config.with_tls_port(port);
    }
    config
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log_path = logging::initialize_logging(cli.verbose).wrap_err("failed to initialize logging")?;
    info!(log = %log_path.display(), "Logging initialized.");

    let config = build_config(&cli);
    let url = normalize_input(&cli.url);

    match Inspector::new(config).inspect(&url).await {
        Ok(report) => {
            let rendered = match cli.format {
                OutputFormat::Json => render_json(&report).wrap_err("failed to serialize report")?,
                OutputFormat::Text => render_text(&report, chrono::Utc::now()),
            };
            println!("{}", rendered);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            // Full detail goes to the log; the caller only sees the public message.
            error!(url = %url, error = ?e, "Inspection failed.");
            eprintln!("{}", e.public_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
