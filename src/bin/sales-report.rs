//! CLI binary for sales-report.
//!
//! A thin shim over the library crate that maps CLI flags onto
//! `ReportConfig` / `ServerConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sales_report::pipeline::format::currency;
use sales_report::{
    generate_report, list_artifacts, server, Diagnostics, ReportConfig, RowError, ServerConfig,
    Severity,
};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Terminal diagnostics ─────────────────────────────────────────────────────

/// Prints skipped rows to stderr as they happen and counts them for the
/// final summary line.
struct CliDiagnostics {
    quiet: bool,
    skipped: AtomicUsize,
}

impl CliDiagnostics {
    fn new(quiet: bool) -> Self {
        Self {
            quiet,
            skipped: AtomicUsize::new(0),
        }
    }
}

impl Diagnostics for CliDiagnostics {
    fn warn(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}  {}", yellow("⚠"), message);
        }
    }

    fn error(&self, message: &str) {
        eprintln!("{}  {}", red("✗"), message);
    }

    fn row_skipped(&self, issue: &RowError) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        match issue.severity() {
            Severity::Warning => self.warn(&issue.to_string()),
            Severity::Error => self.error(&issue.to_string()),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve the HTTP API on 127.0.0.1:8000
  sales-report serve

  # Listen on all interfaces, allow a custom front-end origin
  sales-report serve --bind 0.0.0.0:8080 --allowed-origin https://dash.example.com

  # One-off report from the configured data directory
  sales-report generate

  # Report from an explicit CSV file, descriptor as JSON
  sales-report generate --source ./exports/march.csv --json

  # List rendered reports
  sales-report list

CSV FORMAT:
  Header row required. Columns are matched by name:
    product   Producto | Product
    quantity  Cantidad | Quantity   (integer ≥ 1)
    price     Precio   | Price      (decimal ≥ 0)
  Malformed rows are skipped and reported; the report fails only if no row
  is valid.

ENVIRONMENT VARIABLES:
  SALES_REPORT_DATA_DIR         Directory holding the CSV source (default: data)
  SALES_REPORT_REPORTS_DIR      Directory for rendered PDFs (default: reports)
  SALES_REPORT_SOURCE_FILE      CSV file name inside the data dir (default: ventas.csv)
  SALES_REPORT_BIND             Listen address for `serve`
  SALES_REPORT_ALLOWED_ORIGINS  Comma-separated CORS origins for `serve`
  RUST_LOG                      Overrides the log filter (e.g. sales_report=debug)
"#;

/// Generate PDF sales reports from CSV data.
#[derive(Parser, Debug)]
#[command(
    name = "sales-report",
    version,
    about = "Generate PDF sales reports from CSV data",
    long_about = "Generate PDF sales reports (summary, line-item table, quantity bar chart) \
from a CSV export. Runs as an HTTP API or as a one-shot command.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Directory holding the CSV source.
    #[arg(long, global = true, env = "SALES_REPORT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory rendered PDFs are written to.
    #[arg(long, global = true, env = "SALES_REPORT_REPORTS_DIR")]
    reports_dir: Option<PathBuf>,

    /// CSV file name inside the data directory.
    #[arg(long, global = true, env = "SALES_REPORT_SOURCE_FILE")]
    source_file: Option<String>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "SALES_REPORT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "SALES_REPORT_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API.
    Serve {
        /// Socket address to listen on.
        #[arg(long, env = "SALES_REPORT_BIND")]
        bind: Option<SocketAddr>,

        /// CORS origin to allow; repeat for several. Replaces the defaults.
        #[arg(long = "allowed-origin", env = "SALES_REPORT_ALLOWED_ORIGINS", value_delimiter = ',')]
        allowed_origins: Vec<String>,
    },

    /// Parse the CSV source and render one report.
    Generate {
        /// Explicit CSV file; overrides --data-dir and --source-file.
        #[arg(long)]
        source: Option<PathBuf>,

        /// Print the report descriptor as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List rendered reports, newest first.
    List {
        /// Print the listing as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let source = match &cli.command {
        Command::Generate { source, .. } => source.clone(),
        _ => None,
    };
    let config = build_config(&cli, source)?;

    match cli.command {
        Command::Serve {
            bind,
            allowed_origins,
        } => {
            let mut server_config = ServerConfig::default();
            if let Some(addr) = bind {
                server_config.bind = addr;
            }
            if !allowed_origins.is_empty() {
                server_config.allowed_origins = allowed_origins;
            }
            server::run(config, server_config)
                .await
                .context("HTTP server failed")?;
        }

        Command::Generate { json, .. } => {
            let diagnostics = CliDiagnostics::new(cli.quiet || json);
            let artifact =
                generate_report(&config, &diagnostics).context("Report generation failed")?;

            if json {
                let out = serde_json::to_string_pretty(&artifact)
                    .context("Failed to serialise report descriptor")?;
                println!("{out}");
            } else if !cli.quiet {
                let skipped = diagnostics.skipped.load(Ordering::Relaxed);
                eprintln!(
                    "{}  {} items  {}  →  {}",
                    green("✔"),
                    artifact.items_count,
                    bold(&currency(artifact.total_revenue)),
                    bold(&config.reports_dir.join(&artifact.filename).display().to_string()),
                );
                if skipped > 0 {
                    eprintln!("   {} rows skipped", dim(&skipped.to_string()));
                }
            }
        }

        Command::List { json } => {
            let reports = list_artifacts(&config.reports_dir, &config.download_base)
                .context("Failed to list reports")?;

            if json {
                let out =
                    serde_json::to_string_pretty(&reports).context("Failed to serialise listing")?;
                println!("{out}");
            } else if reports.is_empty() {
                if !cli.quiet {
                    eprintln!("No reports in {}", config.reports_dir.display());
                }
            } else {
                for r in &reports {
                    println!(
                        "{}  {:>9}  {}",
                        r.filename,
                        format!("{} B", r.size),
                        dim(&r.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
                    );
                }
            }
        }
    }

    Ok(())
}

/// Map CLI args to `ReportConfig`.
fn build_config(cli: &Cli, source: Option<PathBuf>) -> Result<ReportConfig> {
    let mut builder = ReportConfig::builder();

    if let Some(ref dir) = cli.data_dir {
        builder = builder.data_dir(dir);
    }
    if let Some(ref dir) = cli.reports_dir {
        builder = builder.reports_dir(dir);
    }
    if let Some(ref name) = cli.source_file {
        builder = builder.source_file(name.clone());
    }
    if let Some(path) = source {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("Not a file path: {}", path.display()))?
            .to_string();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        builder = builder.data_dir(dir).source_file(name);
    }

    builder.build().context("Invalid configuration")
}
