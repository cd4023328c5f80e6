//! # sales-report
//!
//! Render PDF sales reports from CSV exports.
//!
//! A report is a single A4 document: title, a three-row summary (items sold,
//! revenue, generation time), a line-item table and a bar chart of quantities
//! per product. Malformed CSV rows are skipped and reported through an
//! injected [`Diagnostics`] sink; a report fails only when the source is
//! missing, unreadable, or has no valid row at all.
//!
//! ## Pipeline Overview
//!
//! ```text
//! CSV
//!  │
//!  ├─ 1. Input   open the source; missing file → DataSourceMissing
//!  ├─ 2. Parse   header synonyms, per-row validation, skip bad rows
//!  ├─ 3. Layout  title, summary, paginated table, bar chart (pure)
//!  ├─ 4. Encode  draw ops → PDF bytes (Helvetica, WinAnsi)
//!  ├─ 5. Write   temp file + atomic rename into reports/
//!  └─ 6. Output  RenderedArtifact descriptor (name, totals, download URL)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sales_report::{generate_report, ReportConfig, TracingDiagnostics};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ReportConfig::builder()
//!         .data_dir("data")
//!         .reports_dir("reports")
//!         .build()?;
//!     let artifact = generate_report(&config, &TracingDiagnostics)?;
//!     println!("{} ({} items)", artifact.filename, artifact.items_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | via cli | axum HTTP API ([`server`]) on tokio |
//! | `cli`    | on      | Enables the `sales-report` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable default features when using only the library:
//! ```toml
//! sales-report = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generate;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod store;

#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ChartStyle, Color, Padding, RenderStyle, ReportConfig, ReportConfigBuilder, ServerConfig};
pub use diagnostics::{Diagnostics, NoopDiagnostics, TracingDiagnostics};
pub use error::{InvalidItem, RenderCause, ReportError, RowError, Severity};
pub use generate::{generate_report, parse_file, parse_reader, render_report, render_report_at};
pub use model::{LineItem, Report};
pub use output::{ArtifactInfo, RenderedArtifact};
pub use store::{list_artifacts, read_artifact, resolve_artifact};
