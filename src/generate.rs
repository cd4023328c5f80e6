//! Report generation entry points.
//!
//! Everything here is synchronous. The HTTP server moves these calls onto
//! `spawn_blocking`; the CLI calls them directly.
//!
//! ```text
//! generate_report ──▶ parse_file ──▶ render_report ──▶ RenderedArtifact
//! ```

use crate::config::ReportConfig;
use crate::diagnostics::Diagnostics;
use crate::error::{RenderCause, ReportError};
use crate::model::Report;
use crate::output::{self, RenderedArtifact};
use crate::pipeline::pdf::{self, DocumentInfo};
use crate::pipeline::{format, input, layout, parse, write};
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

pub use crate::pipeline::parse::parse_reader;

/// Parse the CSV file at `path` into a [`Report`].
///
/// # Errors
/// - [`ReportError::DataSourceMissing`] if the file does not exist; no row
///   is read in that case.
/// - [`ReportError::NoValidRows`] if every data row was rejected.
/// - [`ReportError::SourceRead`] on I/O or decoding failure.
pub fn parse_file(path: &Path, diagnostics: &dyn Diagnostics) -> Result<Report, ReportError> {
    let file = input::open_source(path)?;
    parse::parse_reader(file, path, diagnostics)
}

/// Render `report` as a PDF in `config.reports_dir`.
///
/// The file name comes from the current local time at whole-second
/// resolution; two renders within the same second target the same file
/// and the later one replaces the earlier.
pub fn render_report(report: &Report, config: &ReportConfig) -> Result<RenderedArtifact, ReportError> {
    render_report_at(report, config, Local::now().naive_local())
}

/// [`render_report`] with an explicit clock reading for the file name.
///
/// # Errors
/// [`ReportError::Render`] for any failure while creating the directory,
/// encoding the document or committing the file. On error no file exists
/// under the final name unless an earlier render left one there.
pub fn render_report_at(
    report: &Report,
    config: &ReportConfig,
    now: NaiveDateTime,
) -> Result<RenderedArtifact, ReportError> {
    let started = Instant::now();
    let filename = format::artifact_filename(now);
    let path = config.reports_dir.join(&filename);
    let fail = |source: RenderCause| ReportError::Render {
        path: path.clone(),
        source,
    };

    std::fs::create_dir_all(&config.reports_dir).map_err(|e| fail(e.into()))?;

    let composed = layout::compose(report, &config.style);
    debug!(
        "Laid out {} items on {} page(s)",
        report.items().len(),
        composed.pages.len()
    );

    let info = DocumentInfo {
        title: config.style.title_text.clone(),
        created: report.generated_at(),
    };
    let bytes = pdf::encode_document(&composed.pages, &info, &config.style).map_err(fail)?;
    write::write_atomic(&path, &bytes).map_err(|e| fail(e.into()))?;

    info!(
        "Report written: {} ({} bytes, {}ms)",
        filename,
        bytes.len(),
        started.elapsed().as_millis()
    );

    Ok(RenderedArtifact {
        download_url: output::download_url(&config.download_base, &filename),
        filename,
        generated_at: report.generated_at(),
        items_count: report.items().len(),
        total_revenue: report.total_revenue(),
    })
}

/// Parse the configured source and render it: the whole request in one call.
pub fn generate_report(
    config: &ReportConfig,
    diagnostics: &dyn Diagnostics,
) -> Result<RenderedArtifact, ReportError> {
    let source = config.source_path();
    info!("Generating report from {}", source.display());
    let report = parse_file(&source, diagnostics)?;
    render_report(&report, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NoopDiagnostics;
    use crate::model::LineItem;
    use rust_decimal::Decimal;

    fn config_in(dir: &Path) -> ReportConfig {
        ReportConfig::builder()
            .data_dir(dir.join("data"))
            .reports_dir(dir.join("reports"))
            .build()
            .unwrap()
    }

    #[test]
    fn render_creates_directory_and_returns_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let report = Report::new(vec![
            LineItem::new("Widget", 3, Decimal::new(999, 2)).unwrap(),
            LineItem::new("Gadget", 2, Decimal::new(12345, 1)).unwrap(),
        ])
        .unwrap();

        let artifact = render_report(&report, &config).unwrap();

        assert!(artifact.filename.starts_with("sales_report_"));
        assert!(artifact.filename.ends_with(".pdf"));
        assert_eq!(artifact.items_count, 2);
        assert_eq!(artifact.total_revenue, Decimal::new(249897, 2));
        assert_eq!(artifact.generated_at, report.generated_at());
        assert_eq!(
            artifact.download_url,
            format!("/api/v1/reports/download/{}", artifact.filename)
        );
        let bytes = std::fs::read(config.reports_dir.join(&artifact.filename)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn generate_report_reads_configured_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::create_dir_all(&config.data_dir).unwrap();
        std::fs::write(
            config.source_path(),
            "Producto,Cantidad,Precio\nCafé,2,3.50\n",
        )
        .unwrap();

        let artifact = generate_report(&config, &NoopDiagnostics).unwrap();
        assert_eq!(artifact.items_count, 1);
        assert_eq!(artifact.total_revenue, Decimal::new(700, 2));
    }

    #[test]
    fn generate_report_without_source_is_data_source_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let err = generate_report(&config, &NoopDiagnostics).unwrap_err();
        assert!(matches!(err, ReportError::DataSourceMissing { .. }));
        assert!(!config.reports_dir.exists());
    }
}
