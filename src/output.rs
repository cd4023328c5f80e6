//! Output types: what a render returns and what the artifact listing reports.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Descriptor of a rendered report file.
///
/// Carries a download locator rather than the PDF bytes; the caller resolves
/// it through [`crate::store::resolve_artifact`] or the HTTP download route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedArtifact {
    /// Generated file name, e.g. `sales_report_20240309_140507.pdf`.
    pub filename: String,

    /// Generation timestamp of the rendered [`crate::model::Report`].
    pub generated_at: NaiveDateTime,

    /// Number of line items in the report.
    pub items_count: usize,

    /// Sum of all line totals.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,

    /// Relative URL the file can be downloaded from.
    pub download_url: String,
}

/// One entry of the artifact listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub filename: String,
    /// File size in bytes.
    pub size: u64,
    /// Creation time, or last modification time where the platform has no birth time.
    pub created_at: DateTime<Utc>,
    pub download_url: String,
}

/// Join a download base (`/api/v1/reports/download`) and a file name.
pub(crate) fn download_url(base: &str, filename: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), filename)
}
