//! Error types for the sales-report library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ReportError`] (**fatal**): the request cannot produce a report at all
//!   (source file missing, nothing valid to report, output not writable).
//!   Returned as `Err(ReportError)` from the top-level entry points in
//!   [`crate::generate`].
//!
//! * [`RowError`] (**non-fatal**): a single CSV row was malformed and was
//!   skipped. It never reaches the caller as an `Err`; the parser hands it to
//!   the injected [`crate::diagnostics::Diagnostics`] sink and moves on to the
//!   next row.
//!
//! The fatal taxonomy is deliberately small so the HTTP layer can map it onto
//! status codes with a single `match`.

use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the sales-report library.
#[derive(Debug, Error)]
pub enum ReportError {
    // ── Parse errors ──────────────────────────────────────────────────────
    /// The sales data source does not exist. Raised before any row is read.
    #[error("Sales data file not found: '{path}'")]
    DataSourceMissing { path: PathBuf },

    /// The source was read completely but no row survived validation.
    #[error("No valid sales data found ({rows} data rows read)")]
    NoValidRows { rows: usize },

    /// I/O or decoding failure while reading the source.
    #[error("Failed to read sales data '{path}': {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    // ── Render errors ─────────────────────────────────────────────────────
    /// Composing or writing the PDF failed. No file exists under `path`.
    #[error("Failed to render report '{path}': {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: RenderCause,
    },

    // ── Artifact store errors ─────────────────────────────────────────────
    /// A requested report file does not exist (or its name is not a report name).
    #[error("Report file not found: '{filename}'")]
    ArtifactNotFound { filename: String },

    /// The reports directory could not be scanned or a report could not be read.
    #[error("Report storage error at '{path}': {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ReportError {
    /// True for failures caused by the input data rather than by this service.
    ///
    /// The HTTP layer answers these with `400 Bad Request`.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            ReportError::NoValidRows { .. } | ReportError::SourceRead { .. }
        )
    }
}

/// Underlying cause of a [`ReportError::Render`].
#[derive(Debug, Error)]
pub enum RenderCause {
    /// Creating the directory, writing the temp file or renaming it failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF object graph could not be encoded.
    #[error("PDF encoding error: {0}")]
    Pdf(#[from] lopdf::Error),
}

/// Why a [`crate::model::LineItem`] could not be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidItem {
    #[error("product name is empty")]
    EmptyName,

    #[error("quantity must be at least 1, got {0}")]
    QuantityBelowOne(i64),

    #[error("quantity {0} is too large")]
    QuantityTooLarge(i64),

    #[error("unit price must not be negative, got {0}")]
    NegativePrice(Decimal),

    #[error("line total overflows for quantity {quantity} at {unit_price}")]
    TotalOverflow { quantity: u32, unit_price: Decimal },

    /// The item is valid on its own but would push the report's revenue past
    /// the largest representable amount.
    #[error("line total {line_total} would overflow the report revenue")]
    RevenueOverflow { line_total: Decimal },
}

/// How loudly a skipped row is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A non-fatal problem with a single data row.
///
/// Rows are numbered as they appear in the file: the header is row 1, so the
/// first data row is row 2.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// Product name cell is blank or the column is absent.
    #[error("Empty product name in row {row}")]
    MissingProduct { row: usize },

    /// Quantity cell is not an integer.
    #[error("Invalid data in row {row}: quantity '{value}' is not an integer")]
    InvalidQuantity { row: usize, value: String },

    /// Price cell is not a number.
    #[error("Invalid data in row {row}: price '{value}' is not a number")]
    InvalidPrice { row: usize, value: String },

    /// Values parsed but the item failed validation.
    #[error("Invalid data in row {row}: {reason}")]
    Rejected { row: usize, reason: InvalidItem },
}

impl RowError {
    /// 1-based row number in the source file (header = 1).
    pub fn row(&self) -> usize {
        match self {
            RowError::MissingProduct { row }
            | RowError::InvalidQuantity { row, .. }
            | RowError::InvalidPrice { row, .. }
            | RowError::Rejected { row, .. } => *row,
        }
    }

    /// A missing product is a warning; every malformed value is an error.
    pub fn severity(&self) -> Severity {
        match self {
            RowError::MissingProduct { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
