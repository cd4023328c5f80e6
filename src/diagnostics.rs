//! Diagnostics sink for rows the parser skips.
//!
//! The parser never fails on a single bad row; it reports the row here and
//! carries on. Passing the sink in explicitly (instead of logging to a global
//! subscriber) lets callers route row problems wherever they want, and lets
//! tests assert on exactly which rows were rejected.
//!
//! # Example
//!
//! ```rust
//! use sales_report::diagnostics::Diagnostics;
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct Collect(Mutex<Vec<String>>);
//!
//! impl Diagnostics for Collect {
//!     fn warn(&self, message: &str) {
//!         self.0.lock().unwrap().push(format!("warn: {message}"));
//!     }
//!     fn error(&self, message: &str) {
//!         self.0.lock().unwrap().push(format!("error: {message}"));
//!     }
//! }
//! ```

use crate::error::{RowError, Severity};
use tracing::{error, warn};

/// Receives one message per skipped row.
///
/// Implementations must be `Send + Sync`: the HTTP server runs parses on the
/// blocking thread pool.
pub trait Diagnostics: Send + Sync {
    /// A row was skipped for a benign reason (e.g. blank product name).
    fn warn(&self, message: &str);

    /// A row was skipped because a value was malformed or out of range.
    fn error(&self, message: &str);

    /// Route a typed row problem to [`warn`](Self::warn) or
    /// [`error`](Self::error) according to its severity.
    fn row_skipped(&self, issue: &RowError) {
        let message = issue.to_string();
        match issue.severity() {
            Severity::Warning => self.warn(&message),
            Severity::Error => self.error(&message),
        }
    }
}

/// Default sink: forwards to `tracing` at WARN / ERROR level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str) {
        warn!(target: "sales_report::parse", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "sales_report::parse", "{}", message);
    }
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}
