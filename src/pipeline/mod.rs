//! Pipeline stages for CSV-to-PDF report generation.
//!
//! Each submodule implements exactly one step, and all of them are
//! synchronous. Only [`input`] and [`write`] touch the filesystem; the
//! stages in between are pure and testable without a temp directory.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ parse ──▶ layout ──▶ pdf ──▶ write
//! (open)    (rows)    (pages)    (bytes)  (atomic rename)
//!                       ▲
//!             format ───┤
//!             chart ────┘
//! ```
//!
//! 1. [`input`]: open the source file; a missing file is its own error
//! 2. [`parse`]: map header columns, validate rows, skip bad ones
//! 3. [`layout`]: title, summary, paginated item table, bar chart as draw ops
//! 4. [`pdf`]: encode pages with the standard Helvetica fonts
//! 5. [`write`]: persist via temp file + rename in the reports directory
//!
//! [`format`] holds currency/date/file-name formatting, and [`chart`] the
//! bar-chart model (axis range, labels).

pub mod chart;
pub mod format;
pub mod input;
pub mod layout;
pub mod parse;
pub mod pdf;
pub mod write;
