//! CSV parsing: header resolution and the per-row validation fold.
//!
//! ## Column synonyms
//!
//! The same report is fed by Spanish and English exports, so each field
//! accepts two header spellings ([`Field::headers`]). The header row is
//! resolved into a [`ColumnMap`] once; rows are then read by index.
//!
//! ## Continue-on-error
//!
//! Rows are folded into a [`Tally`]: a valid row is appended to the
//! report, an invalid row is handed to the [`Diagnostics`] sink and counted.
//! A row whose line total would overflow the report's running revenue is
//! skipped like any other invalid row. Only a failure of the reader itself
//! (I/O, invalid UTF-8) stops the fold.

use crate::diagnostics::Diagnostics;
use crate::error::{ReportError, RowError};
use crate::model::{LineItem, Report};
use csv::StringRecord;
use rust_decimal::Decimal;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

/// Row number of the first data row; the header is row 1.
pub const FIRST_DATA_ROW: usize = 2;

/// A canonical input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Product,
    Quantity,
    Price,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Product, Field::Quantity, Field::Price];

    /// Accepted header spellings, in order of preference.
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            Field::Product => &["Producto", "Product"],
            Field::Quantity => &["Cantidad", "Quantity"],
            Field::Price => &["Precio", "Price"],
        }
    }
}

/// Column index of each field in the source, if present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub product: Option<usize>,
    pub quantity: Option<usize>,
    pub price: Option<usize>,
}

impl ColumnMap {
    /// Resolve the header row against the synonym table.
    ///
    /// Matching is case-sensitive on the trimmed header cell. When both
    /// spellings of a field are present, the first listed one wins.
    pub fn resolve(header: &StringRecord) -> Self {
        let find = |field: Field| {
            field
                .headers()
                .iter()
                .find_map(|name| header.iter().position(|h| h.trim() == *name))
        };
        Self {
            product: find(Field::Product),
            quantity: find(Field::Quantity),
            price: find(Field::Price),
        }
    }

    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::Product => self.product,
            Field::Quantity => self.quantity,
            Field::Price => self.price,
        }
    }

    /// Validate one data row into a line item.
    ///
    /// Checks run in order: product name, quantity, price, then the item's own
    /// range rules.
    pub fn extract(&self, record: &StringRecord, row: usize) -> Result<LineItem, RowError> {
        let name = cell(record, self.product);
        if name.is_empty() {
            return Err(RowError::MissingProduct { row });
        }

        let raw_quantity = cell(record, self.quantity);
        let quantity: i64 = raw_quantity
            .parse()
            .map_err(|_| RowError::InvalidQuantity {
                row,
                value: raw_quantity.to_string(),
            })?;

        let raw_price = cell(record, self.price);
        let price = parse_price(raw_price).ok_or_else(|| RowError::InvalidPrice {
            row,
            value: raw_price.to_string(),
        })?;

        LineItem::new(name, quantity, price).map_err(|reason| RowError::Rejected { row, reason })
    }
}

/// Trimmed cell content; a missing column or a short row reads as blank.
fn cell(record: &StringRecord, index: Option<usize>) -> &str {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .unwrap_or("")
}

/// Parse a price in plain (`9.99`) or scientific (`1e3`) notation.
///
/// `Decimal` holds at most 28 decimal places; finer values such as `1e-30`
/// are rounded to 28 places.
fn parse_price(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
        .or_else(|| round_fine_scientific(raw))
}

/// Most divisions by ten before any `Decimal` mantissa rounds to zero.
const MAX_SCALE_STEPS: u64 = 60;

fn round_fine_scientific(raw: &str) -> Option<Decimal> {
    let (mantissa, exponent) = raw.split_once(|c: char| c == 'e' || c == 'E')?;
    let exponent: i64 = exponent.parse().ok()?;
    if exponent >= 0 {
        return None;
    }
    let mut value = Decimal::from_str(mantissa).ok()?;
    for _ in 0..exponent.unsigned_abs().min(MAX_SCALE_STEPS) {
        value = value.checked_div(Decimal::TEN)?;
    }
    Some(value.round_dp(28))
}

/// Result of folding every data row.
#[derive(Debug)]
pub struct Tally {
    pub report: Report,
    /// Data rows read, valid or not.
    pub rows: usize,
    pub skipped: usize,
}

impl Tally {
    fn new() -> Self {
        Self {
            report: Report::empty_at(chrono::Local::now().naive_local()),
            rows: 0,
            skipped: 0,
        }
    }
}

/// Fold all data rows of a CSV stream.
///
/// Returns `Err` only when the reader itself fails.
pub fn fold_rows<R: Read>(reader: R, diagnostics: &dyn Diagnostics) -> Result<Tally, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::resolve(rdr.headers()?);
    for field in Field::ALL {
        if columns.get(field).is_none() {
            warn!(
                "Header has no {:?} column (accepted: {})",
                field,
                field.headers().join(", ")
            );
        }
    }
    debug!("Resolved columns: {:?}", columns);

    rdr.records()
        .enumerate()
        .try_fold(Tally::new(), |mut tally, (idx, record)| {
            let record = record?;
            let row = idx + FIRST_DATA_ROW;
            tally.rows += 1;
            let added = columns.extract(&record, row).and_then(|item| {
                tally
                    .report
                    .push(item)
                    .map_err(|reason| RowError::Rejected { row, reason })
            });
            if let Err(issue) = added {
                diagnostics.row_skipped(&issue);
                tally.skipped += 1;
            }
            Ok::<_, csv::Error>(tally)
        })
}

/// Parse a CSV stream into a [`Report`].
///
/// `origin` names the stream in error messages.
///
/// # Errors
/// - [`ReportError::SourceRead`]: the stream failed or is not valid UTF-8
/// - [`ReportError::NoValidRows`]: no row survived validation
pub fn parse_reader<R: Read>(
    reader: R,
    origin: &Path,
    diagnostics: &dyn Diagnostics,
) -> Result<Report, ReportError> {
    let tally = fold_rows(reader, diagnostics).map_err(|source| ReportError::SourceRead {
        path: origin.to_path_buf(),
        source,
    })?;

    if tally.report.is_empty() {
        return Err(ReportError::NoValidRows { rows: tally.rows });
    }

    info!(
        "Parsed {} items from {} ({} rows skipped)",
        tally.report.items().len(),
        origin.display(),
        tally.skipped
    );
    Ok(tally.report)
}
