//! Text formatting for the rendered report.
//!
//! Money is formatted from the exact [`Decimal`] value; rounding to cents
//! happens here and nowhere else.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

/// Fixed prefix of every generated report file name.
pub const ARTIFACT_PREFIX: &str = "sales_report_";

/// Extension of every generated report file.
pub const ARTIFACT_EXTENSION: &str = "pdf";

/// `1234.5` → `$1,234.50`. Negative amounts render as `-$5.00`.
pub fn currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    // `{:.2}` pads to exactly two decimals; the sign is re-added in front of `$`.
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Insert `,` every three digits from the right.
pub fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `2024-03-09 14:05:07`
pub fn timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `sales_report_20240309_140507.pdf` (whole-second resolution).
pub fn artifact_filename(at: NaiveDateTime) -> String {
    format!(
        "{ARTIFACT_PREFIX}{}.{ARTIFACT_EXTENSION}",
        at.format("%Y%m%d_%H%M%S")
    )
}

/// `D:20240309140507`, the PDF date string used in the Info dictionary.
pub fn pdf_date(at: NaiveDateTime) -> String {
    at.format("D:%Y%m%d%H%M%S").to_string()
}
