//! Sales data model: [`LineItem`] and [`Report`].
//!
//! Both types are immutable once built. [`LineItem::new`] is the only way to
//! obtain a line item, so an invalid quantity or price can never reach the
//! renderer. A [`Report`] keeps an exact running revenue as items are added
//! and refuses an item that would overflow it, so
//! `total_revenue() == Σ line_total()` holds for every report.

use crate::error::InvalidItem;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// One sold product line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    name: String,
    quantity: u32,
    unit_price: Decimal,
}

impl LineItem {
    /// Validate and build a line item.
    ///
    /// The name is trimmed; it must be non-empty afterwards. The quantity must
    /// be at least 1 and the unit price must not be negative.
    pub fn new(
        name: impl AsRef<str>,
        quantity: i64,
        unit_price: Decimal,
    ) -> Result<Self, InvalidItem> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(InvalidItem::EmptyName);
        }
        if quantity < 1 {
            return Err(InvalidItem::QuantityBelowOne(quantity));
        }
        let quantity =
            u32::try_from(quantity).map_err(|_| InvalidItem::QuantityTooLarge(quantity))?;
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(InvalidItem::NegativePrice(unit_price));
        }
        if Decimal::from(quantity).checked_mul(unit_price).is_none() {
            return Err(InvalidItem::TotalOverflow {
                quantity,
                unit_price,
            });
        }

        Ok(Self {
            name: name.to_string(),
            quantity,
            unit_price,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// `quantity × unit_price`, exact.
    pub fn line_total(&self) -> Decimal {
        // Overflow was ruled out in `new`.
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// An immutable set of line items plus the moment the report was generated.
///
/// A report built by the parser always has at least one item; reports built
/// directly may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    items: Vec<LineItem>,
    revenue: Decimal,
    generated_at: NaiveDateTime,
}

impl Report {
    /// Build a report stamped with the current local time.
    ///
    /// Fails with [`InvalidItem::RevenueOverflow`] when the line totals do not
    /// sum to a representable amount.
    pub fn new(items: Vec<LineItem>) -> Result<Self, InvalidItem> {
        Self::with_timestamp(items, chrono::Local::now().naive_local())
    }

    /// Build a report with an explicit generation time.
    pub fn with_timestamp(
        items: Vec<LineItem>,
        generated_at: NaiveDateTime,
    ) -> Result<Self, InvalidItem> {
        let mut report = Self::empty_at(generated_at);
        for item in items {
            report.push(item)?;
        }
        Ok(report)
    }

    pub(crate) fn empty_at(generated_at: NaiveDateTime) -> Self {
        Self {
            items: Vec::new(),
            revenue: Decimal::ZERO,
            generated_at,
        }
    }

    /// Append an item, keeping the revenue exact. The report is unchanged on
    /// error.
    pub(crate) fn push(&mut self, item: LineItem) -> Result<(), InvalidItem> {
        let line_total = item.line_total();
        self.revenue = self
            .revenue
            .checked_add(line_total)
            .ok_or(InvalidItem::RevenueOverflow { line_total })?;
        self.items.push(item);
        Ok(())
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn generated_at(&self) -> NaiveDateTime {
        self.generated_at
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of every line total, exact.
    pub fn total_revenue(&self) -> Decimal {
        self.revenue
    }

    /// Sum of every item quantity.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Largest single-item quantity, if any.
    pub fn max_quantity(&self) -> Option<u32> {
        self.items.iter().map(LineItem::quantity).max()
    }
}
