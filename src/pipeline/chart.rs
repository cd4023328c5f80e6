//! Bar chart model: one bar per line item, value axis from 0 to 1.2 × the
//! largest quantity.
//!
//! The model is plain data so the axis range can be tested without drawing
//! anything; [`crate::pipeline::layout`] turns it into rectangles and text.

use crate::model::Report;

/// Category labels are cut to this many characters.
pub const LABEL_MAX_CHARS: usize = 15;

/// Headroom above the tallest bar.
pub const AXIS_HEADROOM: f64 = 1.2;

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: u32,
}

/// A vertical bar chart of item quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub bars: Vec<Bar>,
    pub axis_min: f64,
    pub axis_max: f64,
}

impl BarChart {
    /// Build the chart for a report, in item order.
    ///
    /// An empty report gets the range `0..1` so the axis never collapses.
    pub fn from_report(report: &Report) -> Self {
        let bars = report
            .items()
            .iter()
            .map(|item| Bar {
                label: truncate_label(item.name()),
                value: item.quantity(),
            })
            .collect();
        let axis_max = report
            .max_quantity()
            .map_or(1.0, |max| f64::from(max) * AXIS_HEADROOM);

        Self {
            bars,
            axis_min: 0.0,
            axis_max,
        }
    }

    /// Position of `value` on the value axis, `0.0` at the minimum and `1.0`
    /// at the maximum.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.axis_max - self.axis_min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.axis_min) / span).clamp(0.0, 1.0)
    }

    /// Evenly spaced tick values from minimum to maximum, both inclusive.
    pub fn ticks(&self, intervals: u32) -> Vec<f64> {
        let intervals = intervals.max(1);
        let step = (self.axis_max - self.axis_min) / f64::from(intervals);
        (0..=intervals)
            .map(|i| self.axis_min + step * f64::from(i))
            .collect()
    }
}

/// First [`LABEL_MAX_CHARS`] characters of a product name.
pub fn truncate_label(name: &str) -> String {
    name.chars().take(LABEL_MAX_CHARS).collect()
}

/// Whole numbers without decimals, everything else with one.
pub fn tick_label(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
