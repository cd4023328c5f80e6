//! Page layout: turn a [`Report`] into pages of primitive draw operations.
//!
//! The layout is a pure function of the report and the [`RenderStyle`]; it
//! performs no I/O and knows nothing about PDF syntax. [`crate::pipeline::pdf`]
//! encodes the resulting [`Page`]s.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────────────────┐
//! │ Title                    │
//! │ Summary (3 rows)         │
//! │ Product | Qty | … | …    │  ← header repeated on continuation pages
//! │ …                        │
//! │ Bar chart                │  ← moved to a new page if it does not fit
//! └──────────────────────────┘
//! ```
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of
//! the page. A cursor tracks the top of the next block and moves downwards.

use crate::config::{Color, Padding, RenderStyle};
use crate::model::Report;
use crate::pipeline::chart::{tick_label, BarChart};
use crate::pipeline::format;

/// Summary row captions, in render order.
pub const SUMMARY_LABELS: [&str; 3] = ["Total Items Sold:", "Total Revenue:", "Report Generated:"];

/// Item table header.
pub const TABLE_HEADER: [&str; 4] = ["Product", "Quantity", "Unit Price", "Total"];

/// One of the two standard fonts the report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

/// A primitive drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text whose baseline starts at `(x, y)`, rotated `angle` degrees
    /// counter-clockwise.
    Text {
        x: f32,
        y: f32,
        font: Font,
        size: f32,
        color: Color,
        angle: f32,
        text: String,
    },
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
        color: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        line_width: f32,
        color: Color,
    },
}

/// One page worth of draw operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Every text run on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// The composed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub pages: Vec<Page>,
    /// The chart model the last block was drawn from.
    pub chart: BarChart,
}

/// Lay out the full report: title, summary, item table, chart.
pub fn compose(report: &Report, style: &RenderStyle) -> Layout {
    let chart = BarChart::from_report(report);
    let mut c = Composer::new(style);

    c.title(&style.title_text);
    c.gap(style.title_gap);
    c.summary(report);
    c.gap(style.section_gap);
    c.item_table(report);
    c.gap(style.section_gap);
    c.chart(&chart);

    Layout {
        pages: c.finish(),
        chart,
    }
}

// ── Text metrics ─────────────────────────────────────────────────────────

/// Approximate advance width of `text` in points.
///
/// Uses rounded Helvetica glyph classes; good enough for centering and
/// line breaking, not for kerning-exact typesetting.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: f32 = text.chars().map(glyph_units).sum();
    let weight = match font {
        Font::Regular => 1.0,
        Font::Bold => 1.06,
    };
    units * weight * size / 1000.0
}

fn glyph_units(ch: char) -> f32 {
    match ch {
        'i' | 'j' | 'l' | '\'' | '|' => 222.0,
        ' ' | '.' | ',' | ':' | ';' | '!' | 'f' | 't' | 'I' | '/' | '(' | ')' | '[' | ']' => 278.0,
        'r' | '-' => 333.0,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' => 500.0,
        'm' => 833.0,
        'w' => 722.0,
        'M' => 833.0,
        'W' => 944.0,
        'A'..='Z' => 690.0,
        _ => 556.0,
    }
}

/// Break `text` into lines no wider than `max_width`.
///
/// Lines break between words; a single word wider than `max_width` is broken
/// between characters. Always returns at least one line (possibly empty).
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };
        if text_width(&candidate, font, size) <= max_width {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        for ch in word.chars() {
            line.push(ch);
            if line.chars().count() > 1 && text_width(&line, font, size) > max_width {
                line.pop();
                lines.push(std::mem::replace(&mut line, ch.to_string()));
            }
        }
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

fn max_lines(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(1).max(1)
}

// ── Composer ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

struct CellStyle {
    font: Font,
    size: f32,
    text: Color,
    background: Color,
    padding: Padding,
    align: Align,
}

impl CellStyle {
    fn line_height(&self) -> f32 {
        self.size * 1.2
    }

    fn row_height(&self, lines: usize) -> f32 {
        self.line_height() * lines.max(1) as f32 + self.padding.top + self.padding.bottom
    }

    /// Wrap every cell to its column width.
    fn wrap(&self, widths: &[f32], cells: &[String]) -> Vec<Vec<String>> {
        widths
            .iter()
            .zip(cells)
            .map(|(&width, content)| {
                let room = width - self.padding.left - self.padding.right;
                wrap_text(content, self.font, self.size, room)
            })
            .collect()
    }
}

struct Composer<'a> {
    style: &'a RenderStyle,
    pages: Vec<Page>,
    current: Page,
    cursor: f32,
}

impl<'a> Composer<'a> {
    fn new(style: &'a RenderStyle) -> Self {
        Self {
            style,
            pages: Vec::new(),
            current: Page::default(),
            cursor: style.page_height - style.margin,
        }
    }

    fn top(&self) -> f32 {
        self.style.page_height - self.style.margin
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor - height >= self.style.margin
    }

    fn page_break(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.cursor = self.top();
    }

    /// Start a new page unless `height` fits below the cursor. A block taller
    /// than a whole page is placed on the current page anyway.
    fn reserve(&mut self, height: f32) {
        if !self.fits(height) && !self.current.ops.is_empty() {
            self.page_break();
        }
    }

    /// Vertical space; swallowed at a page boundary.
    fn gap(&mut self, height: f32) {
        if self.fits(height) {
            self.cursor -= height;
        } else {
            self.page_break();
        }
    }

    fn push(&mut self, op: DrawOp) {
        self.current.ops.push(op);
    }

    fn text(&mut self, x: f32, y: f32, font: Font, size: f32, color: Color, text: String) {
        self.push(DrawOp::Text {
            x,
            y,
            font,
            size,
            color,
            angle: 0.0,
            text,
        });
    }

    fn line(&mut self, (x1, y1): (f32, f32), (x2, y2): (f32, f32), line_width: f32, color: Color) {
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            line_width,
            color,
        });
    }

    fn finish(mut self) -> Vec<Page> {
        if !self.current.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        self.pages
    }

    // ── Blocks ───────────────────────────────────────────────────────────

    fn title(&mut self, title: &str) {
        let s = self.style;
        let height = s.title_font_size * 1.2;
        self.reserve(height);
        let baseline = self.cursor - s.title_font_size;
        self.text(
            s.margin,
            baseline,
            Font::Bold,
            s.title_font_size,
            s.title_color,
            title.to_string(),
        );
        self.cursor -= height;
    }

    fn summary(&mut self, report: &Report) {
        let s = self.style;
        let cell = CellStyle {
            font: Font::Bold,
            size: s.summary_font_size,
            text: s.text_color,
            background: s.summary_background,
            padding: s.summary_padding,
            align: Align::Left,
        };
        let values = [
            report.total_quantity().to_string(),
            format::currency(report.total_revenue()),
            format::timestamp(report.generated_at()),
        ];

        let rows: Vec<_> = SUMMARY_LABELS
            .iter()
            .zip(values)
            .map(|(label, value)| cell.wrap(&s.summary_col_widths, &[label.to_string(), value]))
            .collect();
        self.reserve(rows.iter().map(|r| cell.row_height(max_lines(r))).sum());
        for lines in rows {
            self.row(&s.summary_col_widths, lines, &cell);
        }
    }

    fn item_table(&mut self, report: &Report) {
        let s = self.style;
        let header = CellStyle {
            font: Font::Bold,
            size: s.table_header_font_size,
            text: s.table_header_text,
            background: s.table_header_background,
            padding: s.table_padding,
            align: Align::Center,
        };
        let body = CellStyle {
            font: Font::Regular,
            size: s.table_body_font_size,
            text: s.text_color,
            background: s.table_body_background,
            padding: s.table_padding,
            align: Align::Center,
        };
        let header_lines = header.wrap(&s.table_col_widths, &TABLE_HEADER.map(str::to_string));
        let header_height = header.row_height(max_lines(&header_lines));
        let rows: Vec<_> = report
            .items()
            .iter()
            .map(|item| {
                let cells = [
                    item.name().to_string(),
                    item.quantity().to_string(),
                    format::currency(item.unit_price()),
                    format::currency(item.line_total()),
                ];
                body.wrap(&s.table_col_widths, &cells)
            })
            .collect();

        let first = rows.first().map_or(0.0, |r| body.row_height(max_lines(r)));
        self.reserve(header_height + first);
        self.row(&s.table_col_widths, header_lines.clone(), &header);

        for lines in rows {
            if !self.fits(body.row_height(max_lines(&lines))) {
                self.page_break();
                self.row(&s.table_col_widths, header_lines.clone(), &header);
            }
            self.row(&s.table_col_widths, lines, &body);
        }
    }

    /// One table row of pre-wrapped cells, horizontally centered in the
    /// content area. The row is as tall as its tallest cell; shorter cells are
    /// centered vertically.
    fn row(&mut self, widths: &[f32], cells: Vec<Vec<String>>, cell: &CellStyle) {
        let s = self.style;
        let total: f32 = widths.iter().sum();
        let rows = max_lines(&cells);
        let height = cell.row_height(rows);
        let lh = cell.line_height();
        let x0 = s.margin + ((s.content_width() - total) / 2.0).max(0.0);
        let y = self.cursor - height;

        self.push(DrawOp::FillRect {
            x: x0,
            y,
            width: total,
            height,
            color: cell.background,
        });

        let mut x = x0;
        for (&width, lines) in widths.iter().zip(cells) {
            // Baseline of the last line sits one descent (~0.2 em) above the
            // bottom padding.
            let bottom = y + cell.padding.bottom + cell.size * 0.2
                + (rows - lines.len()) as f32 * lh / 2.0;
            let count = lines.len();
            for (i, content) in lines.into_iter().enumerate() {
                let tx = match cell.align {
                    Align::Left => x + cell.padding.left,
                    Align::Center => {
                        x + (width - text_width(&content, cell.font, cell.size)) / 2.0
                    }
                };
                let ty = bottom + (count - 1 - i) as f32 * lh;
                self.text(tx, ty, cell.font, cell.size, cell.text, content);
            }
            self.push(DrawOp::StrokeRect {
                x,
                y,
                width,
                height,
                line_width: s.grid_width,
                color: s.grid_color,
            });
            x += width;
        }

        self.cursor = y;
    }

    fn chart(&mut self, chart: &BarChart) {
        let style = self.style;
        let cs = &style.chart;
        self.reserve(cs.height);

        let origin_x = style.margin;
        let origin_y = self.cursor - cs.height;
        let px = origin_x + cs.plot_x;
        let py = origin_y + cs.plot_y;
        let pw = cs.plot_width;
        let ph = cs.plot_height;

        // Value axis: gridlines, ticks, labels.
        for value in chart.ticks(cs.value_ticks) {
            let ly = py + (chart.fraction(value) as f32) * ph;
            if value > chart.axis_min {
                self.line((px, ly), (px + pw, ly), 0.5, cs.gridline_color);
            }
            self.line((px - 4.0, ly), (px, ly), 1.0, cs.axis_color);
            let label = tick_label(value);
            let lw = text_width(&label, Font::Regular, cs.axis_font_size);
            self.text(
                px - 6.0 - lw,
                ly - cs.axis_font_size / 3.0,
                Font::Regular,
                cs.axis_font_size,
                cs.axis_color,
                label,
            );
        }

        // Bars and rotated category labels.
        if !chart.bars.is_empty() {
            let slot = pw / chart.bars.len() as f32;
            let bar_width = slot * cs.bar_fill;
            let (sin, cos) = cs.label_angle.to_radians().sin_cos();
            let ascent = cs.label_font_size * 0.7;

            for (i, bar) in chart.bars.iter().enumerate() {
                let slot_x = px + slot * i as f32;
                let bar_height = (chart.fraction(f64::from(bar.value)) as f32) * ph;
                if bar_height > 0.0 {
                    self.push(DrawOp::FillRect {
                        x: slot_x + (slot - bar_width) / 2.0,
                        y: py,
                        width: bar_width,
                        height: bar_height,
                        color: cs.bar_color,
                    });
                }

                // Anchor is the label's top-right corner; the text runs
                // down-left from it along the rotated baseline.
                let anchor_x = slot_x + slot / 2.0 + cs.label_dx;
                let anchor_y = py + cs.label_dy;
                let lw = text_width(&bar.label, Font::Regular, cs.label_font_size);
                self.push(DrawOp::Text {
                    x: anchor_x - lw * cos + ascent * sin,
                    y: anchor_y - lw * sin - ascent * cos,
                    font: Font::Regular,
                    size: cs.label_font_size,
                    color: cs.axis_color,
                    angle: cs.label_angle,
                    text: bar.label.clone(),
                });
            }
        }

        // Axes on top of the bars.
        self.line((px, py), (px + pw, py), 1.0, cs.axis_color);
        self.line((px, py), (px, py + ph), 1.0, cs.axis_color);

        self.cursor = origin_y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LineItem;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn report(items: &[(&str, i64, &str)]) -> Report {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        Report::with_timestamp(
            items
                .iter()
                .map(|(n, q, p)| LineItem::new(n, *q, Decimal::from_str(p).unwrap()).unwrap())
                .collect(),
            ts,
        )
        .unwrap()
    }

    /// Default style with a bar color no other block uses.
    fn chart_style() -> RenderStyle {
        let mut style = RenderStyle::default();
        style.chart.bar_color = Color::rgb(0.9, 0.1, 0.1);
        style
    }

    /// Unrotated text runs of one page (everything except chart labels).
    fn flat_texts(page: &Page) -> Vec<&str> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, angle, .. } if *angle == 0.0 => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn all_texts(layout: &Layout) -> Vec<String> {
        layout
            .pages
            .iter()
            .flat_map(|p| p.texts().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    fn position(texts: &[String], needle: &str) -> usize {
        texts
            .iter()
            .position(|t| t == needle)
            .unwrap_or_else(|| panic!("'{needle}' not in {texts:?}"))
    }

    #[test]
    fn single_item_report_fits_one_page() {
        let layout = compose(&report(&[("Widget", 3, "9.99")]), &RenderStyle::default());
        assert_eq!(layout.pages.len(), 1);
        assert_eq!(layout.chart.axis_max, 1.2 * 3.0);
    }

    #[test]
    fn sections_appear_in_order() {
        let layout = compose(
            &report(&[("Widget", 3, "9.99"), ("Gadget", 2, "1234.5")]),
            &RenderStyle::default(),
        );
        let texts = all_texts(&layout);

        let title = position(&texts, "Sales Report");
        let sold = position(&texts, "Total Items Sold:");
        let revenue = position(&texts, "Total Revenue:");
        let generated = position(&texts, "Report Generated:");
        let product = position(&texts, "Product");
        let widget = position(&texts, "Widget");
        let gadget = position(&texts, "Gadget");
        assert!(title < sold && sold < revenue && revenue < generated);
        assert!(generated < product && product < widget && widget < gadget);

        assert_eq!(texts[sold + 1], "5");
        assert_eq!(texts[revenue + 1], "$2,498.97");
        assert_eq!(texts[generated + 1], "2024-03-09 14:05:07");
        assert!(texts.contains(&"$1,234.50".to_string()));
        assert!(texts.contains(&"$2,469.00".to_string()));
    }

    #[test]
    fn table_header_is_complete() {
        let layout = compose(&report(&[("A", 1, "1")]), &RenderStyle::default());
        let texts = all_texts(&layout);
        let start = position(&texts, "Product");
        assert_eq!(
            &texts[start..start + 4],
            &["Product", "Quantity", "Unit Price", "Total"]
        );
    }

    #[test]
    fn long_tables_paginate_and_repeat_header() {
        let items: Vec<(String, i64, &str)> =
            (0..120).map(|i| (format!("Item {i}"), 1 + i, "2.00")).collect();
        let borrowed: Vec<(&str, i64, &str)> =
            items.iter().map(|(n, q, p)| (n.as_str(), *q, *p)).collect();
        let layout = compose(&report(&borrowed), &RenderStyle::default());

        assert!(layout.pages.len() >= 4, "got {} pages", layout.pages.len());
        let table_pages = layout
            .pages
            .iter()
            .filter(|p| flat_texts(p).iter().any(|t| t.starts_with("Item ")))
            .count();
        let header_pages = layout
            .pages
            .iter()
            .filter(|p| p.texts().any(|t| t == "Unit Price"))
            .count();
        assert_eq!(table_pages, header_pages);

        // Every row is present exactly once, in order.
        let rows: Vec<&str> = layout
            .pages
            .iter()
            .flat_map(flat_texts)
            .filter(|t| t.starts_with("Item "))
            .collect();
        assert_eq!(rows.len(), 120);
        assert_eq!(rows[0], "Item 0");
        assert_eq!(rows[119], "Item 119");
    }

    #[test]
    fn nothing_is_drawn_below_the_margin_on_paginated_tables() {
        let style = RenderStyle::default();
        let items: Vec<(String, i64, &str)> =
            (0..80).map(|i| (format!("P{i}"), 1, "1")).collect();
        let borrowed: Vec<(&str, i64, &str)> =
            items.iter().map(|(n, q, p)| (n.as_str(), *q, *p)).collect();
        let layout = compose(&report(&borrowed), &style);
        for page in &layout.pages {
            for op in &page.ops {
                if let DrawOp::FillRect { y, .. } | DrawOp::StrokeRect { y, .. } = op {
                    assert!(*y >= style.margin - 0.01, "op below margin: {op:?}");
                }
            }
        }
    }

    #[test]
    fn empty_report_still_has_every_section() {
        let style = chart_style();
        let layout = compose(&Report::new(Vec::new()).unwrap(), &style);
        let texts = all_texts(&layout);
        assert!(texts.contains(&"Total Items Sold:".to_string()));
        assert!(texts.contains(&"Unit Price".to_string()));
        assert!(texts.contains(&"$0.00".to_string()));
        assert_eq!(layout.chart.axis_max, 1.0);
        let bar_color = style.chart.bar_color;
        let bars = layout.pages[0]
            .ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { color, .. } if *color == bar_color))
            .count();
        assert_eq!(bars, 0);
    }

    #[test]
    fn one_bar_per_item_and_tallest_bar_below_plot_top() {
        let style = chart_style();
        let layout = compose(&report(&[("A", 4, "1"), ("B", 10, "1")]), &style);
        let bars: Vec<f32> = layout
            .pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .filter_map(|op| match op {
                DrawOp::FillRect { height, color, .. } if *color == style.chart.bar_color => {
                    Some(*height)
                }
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), 2);
        let expected = style.chart.plot_height / 1.2;
        assert!((bars[1] - expected).abs() < 0.01, "got {}", bars[1]);
        assert!(bars[0] < bars[1]);
    }

    #[test]
    fn chart_labels_are_rotated_and_truncated() {
        let layout = compose(
            &report(&[("A Very Long Product Name", 1, "1")]),
            &RenderStyle::default(),
        );
        let label = layout.pages[0].ops.iter().find_map(|op| match op {
            DrawOp::Text { angle, text, .. } if *angle != 0.0 => Some((*angle, text.clone())),
            _ => None,
        });
        assert_eq!(label, Some((45.0, "A Very Long Pro".to_string())));
    }

    #[test]
    fn wrap_text_breaks_between_words() {
        let long = "Industrial Grade Stainless Steel Fastener Assortment";
        let lines = wrap_text(long, Font::Regular, 10.0, 168.0);
        assert!(lines.len() > 1, "{lines:?}");
        assert!(lines
            .iter()
            .all(|l| text_width(l, Font::Regular, 10.0) <= 168.0));
        assert_eq!(lines.join(" "), long);
        assert_eq!(wrap_text("Bolt", Font::Regular, 10.0, 168.0), ["Bolt"]);
        assert_eq!(wrap_text("", Font::Regular, 10.0, 168.0), [""]);
    }

    #[test]
    fn wrap_text_splits_words_wider_than_the_cell() {
        let word = "W".repeat(40);
        let lines = wrap_text(&word, Font::Regular, 10.0, 60.0);
        assert!(lines.len() > 1);
        assert!(lines
            .iter()
            .all(|l| text_width(l, Font::Regular, 10.0) <= 60.0));
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn long_product_name_appears_complete_in_table() {
        let name = "Industrial Grade Stainless Steel Fastener Assortment";
        let style = RenderStyle::default();
        let layout = compose(&report(&[(name, 2, "4.50"), ("Bolt", 1, "1")]), &style);
        let texts = flat_texts(&layout.pages[0]);

        let start = texts.iter().position(|t| *t == "Total").unwrap() + 1;
        let quantity = texts[start..].iter().position(|t| *t == "2").unwrap() + start;
        assert_eq!(texts[start..quantity].join(" "), name);
        assert!(texts[start..quantity].len() > 1, "name should wrap");

        // The wrapped row is taller than the single-line row below it.
        let heights: Vec<f32> = layout.pages[0]
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { height, color, .. }
                    if *color == style.table_body_background =>
                {
                    Some(*height)
                }
                _ => None,
            })
            .collect();
        assert_eq!(heights.len(), 2, "{heights:?}");
        assert!(heights[0] > heights[1]);
    }

    #[test]
    fn bold_is_wider_than_regular() {
        assert!(text_width("Total", Font::Bold, 12.0) > text_width("Total", Font::Regular, 12.0));
        assert_eq!(text_width("", Font::Regular, 12.0), 0.0);
    }
}
