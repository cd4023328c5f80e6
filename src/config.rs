//! Configuration types for report generation and the HTTP service.
//!
//! All pipeline behaviour is controlled through [`ReportConfig`], built via
//! its [`ReportConfigBuilder`]. Visual constants (page geometry, fonts,
//! colors, paddings, chart geometry) are grouped in [`RenderStyle`] and passed
//! to the layout step as a value, so layout tests never depend on literals
//! buried in drawing code.

use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default name of the sales data file inside the data directory.
pub const DEFAULT_SOURCE_FILE: &str = "ventas.csv";

/// Default URL prefix under which rendered reports are downloadable.
pub const DEFAULT_DOWNLOAD_BASE: &str = "/api/v1/reports/download";

/// Configuration for parsing and rendering.
///
/// # Example
/// ```rust
/// use sales_report::ReportConfig;
///
/// let config = ReportConfig::builder()
///     .data_dir("/srv/sales/data")
///     .reports_dir("/srv/sales/reports")
///     .build()
///     .unwrap();
/// assert!(config.source_path().ends_with("ventas.csv"));
/// ```
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Directory holding the CSV source. Default: `data`.
    pub data_dir: PathBuf,

    /// Directory rendered PDFs are written to. Created on demand. Default: `reports`.
    pub reports_dir: PathBuf,

    /// File name of the CSV source inside `data_dir`. Default: `ventas.csv`.
    pub source_file: String,

    /// Prefix for download locators in [`crate::output::RenderedArtifact`].
    pub download_base: String,

    /// Visual constants for the PDF layout.
    pub style: RenderStyle,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            reports_dir: PathBuf::from("reports"),
            source_file: DEFAULT_SOURCE_FILE.to_string(),
            download_base: DEFAULT_DOWNLOAD_BASE.to_string(),
            style: RenderStyle::default(),
        }
    }
}

impl ReportConfig {
    /// Create a new builder for `ReportConfig`.
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full path of the configured CSV source.
    pub fn source_path(&self) -> PathBuf {
        self.data_dir.join(&self.source_file)
    }
}

/// Builder for [`ReportConfig`].
#[derive(Debug)]
pub struct ReportConfigBuilder {
    config: ReportConfig,
}

impl ReportConfigBuilder {
    pub fn data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn reports_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.reports_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn source_file(mut self, name: impl Into<String>) -> Self {
        self.config.source_file = name.into();
        self
    }

    pub fn download_base(mut self, base: impl Into<String>) -> Self {
        self.config.download_base = base.into();
        self
    }

    pub fn style(mut self, style: RenderStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ReportConfig, ReportError> {
        let c = &self.config;
        if c.source_file.trim().is_empty() {
            return Err(ReportError::InvalidConfig(
                "source file name must not be empty".into(),
            ));
        }
        if !c.download_base.starts_with('/') {
            return Err(ReportError::InvalidConfig(format!(
                "download base must be an absolute path, got '{}'",
                c.download_base
            )));
        }
        let s = &c.style;
        if s.page_width <= 2.0 * s.margin || s.page_height <= 2.0 * s.margin {
            return Err(ReportError::InvalidConfig(format!(
                "page {}x{} pt leaves no room inside {} pt margins",
                s.page_width, s.page_height, s.margin
            )));
        }
        Ok(self.config)
    }
}

// ── Style ────────────────────────────────────────────────────────────────

/// An RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const DARK_BLUE: Color = Color::rgb(0.0, 0.0, 0.545);
    pub const LIGHT_GREY: Color = Color::rgb(0.827, 0.827, 0.827);
    pub const BEIGE: Color = Color::rgb(0.961, 0.961, 0.863);
    pub const WHITE_SMOKE: Color = Color::rgb(0.961, 0.961, 0.961);
    pub const GREY: Color = Color::rgb(0.5, 0.5, 0.5);
}

/// Cell padding in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Visual constants of the rendered report. All lengths are PDF points (1/72 in).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Page size. Default: A4 (595.28 × 841.89).
    pub page_width: f32,
    pub page_height: f32,
    /// Margin on all four sides. Default: 1 inch.
    pub margin: f32,

    pub title_text: String,
    pub title_font_size: f32,
    pub title_color: Color,
    /// Vertical space between title and summary.
    pub title_gap: f32,
    /// Vertical space between the summary, the table and the chart.
    pub section_gap: f32,

    pub text_color: Color,
    pub grid_color: Color,
    pub grid_width: f32,

    pub summary_col_widths: [f32; 2],
    pub summary_font_size: f32,
    pub summary_background: Color,
    pub summary_padding: Padding,

    pub table_col_widths: [f32; 4],
    pub table_header_font_size: f32,
    pub table_header_background: Color,
    pub table_header_text: Color,
    pub table_body_font_size: f32,
    pub table_body_background: Color,
    pub table_padding: Padding,

    pub chart: ChartStyle,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 72.0,
            title_text: "Sales Report".to_string(),
            title_font_size: 24.0,
            title_color: Color::DARK_BLUE,
            title_gap: 20.0,
            section_gap: 30.0,
            text_color: Color::BLACK,
            grid_color: Color::BLACK,
            grid_width: 1.0,
            summary_col_widths: [144.0, 144.0],
            summary_font_size: 12.0,
            summary_background: Color::LIGHT_GREY,
            summary_padding: Padding::new(3.0, 6.0, 12.0, 6.0),
            table_col_widths: [180.0, 72.0, 72.0, 72.0],
            table_header_font_size: 12.0,
            table_header_background: Color::DARK_BLUE,
            table_header_text: Color::WHITE_SMOKE,
            table_body_font_size: 10.0,
            table_body_background: Color::BEIGE,
            table_padding: Padding::new(6.0, 6.0, 6.0, 6.0),
            chart: ChartStyle::default(),
        }
    }
}

impl RenderStyle {
    /// Width available between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }
}

/// Geometry and styling of the bar chart drawing.
///
/// The plot area sits inside a `width × height` drawing at offset
/// `(plot_x, plot_y)` from the drawing's lower-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub width: f32,
    pub height: f32,
    pub plot_x: f32,
    pub plot_y: f32,
    pub plot_width: f32,
    pub plot_height: f32,
    pub bar_color: Color,
    /// Fraction of each category slot covered by its bar.
    pub bar_fill: f32,
    pub axis_color: Color,
    pub gridline_color: Color,
    /// Number of intervals on the value axis.
    pub value_ticks: u32,
    pub axis_font_size: f32,
    pub label_font_size: f32,
    /// Rotation of category labels, degrees counter-clockwise.
    pub label_angle: f32,
    pub label_dx: f32,
    pub label_dy: f32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            plot_x: 50.0,
            plot_y: 50.0,
            plot_width: 300.0,
            plot_height: 200.0,
            bar_color: Color::DARK_BLUE,
            bar_fill: 0.6,
            axis_color: Color::BLACK,
            gridline_color: Color::LIGHT_GREY,
            value_ticks: 5,
            axis_font_size: 8.0,
            label_font_size: 8.0,
            label_angle: 45.0,
            label_dx: 8.0,
            label_dy: -2.0,
        }
    }
}

// ── Server ───────────────────────────────────────────────────────────────

/// Settings for the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to listen on. Default: `127.0.0.1:8000`.
    pub bind: SocketAddr,

    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:8000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://127.0.0.1:8000".to_string(),
            ],
        }
    }
}
