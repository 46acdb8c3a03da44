//! Chart style passed explicitly into every render call
//!
//! Dashboards are sized in inches and rasterized at `dpi`, so every font size
//! and stroke width is declared in points and converted with [`ChartStyle::px`].
//!
//! # Color Palette
//! - **Series**: one fixed color per market panel (investors, CPFs, volume, funds)
//! - **Positive / Negative**: green and red for year-over-year growth bars
//! - **Sequential**: viridis ramp for year-colored scatter points
//! - **Panels**: soft fills behind the free-text summary blocks

use plotters::prelude::*;
use plotters::style::FontStyle;
use serde::{Deserialize, Serialize};

/// Fixed colors used by the dashboards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: RGBColor,
    pub text: RGBColor,
    pub grid: RGBColor,
    pub investors: RGBColor,
    pub cpfs: RGBColor,
    pub volume: RGBColor,
    pub fund_assets: RGBColor,
    pub policy_rate: RGBColor,
    pub cpfs_secondary: RGBColor,
    pub positive: RGBColor,
    pub negative: RGBColor,
    pub fund_count: RGBColor,
    pub inflation: RGBColor,
    pub headline_fill: RGBColor,
    pub summary_fill: RGBColor,
    pub insights_fill: RGBColor,
    pub categories: [RGBColor; 4],
    pub marital_status: RGBColor,
    pub age: RGBColor,
    pub mean_marker: RGBColor,
    pub professions: RGBColor,
    pub states: RGBColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: WHITE,
            text: BLACK,
            grid: RGBColor(200, 200, 200),
            investors: RGBColor(31, 119, 180),
            cpfs: RGBColor(255, 127, 14),
            volume: RGBColor(44, 160, 44),
            fund_assets: RGBColor(214, 39, 40),
            policy_rate: RED,
            cpfs_secondary: BLUE,
            positive: RGBColor(0, 128, 0),
            negative: RED,
            fund_count: RGBColor(128, 0, 128),
            inflation: RGBColor(255, 165, 0),
            headline_fill: RGBColor(173, 216, 230),
            summary_fill: RGBColor(144, 238, 144),
            insights_fill: RGBColor(240, 240, 240),
            categories: [
                RGBColor(255, 153, 153),
                RGBColor(102, 179, 255),
                RGBColor(153, 255, 153),
                RGBColor(255, 204, 153),
            ],
            marital_status: RGBColor(135, 206, 235),
            age: RGBColor(250, 128, 114),
            mean_marker: RED,
            professions: RGBColor(60, 179, 113),
            states: RGBColor(153, 50, 204),
        }
    }
}

const VIRIDIS: [(u8, u8, u8); 5] = [
    (68, 1, 84),
    (59, 82, 139),
    (33, 145, 140),
    (94, 201, 98),
    (253, 231, 37),
];

impl Palette {
    /// Green for growth, red otherwise.
    pub fn growth_color(&self, value: f64) -> RGBColor {
        if value > 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    /// Category color, cycling through the category palette.
    pub fn category(&self, index: usize) -> RGBColor {
        self.categories[index % self.categories.len()]
    }

    /// Colors for `count` pie slices. The last slice never repeats the
    /// color of the first, which it borders.
    pub fn pie_colors(&self, count: usize) -> Vec<RGBColor> {
        let mut colors: Vec<RGBColor> = (0..count).map(|i| self.category(i)).collect();
        if count > 2 && colors[count - 1] == colors[0] {
            colors[count - 1] = self.category(1);
        }
        colors
    }

    /// Viridis color for `t` in `[0, 1]`; values outside are clamped.
    pub fn sequential(&self, t: f64) -> RGBColor {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let scaled = t * (VIRIDIS.len() - 1) as f64;
        let lo = scaled.floor() as usize;
        let hi = (lo + 1).min(VIRIDIS.len() - 1);
        let frac = scaled - lo as f64;
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        let (a, b) = (VIRIDIS[lo], VIRIDIS[hi]);
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }
}

/// Rendering configuration: resolution, fonts and palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartStyle {
    /// Raster resolution in dots per inch.
    pub dpi: u32,
    /// Font family for titles, axes and labels.
    pub font_family: String,
    /// Font family for the free-text panels.
    pub mono_family: String,
    /// Base font size in points.
    pub font_size_pt: f64,
    #[serde(skip)]
    pub palette: Palette,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            dpi: 300,
            font_family: "sans-serif".to_string(),
            mono_family: "monospace".to_string(),
            font_size_pt: 10.0,
            palette: Palette::default(),
        }
    }
}

impl ChartStyle {
    /// Points to pixels at the configured resolution.
    pub fn px(&self, pt: f64) -> f64 {
        pt * f64::from(self.dpi) / 72.0
    }

    pub fn px_u32(&self, pt: f64) -> u32 {
        self.px(pt).round().max(1.0) as u32
    }

    pub fn px_i32(&self, pt: f64) -> i32 {
        self.px(pt).round() as i32
    }

    /// Canvas size in pixels for a figure measured in inches.
    pub fn canvas(&self, width_in: f64, height_in: f64) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        ((width_in * dpi).round() as u32, (height_in * dpi).round() as u32)
    }

    /// Font scaled relative to the base size (1.0 = base).
    pub fn font(&self, scale: f64) -> FontDesc<'_> {
        (self.font_family.as_str(), self.px(self.font_size_pt * scale)).into_font()
    }

    pub fn bold(&self, scale: f64) -> FontDesc<'_> {
        (
            self.font_family.as_str(),
            self.px(self.font_size_pt * scale),
            FontStyle::Bold,
        )
            .into_font()
    }

    pub fn mono(&self, scale: f64) -> FontDesc<'_> {
        (self.mono_family.as_str(), self.px(self.font_size_pt * scale)).into_font()
    }

    /// Stroke width in pixels for a line width given in points.
    pub fn stroke(&self, pt: f64) -> u32 {
        self.px_u32(pt)
    }
}
