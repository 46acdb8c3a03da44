//! Shared panel building blocks: axes, ranked bars, text boxes and placeholders.

use std::ops::Range;

use anyhow::Result;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::theme::ChartStyle;

/// Placeholder shown when a panel's data is unavailable.
pub const NOT_AVAILABLE: &str = "N/D";

/// One cell of a dashboard grid.
pub type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Cartesian chart with a year x-axis and a numeric y-axis.
pub type YearChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Year axis with half a year of padding on each side.
pub fn year_axis(years: &[f64]) -> Range<f64> {
    let lo = years.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = years.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    (lo - 0.6)..(hi + 0.6)
}

/// Value axis covering `values` with 15% headroom.
///
/// With `include_zero` the axis is anchored at zero whenever all values share a sign.
pub fn value_range<I>(values: I, include_zero: bool) -> Range<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (mut lo, mut hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let span = if hi > lo { hi - lo } else { hi.abs().max(1.0) };
    let pad = span * 0.15;
    let lo = if include_zero && lo >= 0.0 { 0.0 } else { lo - pad };
    let hi = if include_zero && hi <= 0.0 { 0.0 } else { hi + pad };
    lo..hi
}

/// Text anchored at its bottom center, for value labels above points and bars.
pub fn label_above<'a>(style: &'a ChartStyle, scale: f64) -> TextStyle<'a> {
    TextStyle::from(style.font(scale)).pos(Pos::new(HPos::Center, VPos::Bottom))
}

/// Text anchored at its left middle, for labels right of horizontal bars.
pub fn label_right<'a>(style: &'a ChartStyle, scale: f64) -> TextStyle<'a> {
    TextStyle::from(style.font(scale)).pos(Pos::new(HPos::Left, VPos::Center))
}

/// Build a titled chart over years and draw its mesh.
pub fn year_chart<'a, 'b>(
    area: &'a Panel<'b>,
    title: &str,
    style: &ChartStyle,
    years: &[f64],
    y: Range<f64>,
    y_desc: &str,
) -> Result<YearChart<'a, 'b>> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, style.bold(1.2))
        .margin(style.px_u32(8.0))
        .x_label_area_size(style.px_u32(28.0))
        .y_label_area_size(style.px_u32(40.0))
        .build_cartesian_2d(year_axis(years), y)?;

    chart
        .configure_mesh()
        .x_labels(years.len().max(2))
        .x_label_formatter(&|x: &f64| format!("{:.0}", x))
        .x_desc("Ano")
        .y_desc(y_desc)
        .label_style(style.font(0.9))
        .axis_desc_style(style.font(1.0))
        .light_line_style(style.palette.grid.mix(0.3).stroke_width(1))
        .draw()?;

    Ok(chart)
}

/// Title plus a centered "N/D" for panels without data.
pub fn draw_placeholder(area: &Panel<'_>, title: &str, style: &ChartStyle) -> Result<()> {
    let (w, h) = area.dim_in_pixel();
    let title_style = TextStyle::from(style.bold(1.2)).pos(Pos::new(HPos::Center, VPos::Top));
    area.draw_text(title, &title_style, ((w / 2) as i32, style.px_i32(8.0)))?;

    let body_style = TextStyle::from(style.bold(2.0))
        .pos(Pos::new(HPos::Center, VPos::Center))
        .color(&style.palette.grid);
    area.draw_text(NOT_AVAILABLE, &body_style, ((w / 2) as i32, (h / 2) as i32))?;
    Ok(())
}

/// Monospaced lines on a soft filled box.
pub fn draw_text_panel(
    area: &Panel<'_>,
    lines: &[String],
    fill: RGBColor,
    style: &ChartStyle,
    scale: f64,
) -> Result<()> {
    let pad = style.px_i32(10.0);
    let boxed = area.margin(pad, pad, pad, pad);
    boxed.fill(&fill.mix(0.8))?;

    let font = TextStyle::from(style.mono(scale));
    let line_height = style.px(style.font_size_pt * scale * 1.6).round() as i32;
    for (i, line) in lines.iter().enumerate() {
        boxed.draw_text(line, &font, (pad, pad + i as i32 * line_height))?;
    }
    Ok(())
}

/// Horizontal bars for a ranked category list, largest at the top.
///
/// `counts` must already be ranked in descending order.
pub fn draw_ranked_bars(
    area: &Panel<'_>,
    title: &str,
    counts: &[(String, usize)],
    color: RGBColor,
    style: &ChartStyle,
    show_counts: bool,
) -> Result<()> {
    if counts.is_empty() {
        return draw_placeholder(area, title, style);
    }

    let ordered: Vec<(String, usize)> = counts.iter().rev().cloned().collect();
    let labels: Vec<String> = ordered.iter().map(|(k, _)| k.clone()).collect();
    let max = ordered.iter().map(|(_, n)| *n).max().unwrap_or(1).max(1) as f64;
    let n = ordered.len();

    let mut chart = ChartBuilder::on(area)
        .caption(title, style.bold(1.2))
        .margin(style.px_u32(8.0))
        .x_label_area_size(style.px_u32(28.0))
        .y_label_area_size(style.px_u32(110.0))
        .build_cartesian_2d(0f64..max * 1.15, (0..n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&|v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc("Quantidade")
        .label_style(style.font(0.9))
        .axis_desc_style(style.font(1.0))
        .light_line_style(style.palette.grid.mix(0.3).stroke_width(1))
        .draw()?;

    let bar_margin = style.px_u32(3.0);
    chart.draw_series(ordered.iter().enumerate().map(|(i, (_, count))| {
        let mut bar = Rectangle::new(
            [
                (0.0, SegmentValue::Exact(i)),
                (*count as f64, SegmentValue::Exact(i + 1)),
            ],
            color.filled(),
        );
        bar.set_margin(bar_margin, bar_margin, 0, 0);
        bar
    }))?;

    if show_counts {
        let label = label_right(style, 0.9);
        chart.draw_series(ordered.iter().enumerate().map(|(i, (_, count))| {
            Text::new(
                count.to_string(),
                (*count as f64 + max * 0.01, SegmentValue::CenterOf(i)),
                label.clone(),
            )
        }))?;
    }

    Ok(())
}
