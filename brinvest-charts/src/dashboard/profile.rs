//! Investor-profile dashboard: a 2×3 grid of demographic panels.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::{debug, info, warn};

use brinvest_core::data::schema::{
    AGE_COLUMN, GENDER_COLUMN, MARITAL_STATUS_COLUMN, PROFESSION_COLUMN, STATE_COLUMN,
};
use brinvest_core::domain::top_n;
use brinvest_core::ProfileTable;

use crate::panels::{draw_placeholder, draw_ranked_bars, draw_text_panel, Panel, NOT_AVAILABLE};
use crate::stats;
use crate::theme::ChartStyle;

const FIGURE_INCHES: (f64, f64) = (22.0, 12.0);
const AGE_BINS: usize = 20;
const KDE_POINTS: usize = 200;

/// Summary figures for the insights panel.
///
/// Each figure is `None` when it cannot be computed from the table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileInsights {
    pub sample_size: usize,
    pub mean_age: Option<f64>,
    pub modal_gender: Option<String>,
    pub modal_state: Option<String>,
}

impl ProfileInsights {
    pub fn from_table(table: &ProfileTable) -> Self {
        Self {
            sample_size: table.len(),
            mean_age: table
                .numeric_column(AGE_COLUMN)
                .and_then(|ages| stats::mean(&ages)),
            modal_gender: table.mode(GENDER_COLUMN),
            modal_state: table.mode(STATE_COLUMN),
        }
    }

    /// Panel text, with "N/D" for every figure that is missing.
    pub fn lines(&self) -> Vec<String> {
        let age = self
            .mean_age
            .map(|a| format!("{a:.1} anos"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let gender = self.modal_gender.as_deref().unwrap_or(NOT_AVAILABLE);
        let state = self.modal_state.as_deref().unwrap_or(NOT_AVAILABLE);

        let mut lines = vec![
            "INSIGHTS".to_string(),
            String::new(),
            format!("• Total de Investidores na Amostra: {}", self.sample_size),
            format!("• Idade Média: {age}"),
            format!("• Gênero Dominante: {gender}"),
            format!("• Estado com Mais Investidores: {state}"),
        ];
        if let (Some(mean), Some(gender), Some(state)) =
            (self.mean_age, &self.modal_gender, &self.modal_state)
        {
            lines.push(String::new());
            lines.push("O perfil predominante é de".to_string());
            lines.push(format!("investidores de {mean:.1} anos, de gênero {gender},"));
            lines.push(format!("concentrados em {state}."));
        }
        lines
    }
}

/// Render the profile dashboard to `output`.
///
/// A missing or empty table is not an error: a warning is logged and no file
/// is created.
pub fn render_profile_dashboard(
    table: Option<&ProfileTable>,
    output: Option<&Path>,
    style: &ChartStyle,
) -> Result<()> {
    let table = match table {
        Some(t) if !t.is_empty() => t,
        _ => {
            warn!("profile table missing or empty, profile dashboard skipped");
            return Ok(());
        }
    };
    let Some(path) = output else {
        info!("no output path for the profile dashboard, skipping render");
        return Ok(());
    };

    let (width, height) = style.canvas(FIGURE_INCHES.0, FIGURE_INCHES.1);
    debug!(width, height, rows = table.len(), "rendering profile dashboard");

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&style.palette.background)?;
    let body = root.titled(
        "Dashboard de Perfil dos Investidores do Tesouro Direto",
        style.bold(2.0),
    )?;
    let cells = body.split_evenly((2, 3));
    let palette = style.palette;

    draw_gender_pie(&cells[0], table, style)?;
    draw_ranked_bars(
        &cells[1],
        "Top 5 Estados Civis",
        &ranked(table, MARITAL_STATUS_COLUMN, 5),
        palette.marital_status,
        style,
        true,
    )?;
    draw_age_distribution(&cells[2], table, style)?;
    draw_ranked_bars(
        &cells[3],
        "Top 10 Profissões",
        &ranked(table, PROFESSION_COLUMN, 10),
        palette.professions,
        style,
        false,
    )?;
    draw_ranked_bars(
        &cells[4],
        "Top 10 UF dos Investidores",
        &ranked(table, STATE_COLUMN, 10),
        palette.states,
        style,
        true,
    )?;
    draw_text_panel(
        &cells[5],
        &ProfileInsights::from_table(table).lines(),
        palette.insights_fill,
        style,
        1.2,
    )?;

    root.present()
        .with_context(|| format!("failed to write profile dashboard to {}", path.display()))?;
    info!(path = %path.display(), "profile dashboard saved");
    Ok(())
}

fn ranked(table: &ProfileTable, column: &str, n: usize) -> Vec<(String, usize)> {
    table
        .value_counts(column)
        .map(|counts| top_n(counts, n))
        .unwrap_or_default()
}

fn draw_gender_pie(area: &Panel<'_>, table: &ProfileTable, style: &ChartStyle) -> Result<()> {
    let title = "Distribuição por Gênero";
    let counts = match table.value_counts(GENDER_COLUMN) {
        Some(c) if !c.is_empty() => c,
        _ => return draw_placeholder(area, title, style),
    };

    let (w, h) = area.dim_in_pixel();
    let title_style = TextStyle::from(style.bold(1.2)).pos(Pos::new(HPos::Center, VPos::Top));
    area.draw_text(title, &title_style, ((w / 2) as i32, style.px_i32(8.0)))?;

    let center = ((w / 2) as i32, (h / 2) as i32 + style.px_i32(8.0));
    let radius = f64::from(w.min(h)) * 0.32;
    let sizes: Vec<f64> = counts.iter().map(|(_, n)| *n as f64).collect();
    let colors = style.palette.pie_colors(counts.len());
    let labels: Vec<String> = counts.iter().map(|(k, _)| k.clone()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(style.font(1.0));
    pie.percentages(style.font(0.9));
    area.draw(&pie)?;
    Ok(())
}

fn draw_age_distribution(area: &Panel<'_>, table: &ProfileTable, style: &ChartStyle) -> Result<()> {
    let title = "Distribuição por Idade";
    let ages = table.numeric_column(AGE_COLUMN).unwrap_or_default();
    let bins = stats::histogram(&ages, AGE_BINS);
    let (Some(mean_age), Some(first), Some(last)) =
        (stats::mean(&ages), bins.first(), bins.last())
    else {
        return draw_placeholder(area, title, style);
    };

    let (x_lo, x_hi) = (first.start, last.end);
    let bin_width = first.width();
    let grid = stats::linspace(x_lo, x_hi, KDE_POINTS);
    // density scaled to counts so it overlays the histogram
    let scale = ages.len() as f64 * bin_width;
    let kde: Vec<(f64, f64)> = stats::gaussian_kde(&ages, &grid)
        .map(|d| grid.iter().zip(d).map(|(&x, y)| (x, y * scale)).collect())
        .unwrap_or_default();
    let y_max = bins
        .iter()
        .map(|b| b.count as f64)
        .chain(kde.iter().map(|p| p.1))
        .fold(1.0, f64::max)
        * 1.15;

    let color = style.palette.age;
    let marker = style.palette.mean_marker;
    let mut chart = ChartBuilder::on(area)
        .caption(title, style.bold(1.2))
        .margin(style.px_u32(8.0))
        .x_label_area_size(style.px_u32(28.0))
        .y_label_area_size(style.px_u32(40.0))
        .build_cartesian_2d(x_lo..x_hi, 0.0..y_max)?;
    chart
        .configure_mesh()
        .x_label_formatter(&|x: &f64| format!("{:.0}", x))
        .y_label_formatter(&|y: &f64| format!("{:.0}", y))
        .x_desc("Idade")
        .y_desc("Frequência")
        .label_style(style.font(0.9))
        .axis_desc_style(style.font(1.0))
        .light_line_style(style.palette.grid.mix(0.3).stroke_width(1))
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], color.mix(0.6).filled())
    }))?;
    if !kde.is_empty() {
        chart.draw_series(LineSeries::new(kde, color.stroke_width(style.stroke(2.0))))?;
    }

    chart.draw_series(LineSeries::new(
        vec![(mean_age, 0.0), (mean_age, y_max)],
        marker.stroke_width(style.stroke(2.0)),
    ))?;
    chart.draw_series(std::iter::once(Text::new(
        format!("Média: {mean_age:.1} anos"),
        (mean_age + (x_hi - x_lo) * 0.03, y_max * 0.9),
        style.font(1.0).color(&marker),
    )))?;
    Ok(())
}
