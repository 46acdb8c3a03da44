//! Market dashboard: a 3×4 grid of growth, volume, asset and macro panels.
//!
//! Row 1: total investors, B3 CPFs, traded volume, fund assets.
//! Row 2: SELIC vs CPFs, GDP vs total assets, annual growth, fund count.
//! Row 3: IPCA vs SELIC, headline text (two cells), data summary.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;
use tracing::{debug, info};

use brinvest_core::{GrowthStatistics, MarketTable};

use crate::panels::{
    draw_placeholder, draw_text_panel, label_above, value_range, year_axis, year_chart, Panel,
    NOT_AVAILABLE,
};
use crate::theme::ChartStyle;

const FIGURE_INCHES: (f64, f64) = (22.0, 16.0);

/// Half the width of a single bar, in years.
const BAR_HALF_WIDTH: f64 = 0.3;

/// Width of each bar in a grouped pair, in years.
const GROUPED_BAR_WIDTH: f64 = 0.35;

/// Render the market dashboard to `output`.
///
/// Without an output path nothing is drawn: there is no interactive surface.
pub fn render_market_dashboard(
    table: &MarketTable,
    stats: &GrowthStatistics,
    output: Option<&Path>,
    style: &ChartStyle,
) -> Result<()> {
    let Some(path) = output else {
        info!("no output path for the market dashboard, skipping render");
        return Ok(());
    };

    let (width, height) = style.canvas(FIGURE_INCHES.0, FIGURE_INCHES.1);
    debug!(width, height, dpi = style.dpi, "rendering market dashboard");

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&style.palette.background)?;
    let title = format!(
        "CRESCIMENTO DOS INVESTIMENTOS NO BRASIL ({}-{})",
        stats.first_year, stats.last_year
    );
    let body = root.titled(&title, style.bold(1.8))?;

    let rows = body.split_evenly((3, 1));
    let top = rows[0].split_evenly((1, 4));
    let middle = rows[1].split_evenly((1, 4));
    let (row_width, _) = rows[2].dim_in_pixel();
    let quarter = (row_width / 4) as i32;
    let (bottom_left, rest) = rows[2].split_horizontally(quarter);
    let (headline_area, summary_area) = rest.split_horizontally(quarter * 2);

    draw_total_investors(&top[0], table, style)?;
    draw_b3_cpfs(&top[1], table, style)?;
    draw_traded_volume(&top[2], table, style)?;
    draw_fund_assets(&top[3], table, style)?;

    draw_rate_vs_cpfs(&middle[0], table, style)?;
    draw_gdp_vs_assets(&middle[1], table, style)?;
    draw_annual_growth(&middle[2], table, style)?;
    draw_fund_count(&middle[3], table, style)?;

    draw_inflation_vs_rate(&bottom_left, table, style)?;
    draw_text_panel(
        &headline_area,
        &headline_lines(table, stats),
        style.palette.headline_fill,
        style,
        1.1,
    )?;
    draw_text_panel(
        &summary_area,
        &summary_lines(stats),
        style.palette.summary_fill,
        style,
        1.0,
    )?;

    root.present()
        .with_context(|| format!("failed to write market dashboard to {}", path.display()))?;
    info!(path = %path.display(), "market dashboard saved");
    Ok(())
}

/// Text of the two-cell headline panel.
pub fn headline_lines(table: &MarketTable, stats: &GrowthStatistics) -> Vec<String> {
    let last = table.last();
    let investors = last
        .map(|r| format!("{:.1}", r.total_investors_millions))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let assets = last
        .map(|r| format!("{:.1}", r.total_assets_trillions))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let companies = last
        .and_then(|r| r.record.listed_companies)
        .map(|n| n.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    vec![
        "INVESTIMENTOS NO BRASIL EM NÚMEROS".to_string(),
        String::new(),
        format!("• Crescimento de {:.0}% em investidores", stats.total_investors_pct),
        format!("• {investors} milhões de brasileiros investindo"),
        format!("• R$ {assets} trilhões em patrimônio total"),
        format!("• {companies} empresas listadas na B3"),
    ]
}

/// Text of the summary panel.
pub fn summary_lines(stats: &GrowthStatistics) -> Vec<String> {
    vec![
        "RESUMO DOS DADOS".to_string(),
        String::new(),
        "CRESCIMENTO EXPLOSIVO:".to_string(),
        format!("CPFs na B3: {:.0}%", stats.b3_cpfs_pct),
        format!("Patrimônio: {:.0}%", stats.fund_assets_pct),
    ]
}

fn years_of(points: &[(f64, f64)]) -> Vec<f64> {
    points.iter().map(|p| p.0).collect()
}

fn draw_total_investors(area: &Panel<'_>, table: &MarketTable, style: &ChartStyle) -> Result<()> {
    let color = style.palette.investors;
    let points = table.series(|r| Some(r.total_investors_millions));
    let y = value_range(points.iter().map(|p| p.1), true);
    let mut chart = year_chart(
        area,
        "Evolução Total de Investidores",
        style,
        &years_of(&points),
        y,
        "Investidores (milhões)",
    )?;

    chart.draw_series(
        AreaSeries::new(points.iter().copied(), 0.0, color.mix(0.3).filled())
            .border_style(color.stroke_width(style.stroke(3.0))),
    )?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, style.px_u32(4.0), color.filled())),
    )?;

    let label = label_above(style, 0.9);
    let offset = style.px_i32(6.0);
    chart.draw_series(points.iter().map(|&(x, y)| {
        EmptyElement::at((x, y)) + Text::new(format!("{y:.1}M"), (0, -offset), label.clone())
    }))?;
    Ok(())
}

fn draw_b3_cpfs(area: &Panel<'_>, table: &MarketTable, style: &ChartStyle) -> Result<()> {
    let color = style.palette.cpfs;
    let points = table.series(|r| Some(r.record.cpfs_b3_millions));
    let y = value_range(points.iter().map(|p| p.1), true);
    let mut chart = year_chart(
        area,
        "CPFs Cadastrados na B3",
        style,
        &years_of(&points),
        y,
        "CPFs (milhões)",
    )?;

    chart.draw_series(points.iter().map(|&(x, y)| {
        Rectangle::new(
            [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, y)],
            color.mix(0.8).filled(),
        )
    }))?;

    let label = label_above(style, 0.9);
    let offset = style.px_i32(2.0);
    chart.draw_series(points.iter().map(|&(x, y)| {
        EmptyElement::at((x, y)) + Text::new(format!("{y:.1}M"), (0, -offset), label.clone())
    }))?;
    Ok(())
}

fn draw_traded_volume(area: &Panel<'_>, table: &MarketTable, style: &ChartStyle) -> Result<()> {
    let color = style.palette.volume;
    let points = table.series(|r| Some(r.record.traded_volume_trillions));
    let y = value_range(points.iter().map(|p| p.1), false);
    let mut chart = year_chart(
        area,
        "Volume Negociado na B3",
        style,
        &years_of(&points),
        y,
        "Volume (R$ trilhões)",
    )?;

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        color.stroke_width(style.stroke(3.0)),
    ))?;
    let s = style.px_i32(4.0);
    chart.draw_series(
        points
            .iter()
            .map(|&p| EmptyElement::at(p) + Rectangle::new([(-s, -s), (s, s)], color.filled())),
    )?;
    Ok(())
}

fn draw_fund_assets(area: &Panel<'_>, table: &MarketTable, style: &ChartStyle) -> Result<()> {
    let color = style.palette.fund_assets;
    let points = table.series(|r| Some(r.record.fund_assets_trillions));
    let y = value_range(points.iter().map(|p| p.1), true);
    let mut chart = year_chart(
        area,
        "Patrimônio em Fundos de Investimento",
        style,
        &years_of(&points),
        y,
        "Patrimônio (R$ trilhões)",
    )?;

    chart.draw_series(
        AreaSeries::new(points.iter().copied(), 0.0, color.mix(0.7).filled())
            .border_style(color.stroke_width(style.stroke(2.0))),
    )?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, style.px_u32(3.0), color.filled())),
    )?;
    Ok(())
}

fn draw_rate_vs_cpfs(area: &Panel<'_>, table: &MarketTable, style: &ChartStyle) -> Result<()> {
    let title = "SELIC vs Investidores na Bolsa";
    let rates = table.series(|r| r.record.policy_rate_pct);
    if rates.is_empty() {
        return draw_placeholder(area, title, style);
    }
    let cpfs = table.series(|r| Some(r.record.cpfs_b3_millions));
    let years = years_of(&cpfs);
    let (rate_color, cpf_color) = (style.palette.policy_rate, style.palette.cpfs_secondary);
    let line = style.stroke(2.0);
    let key = style.px_i32(14.0);

    let mut chart = ChartBuilder::on(area)
        .caption(title, style.bold(1.2))
        .margin(style.px_u32(8.0))
        .x_label_area_size(style.px_u32(28.0))
        .y_label_area_size(style.px_u32(40.0))
        .right_y_label_area_size(style.px_u32(40.0))
        .build_cartesian_2d(year_axis(&years), value_range(rates.iter().map(|p| p.1), true))?
        .set_secondary_coord(year_axis(&years), value_range(cpfs.iter().map(|p| p.1), true));

    chart
        .configure_mesh()
        .x_labels(years.len().max(2))
        .x_label_formatter(&|x: &f64| format!("{:.0}", x))
        .x_desc("Ano")
        .y_desc("Taxa SELIC (%)")
        .label_style(style.font(0.9))
        .axis_desc_style(style.font(1.0).color(&rate_color))
        .light_line_style(style.palette.grid.mix(0.3).stroke_width(1))
        .draw()?;
    chart
        .configure_secondary_axes()
        .y_desc("CPFs na B3 (milhões)")
        .label_style(style.font(0.9))
        .axis_desc_style(style.font(1.0).color(&cpf_color))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            rates.iter().copied(),
            rate_color.stroke_width(line),
        ))?
        .label("SELIC (%)")
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + key, y)], rate_color.stroke_width(line))
        });
    chart.draw_series(
        rates
            .iter()
            .map(|&p| Circle::new(p, style.px_u32(3.0), rate_color.filled())),
    )?;

    chart
        .draw_secondary_series(LineSeries::new(
            cpfs.iter().copied(),
            cpf_color.stroke_width(line),
        ))?
        .label("CPFs B3 (milhões)")
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + key, y)], cpf_color.stroke_width(line))
        });
    let s = style.px_i32(3.0);
    chart.draw_secondary_series(
        cpfs.iter()
            .map(|&p| EmptyElement::at(p) + Rectangle::new([(-s, -s), (s, s)], cpf_color.filled())),
    )?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(style.palette.background.mix(0.8).filled())
        .border_style(style.palette.text.stroke_width(1))
        .label_font(style.font(0.9))
        .draw()?;
    Ok(())
}

fn draw_gdp_vs_assets(area: &Panel<'_>, table: &MarketTable, style: &ChartStyle) -> Result<()> {
    let title = "PIB vs Patrimônio de Investimentos";
    let points: Vec<(i32, f64, f64)> = table
        .iter()
        .filter_map(|r| {
            r.record
                .gdp_trillions
                .map(|gdp| (r.year(), gdp, r.total_assets_trillions))
        })
        .collect();
    if points.is_empty() {
        return draw_placeholder(area, title, style);
    }

    let first_year = points.iter().map(|p| p.0).min().unwrap_or_default();
    let last_year = points.iter().map(|p| p.0).max().unwrap_or_default();
    let span = f64::from((last_year - first_year).max(1));
    let shade = |year: i32| style.palette.sequential(f64::from(year - first_year) / span);

    let mut chart = ChartBuilder::on(area)
        .caption(title, style.bold(1.2))
        .margin(style.px_u32(8.0))
        .x_label_area_size(style.px_u32(28.0))
        .y_label_area_size(style.px_u32(40.0))
        .build_cartesian_2d(
            value_range(points.iter().map(|p| p.1), false),
            value_range(points.iter().map(|p| p.2), false),
        )?;
    chart
        .configure_mesh()
        .x_label_formatter(&|x: &f64| format!("{:.1}", x))
        .x_desc("PIB (R$ trilhões)")
        .y_desc("Patrimônio Total (R$ trilhões)")
        .label_style(style.font(0.9))
        .axis_desc_style(style.font(1.0))
        .light_line_style(style.palette.grid.mix(0.3).stroke_width(1))
        .draw()?;

    chart.draw_series(points.iter().map(|&(year, gdp, assets)| {
        Circle::new((gdp, assets), style.px_u32(6.0), shade(year).mix(0.8).filled())
    }))?;

    let label = TextStyle::from(style.font(0.8));
    let offset = style.px_i32(5.0);
    chart.draw_series(points.iter().map(|&(year, gdp, assets)| {
        EmptyElement::at((gdp, assets))
            + Text::new(year.to_string(), (offset, -2 * offset), label.clone())
    }))?;
    Ok(())
}

fn draw_annual_growth(area: &Panel<'_>, table: &MarketTable, style: &ChartStyle) -> Result<()> {
    let title = "Taxa de Crescimento Anual";
    let points = table.series(|r| r.investor_growth_pct);
    if points.is_empty() {
        return draw_placeholder(area, title, style);
    }
    let y = value_range(points.iter().map(|p| p.1), true);
    let x = year_axis(&years_of(&points));
    let mut chart = year_chart(area, title, style, &years_of(&points), y, "Crescimento (%)")?;

    chart.draw_series(points.iter().map(|&(year, growth)| {
        Rectangle::new(
            [(year - BAR_HALF_WIDTH, 0.0), (year + BAR_HALF_WIDTH, growth)],
            style.palette.growth_color(growth).mix(0.8).filled(),
        )
    }))?;
    chart.draw_series(LineSeries::new(
        vec![(x.start, 0.0), (x.end, 0.0)],
        style.palette.text.mix(0.5).stroke_width(style.stroke(1.0)),
    ))?;
    Ok(())
}

fn draw_fund_count(area: &Panel<'_>, table: &MarketTable, style: &ChartStyle) -> Result<()> {
    let title = "Fundos de Investimento Disponíveis";
    let points = table.series(|r| r.record.fund_count.map(|n| n as f64 / 1000.0));
    if points.is_empty() {
        return draw_placeholder(area, title, style);
    }
    let color = style.palette.fund_count;
    let y = value_range(points.iter().map(|p| p.1), true);
    let mut chart = year_chart(
        area,
        title,
        style,
        &years_of(&points),
        y,
        "Número de Fundos (milhares)",
    )?;

    chart.draw_series(points.iter().map(|&(x, y)| {
        Rectangle::new(
            [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, y)],
            color.mix(0.7).filled(),
        )
    }))?;
    Ok(())
}

fn draw_inflation_vs_rate(area: &Panel<'_>, table: &MarketTable, style: &ChartStyle) -> Result<()> {
    let title = "Inflação vs Taxa SELIC";
    let inflation = table.series(|r| r.record.inflation_pct);
    let rates = table.series(|r| r.record.policy_rate_pct);
    if inflation.is_empty() && rates.is_empty() {
        return draw_placeholder(area, title, style);
    }

    let (inflation_color, rate_color) = (style.palette.inflation, style.palette.cpfs_secondary);
    let years: Vec<f64> = table.years().into_iter().map(f64::from).collect();
    let y = value_range(inflation.iter().chain(rates.iter()).map(|p| p.1), true);
    let mut chart = year_chart(area, title, style, &years, y, "Taxa (%)")?;
    let key = style.px_i32(5.0);

    chart
        .draw_series(inflation.iter().map(|&(x, v)| {
            Rectangle::new(
                [(x - GROUPED_BAR_WIDTH, 0.0), (x, v)],
                inflation_color.mix(0.8).filled(),
            )
        }))?
        .label("Inflação (IPCA)")
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - key), (x + 2 * key, y + key)], inflation_color.filled())
        });
    chart
        .draw_series(rates.iter().map(|&(x, v)| {
            Rectangle::new(
                [(x, 0.0), (x + GROUPED_BAR_WIDTH, v)],
                rate_color.mix(0.8).filled(),
            )
        }))?
        .label("SELIC")
        .legend(move |(x, y)| {
            Rectangle::new([(x, y - key), (x + 2 * key, y + key)], rate_color.filled())
        });

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(style.palette.background.mix(0.8).filled())
        .border_style(style.palette.text.stroke_width(1))
        .label_font(style.font(0.9))
        .draw()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brinvest_core::{compute_growth_statistics, MarketYearRecord};

    fn table() -> MarketTable {
        let mut last = MarketYearRecord::new(2024, 20.0, 30.0, 2.0, 3.0);
        last.listed_companies = Some(433);
        MarketTable::from_records(vec![MarketYearRecord::new(2017, 5.0, 10.0, 1.0, 1.0), last])
            .unwrap()
    }

    #[test]
    fn test_headline_lines() {
        let table = table();
        let stats = compute_growth_statistics(&table).unwrap();
        let lines = headline_lines(&table, &stats);
        assert_eq!(lines[0], "INVESTIMENTOS NO BRASIL EM NÚMEROS");
        assert!(lines[2].starts_with("• Crescimento de 26"));
        assert!(lines[2].ends_with("% em investidores"));
        assert_eq!(lines[3], "• 29.0 milhões de brasileiros investindo");
        assert_eq!(lines[4], "• R$ 3.4 trilhões em patrimônio total");
        assert_eq!(lines[5], "• 433 empresas listadas na B3");
    }

    #[test]
    fn test_headline_without_listed_companies() {
        let table = MarketTable::from_records(vec![
            MarketYearRecord::new(2017, 5.0, 10.0, 1.0, 1.0),
            MarketYearRecord::new(2024, 20.0, 30.0, 2.0, 3.0),
        ])
        .unwrap();
        let stats = compute_growth_statistics(&table).unwrap();
        let lines = headline_lines(&table, &stats);
        assert_eq!(lines[5], "• N/D empresas listadas na B3");
    }

    #[test]
    fn test_summary_lines() {
        let table = table();
        let stats = compute_growth_statistics(&table).unwrap();
        let lines = summary_lines(&stats);
        assert_eq!(lines[3], "CPFs na B3: 300%");
        assert_eq!(lines[4], "Patrimônio: 200%");
    }

    #[test]
    fn test_no_output_path_is_a_no_op() {
        let table = table();
        let stats = compute_growth_statistics(&table).unwrap();
        render_market_dashboard(&table, &stats, None, &ChartStyle::default()).unwrap();
    }
}
