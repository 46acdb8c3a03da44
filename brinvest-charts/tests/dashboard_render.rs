//! Both dashboards rendered to PNG at a low resolution.

use std::fs;
use std::path::Path;

use brinvest_charts::{render_market_dashboard, render_profile_dashboard, ChartStyle};
use brinvest_core::{compute_growth_statistics, MarketTable, MarketYearRecord, ProfileTable};

const PNG_MAGIC: &[u8] = b"\x89PNG";

fn low_res() -> ChartStyle {
    ChartStyle {
        dpi: 40,
        ..ChartStyle::default()
    }
}

fn assert_png(path: &Path) {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(PNG_MAGIC), "{} is not a PNG", path.display());
}

fn full_market_table() -> MarketTable {
    let records = (2020..=2022)
        .map(|year| {
            let step = f64::from(year - 2020);
            let mut r = MarketYearRecord::new(year, 3.0 + step, 15.0 + step, 1.5, 5.0 + step);
            r.listed_companies = Some(400 + year as i64 - 2020);
            r.fund_count = Some(20_000 + 500 * (year as i64 - 2020));
            r.gdp_trillions = Some(7.5 + step);
            r.policy_rate_pct = Some(2.0 + 5.0 * step);
            r.inflation_pct = Some(4.5 + step);
            r.unemployment_pct = Some(13.0 - step);
            r
        })
        .collect();
    MarketTable::from_records(records).unwrap()
}

#[test]
fn test_market_dashboard_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mercado.png");
    let table = full_market_table();
    let stats = compute_growth_statistics(&table).unwrap();

    render_market_dashboard(&table, &stats, Some(path.as_path()), &low_res()).unwrap();
    assert_png(&path);
}

#[test]
fn test_market_dashboard_without_indicators_uses_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mercado.png");
    let table = MarketTable::from_records(vec![
        MarketYearRecord::new(2019, 1.7, 12.0, 1.2, 5.0),
        MarketYearRecord::new(2021, 4.2, 17.0, 1.8, 6.5),
    ])
    .unwrap();
    let stats = compute_growth_statistics(&table).unwrap();

    render_market_dashboard(&table, &stats, Some(path.as_path()), &low_res()).unwrap();
    assert_png(&path);
}

#[test]
fn test_profile_dashboard_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perfil.png");
    let table = ProfileTable::from_columns(&[
        ("Estado Civil", vec![Some("Casado(A)"), Some("Solteiro(A)"), Some("Casado(A)"), None]),
        ("Genero", vec![Some("M"), Some("F"), Some("M"), None]),
        ("Profissao", vec![Some("Medico"), Some("Engenheiro"), Some("Professor"), Some("Medico")]),
        ("UF do Investidor", vec![Some("Sp"), Some("Rj"), Some("Sp"), Some("Mg")]),
        ("Idade", vec![Some("30"), Some("45"), Some("52"), Some("38")]),
    ]);

    render_profile_dashboard(Some(&table), Some(path.as_path()), &low_res()).unwrap();
    assert_png(&path);
}

#[test]
fn test_profile_dashboard_with_sparse_columns_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perfil.png");
    // one distinct age and no marital status or profession columns
    let table = ProfileTable::from_columns(&[
        ("Genero", vec![Some("M"), Some("F")]),
        ("Idade", vec![Some("40"), Some("40")]),
    ]);

    render_profile_dashboard(Some(&table), Some(path.as_path()), &low_res()).unwrap();
    assert_png(&path);
}
