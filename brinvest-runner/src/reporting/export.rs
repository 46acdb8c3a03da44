//! Report export: localized market CSV and JSON growth summary.
//!
//! The CSV report carries every market column plus the derived ones under
//! Portuguese display headers. Floating-point values are rounded to 2 decimal
//! places, counts stay integers and absent indicators are empty cells. The
//! file starts with a UTF-8 byte-order mark so spreadsheet tools pick the
//! right encoding.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use brinvest_core::{GrowthStatistics, MarketTable, MarketYear};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Report headers, in column order.
pub const REPORT_COLUMNS: [&str; 14] = [
    "Ano",
    "CPFs na B3 (milhões)",
    "Cotistas de Fundos (milhões)",
    "Volume Negociado (R$ trilhões)",
    "Patrimônio em Fundos (R$ trilhões)",
    "Empresas Listadas",
    "Número de Fundos",
    "PIB (R$ trilhões)",
    "SELIC Média (%)",
    "Inflação IPCA (%)",
    "Desemprego (%)",
    "Total de Investidores (milhões)",
    "Crescimento de Investidores (%)",
    "Patrimônio Total (R$ trilhões)",
];

/// One report line. Field renames must stay in sync with [`REPORT_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "Ano")]
    pub year: i32,
    #[serde(rename = "CPFs na B3 (milhões)")]
    pub cpfs_b3_millions: f64,
    #[serde(rename = "Cotistas de Fundos (milhões)")]
    pub fund_quota_holders_millions: f64,
    #[serde(rename = "Volume Negociado (R$ trilhões)")]
    pub traded_volume_trillions: f64,
    #[serde(rename = "Patrimônio em Fundos (R$ trilhões)")]
    pub fund_assets_trillions: f64,
    #[serde(rename = "Empresas Listadas")]
    pub listed_companies: Option<i64>,
    #[serde(rename = "Número de Fundos")]
    pub fund_count: Option<i64>,
    #[serde(rename = "PIB (R$ trilhões)")]
    pub gdp_trillions: Option<f64>,
    #[serde(rename = "SELIC Média (%)")]
    pub policy_rate_pct: Option<f64>,
    #[serde(rename = "Inflação IPCA (%)")]
    pub inflation_pct: Option<f64>,
    #[serde(rename = "Desemprego (%)")]
    pub unemployment_pct: Option<f64>,
    #[serde(rename = "Total de Investidores (milhões)")]
    pub total_investors_millions: f64,
    #[serde(rename = "Crescimento de Investidores (%)")]
    pub investor_growth_pct: Option<f64>,
    #[serde(rename = "Patrimônio Total (R$ trilhões)")]
    pub total_assets_trillions: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

impl From<&MarketYear> for ReportRow {
    fn from(row: &MarketYear) -> Self {
        let r = &row.record;
        Self {
            year: r.year,
            cpfs_b3_millions: round2(r.cpfs_b3_millions),
            fund_quota_holders_millions: round2(r.fund_quota_holders_millions),
            traded_volume_trillions: round2(r.traded_volume_trillions),
            fund_assets_trillions: round2(r.fund_assets_trillions),
            listed_companies: r.listed_companies,
            fund_count: r.fund_count,
            gdp_trillions: r.gdp_trillions.map(round2),
            policy_rate_pct: r.policy_rate_pct.map(round2),
            inflation_pct: r.inflation_pct.map(round2),
            unemployment_pct: r.unemployment_pct.map(round2),
            total_investors_millions: round2(row.total_investors_millions),
            investor_growth_pct: row.investor_growth_pct.map(round2),
            total_assets_trillions: round2(row.total_assets_trillions),
        }
    }
}

// ─── CSV report ─────────────────────────────────────────────────────

/// Write the market table as the localized CSV report.
pub fn export_report(table: &MarketTable, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create report {}", path.display()))?;
    let mut out = BufWriter::new(file);
    out.write_all(UTF8_BOM)
        .with_context(|| format!("failed to write report {}", path.display()))?;

    let mut wtr = csv::Writer::from_writer(out);
    for row in table {
        wtr.serialize(ReportRow::from(row))
            .with_context(|| format!("failed to write report row for {}", row.year()))?;
    }
    // header-only report for an empty table
    if table.is_empty() {
        wtr.write_record(REPORT_COLUMNS)?;
    }
    wtr.flush()
        .with_context(|| format!("failed to flush report {}", path.display()))?;

    info!(path = %path.display(), rows = table.len(), "market report exported");
    Ok(())
}

/// Read a report written by [`export_report`] back by its localized headers.
pub fn import_report(path: &Path) -> Result<Vec<ReportRow>> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read report {}", path.display()))?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes);

    let mut rdr = csv::Reader::from_reader(body);
    rdr.deserialize()
        .collect::<Result<Vec<ReportRow>, _>>()
        .with_context(|| format!("failed to parse report {}", path.display()))
}

// ─── JSON summary ───────────────────────────────────────────────────

/// Write the growth statistics as pretty JSON.
pub fn export_growth_summary_json(stats: &GrowthStatistics, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(stats)
        .context("failed to serialize growth statistics to JSON")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write growth summary {}", path.display()))?;
    info!(path = %path.display(), "growth summary exported");
    Ok(())
}

pub fn import_growth_summary_json(path: &Path) -> Result<GrowthStatistics> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read growth summary {}", path.display()))?;
    serde_json::from_str(&json).context("failed to deserialize growth statistics from JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use brinvest_core::{compute_growth_statistics, MarketYearRecord};

    // ─── Test helpers ────────────────────────────────────────────────

    fn sample_table() -> MarketTable {
        let mut first = MarketYearRecord::new(2017, 5.0, 10.0, 1.0, 1.0);
        first.listed_companies = Some(335);
        first.policy_rate_pct = Some(9.876);
        let mut last = MarketYearRecord::new(2024, 20.0, 30.0, 2.0, 3.0);
        last.listed_companies = Some(433);
        last.policy_rate_pct = Some(10.5);
        MarketTable::from_records(vec![first, last]).unwrap()
    }

    #[test]
    fn test_report_starts_with_bom_and_localized_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relatorio.csv");
        export_report(&sample_table(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, REPORT_COLUMNS.join(","));
    }

    #[test]
    fn test_report_values_are_rounded_and_nulls_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relatorio.csv");
        export_report(&sample_table(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let first_row: Vec<&str> = text.lines().nth(1).unwrap().split(',').collect();
        assert_eq!(first_row[0], "2017");
        assert_eq!(first_row[5], "335");
        assert_eq!(first_row[6], "");
        assert_eq!(first_row[8], "9.88");
        // first year has no prior row to grow from
        assert_eq!(first_row[12], "");
    }

    #[test]
    fn test_report_round_trips_through_localized_headers() {
        let table = sample_table();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relatorio.csv");
        export_report(&table, &path).unwrap();

        let rows = import_report(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ReportRow::from(&table.rows()[0]));
        assert_eq!(rows[1].year, 2024);
        assert_eq!(rows[1].total_investors_millions, 29.0);
        assert_eq!(rows[1].investor_growth_pct, Some(262.5));
        assert_eq!(rows[1].total_assets_trillions, 3.4);
        assert_eq!(rows[1].gdp_trillions, None);
    }

    #[test]
    fn test_empty_table_writes_header_only() {
        let table = MarketTable::from_records(Vec::new()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relatorio.csv");
        export_report(&table, &path).unwrap();

        assert!(import_report(&path).unwrap().is_empty());
    }

    #[test]
    fn test_growth_summary_json_roundtrip() {
        let stats = compute_growth_statistics(&sample_table()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumo.json");
        export_growth_summary_json(&stats, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"b3_cpfs_pct\""));
        assert_eq!(import_growth_summary_json(&path).unwrap(), stats);
    }

    #[test]
    fn test_export_into_missing_dir_fails_with_context() {
        let err = export_report(&sample_table(), Path::new("/nonexistent/dir/r.csv")).unwrap_err();
        assert!(err.to_string().contains("failed to create report"));
    }
}
