//! Market year rows and the enriched market table.

use serde::Deserialize;
use thiserror::Error;

/// Weight applied to fund quota holders when estimating total investors.
///
/// Quota holders overlap heavily with B3 CPF registrations, so only a
/// fraction of them is counted as distinct investors.
pub const FUND_HOLDER_WEIGHT: f64 = 0.3;

/// Weight applied to traded volume when estimating total invested assets.
pub const TRADED_VOLUME_WEIGHT: f64 = 0.2;

/// One year of raw market data, as read from the market CSV.
///
/// Required columns map to plain fields; economic indicators are optional and
/// deserialize to `None` when the column is absent or the cell is unparsable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketYearRecord {
    #[serde(rename = "ano")]
    pub year: i32,
    #[serde(rename = "cpfs_b3_milhoes")]
    pub cpfs_b3_millions: f64,
    #[serde(rename = "cotistas_milhoes")]
    pub fund_quota_holders_millions: f64,
    #[serde(rename = "volume_negociado_trilhoes")]
    pub traded_volume_trillions: f64,
    #[serde(rename = "patrimonio_fundos_trilhoes")]
    pub fund_assets_trillions: f64,
    #[serde(rename = "empresas_listadas", default, deserialize_with = "csv::invalid_option")]
    pub listed_companies: Option<i64>,
    #[serde(rename = "numero_fundos", default, deserialize_with = "csv::invalid_option")]
    pub fund_count: Option<i64>,
    #[serde(rename = "pib_trilhoes", default, deserialize_with = "csv::invalid_option")]
    pub gdp_trillions: Option<f64>,
    #[serde(rename = "selic_media", default, deserialize_with = "csv::invalid_option")]
    pub policy_rate_pct: Option<f64>,
    #[serde(rename = "inflacao_ipca", default, deserialize_with = "csv::invalid_option")]
    pub inflation_pct: Option<f64>,
    #[serde(rename = "desemprego", default, deserialize_with = "csv::invalid_option")]
    pub unemployment_pct: Option<f64>,
}

impl MarketYearRecord {
    /// Record with only the required columns set.
    pub fn new(
        year: i32,
        cpfs_b3_millions: f64,
        fund_quota_holders_millions: f64,
        traded_volume_trillions: f64,
        fund_assets_trillions: f64,
    ) -> Self {
        Self {
            year,
            cpfs_b3_millions,
            fund_quota_holders_millions,
            traded_volume_trillions,
            fund_assets_trillions,
            listed_companies: None,
            fund_count: None,
            gdp_trillions: None,
            policy_rate_pct: None,
            inflation_pct: None,
            unemployment_pct: None,
        }
    }

    /// `cpfs_b3 + 0.3 * quota_holders`, in millions.
    pub fn total_investors_millions(&self) -> f64 {
        self.cpfs_b3_millions + FUND_HOLDER_WEIGHT * self.fund_quota_holders_millions
    }

    /// `0.2 * traded_volume + fund_assets`, in trillions of BRL.
    pub fn total_assets_trillions(&self) -> f64 {
        TRADED_VOLUME_WEIGHT * self.traded_volume_trillions + self.fund_assets_trillions
    }
}

/// A market year enriched with the derived columns.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketYear {
    pub record: MarketYearRecord,
    pub total_investors_millions: f64,
    /// Percent change of total investors versus the prior year. `None` on the first row.
    pub investor_growth_pct: Option<f64>,
    pub total_assets_trillions: f64,
}

impl MarketYear {
    pub fn year(&self) -> i32 {
        self.record.year
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketTableError {
    #[error("year {0} appears more than once")]
    DuplicateYear(i32),
}

/// Market rows ordered by ascending year, one row per year.
///
/// Built once from raw records; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketTable {
    rows: Vec<MarketYear>,
}

impl MarketTable {
    /// Sort records by year, reject duplicates and compute the derived columns.
    pub fn from_records(mut records: Vec<MarketYearRecord>) -> Result<Self, MarketTableError> {
        records.sort_by_key(|r| r.year);
        if let Some(pair) = records.windows(2).find(|w| w[0].year == w[1].year) {
            return Err(MarketTableError::DuplicateYear(pair[0].year));
        }

        let mut rows: Vec<MarketYear> = Vec::with_capacity(records.len());
        for record in records {
            let total_investors_millions = record.total_investors_millions();
            let investor_growth_pct = rows
                .last()
                .map(|prev| percent_change(prev.total_investors_millions, total_investors_millions));
            let total_assets_trillions = record.total_assets_trillions();
            rows.push(MarketYear {
                record,
                total_investors_millions,
                investor_growth_pct,
                total_assets_trillions,
            });
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[MarketYear] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MarketYear> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&MarketYear> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&MarketYear> {
        self.rows.last()
    }

    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().map(MarketYear::year).collect()
    }

    /// Number of distinct years. Equal to `len()` given the table invariant.
    pub fn distinct_years(&self) -> usize {
        self.rows.len()
    }

    /// `(year, value)` pairs for a column, skipping rows where it is absent.
    pub fn series<F>(&self, column: F) -> Vec<(f64, f64)>
    where
        F: Fn(&MarketYear) -> Option<f64>,
    {
        self.rows
            .iter()
            .filter_map(|row| column(row).map(|v| (f64::from(row.year()), v)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a MarketTable {
    type Item = &'a MarketYear;
    type IntoIter = std::slice::Iter<'a, MarketYear>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// `100 * (current / previous - 1)`.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    (current / previous - 1.0) * 100.0
}
