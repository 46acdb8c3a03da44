//! Growth statistics over the market table span and the console narrative.
//!
//! Growth is measured between the first and last year only: interior rows
//! never influence the figures. A baseline that is zero, negative or not
//! finite is rejected instead of producing an infinite or NaN percentage.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::market::percent_change;
use crate::domain::MarketTable;

/// Percentage growth of the headline metrics between the first and last year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthStatistics {
    pub first_year: i32,
    pub last_year: i32,
    /// Growth of `total_investors_millions`.
    pub total_investors_pct: f64,
    /// Growth of `cpfs_b3_millions`.
    pub b3_cpfs_pct: f64,
    /// Growth of `fund_assets_trillions`.
    pub fund_assets_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("growth needs at least two years of data, got {rows}")]
    InsufficientHistory { rows: usize },

    #[error("cannot compute {metric} growth from a baseline of {value}")]
    InvalidBaseline { metric: &'static str, value: f64 },
}

fn endpoint_growth(metric: &'static str, first: f64, last: f64) -> Result<f64, AnalysisError> {
    if !first.is_finite() || first <= 0.0 {
        return Err(AnalysisError::InvalidBaseline {
            metric,
            value: first,
        });
    }
    Ok(percent_change(first, last))
}

/// Compute first-to-last growth for total investors, B3 CPFs and fund assets.
pub fn compute_growth_statistics(table: &MarketTable) -> Result<GrowthStatistics, AnalysisError> {
    let (first, last) = match (table.first(), table.last()) {
        (Some(first), Some(last)) if table.len() >= 2 => (first, last),
        _ => return Err(AnalysisError::InsufficientHistory { rows: table.len() }),
    };

    let stats = GrowthStatistics {
        first_year: first.year(),
        last_year: last.year(),
        total_investors_pct: endpoint_growth(
            "total investors",
            first.total_investors_millions,
            last.total_investors_millions,
        )?,
        b3_cpfs_pct: endpoint_growth(
            "B3 CPF",
            first.record.cpfs_b3_millions,
            last.record.cpfs_b3_millions,
        )?,
        fund_assets_pct: endpoint_growth(
            "fund assets",
            first.record.fund_assets_trillions,
            last.record.fund_assets_trillions,
        )?,
    };

    info!(
        first_year = stats.first_year,
        last_year = stats.last_year,
        total_investors_pct = stats.total_investors_pct,
        b3_cpfs_pct = stats.b3_cpfs_pct,
        fund_assets_pct = stats.fund_assets_pct,
        "growth statistics computed"
    );
    Ok(stats)
}

impl GrowthStatistics {
    /// Console summary lines: period, investors, B3 CPFs and fund assets.
    pub fn headline(&self, table: &MarketTable) -> Vec<String> {
        let mut lines = vec![format!(
            "Período analisado: {} - {}",
            self.first_year, self.last_year
        )];
        if let Some(last) = table.last() {
            lines.push(format!(
                "Investidores em {}: {:.1} milhões (Crescimento de {:.2}%)",
                self.last_year, last.total_investors_millions, self.total_investors_pct
            ));
            lines.push(format!(
                "CPFs na B3 em {}: {:.1} milhões (Crescimento de {:.0}%)",
                self.last_year, last.record.cpfs_b3_millions, self.b3_cpfs_pct
            ));
            lines.push(format!(
                "Patrimônio em Fundos em {}: R$ {:.1} trilhões (Crescimento de {:.1}%)",
                self.last_year, last.record.fund_assets_trillions, self.fund_assets_pct
            ));
        }
        lines
    }
}

/// Fixed-template narrative of the market growth.
pub fn build_narrative(stats: &GrowthStatistics, table: &MarketTable) -> String {
    let (Some(first), Some(last)) = (table.first(), table.last()) else {
        return String::new();
    };

    format!(
        "ANÁLISE DETALHADA: REVOLUÇÃO DOS INVESTIDORES NO BRASIL\n\
         \n\
         O Brasil vive uma verdadeira revolução no mercado de investimentos. \
         Os dados de {first_year} a {last_year} mostram um crescimento extraordinário.\n\
         \n\
         PRINCIPAIS DESCOBERTAS:\n\
         \n\
         1. EXPLOSÃO DE INVESTIDORES NA BOLSA\n   \
            - Os CPFs cadastrados na B3 saltaram de {cpf_first:.1} milhão para {cpf_last:.1} milhões.\n   \
            - Crescimento de mais de {b3:.0}% em apenas {years} anos.\n\
         \n\
         2. CRESCIMENTO DO PATRIMÔNIO EM FUNDOS\n   \
            - Patrimônio em fundos cresceu de R$ {fund_first:.1} trilhões para R$ {fund_last:.1} trilhões.\n   \
            - Aumento de {fund:.1}% no período, superando o crescimento do PIB.\n\
         \n\
         3. BASE TOTAL DE INVESTIDORES\n   \
            - De {inv_first:.1} para {inv_last:.1} milhões de investidores estimados ({total:.1}% de crescimento).\n",
        first_year = stats.first_year,
        last_year = stats.last_year,
        cpf_first = first.record.cpfs_b3_millions,
        cpf_last = last.record.cpfs_b3_millions,
        b3 = stats.b3_cpfs_pct,
        years = table.distinct_years(),
        fund_first = first.record.fund_assets_trillions,
        fund_last = last.record.fund_assets_trillions,
        fund = stats.fund_assets_pct,
        inv_first = first.total_investors_millions,
        inv_last = last.total_investors_millions,
        total = stats.total_investors_pct,
    )
}
