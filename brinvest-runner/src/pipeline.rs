//! Pipeline orchestration: the market flow and the profile flow.
//!
//! The two flows are independent. A flow whose input cannot be loaded is
//! skipped with a log line; a failing artifact is logged and recorded while
//! the remaining artifacts are still produced. Only failing to create the
//! output directory aborts the run.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use brinvest_charts::{render_market_dashboard, render_profile_dashboard};
use brinvest_core::{build_narrative, compute_growth_statistics, load_market_data, load_profile_data};

use crate::config::PipelineConfig;
use crate::reporting::{export_growth_summary_json, export_report};

const RULE_WIDTH: usize = 60;

/// Outcome of one flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowReport {
    /// Why the flow did not run, when its input could not be loaded.
    pub skipped: Option<String>,
    /// Files written by the flow.
    pub artifacts: Vec<PathBuf>,
    /// Artifacts or steps that failed, with their error chain.
    pub failures: Vec<String>,
}

impl FlowReport {
    fn skipped(reason: String) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }

    fn record(&mut self, what: &str, path: PathBuf, result: Result<()>) {
        match result {
            Ok(()) => self.artifacts.push(path),
            Err(e) => {
                let message = format!("{e:#}");
                error!(artifact = what, error = %message, "artifact not written");
                self.failures.push(format!("{what}: {message}"));
            }
        }
    }
}

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    pub market: FlowReport,
    pub profile: FlowReport,
}

impl PipelineReport {
    pub fn artifacts(&self) -> impl Iterator<Item = &PathBuf> {
        self.market.artifacts.iter().chain(&self.profile.artifacts)
    }
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Run both flows against `config`.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    println!("INICIANDO ANÁLISE DE INVESTIDORES NO BRASIL");
    println!("{}", rule());

    let dir = &config.outputs.dir;
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let market = run_market_flow(config);
    let profile = run_profile_flow(config);

    info!(
        artifacts = market.artifacts.len() + profile.artifacts.len(),
        failures = market.failures.len() + profile.failures.len(),
        "pipeline finished"
    );
    Ok(PipelineReport { market, profile })
}

/// Load market data, print the analysis and write the market artifacts.
///
/// Without usable growth statistics the dashboard, narrative and summary are
/// skipped; the CSV report of the loaded table is still written.
pub fn run_market_flow(config: &PipelineConfig) -> FlowReport {
    info!("[FLUXO 1] running market analysis");
    let table = match load_market_data(&config.inputs.market) {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "market data unavailable, flow 1 skipped");
            return FlowReport::skipped(e.to_string());
        }
    };

    let outputs = &config.outputs;
    let mut report = FlowReport::default();

    match compute_growth_statistics(&table) {
        Ok(stats) => {
            println!();
            println!("{}", rule());
            println!("ANÁLISE DO CRESCIMENTO DE INVESTIDORES NO BRASIL");
            println!("{}", rule());
            for line in stats.headline(&table) {
                println!("{line}");
            }

            let path = outputs.market_dashboard_path();
            let result =
                render_market_dashboard(&table, &stats, Some(path.as_path()), &config.style);
            report.record("market dashboard", path, result);

            println!();
            println!("{}", rule());
            println!("{}", build_narrative(&stats, &table));
            println!("{}", rule());

            if outputs.write_summary {
                let path = outputs.summary_path();
                let result = export_growth_summary_json(&stats, &path);
                report.record("growth summary", path, result);
            }
        }
        Err(e) => {
            warn!(error = %e, "growth statistics unavailable, dashboard and narrative skipped");
            report.failures.push(format!("growth statistics: {e}"));
        }
    }

    if outputs.write_report {
        let path = outputs.report_path();
        let result = export_report(&table, &path);
        report.record("market report", path, result);
    }

    report
}

/// Load the investor profile and render its dashboard.
pub fn run_profile_flow(config: &PipelineConfig) -> FlowReport {
    info!("[FLUXO 2] running investor profile analysis");
    let table = match load_profile_data(&config.inputs.profile) {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "profile data unavailable, flow 2 skipped");
            return FlowReport::skipped(e.to_string());
        }
    };
    if table.skipped_lines() > 0 {
        warn!(skipped = table.skipped_lines(), "malformed profile lines were ignored");
    }

    let mut report = FlowReport::default();
    let path = config.outputs.profile_dashboard_path();
    let result = render_profile_dashboard(Some(&table), Some(path.as_path()), &config.style);
    report.record("profile dashboard", path, result);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_splits_artifacts_and_failures() {
        let mut report = FlowReport::default();
        report.record("a", PathBuf::from("a.csv"), Ok(()));
        report.record("b", PathBuf::from("b.csv"), Err(anyhow::anyhow!("disk full")));
        assert_eq!(report.artifacts, vec![PathBuf::from("a.csv")]);
        assert_eq!(report.failures, vec!["b: disk full".to_string()]);
        assert!(!report.is_skipped());
    }

    #[test]
    fn test_missing_inputs_skip_both_flows() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.inputs.market = dir.path().join("mercado.csv");
        config.inputs.profile = dir.path().join("perfil.csv");
        config.outputs.dir = dir.path().join("saida");

        let report = run_pipeline(&config).unwrap();
        assert!(report.market.is_skipped());
        assert!(report.profile.is_skipped());
        assert_eq!(report.artifacts().count(), 0);
        assert!(config.outputs.dir.is_dir());
        assert!(!config.outputs.profile_dashboard_path().exists());
    }
}
