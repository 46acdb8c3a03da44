//! BrInvest Runner — configuration, report export and pipeline orchestration.
//!
//! This crate builds on `brinvest-core` and `brinvest-charts` to provide:
//! - TOML pipeline configuration with fixed defaults
//! - Localized CSV report and JSON growth summary export
//! - The market and investor-profile flows, each failing independently

pub mod config;
pub mod pipeline;
pub mod reporting;

pub use config::{ConfigError, InputPaths, OutputPaths, PipelineConfig};
pub use pipeline::{run_market_flow, run_pipeline, run_profile_flow, FlowReport, PipelineReport};
pub use reporting::{export_growth_summary_json, export_report, import_report, ReportRow};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn test_reports_are_send_sync() {
        assert_send::<PipelineReport>();
        assert_sync::<PipelineReport>();
        assert_send::<PipelineConfig>();
        assert_sync::<PipelineConfig>();
    }
}
