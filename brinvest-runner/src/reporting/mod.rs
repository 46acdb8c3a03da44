//! Report artifacts written after the market analysis.

pub mod export;

pub use export::{
    export_growth_summary_json, export_report, import_growth_summary_json, import_report,
    ReportRow, REPORT_COLUMNS,
};
