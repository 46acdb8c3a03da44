//! BrInvest Core — domain types, loaders and growth analysis.
//!
//! This crate contains everything that does not draw or write files:
//! - Market year records and the enriched, year-ordered market table
//! - Free-form investor profile table with ranking helpers
//! - CSV loaders with typed failures for the two input files
//! - First-to-last growth statistics and the console narrative

pub mod analysis;
pub mod data;
pub mod domain;

pub use analysis::{build_narrative, compute_growth_statistics, AnalysisError, GrowthStatistics};
pub use data::{load_market_data, load_profile_data, LoadError};
pub use domain::{MarketTable, MarketYear, MarketYearRecord, ProfileTable, NOT_INFORMED};
