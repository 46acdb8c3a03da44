//! Composite dashboards, one PNG per dataset.

pub mod market;
pub mod profile;

pub use market::{headline_lines, render_market_dashboard, summary_lines};
pub use profile::{render_profile_dashboard, ProfileInsights};
