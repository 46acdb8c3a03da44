//! BrInvest Charts — PNG dashboards for the market and investor-profile datasets.
//!
//! Rendering is driven by an explicit [`ChartStyle`]; nothing here touches
//! global plotting state.

pub mod dashboard;
pub mod panels;
pub mod stats;
pub mod theme;

pub use dashboard::{render_market_dashboard, render_profile_dashboard, ProfileInsights};
pub use theme::{ChartStyle, Palette};
