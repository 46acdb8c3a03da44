//! Domain types for the market and investor-profile datasets

pub mod market;
pub mod profile;

pub use market::{MarketTable, MarketTableError, MarketYear, MarketYearRecord};
pub use profile::{title_case, top_n, ProfileTable, NOT_INFORMED};
