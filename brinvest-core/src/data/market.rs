//! Market CSV loader.

use std::path::Path;

use tracing::{debug, info};

use super::schema::{self, MARKET_OPTIONAL_COLUMNS, MARKET_REQUIRED_COLUMNS};
use super::{open_input, LoadError};
use crate::domain::{MarketTable, MarketYearRecord};

/// Load the comma-delimited market file and compute the derived columns.
///
/// A missing file is reported as [`LoadError::NotFound`] so the caller can
/// skip the market flow without aborting the run.
pub fn load_market_data(path: impl AsRef<Path>) -> Result<MarketTable, LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading market data");

    let file = open_input(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = schema::clean_headers(reader.headers().map_err(|e| LoadError::csv(path, e))?);
    let missing = schema::missing_columns(&headers, &MARKET_REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }
    let absent_optional = schema::missing_columns(&headers, &MARKET_OPTIONAL_COLUMNS);
    if !absent_optional.is_empty() {
        debug!(columns = ?absent_optional, "market file has no economic indicator columns");
    }
    reader.set_headers(headers);

    let records = reader
        .deserialize::<MarketYearRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| LoadError::csv(path, e))?;
    if records.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let table = MarketTable::from_records(records)?;
    info!(years = table.len(), "market data loaded");
    Ok(table)
}
