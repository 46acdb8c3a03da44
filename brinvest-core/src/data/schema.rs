//! Expected columns for the input files.

use csv::StringRecord;

/// Columns the market file must contain.
pub const MARKET_REQUIRED_COLUMNS: [&str; 5] = [
    "ano",
    "cpfs_b3_milhoes",
    "cotistas_milhoes",
    "volume_negociado_trilhoes",
    "patrimonio_fundos_trilhoes",
];

/// Economic indicator columns the market file may contain.
pub const MARKET_OPTIONAL_COLUMNS: [&str; 6] = [
    "empresas_listadas",
    "numero_fundos",
    "pib_trilhoes",
    "selic_media",
    "inflacao_ipca",
    "desemprego",
];

pub const MARITAL_STATUS_COLUMN: &str = "Estado Civil";
pub const GENDER_COLUMN: &str = "Genero";
pub const PROFESSION_COLUMN: &str = "Profissao";
pub const STATE_COLUMN: &str = "UF do Investidor";
pub const AGE_COLUMN: &str = "Idade";

/// Text columns of the profile file that get trimmed and title-cased.
pub const PROFILE_TEXT_COLUMNS: [&str; 4] = [
    MARITAL_STATUS_COLUMN,
    GENDER_COLUMN,
    PROFESSION_COLUMN,
    STATE_COLUMN,
];

/// Strip a leading byte-order mark and surrounding whitespace from a header name.
pub fn clean_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_string()
}

/// Header record with every name cleaned.
pub fn clean_headers(headers: &StringRecord) -> StringRecord {
    headers.iter().map(clean_header).collect()
}

/// Required columns absent from `headers`, in declaration order.
pub fn missing_columns(headers: &StringRecord, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| !headers.iter().any(|h| h == **name))
        .map(|name| name.to_string())
        .collect()
}
