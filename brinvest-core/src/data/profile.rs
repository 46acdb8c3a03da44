//! Investor-profile CSV loader.
//!
//! The profile export is semicolon-delimited and not always well formed:
//! - lines with more fields than the header are skipped with a warning
//! - short lines are padded with nulls
//! - non-UTF-8 files are decoded as Latin-1
//!
//! Recognized text columns are trimmed and title-cased. A recognized column
//! that is absent is logged and recorded, never fatal.

use std::path::Path;

use tracing::{info, warn};

use super::schema::{clean_header, PROFILE_TEXT_COLUMNS};
use super::{open_input, LoadError};
use crate::domain::ProfileTable;

/// Load and normalize the semicolon-delimited profile file.
pub fn load_profile_data(path: impl AsRef<Path>) -> Result<ProfileTable, LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading investor profile data");

    let file = open_input(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(file);

    let columns: Vec<String> = reader
        .byte_headers()
        .map_err(|e| LoadError::csv(path, e))?
        .iter()
        .map(|h| clean_header(&decode_cell(h)))
        .collect();
    info!(?columns, "profile columns found");

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (idx, result) in reader.byte_records().enumerate() {
        let line = idx + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "skipping unreadable profile line");
                skipped += 1;
                continue;
            }
        };
        if record.len() > columns.len() {
            warn!(
                line,
                expected = columns.len(),
                found = record.len(),
                "skipping malformed profile line"
            );
            skipped += 1;
            continue;
        }
        rows.push(
            record
                .iter()
                .map(|cell| Some(decode_cell(cell)).filter(|s| !s.is_empty()))
                .collect(),
        );
    }

    if rows.is_empty() {
        warn!(columns = ?columns, "profile file parsed to zero rows");
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut table = ProfileTable::new(columns, rows);
    table.set_skipped_lines(skipped);
    for column in PROFILE_TEXT_COLUMNS {
        if !table.normalize_text_column(column) {
            warn!(column, "expected profile column not found");
            table.mark_missing(column);
        }
    }

    info!(rows = table.len(), skipped, "investor profile data loaded and normalized");
    Ok(table)
}

/// UTF-8 when valid, Latin-1 otherwise.
fn decode_cell(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NOT_INFORMED;
    use std::io::Write;

    fn write_bytes(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_normalizes_text_columns() {
        let file = write_bytes(
            "Estado Civil;Genero;Profissao;UF do Investidor;Idade\n\
             casado(a); m ;ENGENHEIRO;sp;39\n\
             solteiro(a);F;medico;RJ;\n"
                .as_bytes(),
        );

        let table = load_profile_data(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.missing_columns().is_empty());
        assert_eq!(table.column("Genero").unwrap(), vec![Some("M"), Some("F")]);
        assert_eq!(
            table.column("Estado Civil").unwrap(),
            vec![Some("Casado(A)"), Some("Solteiro(A)")]
        );
        assert_eq!(table.column("UF do Investidor").unwrap(), vec![Some("Sp"), Some("Rj")]);
        assert_eq!(table.numeric_column("Idade").unwrap(), vec![39.0]);
    }

    #[test]
    fn test_missing_text_column_is_tolerated() {
        let file = write_bytes(b"Genero;Profissao;Idade\nM;Professor;50\nF;Advogado;41\n");

        let table = load_profile_data(file.path()).unwrap();
        assert!(!table.is_empty());
        assert_eq!(table.missing_columns(), ["Estado Civil", "UF do Investidor"]);
        assert_eq!(
            table.column("Profissao").unwrap(),
            vec![Some("Professor"), Some("Advogado")]
        );
    }

    #[test]
    fn test_long_lines_are_skipped_and_short_lines_padded() {
        let file = write_bytes(b"Genero;Idade\nM;30\nF;40;extra\nM\n");

        let table = load_profile_data(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.skipped_lines(), 1);
        assert_eq!(table.column("Idade").unwrap(), vec![Some("30"), None]);
        let counts = table.value_counts("Genero").unwrap();
        assert_eq!(counts, vec![("M".to_string(), 2)]);
        assert!(!counts.iter().any(|(k, _)| k == NOT_INFORMED));
    }

    #[test]
    fn test_latin1_cells_are_decoded() {
        let mut bytes = b"Profissao\n".to_vec();
        bytes.extend_from_slice(&[b'S', b'E', b'R', b'V', b'I', b'D', b'O', b'R', b' ', 0xC3, 0x0A]);
        // 0xC3 followed by a newline is invalid UTF-8; Latin-1 maps it to 'Ã'.
        let file = write_bytes(&bytes);

        let table = load_profile_data(file.path()).unwrap();
        assert_eq!(table.column("Profissao").unwrap(), vec![Some("Servidor Ã")]);
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let file = write_bytes(b"Genero;Idade\n");
        assert!(matches!(
            load_profile_data(file.path()).unwrap_err(),
            LoadError::Empty { .. }
        ));
    }

    #[test]
    fn test_all_malformed_lines_are_empty() {
        let file = write_bytes(b"Genero;Idade\nM;1;x\nF;2;y\n");
        assert!(matches!(
            load_profile_data(file.path()).unwrap_err(),
            LoadError::Empty { .. }
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        assert!(matches!(
            load_profile_data("nope/perfil.csv").unwrap_err(),
            LoadError::NotFound { .. }
        ));
    }
}
