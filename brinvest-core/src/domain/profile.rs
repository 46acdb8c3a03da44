//! Free-form investor profile table (one row per surveyed investor).

use std::collections::HashMap;

/// Bucket used for null cells when ranking categories.
pub const NOT_INFORMED: &str = "Não Informado";

/// Investor profile rows with nullable string cells.
///
/// Columns are whatever the source file declared. Recognized columns are
/// normalized by the loader; everything else is kept verbatim.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    missing_columns: Vec<String>,
    skipped_lines: usize,
}

impl ProfileTable {
    /// Build a table. Rows shorter than the header are padded with nulls,
    /// longer rows are truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self {
            columns,
            rows,
            missing_columns: Vec::new(),
            skipped_lines: 0,
        }
    }

    /// Build a table from string literals; `None` cells stay null.
    pub fn from_columns(columns: &[(&str, Vec<Option<&str>>)]) -> Self {
        let len = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let names = columns.iter().map(|(name, _)| name.to_string()).collect();
        let rows = (0..len)
            .map(|i| {
                columns
                    .iter()
                    .map(|(_, values)| values.get(i).copied().flatten().map(str::to_string))
                    .collect()
            })
            .collect();
        Self::new(names, rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Recognized columns the source file did not contain.
    pub fn missing_columns(&self) -> &[String] {
        &self.missing_columns
    }

    pub(crate) fn mark_missing(&mut self, name: &str) {
        self.missing_columns.push(name.to_string());
    }

    /// Lines dropped by the loader because they were malformed.
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub(crate) fn set_skipped_lines(&mut self, skipped: usize) {
        self.skipped_lines = skipped;
    }

    /// Cells of a column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_deref()).collect())
    }

    /// Trim and title-case every cell of a column. Cells that become empty turn null.
    ///
    /// Returns `false` when the column does not exist.
    pub fn normalize_text_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        for row in &mut self.rows {
            row[idx] = row[idx]
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(title_case);
        }
        true
    }

    /// Numeric values of a column; cells that do not parse are dropped.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<f64>> {
        let cells = self.column(name)?;
        Some(
            cells
                .into_iter()
                .flatten()
                .filter_map(|cell| cell.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .collect(),
        )
    }

    /// Category counts with nulls bucketed as [`NOT_INFORMED`].
    ///
    /// Sorted by descending count; ties keep first-appearance order.
    pub fn value_counts(&self, name: &str) -> Option<Vec<(String, usize)>> {
        let cells = self.column(name)?;
        let mut order: Vec<(String, usize)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for cell in cells {
            let key = cell.unwrap_or(NOT_INFORMED);
            match index.get(key) {
                Some(&i) => order[i].1 += 1,
                None => {
                    index.insert(key.to_string(), order.len());
                    order.push((key.to_string(), 1));
                }
            }
        }
        order.sort_by(|a, b| b.1.cmp(&a.1));
        Some(order)
    }

    /// Most frequent non-null value. Ties resolve to the lexicographically smallest value.
    pub fn mode(&self, name: &str) -> Option<String> {
        let cells = self.column(name)?;
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for cell in cells.into_iter().flatten() {
            *counts.entry(cell).or_insert(0) += 1;
        }
        counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(value, _)| value.to_string())
    }
}

/// First `n` entries of an already ranked count list.
pub fn top_n(mut counts: Vec<(String, usize)>, n: usize) -> Vec<(String, usize)> {
    counts.truncate(n);
    counts
}

/// Uppercase the first letter of every word and lowercase the rest.
///
/// A word starts after any non-alphabetic character, so `"são paulo"` becomes
/// `"São Paulo"` and `"d'avila"` becomes `"D'Avila"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}
