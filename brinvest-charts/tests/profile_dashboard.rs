//! Profile dashboard entry conditions that must not touch the filesystem.

use brinvest_charts::{render_profile_dashboard, ChartStyle};
use brinvest_core::ProfileTable;

#[test]
fn test_missing_table_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perfil.png");

    render_profile_dashboard(None, Some(path.as_path()), &ChartStyle::default()).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_empty_table_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perfil.png");
    let table = ProfileTable::new(vec!["Genero".to_string()], Vec::new());

    render_profile_dashboard(Some(&table), Some(path.as_path()), &ChartStyle::default()).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_no_output_path_is_a_no_op() {
    let table = ProfileTable::from_columns(&[("Genero", vec![Some("M")])]);
    render_profile_dashboard(Some(&table), None, &ChartStyle::default()).unwrap();
}
