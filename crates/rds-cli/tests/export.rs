//! Integration tests for CSV export.

use std::fs;

use polars::prelude::{DataFrame, IntoColumn, NamedFrom, Series};

use rds_cli::export::{write_csv, write_removed};
use rds_transform::RemovedRows;

fn guests() -> DataFrame {
    DataFrame::new(vec![
        Series::new("id".into(), vec![1i64, 2]).into_column(),
        Series::new("name".into(), vec![Some("Ann"), None]).into_column(),
    ])
    .unwrap()
}

#[test]
fn writes_table_with_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("guests.csv");
    let mut df = guests();

    write_csv(&mut df, Some(&path)).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, "id,name\n1,Ann\n2,\n");
}

#[test]
fn removed_rows_are_stacked_into_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("removed.csv");
    let mut removed = RemovedRows::new();
    removed.push("name", guests());
    removed.push("name", guests());

    let rows = write_removed(&removed, &path).unwrap();

    assert_eq!(rows, 4);
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written.lines().count(), 5);
}

#[test]
fn nothing_removed_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("removed.csv");

    let rows = write_removed(&RemovedRows::new(), &path).unwrap();

    assert_eq!(rows, 0);
    assert!(!path.exists());
}

#[test]
fn unwritable_path_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");
    let mut df = guests();

    let err = write_csv(&mut df, Some(&path)).unwrap_err();
    assert!(format!("{err:#}").contains("out.csv"));
}
