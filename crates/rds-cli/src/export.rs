//! CSV export of session results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};

use rds_transform::RemovedRows;

/// Write `df` as CSV to `path`, or to stdout when no path is given.
pub fn write_csv(df: &mut DataFrame, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("create output file {}", path.display()))?;
            write_to(df, file).with_context(|| format!("write {}", path.display()))
        }
        None => write_to(df, io::stdout().lock()).context("write table to stdout"),
    }
}

/// Write every removed row to `path`. Returns the number of rows written;
/// no file is created when nothing was removed.
pub fn write_removed(removed: &RemovedRows, path: &Path) -> Result<usize> {
    let Some(mut frame) = removed.to_frame().context("combine removed rows")? else {
        return Ok(0);
    };
    let rows = frame.height();
    write_csv(&mut frame, Some(path))?;
    Ok(rows)
}

fn write_to<W: Write>(df: &mut DataFrame, writer: W) -> Result<()> {
    CsvWriter::new(writer).include_header(true).finish(df)?;
    Ok(())
}
