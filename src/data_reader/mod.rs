
use anyhow::{anyhow, Context, Result};
use csv::{ReaderBuilder, Trim};
use log::*;
use ndarray::prelude::*;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

/// Cells that are read as the `NaN` null sentinel.
const MISSING: [&str; 4] = ["", "nan", "na", "null"];

fn parse_cell(cell: &str) -> Result<f64> {
    if MISSING.iter().any(|missing| cell.eq_ignore_ascii_case(missing)) {
        return Ok(f64::NAN);
    }
    f64::from_str(cell).map_err(|e| anyhow!("'{}' is not a number: {}", cell, e))
}

/// Reads a headed CSV file into a row-major matrix, one column per CSV column.
pub fn read_columns<P: AsRef<Path>>(file_path: P) -> Result<Array2<f64>> {
    let file_path = file_path.as_ref();
    let file = File::open(file_path)
        .with_context(|| format!("Could not open '{}'", file_path.display()))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(file);

    let n_columns = reader.headers()?.len();
    let mut n_rows = 0;
    let mut flat_data = vec![];
    for (row, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Could not read row {}", row + 1))?;
        for (column, cell) in record.iter().enumerate() {
            let value = parse_cell(cell)
                .with_context(|| format!("Invalid cell at row {}, column {}", row + 1, column))?;
            flat_data.push(value);
        }
        n_rows += 1;
    }

    debug!(
        "Read {} rows and {} columns from '{}'",
        n_rows,
        n_columns,
        file_path.display()
    );
    Ok(Array2::from_shape_vec((n_rows, n_columns), flat_data)?)
}
