use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::error::{DataError, Result};
use super::model::{format_float, Dataset, Value};

// ---------------------------------------------------------------------------
// CSV writer
// ---------------------------------------------------------------------------

/// Write `dataset` to `path` as comma-delimited text: one header row with
/// the column names, one row per record, no index column.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| DataError::from_io(path, e))?;
    write_csv_to(dataset, file)?;
    log::debug!(
        "wrote {} rows x {} columns to {}",
        dataset.len(),
        dataset.num_columns(),
        path.display()
    );
    Ok(())
}

/// Same as [`write_csv`] but into any writer. A dataset without columns
/// writes nothing, so it reads back as a dataset without columns.
pub fn write_csv_to<W: Write>(dataset: &Dataset, out: W) -> Result<()> {
    if dataset.is_empty() {
        return Ok(());
    }
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(dataset.column_names())?;
    for row in dataset.rows() {
        writer.write_record(row.into_iter().map(csv_field))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Text of a single CSV cell. Missing values (`Null`, `NaN`) are empty.
fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Float(v) if v.is_nan() => String::new(),
        Value::Float(v) => format_float(*v),
        other => other.to_string(),
    }
}
