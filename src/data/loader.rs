use std::path::Path;

use anyhow::{bail, Context, Result};

use super::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Read a CSV file written by [`write_csv`](super::writer::write_csv) back
/// into a dataset.
///
/// Layout: header row with column names, then one record per row. Columns
/// keep header order and every field is kept as a string. An empty file
/// yields a dataset without columns.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) {
            bail!("duplicate column '{name}' in {}", path.display());
        }
    }

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, field) in record.iter().enumerate() {
            columns[col_idx].push(Value::String(field.to_string()));
        }
    }

    Dataset::from_columns(headers.into_iter().zip(columns))
        .with_context(|| format!("building dataset from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn fields_stay_strings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "A\n1\n2.0\n").unwrap();

        let ds = load_csv(&path).unwrap();
        assert_eq!(ds.column("A").unwrap(), &[Value::from("1"), Value::from("2.0")]);
    }

    #[test]
    fn columns_keep_header_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "B,A,C\n1,2,3\n").unwrap();

        let ds = load_csv(&path).unwrap();
        assert_eq!(ds.column_names(), vec!["B", "A", "C"]);
        assert_eq!(ds.column("A").unwrap(), &[Value::from("2")]);
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "A,A\n1,2\n").unwrap();

        let err = load_csv(&path).unwrap_err();
        assert!(err.to_string().contains("duplicate column 'A'"));
    }

    #[test]
    fn empty_file_has_no_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        fs::write(&path, "").unwrap();

        let ds = load_csv(&path).unwrap();
        assert_eq!(ds.num_columns(), 0);
    }
}
