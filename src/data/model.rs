use std::fmt;

use super::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Value – a single cell in a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the common DataFrame dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

impl Value {
    /// Try to interpret the value as an `f64` for numeric transforms.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Null => Some(f64::NAN),
            Value::String(_) => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Render a float the way the numeric library prints it: integral values
/// keep a trailing `.0`, everything else uses the shortest round-trip form.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v == f64::INFINITY {
        "inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => f.write_str(&format_float(*v)),
            Value::String(s) => write!(f, "{s}"),
            Value::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
            Value::Null => f.write_str("<null>"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

// ---------------------------------------------------------------------------
// Column – one named sequence of values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Dataset – named, equal-length columns
// ---------------------------------------------------------------------------

/// In-memory table of named columns. Column order is insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from `(name, values)` pairs, enforcing equal lengths.
    pub fn from_columns<I, S, V>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<V>)>,
        S: Into<String>,
        V: Into<Value>,
    {
        let mut dataset = Dataset::new();
        for (name, values) in columns {
            let name = name.into();
            dataset.set_column(&name, values.into_iter().map(Into::into).collect())?;
        }
        Ok(dataset)
    }

    /// Assign `values` to column `name`.
    ///
    /// An existing column is overwritten in place; a new one is appended.
    /// Once the dataset has a column, every assignment must match its row
    /// count, otherwise nothing changes and `LengthMismatch` is returned.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if let Some(expected) = self.num_rows() {
            if values.len() != expected {
                return Err(DataError::LengthMismatch {
                    column: name.to_string(),
                    expected,
                    found: values.len(),
                });
            }
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.values = values,
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
            }),
        }
        Ok(())
    }

    pub fn column(&self, name: &str) -> Result<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    pub fn contains_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Row count, or `None` while the dataset has no columns.
    pub fn num_rows(&self) -> Option<usize> {
        self.columns.first().map(|c| c.values.len())
    }

    /// Row count, treating a column-less dataset as having zero rows.
    pub fn len(&self) -> usize {
        self.num_rows().unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterate over rows as slices of borrowed cells.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.len()).map(move |row| self.columns.iter().map(|c| &c.values[row]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_columns([("A", vec![1, 2, 3]), ("B", vec![10, 20, 30])]).unwrap()
    }

    #[test]
    fn set_column_appends_and_reads_back() {
        let mut ds = sample();
        let values: Vec<Value> = vec![7.into(), 8.into(), 9.into()];
        ds.set_column("C", values.clone()).unwrap();
        assert_eq!(ds.column("C").unwrap(), values.as_slice());
        assert_eq!(ds.column_names(), vec!["A", "B", "C"]);
    }

    #[test]
    fn set_column_overwrites_in_place() {
        let mut ds = sample();
        ds.set_column("A", vec!["x".into(), "y".into(), "z".into()]).unwrap();
        assert_eq!(ds.column_names(), vec!["A", "B"]);
        assert_eq!(ds.column("A").unwrap()[2], Value::from("z"));
    }

    #[test]
    fn length_mismatch_leaves_dataset_untouched() {
        let mut ds = sample();
        let before = ds.clone();
        let err = ds.set_column("C", vec![1.into()]).unwrap_err();
        assert!(matches!(
            err,
            DataError::LengthMismatch { expected: 3, found: 1, .. }
        ));
        assert_eq!(ds, before);
    }

    #[test]
    fn first_column_defines_row_count() {
        let mut ds = Dataset::new();
        assert_eq!(ds.num_rows(), None);
        assert!(ds.is_empty());
        ds.set_column("only", vec![Value::Null; 4]).unwrap();
        assert_eq!(ds.len(), 4);
    }

    #[test]
    fn missing_column_is_an_error() {
        let ds = sample();
        assert!(matches!(ds.column("nope"), Err(DataError::ColumnNotFound(_))));
    }

    #[test]
    fn float_display_keeps_integral_decimal() {
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-inf");
        assert_eq!(Value::Bool(true).to_string(), "True");
    }

    #[test]
    fn rows_iterates_in_column_order() {
        let ds = sample();
        let rows: Vec<Vec<&Value>> = ds.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], vec![&Value::Integer(2), &Value::Integer(20)]);
    }
}
