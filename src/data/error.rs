use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the dataset model, transforms and the CSV writer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("column '{column}' has {found} values but the dataset has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}', row {row}: '{value}' is not numeric")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("permission denied for '{}': {source}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl DataError {
    /// Classify an I/O failure on `path`, singling out permission problems.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            DataError::PermissionDenied { path, source }
        } else {
            DataError::Io { path, source }
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        match self {
            DataError::PermissionDenied { .. } => true,
            DataError::Csv(err) => matches!(
                err.kind(),
                csv::ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::PermissionDenied
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn from_io_separates_permission_errors() {
        let denied = DataError::from_io("out.csv", Error::new(ErrorKind::PermissionDenied, "nope"));
        assert!(denied.is_permission_denied());

        let missing = DataError::from_io("out.csv", Error::new(ErrorKind::NotFound, "gone"));
        assert!(!missing.is_permission_denied());
        assert!(missing.to_string().contains("out.csv"));
    }
}
