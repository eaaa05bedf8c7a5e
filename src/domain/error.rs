// ============================================================
// Layer 3 — Dataset Errors
// ============================================================
// Every failure the loading pipeline can produce.
//
// Data-layer functions return Result<T, DatasetError>; the
// application and CLI layers wrap these in anyhow with context.
// All of them are terminal for the loader instance that hit them.
//
// Reference: thiserror crate documentation

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    /// The source file could not be opened or read
    #[error("cannot read '{path}': {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is out of its allowed range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A line of the source file is malformed (1-based line number)
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// The source contained no data rows
    #[error("source contains no records")]
    EmptySource,

    /// A class has too few rows to populate one of the subsets
    #[error("class '{label}' has no rows left for the {subset} set")]
    DegenerateClass { label: String, subset: &'static str },

    #[error("tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

impl DatasetError {
    /// Shorthand for building a parse error at a given line
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse { line, reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_line() {
        let e = DatasetError::parse(7, "expected 5 fields, found 3");
        assert_eq!(
            e.to_string(),
            "parse error on line 7: expected 5 fields, found 3"
        );
    }

    #[test]
    fn test_degenerate_class_message() {
        let e = DatasetError::DegenerateClass {
            label:  "setosa".to_string(),
            subset: "test",
        };
        assert!(e.to_string().contains("'setosa'"));
        assert!(e.to_string().contains("test set"));
    }
}
