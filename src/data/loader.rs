// ============================================================
// Layer 4 — CSV Record Loader
// ============================================================
// Reads the fixed delimited layout and groups rows by label.
//
// Line layout (F = feature_width):
//   "f0,f1,...,f(F-1)",label
//   ▲              ▲
//   │              └─ second-to-last field: trailing quote stripped
//   └─ first field: leading quote stripped
//
// Every field except the last is a 64-bit float. The last
// field is the class label; surrounding whitespace (including
// the newline) is trimmed.
//
// Rules enforced per line:
//   - exactly F + 1 fields
//   - every feature parses as a finite f64 (NaN, inf rejected)
//   - the label is non-empty
// A violation fails the whole load with the 1-based line number.
// Blank lines are ignored; a header line is skipped on request.
//
// Why group while parsing?
//   The per-class split needs every class's rows side by side.
//   Appending into per-class buffers as lines arrive avoids a
//   second pass over the records.
//
// Reference: Rust Book §12 (Reading a File)
//            std::io::BufRead documentation

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

use crate::domain::error::{DatasetError, Result};
use crate::domain::record::{GroupedRecords, Record};
use crate::domain::traits::RecordSource;

const QUOTE: char = '"';

/// Where CsvRecordSource reads from
#[derive(Debug, Clone)]
enum Input {
    File(PathBuf),
    Text(String),
}

/// Loads records from the quoted CSV layout.
/// Implements the RecordSource trait from Layer 3.
#[derive(Debug, Clone)]
pub struct CsvRecordSource {
    input:         Input,
    feature_width: usize,
    skip_header:   bool,
}

impl CsvRecordSource {
    /// Read records from a file on disk
    pub fn from_path(path: impl Into<PathBuf>, feature_width: usize) -> Self {
        Self {
            input: Input::File(path.into()),
            feature_width,
            skip_header: false,
        }
    }

    /// Read records from an in-memory string
    pub fn from_text(text: impl Into<String>, feature_width: usize) -> Self {
        Self {
            input: Input::Text(text.into()),
            feature_width,
            skip_header: false,
        }
    }

    /// Discard the first line of the input
    pub fn skip_header(mut self, skip: bool) -> Self {
        self.skip_header = skip;
        self
    }

    fn read_from<R: BufRead>(&self, reader: R, origin: &Path) -> Result<GroupedRecords> {
        let mut grouped = GroupedRecords::new(self.feature_width);

        for (i, line) in reader.lines().enumerate() {
            let line_no = i + 1;
            let line = line.map_err(|source| DatasetError::Io {
                path: origin.to_path_buf(),
                source,
            })?;

            if self.skip_header && line_no == 1 {
                tracing::debug!("Skipping header line: {}", line.trim());
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let record = parse_line(&line, line_no, self.feature_width)?;
            grouped.push(&record);
        }

        if grouped.is_empty() {
            return Err(DatasetError::EmptySource);
        }

        tracing::info!(
            "Parsed {} records across {} classes from '{}'",
            grouped.total_samples(),
            grouped.classes().len(),
            origin.display()
        );
        Ok(grouped)
    }
}

impl RecordSource for CsvRecordSource {
    fn load_grouped(&self) -> Result<GroupedRecords> {
        if self.feature_width == 0 {
            return Err(DatasetError::InvalidArgument(
                "feature_width must be at least 1".to_string(),
            ));
        }

        match &self.input {
            Input::File(path) => {
                let file = File::open(path).map_err(|source| DatasetError::Io {
                    path: path.clone(),
                    source,
                })?;
                self.read_from(BufReader::new(file), path)
            }
            Input::Text(text) => {
                self.read_from(Cursor::new(text.as_bytes()), Path::new("<memory>"))
            }
        }
    }
}

/// Parse one non-blank line into a Record.
pub fn parse_line(line: &str, line_no: usize, feature_width: usize) -> Result<Record> {
    let mut fields: Vec<&str> = line.split(',').collect();

    let expected = feature_width + 1;
    if fields.len() != expected {
        return Err(DatasetError::parse(
            line_no,
            format!("expected {} fields, found {}", expected, fields.len()),
        ));
    }

    // The label is the last field; the quoted block spans the features
    let label = fields.pop().map(str::trim).unwrap_or_default();
    if label.is_empty() {
        return Err(DatasetError::parse(line_no, "missing class label"));
    }

    let last = fields.len() - 1;
    fields[0] = fields[0].trim().trim_matches(QUOTE);
    fields[last] = fields[last].trim().trim_matches(QUOTE);

    let features = fields
        .iter()
        .enumerate()
        .map(|(col, raw)| {
            let value = raw.trim().parse::<f64>().map_err(|e| {
                DatasetError::parse(line_no, format!("field {col} ({raw:?}): {e}"))
            })?;
            // NaN/inf would poison the shared column statistics
            if !value.is_finite() {
                return Err(DatasetError::parse(
                    line_no,
                    format!("field {col} ({raw:?}) is not a finite number"),
                ));
            }
            Ok(value)
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(Record::new(features, label))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_strips_quotes_and_trims_label() {
        let r = parse_line("\"1.5,2,3,4.25\",classA\n", 1, 4).unwrap();
        assert_eq!(r.features, vec![1.5, 2.0, 3.0, 4.25]);
        assert_eq!(r.label, "classA");
    }

    #[test]
    fn test_single_feature_line() {
        // First and second-to-last field are the same field here
        let r = parse_line("\"7\",z", 1, 1).unwrap();
        assert_eq!(r.features, vec![7.0]);
        assert_eq!(r.label, "z");
    }

    #[test]
    fn test_wrong_field_count_names_line() {
        let err = parse_line("\"1,2\",a", 12, 4).unwrap_err();
        match err {
            DatasetError::Parse { line, reason } => {
                assert_eq!(line, 12);
                assert!(reason.contains("expected 5 fields, found 3"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_feature() {
        let err = parse_line("\"1,abc,3\",a", 3, 3).unwrap_err();
        assert!(err.to_string().contains("line 3"));
        assert!(err.to_string().contains("field 1"));
    }

    #[test]
    fn test_non_finite_feature_is_rejected() {
        for bad in ["NaN", "inf", "-inf"] {
            let line = format!("\"1,{bad},3\",a");
            let err = parse_line(&line, 9, 3).unwrap_err();
            assert!(err.to_string().contains("line 9"), "{bad}");
            assert!(err.to_string().contains("field 1"), "{bad}");
        }

        let mut text = String::new();
        for i in 0..20 {
            text.push_str(&format!("\"{i},1\",a\n"));
        }
        text.push_str("\"NaN,1\",a\n");
        let err = CsvRecordSource::from_text(text, 2).load_grouped().unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 21, .. }));
    }

    #[test]
    fn test_missing_label() {
        let err = parse_line("\"1,2\",  ", 4, 2).unwrap_err();
        assert!(err.to_string().contains("missing class label"));
    }

    #[test]
    fn test_groups_by_first_seen_label() {
        let text = "\"1,2\",b\n\n\"3,4\",a\n\"5,6\",b\n";
        let grouped = CsvRecordSource::from_text(text, 2).load_grouped().unwrap();

        assert_eq!(grouped.classes().labels(), &["b", "a"]);
        assert_eq!(grouped.sample_count(0), 2);
        assert_eq!(grouped.sample(0, 1), &[5.0, 6.0]);
        assert_eq!(grouped.sample(1, 0), &[3.0, 4.0]);
    }

    #[test]
    fn test_skip_header() {
        let text = "\"f0,f1\",label\n\"1,2\",a\n";
        let grouped = CsvRecordSource::from_text(text, 2)
            .skip_header(true)
            .load_grouped()
            .unwrap();
        assert_eq!(grouped.total_samples(), 1);

        // Without the flag the header is a parse error on line 1
        let err = CsvRecordSource::from_text(text, 2).load_grouped().unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_empty_source() {
        let err = CsvRecordSource::from_text("\n\n", 2).load_grouped().unwrap_err();
        assert!(matches!(err, DatasetError::EmptySource));
    }

    #[test]
    fn test_reads_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\"0.5,1.5,2.5\",x").unwrap();
        writeln!(file, "\"3.5,4.5,5.5\",y").unwrap();

        let grouped = CsvRecordSource::from_path(file.path(), 3)
            .load_grouped()
            .unwrap();
        assert_eq!(grouped.total_samples(), 2);
        assert_eq!(grouped.classes().len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = CsvRecordSource::from_path("/definitely/not/here.csv", 3)
            .load_grouped()
            .unwrap_err();
        assert!(matches!(err, DatasetError::Io { .. }));
    }
}
