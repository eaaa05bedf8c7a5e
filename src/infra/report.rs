// ============================================================
// Layer 6 — Split Report
// ============================================================
// A serialisable summary of a loaded dataset: row counts and
// per-class label sums for each subset, plus the fitted
// normalisation statistics.
//
// Two renderings:
//   render_text() — aligned table for the terminal
//   to_json()     — pretty JSON for scripts
//
// Example text output:
//   classes: 2   features: 4   rows: 200
//   subset      rows  a     b
//   train       162   81    81
//   validation  18    9     9
//   test        20    10    10
//
// Why report label sums?
//   They are the column sums of the one-hot matrices, so they
//   show directly whether every class reached every subset and
//   in what proportion.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write;

use crate::data::dataset::{DatasetSnapshot, Split};
use crate::data::preprocessor::NormStats;

/// Row count and label sums of one subset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsetSummary {
    pub rows:       usize,
    pub label_sums: Vec<usize>,
}

impl SubsetSummary {
    pub fn of(split: &Split) -> Self {
        Self {
            rows:       split.len(),
            label_sums: split.label_sums(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub classes:       Vec<String>,
    pub feature_width: usize,
    pub total_rows:    usize,
    pub train:         SubsetSummary,
    pub validation:    SubsetSummary,
    pub test:          SubsetSummary,
    pub stats:         NormStats,
}

impl SplitReport {
    pub fn from_snapshot(snapshot: &DatasetSnapshot) -> Self {
        Self {
            classes:       snapshot.classes.labels().to_vec(),
            feature_width: snapshot.stats.feature_width(),
            total_rows:    snapshot.total_rows(),
            train:         SubsetSummary::of(&snapshot.train),
            validation:    SubsetSummary::of(&snapshot.validation),
            test:          SubsetSummary::of(&snapshot.test),
            stats:         snapshot.stats.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "classes: {}   features: {}   rows: {}",
            self.classes.len(),
            self.feature_width,
            self.total_rows
        );

        let _ = write!(out, "{:<12}{:<6}", "subset", "rows");
        for label in &self.classes {
            let _ = write!(out, "{:<6}", label);
        }
        out.push('\n');

        for (name, subset) in [
            ("train", &self.train),
            ("validation", &self.validation),
            ("test", &self.test),
        ] {
            let _ = write!(out, "{:<12}{:<6}", name, subset.rows);
            for sum in &subset.label_sums {
                let _ = write!(out, "{:<6}", sum);
            }
            out.push('\n');
        }
        out
    }
}
