// ============================================================
// Layer 3 — Records and Class Grouping
// ============================================================
// A Record is one parsed line: F numeric features plus a label.
//
// Records are not kept individually once parsed. They are
// appended to a per-class flat buffer inside GroupedRecords,
// where sample i of a class occupies [i*F, (i+1)*F).
//
// Class ids are dense and follow first-seen order:
//   "b", "a", "b", "c"  →  b=0, a=1, c=2
// The same ClassIndex is reused for every subset so a label
// always encodes to the same one-hot column.
//
// Why flat buffers instead of Vec<Record>?
//   One allocation per class instead of one per row, and a
//   sample is a plain slice that can be copied straight into
//   a RowSet.
//
// Reference: Rust Book §8 (Storing Keys with Values in Hash Maps)

use std::collections::HashMap;

use serde::Serialize;

/// One parsed input row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub features: Vec<f64>,
    pub label:    String,
}

impl Record {
    pub fn new(features: Vec<f64>, label: impl Into<String>) -> Self {
        Self {
            features,
            label: label.into(),
        }
    }
}

// ─── ClassIndex ───────────────────────────────────────────────────────────────
/// Ordered set of distinct labels. A label's id is its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassIndex {
    labels: Vec<String>,
    #[serde(skip)]
    ids:    HashMap<String, usize>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id for `label`, registering it if unseen
    pub fn get_or_insert(&mut self, label: &str) -> usize {
        if let Some(&id) = self.ids.get(label) {
            return id;
        }
        let id = self.labels.len();
        self.labels.push(label.to_string());
        self.ids.insert(label.to_string(), id);
        id
    }

    pub fn id_of(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    pub fn label(&self, id: usize) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of distinct classes (C)
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ─── GroupedRecords ───────────────────────────────────────────────────────────
/// All parsed samples, bucketed by class into flat f64 buffers.
#[derive(Debug, Clone)]
pub struct GroupedRecords {
    feature_width: usize,
    classes:       ClassIndex,
    buffers:       Vec<Vec<f64>>,
}

impl GroupedRecords {
    pub fn new(feature_width: usize) -> Self {
        Self {
            feature_width,
            classes: ClassIndex::new(),
            buffers: Vec::new(),
        }
    }

    /// Append a record to its class buffer and return the class id.
    ///
    /// # Panics
    /// Panics if the record's width differs from `feature_width`;
    /// the parser rejects such lines before they get here.
    pub fn push(&mut self, record: &Record) -> usize {
        assert_eq!(
            record.features.len(),
            self.feature_width,
            "record width does not match feature_width"
        );
        let id = self.classes.get_or_insert(&record.label);
        if id == self.buffers.len() {
            self.buffers.push(Vec::new());
        }
        self.buffers[id].extend_from_slice(&record.features);
        id
    }

    pub fn feature_width(&self) -> usize {
        self.feature_width
    }

    pub fn classes(&self) -> &ClassIndex {
        &self.classes
    }

    /// M for a class: whole samples held in its buffer
    pub fn sample_count(&self, class_id: usize) -> usize {
        self.buffers
            .get(class_id)
            .map_or(0, |b| b.len() / self.feature_width)
    }

    pub fn total_samples(&self) -> usize {
        (0..self.buffers.len()).map(|c| self.sample_count(c)).sum()
    }

    /// Feature slice of sample `index` within class `class_id`
    pub fn sample(&self, class_id: usize, index: usize) -> &[f64] {
        let f = self.feature_width;
        &self.buffers[class_id][index * f..(index + 1) * f]
    }

    pub fn is_empty(&self) -> bool {
        self.total_samples() == 0
    }
}
