// ============================================================
// Layer 4 — Dataset Containers
// ============================================================
// Two stages of the same rows:
//
//   RowSet  — flat f64 rows + integer class ids, used while
//             splitting and fitting normalisation statistics
//   Split   — the finished tensors: features [N, 1, F, 1] f32
//             (channel-last) and one-hot labels [N, C] f32
//
// DatasetSnapshot bundles the three finished splits with the
// class index and the statistics that produced them.
//
// Reference: Rust Book §5 (Structs), ndarray docs (slicing)

use ndarray::{s, Array2, Array4, Axis};

use crate::data::preprocessor::NormStats;
use crate::domain::error::Result;
use crate::domain::record::ClassIndex;

// ─── RowSet ───────────────────────────────────────────────────────────────────
/// Row-major feature rows with one class id per row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    width:  usize,
    data:   Vec<f64>,
    labels: Vec<usize>,
}

impl RowSet {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            data: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn push(&mut self, row: &[f64], label: usize) {
        debug_assert_eq!(row.len(), self.width);
        self.data.extend_from_slice(row);
        self.labels.push(label);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn row(&self, index: usize) -> &[f64] {
        &self.data[index * self.width..(index + 1) * self.width]
    }

    /// New RowSet holding the given rows, in the given order
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut out = Self::new(self.width);
        out.data.reserve(indices.len() * self.width);
        for &i in indices {
            out.push(self.row(i), self.labels[i]);
        }
        out
    }

    /// Rows per class id
    pub fn class_counts(&self, num_classes: usize) -> Vec<usize> {
        let mut counts = vec![0; num_classes];
        for &l in &self.labels {
            counts[l] += 1;
        }
        counts
    }

    /// Copy the rows into an [N, F] matrix
    pub fn to_matrix(&self) -> Result<Array2<f64>> {
        Ok(Array2::from_shape_vec(
            (self.len(), self.width),
            self.data.clone(),
        )?)
    }
}

// ─── Split ────────────────────────────────────────────────────────────────────
/// A finished subset: channel-last features and one-hot labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// Shape [N, 1, F, 1]
    pub features: Array4<f32>,
    /// Shape [N, C]
    pub labels:   Array2<f32>,
}

/// A minibatch has the same layout as a split, with N = batch size.
pub type Batch = Split;

impl Split {
    pub fn new(features: Array4<f32>, labels: Array2<f32>) -> Self {
        debug_assert_eq!(features.len_of(Axis(0)), labels.nrows());
        Self { features, labels }
    }

    pub fn len(&self) -> usize {
        self.labels.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-class row counts: the column sums of the one-hot matrix
    pub fn label_sums(&self) -> Vec<usize> {
        self.labels
            .sum_axis(Axis(0))
            .iter()
            .map(|&v| v.round() as usize)
            .collect()
    }

    /// Owned copy of rows [start, end)
    pub fn rows(&self, start: usize, end: usize) -> Batch {
        Batch::new(
            self.features.slice(s![start..end, .., .., ..]).to_owned(),
            self.labels.slice(s![start..end, ..]).to_owned(),
        )
    }

    /// Consecutive full batches in stored order; a trailing
    /// partial batch is dropped.
    pub fn sequential_batches(&self, batch_size: usize) -> Vec<Batch> {
        if batch_size == 0 {
            return Vec::new();
        }
        (0..self.len() / batch_size)
            .map(|i| self.rows(i * batch_size, (i + 1) * batch_size))
            .collect()
    }
}

// ─── DatasetSnapshot ──────────────────────────────────────────────────────────
/// Everything the loader produces, ready to hand to a BatchIterator.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub train:      Split,
    pub validation: Split,
    pub test:       Split,
    pub classes:    ClassIndex,
    pub stats:      NormStats,
}

impl DatasetSnapshot {
    /// Number of distinct classes (C)
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn total_rows(&self) -> usize {
        self.train.len() + self.validation.len() + self.test.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_of(n: usize) -> Split {
        let features = Array4::from_shape_fn((n, 1, 2, 1), |(i, _, j, _)| (i * 2 + j) as f32);
        let labels = Array2::from_shape_fn((n, 2), |(i, c)| if i % 2 == c { 1.0 } else { 0.0 });
        Split::new(features, labels)
    }

    #[test]
    fn test_rowset_select_reorders() {
        let mut rs = RowSet::new(2);
        rs.push(&[1.0, 2.0], 0);
        rs.push(&[3.0, 4.0], 1);
        rs.push(&[5.0, 6.0], 0);

        let picked = rs.select(&[2, 0]);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked.row(0), &[5.0, 6.0]);
        assert_eq!(picked.labels(), &[0, 0]);
        assert_eq!(rs.class_counts(2), vec![2, 1]);
    }

    #[test]
    fn test_rowset_to_matrix() {
        let mut rs = RowSet::new(3);
        rs.push(&[1.0, 2.0, 3.0], 0);
        rs.push(&[4.0, 5.0, 6.0], 0);
        let m = rs.to_matrix().unwrap();
        assert_eq!(m.shape(), &[2, 3]);
        assert_eq!(m[[1, 0]], 4.0);
    }

    #[test]
    fn test_sequential_batches_drop_partial() {
        let split = split_of(7);
        let batches = split.sequential_batches(3);
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|b| b.len() == 3));
        // Order is preserved: second batch starts at row 3
        assert_eq!(batches[1].features[[0, 0, 0, 0]], 6.0);
    }

    #[test]
    fn test_label_sums() {
        let split = split_of(5);
        assert_eq!(split.label_sums(), vec![3, 2]);
    }
}
