// ============================================================
// Layer 4 — Stratified Splitter
// ============================================================
// Two per-class random splits, both drawn from the caller's
// seeded RNG so the same seed reproduces the same partition:
//
//   1. train/test:  for each class with M samples, pick
//      floor(M * test_proportion) distinct indices uniformly
//      without replacement → test; the rest → train. Rows keep
//      their original order, classes follow first-seen order.
//
//   2. train/validation: for each class with n train rows,
//      pick ceil(n * validation_proportion) rows → validation.
//      Both outputs are then shuffled so batches mix classes.
//
// Drawing per class (rather than one global shuffle) keeps
// every class at roughly the same proportion in each subset.
// Small classes can still round down to nothing; that case is
// caught by check_class_shares.
//
// Why a separate test draw and validation carve?
//   The test rows are fixed before anything else looks at the
//   data. The validation rows come out of what is left, and are
//   only used to watch training, never to fit statistics.
//
// Uses rand::seq::index::sample (distinct indices without
// replacement) and SliceRandom::shuffle (Fisher-Yates).
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use std::collections::HashSet;

use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::data::dataset::RowSet;
use crate::domain::error::{DatasetError, Result};
use crate::domain::record::{ClassIndex, GroupedRecords};

/// Fail unless 0 < p < 1
pub fn check_proportion(name: &str, p: f64) -> Result<()> {
    if p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(DatasetError::InvalidArgument(format!(
            "{name} must be in the open interval (0, 1), got {p}"
        )))
    }
}

/// Per-class random draw of test rows.
///
/// Returns (train, test).
pub fn stratified_test_split<R: Rng + ?Sized>(
    grouped:         &GroupedRecords,
    test_proportion: f64,
    rng:             &mut R,
) -> Result<(RowSet, RowSet)> {
    check_proportion("test_proportion", test_proportion)?;

    let width = grouped.feature_width();
    let mut train = RowSet::new(width);
    let mut test  = RowSet::new(width);

    for class_id in 0..grouped.classes().len() {
        let m = grouped.sample_count(class_id);
        let k = (m as f64 * test_proportion).floor() as usize;

        let picked: HashSet<usize> = index::sample(rng, m, k).into_iter().collect();

        for i in 0..m {
            let row = grouped.sample(class_id, i);
            if picked.contains(&i) {
                test.push(row, class_id);
            } else {
                train.push(row, class_id);
            }
        }

        tracing::debug!(
            "Class {}: {} samples → {} train, {} test",
            class_id,
            m,
            m - k,
            k
        );
    }

    Ok((train, test))
}

/// Label-balanced carve-out of a validation set from `train`.
///
/// Returns (train, validation), each shuffled.
pub fn stratified_validation_split<R: Rng + ?Sized>(
    train:                 &RowSet,
    validation_proportion: f64,
    num_classes:           usize,
    rng:                   &mut R,
) -> Result<(RowSet, RowSet)> {
    check_proportion("validation_proportion", validation_proportion)?;

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); num_classes];
    for (row, &label) in train.labels().iter().enumerate() {
        by_class[label].push(row);
    }

    let mut keep = Vec::with_capacity(train.len());
    let mut val  = Vec::new();

    for rows in &by_class {
        let n = rows.len();
        let k = ((n as f64 * validation_proportion).ceil() as usize).min(n);
        let picked: HashSet<usize> = index::sample(rng, n, k).into_iter().collect();

        for (j, &row) in rows.iter().enumerate() {
            if picked.contains(&j) {
                val.push(row);
            } else {
                keep.push(row);
            }
        }
    }

    keep.shuffle(rng);
    val.shuffle(rng);

    tracing::debug!(
        "Validation split: {} train, {} validation",
        keep.len(),
        val.len()
    );

    Ok((train.select(&keep), train.select(&val)))
}

/// Verify that every class has at least one row in every subset.
///
/// With `allow_degenerate` set, gaps are logged instead of failing.
pub fn check_class_shares(
    classes:          &ClassIndex,
    subsets:          &[(&'static str, &RowSet)],
    allow_degenerate: bool,
) -> Result<()> {
    for &(subset, rows) in subsets {
        let counts = rows.class_counts(classes.len());
        for (class_id, &count) in counts.iter().enumerate() {
            if count > 0 {
                continue;
            }
            let label = classes.label(class_id).unwrap_or_default().to_string();
            if allow_degenerate {
                tracing::warn!("Class '{}' has no rows in the {} set", label, subset);
            } else {
                return Err(DatasetError::DegenerateClass { label, subset });
            }
        }
    }
    Ok(())
}
