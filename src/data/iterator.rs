// ============================================================
// Layer 4 — Batch Iterator
// ============================================================
// Serves training minibatches across epochs.
//
// Cursor state machine (n_batches = floor(N_train / batch_size)):
//
//   current_batch:  0 → 1 → ... → n_batches-1 ─┐
//                   ▲                          │ wrap:
//                   └──────────────────────────┘   epoch += 1,
//                                                  reshuffle rows
//
// next_batch() returns the batch at the cursor together with the
// cursor value BEFORE it advances. The advance step reports the
// wrap explicitly, so n_batches == 1 behaves like any other size:
// every call completes an epoch.
//
// Trailing rows that do not fill a batch are skipped for the
// current epoch; after the reshuffle they can land in a batch.
//
// Single consumer: every cursor mutation takes &mut self.
//
// Why drop the partial tail instead of a short last batch?
//   Every batch then has exactly `batch_size` rows, so a model
//   can rely on a fixed leading dimension.
//
// Reference: Rust Book §4 (Ownership), §5 (Method Syntax)

use ndarray::Axis;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::data::augment::Augmenter;
use crate::data::dataset::{Batch, DatasetSnapshot, Split};
use crate::domain::error::{DatasetError, Result};

pub struct BatchIterator {
    train:         Split,
    validation:    Split,
    test:          Split,
    batch_size:    usize,
    n_batches:     usize,
    current_batch: usize,
    current_epoch: usize,
    augmenter:     Option<Augmenter>,
    rng:           StdRng,
}

impl BatchIterator {
    /// Take ownership of a loaded snapshot and the RNG that will
    /// drive reshuffles and augmentation.
    pub fn new(
        snapshot:   DatasetSnapshot,
        batch_size: usize,
        augmenter:  Option<Augmenter>,
        rng:        StdRng,
    ) -> Result<Self> {
        if batch_size == 0 {
            return Err(DatasetError::InvalidArgument(
                "batch_size must be at least 1".to_string(),
            ));
        }
        let n_batches = snapshot.train.len() / batch_size;
        if n_batches == 0 {
            return Err(DatasetError::InvalidArgument(format!(
                "batch_size {} exceeds the {} training rows",
                batch_size,
                snapshot.train.len()
            )));
        }

        if let Some(aug) = &augmenter {
            aug.check_width(snapshot.train.features.len_of(Axis(2)))?;
        }

        tracing::debug!(
            "BatchIterator: {} train rows, batch_size={}, {} batches/epoch, augment={}",
            snapshot.train.len(),
            batch_size,
            n_batches,
            augmenter.is_some()
        );

        Ok(Self {
            train: snapshot.train,
            validation: snapshot.validation,
            test: snapshot.test,
            batch_size,
            n_batches,
            current_batch: 0,
            current_epoch: 0,
            augmenter,
            rng,
        })
    }

    /// Next training batch and its (pre-advance) index.
    pub fn next_batch(&mut self) -> (Batch, usize) {
        let batch_idx = self.current_batch;
        let start     = batch_idx * self.batch_size;

        let mut batch = self.train.rows(start, start + self.batch_size);
        if let Some(aug) = &self.augmenter {
            batch.features = aug.apply(batch.features, &mut self.rng);
        }

        if self.advance() {
            self.current_epoch += 1;
            self.reshuffle();
            tracing::debug!("Epoch {} reached, training rows reshuffled", self.current_epoch);
        }

        (batch, batch_idx)
    }

    /// Move the cursor one batch forward; true when it wrapped to 0
    fn advance(&mut self) -> bool {
        let wrapped = self.current_batch + 1 == self.n_batches;
        self.current_batch = if wrapped { 0 } else { self.current_batch + 1 };
        wrapped
    }

    /// Apply one fresh permutation to features and labels alike
    fn reshuffle(&mut self) {
        let mut order: Vec<usize> = (0..self.train.len()).collect();
        order.shuffle(&mut self.rng);

        self.train = Split::new(
            self.train.features.select(Axis(0), &order),
            self.train.labels.select(Axis(0), &order),
        );
    }

    pub fn epoch(&self) -> usize {
        self.current_epoch
    }

    pub fn current_batch(&self) -> usize {
        self.current_batch
    }

    pub fn n_batches(&self) -> usize {
        self.n_batches
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn train_len(&self) -> usize {
        self.train.len()
    }

    /// Whole test set
    pub fn test_set(&self) -> &Split {
        &self.test
    }

    /// Test set as sequential full batches (partial tail dropped)
    pub fn test_batches(&self) -> Vec<Batch> {
        self.test.sequential_batches(self.batch_size)
    }

    /// Whole validation set
    pub fn validation_set(&self) -> &Split {
        &self.validation
    }

    /// Validation set as sequential full batches (partial tail dropped)
    pub fn validation_batches(&self) -> Vec<Batch> {
        self.validation.sequential_batches(self.batch_size)
    }

    /// Zero both cursors. Row order is left as it is.
    pub fn reset(&mut self) {
        self.current_batch = 0;
        self.current_epoch = 0;
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preprocessor::NormStats;
    use crate::domain::record::ClassIndex;
    use ndarray::{Array1, Array2, Array4};
    use rand::SeedableRng;

    /// Train rows carry their own id in feature 0 and class id % 2
    fn snapshot(train: usize, validation: usize, test: usize) -> DatasetSnapshot {
        let split = |n: usize, offset: usize| {
            Split::new(
                Array4::from_shape_fn((n, 1, 3, 1), |(i, _, j, _)| ((offset + i) * 10 + j) as f32),
                Array2::from_shape_fn((n, 2), |(i, c)| if (offset + i) % 2 == c { 1.0 } else { 0.0 }),
            )
        };
        let mut classes = ClassIndex::new();
        classes.get_or_insert("even");
        classes.get_or_insert("odd");

        DatasetSnapshot {
            train: split(train, 0),
            validation: split(validation, 1000),
            test: split(test, 2000),
            classes,
            stats: NormStats {
                mean: Array1::zeros(3),
                std:  Array1::ones(3),
            },
        }
    }

    fn iterator(train: usize, batch_size: usize) -> BatchIterator {
        BatchIterator::new(snapshot(train, 7, 11), batch_size, None, StdRng::seed_from_u64(1)).unwrap()
    }

    fn row_ids(batch: &Batch) -> Vec<usize> {
        (0..batch.len()).map(|i| batch.features[[i, 0, 0, 0]] as usize / 10).collect()
    }

    #[test]
    fn test_indices_cycle_and_epoch_advances_once() {
        let mut it = iterator(10, 3);
        assert_eq!(it.n_batches(), 3);

        let mut indices = Vec::new();
        for _ in 0..3 {
            let (batch, idx) = it.next_batch();
            assert_eq!(batch.len(), 3);
            indices.push(idx);
        }
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(it.epoch(), 1);

        let (_, idx) = it.next_batch();
        assert_eq!(idx, 0);
        assert_eq!(it.epoch(), 1);
    }

    #[test]
    fn test_first_epoch_is_in_stored_order() {
        let mut it = iterator(6, 2);
        let (b0, _) = it.next_batch();
        let (b1, _) = it.next_batch();
        assert_eq!(row_ids(&b0), vec![0, 1]);
        assert_eq!(row_ids(&b1), vec![2, 3]);
    }

    #[test]
    fn test_reshuffle_keeps_features_and_labels_paired() {
        let mut it = iterator(40, 10);
        for _ in 0..4 {
            it.next_batch();
        }
        assert_eq!(it.epoch(), 1);

        let mut seen = Vec::new();
        for _ in 0..4 {
            let (batch, _) = it.next_batch();
            for (i, id) in row_ids(&batch).into_iter().enumerate() {
                // label column still matches the row's own id
                assert_eq!(batch.labels[[i, id % 2]], 1.0);
                seen.push(id);
            }
        }
        let in_order: Vec<usize> = (0..40).collect();
        assert_ne!(seen, in_order);
        seen.sort_unstable();
        assert_eq!(seen, in_order);
    }

    #[test]
    fn test_single_batch_epoch_advances_every_call() {
        let mut it = iterator(5, 4);
        assert_eq!(it.n_batches(), 1);
        for call in 1..=3 {
            let (_, idx) = it.next_batch();
            assert_eq!(idx, 0);
            assert_eq!(it.epoch(), call);
        }
    }

    #[test]
    fn test_eval_sets_as_batches() {
        let it = iterator(10, 3);
        let test = it.test_batches();
        assert_eq!(test.len(), 11 / 3);
        assert!(test.iter().all(|b| b.len() == 3));
        assert_eq!(row_ids(&test[1]), vec![2003, 2004, 2005]);

        assert_eq!(it.validation_batches().len(), 7 / 3);
        assert_eq!(it.validation_set().len(), 7);
        assert_eq!(it.test_set().len(), 11);
    }

    #[test]
    fn test_reset_zeroes_cursors() {
        let mut it = iterator(10, 3);
        for _ in 0..4 {
            it.next_batch();
        }
        assert_eq!(it.epoch(), 1);
        assert_eq!(it.current_batch(), 1);

        it.reset();
        assert_eq!(it.epoch(), 0);
        assert_eq!(it.current_batch(), 0);
        let (_, idx) = it.next_batch();
        assert_eq!(idx, 0);
    }

    #[test]
    fn test_augmentation_leaves_stored_rows_untouched() {
        let aug = Augmenter::new(1.0, 0.0, 3).unwrap();
        let mut it = BatchIterator::new(snapshot(4, 1, 1), 2, Some(aug), StdRng::seed_from_u64(1)).unwrap();

        let (batch, _) = it.next_batch();
        // Flipped: feature order reversed within each sample
        assert_eq!(batch.features[[0, 0, 0, 0]], 2.0);
        assert_eq!(batch.features[[0, 0, 2, 0]], 0.0);

        // The stored row is unchanged
        assert_eq!(it.train.features[[0, 0, 0, 0]], 0.0);
    }

    #[test]
    fn test_rejects_noise_that_cannot_broadcast() {
        let aug = Augmenter::new(0.5, 0.05, 2).unwrap();
        let err = BatchIterator::new(snapshot(4, 1, 1), 2, Some(aug), StdRng::seed_from_u64(1));
        assert!(matches!(err, Err(DatasetError::InvalidArgument(_))));

        let per_sample = Augmenter::new(0.5, 0.05, 1).unwrap();
        assert!(BatchIterator::new(snapshot(4, 1, 1), 2, Some(per_sample), StdRng::seed_from_u64(1)).is_ok());
    }

    #[test]
    fn test_rejects_unusable_batch_size() {
        let zero = BatchIterator::new(snapshot(4, 1, 1), 0, None, StdRng::seed_from_u64(1));
        assert!(zero.is_err());

        let too_big = BatchIterator::new(snapshot(4, 1, 1), 5, None, StdRng::seed_from_u64(1));
        assert!(matches!(too_big, Err(DatasetError::InvalidArgument(_))));
    }
}
