// ============================================================
// Layer 4 — Batch Augmentation
// ============================================================
// Applied to a copy of each training batch, never to the
// stored training rows.
//
//   1. Mirror: with probability `flip_probability` the whole
//      batch is reversed along axis 2 of [B, 1, F, 1], i.e. the
//      feature order of every sample is reversed.
//   2. Jitter: a noise tensor of shape [B, 1, W, 1] is drawn
//      from N(0, noise_std) and added onto the batch.
//
// Noise width W is a setting, not a constant:
//   W == F  → independent noise per feature of every sample
//   W == 1  → one offset per sample, broadcast over all F
// Any other width cannot broadcast onto [B, 1, F, 1] and is
// rejected by check_width().
//
// Why augment at all?
//   With few rows per class the network can learn the exact
//   training vectors. Small mirrored/jittered variants keep
//   each epoch's batches slightly different from the last.
//
// Randomness comes from the iterator's RNG, so a seeded run
// reproduces the same augmented batches.
//
// Reference: rand_distr crate documentation (Normal)
//            ndarray docs (Broadcasting)

use ndarray::{Array4, Axis};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::domain::error::{DatasetError, Result};

#[derive(Debug, Clone)]
pub struct Augmenter {
    flip_probability: f64,
    noise:            Normal<f32>,
    noise_width:      usize,
}

impl Augmenter {
    pub fn new(flip_probability: f64, noise_std: f32, noise_width: usize) -> Result<Self> {
        if !(0.0..=1.0).contains(&flip_probability) {
            return Err(DatasetError::InvalidArgument(format!(
                "flip_probability must be in [0, 1], got {flip_probability}"
            )));
        }
        // Normal::new only rejects a non-finite std
        if !(noise_std.is_finite() && noise_std >= 0.0) {
            return Err(DatasetError::InvalidArgument(format!(
                "noise_std must be finite and non-negative, got {noise_std}"
            )));
        }
        if noise_width == 0 {
            return Err(DatasetError::InvalidArgument(
                "noise_width must be at least 1".to_string(),
            ));
        }
        let noise = Normal::new(0.0, noise_std).map_err(|e| {
            DatasetError::InvalidArgument(format!("noise_std {noise_std}: {e}"))
        })?;
        Ok(Self { flip_probability, noise, noise_width })
    }

    pub fn noise_width(&self) -> usize {
        self.noise_width
    }

    /// Fail unless the noise broadcasts onto `feature_width` columns
    pub fn check_width(&self, feature_width: usize) -> Result<()> {
        if self.noise_width == 1 || self.noise_width == feature_width {
            Ok(())
        } else {
            Err(DatasetError::InvalidArgument(format!(
                "noise_width {} must be 1 or the feature width {}",
                self.noise_width, feature_width
            )))
        }
    }

    /// Mirror (maybe) and jitter a batch of channel-last features
    pub fn apply<R: Rng + ?Sized>(&self, mut features: Array4<f32>, rng: &mut R) -> Array4<f32> {
        if rng.gen_bool(self.flip_probability) {
            features.invert_axis(Axis(2));
            features = features.as_standard_layout().into_owned();
        }

        let batch = features.len_of(Axis(0));
        let noise = Array4::from_shape_fn((batch, 1, self.noise_width, 1), |_| {
            self.noise.sample(&mut *rng)
        });
        features += &noise;
        features
    }
}
