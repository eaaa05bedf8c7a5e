// ============================================================
// Layer 4 — Feature Normaliser
// ============================================================
// Per-feature standardisation: x' = (x - mean) / std
//
// The statistics are fitted ONCE and shared by all subsets:
//
//   mean = (mean(train) + mean(test)) / 2
//   std  = (std(train)  + std(test))  / 2
//
// where `train` is the training pool before the validation
// carve-out and std is the population std (ddof = 0). Train,
// validation and test are all normalised with this one pair;
// no subset is ever normalised with its own statistics.
//
// Zero-variance columns: a std of 0 (or anything non-finite)
// would turn the column into NaN/Inf. Such entries are replaced
// with 1.0 so the column maps to (x - mean), i.e. 0 for a
// constant column, and a warning names the affected columns.
//
// Reference: ndarray docs (mean_axis, std_axis, Broadcasting)

use ndarray::{Array1, Array2, Axis};
use serde::Serialize;

use crate::domain::error::{DatasetError, Result};

/// Shared per-feature mean and standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormStats {
    pub mean: Array1<f64>,
    pub std:  Array1<f64>,
}

impl NormStats {
    /// Statistics of a single [N, F] matrix.
    pub fn fit(data: &Array2<f64>) -> Result<Self> {
        let mean = data.mean_axis(Axis(0)).ok_or_else(|| {
            DatasetError::InvalidArgument("cannot fit statistics on an empty set".to_string())
        })?;
        let std = data.std_axis(Axis(0), 0.0);
        Ok(Self { mean, std })
    }

    /// Elementwise average of the train-pool and test statistics,
    /// with zero std entries guarded.
    pub fn fit_blended(train: &Array2<f64>, test: &Array2<f64>) -> Result<Self> {
        let a = Self::fit(train)?;
        let b = Self::fit(test)?;

        let mut blended = Self {
            mean: (&a.mean + &b.mean) / 2.0,
            std:  (&a.std + &b.std) / 2.0,
        };
        blended.guard_zero_std();
        Ok(blended)
    }

    /// Replace unusable std entries with 1.0
    pub fn guard_zero_std(&mut self) {
        let mut guarded = Vec::new();
        for (col, s) in self.std.iter_mut().enumerate() {
            if !(s.is_finite() && *s > 0.0) {
                *s = 1.0;
                guarded.push(col);
            }
        }
        if !guarded.is_empty() {
            tracing::warn!(
                "{} feature column(s) have zero spread and are centred only: {:?}",
                guarded.len(),
                guarded
            );
        }
    }

    pub fn feature_width(&self) -> usize {
        self.mean.len()
    }

    /// Normalise every row of an [N, F] matrix in place
    pub fn apply(&self, data: &mut Array2<f64>) {
        // [F] broadcasts across the N rows
        *data -= &self.mean;
        *data /= &self.std;
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_matches_population_stats() {
        let data = array![[1.0, 10.0], [3.0, 10.0]];
        let stats = NormStats::fit(&data).unwrap();
        assert_eq!(stats.mean, array![2.0, 10.0]);
        assert_eq!(stats.std, array![1.0, 0.0]);
    }

    #[test]
    fn test_own_stats_centre_the_data() {
        let mut data = array![[1.0, 5.0, -2.0], [2.0, 7.0, 0.5], [6.0, 9.0, 3.0], [3.0, 1.0, 4.0]];
        let stats = NormStats::fit(&data).unwrap();
        stats.apply(&mut data);

        let mean = data.mean_axis(Axis(0)).unwrap();
        let std  = data.std_axis(Axis(0), 0.0);
        for col in 0..3 {
            assert!(mean[col].abs() < 1e-12);
            assert!((std[col] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_blended_is_elementwise_average() {
        let train = array![[0.0, 0.0], [2.0, 4.0]];
        let test  = array![[4.0, 0.0], [8.0, 0.0]];
        let stats = NormStats::fit_blended(&train, &test).unwrap();

        // train: mean [1, 2] std [1, 2]; test: mean [6, 0] std [2, 0]
        assert_eq!(stats.mean, array![3.5, 1.0]);
        assert_eq!(stats.std, array![1.5, 1.0]);
    }

    #[test]
    fn test_constant_column_stays_finite() {
        let train = array![[5.0, 1.0], [5.0, 2.0]];
        let test  = array![[5.0, 3.0], [5.0, 4.0]];
        let stats = NormStats::fit_blended(&train, &test).unwrap();
        assert_eq!(stats.std[0], 1.0);

        let mut data = train.clone();
        stats.apply(&mut data);
        assert!(data.iter().all(|v| v.is_finite()));
        assert_eq!(data[[0, 0]], 0.0);
    }

    #[test]
    fn test_empty_set_is_rejected() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(NormStats::fit(&empty).is_err());
    }
}
