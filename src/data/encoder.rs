// ============================================================
// Layer 4 — Tensor Encoder
// ============================================================
// Turns normalised RowSets into model-ready tensors.
//
// Features:  [N, F] ──reshape──▶ [N, 1, 1, F]   (bc01)
//                    ──permute (0, 2, 3, 1)──▶ [N, 1, F, 1]   (b01c)
//
// The permuted view is materialised in standard (row-major)
// layout so later slicing and shuffling see contiguous rows.
//
// Labels:    class id k ──▶ length-C row with 1.0 at index k
//
// Why channel-last?
//   Downstream convolution code expects batch, height, width,
//   channel order; a feature vector is treated as a 1 x F image
//   with a single channel.
//
// Reference: ndarray docs (permuted_axes, as_standard_layout)

use ndarray::{Array2, Array4};

use crate::data::dataset::{RowSet, Split};
use crate::data::preprocessor::NormStats;
use crate::domain::error::Result;

/// [N, F] → channel-last [N, 1, F, 1], narrowed to f32
pub fn to_channel_last(data: Array2<f64>) -> Result<Array4<f32>> {
    let (n, f) = data.dim();
    let bc01 = data.into_shape_with_order((n, 1, 1, f))?;
    let b01c = bc01.permuted_axes([0, 2, 3, 1]);
    Ok(b01c.as_standard_layout().mapv(|v| v as f32))
}

/// One row per label, 1.0 in the label's column
pub fn one_hot(labels: &[usize], num_classes: usize) -> Array2<f32> {
    let mut out = Array2::zeros((labels.len(), num_classes));
    for (row, &class_id) in labels.iter().enumerate() {
        out[[row, class_id]] = 1.0;
    }
    out
}

/// Index of the largest entry in a one-hot row
#[cfg(test)]
pub fn argmax(row: &[f32]) -> Option<usize> {
    row.iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
}

/// Normalise, reshape and label-encode one subset
pub fn encode_split(rows: &RowSet, stats: &NormStats, num_classes: usize) -> Result<Split> {
    let mut matrix = rows.to_matrix()?;
    stats.apply(&mut matrix);

    Ok(Split::new(
        to_channel_last(matrix)?,
        one_hot(rows.labels(), num_classes),
    ))
}
