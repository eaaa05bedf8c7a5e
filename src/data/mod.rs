// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw file and the training loop:
//
//   delimited file
//       │
//       ▼
//   CsvRecordSource   → parses lines, groups rows by label
//       │
//       ▼
//   splitter          → per-class train/test draw, then a
//       │               per-class train/validation carve-out
//       ▼
//   NormStats         → one blended mean/std for every subset
//       │
//       ▼
//   encoder           → [N, 1, F, 1] tensors + one-hot labels
//       │
//       ▼
//   BatchIterator     → epochs of (optionally augmented) batches
//
// Each module does one step and is tested on its own.
//
// Reference: ndarray docs, rand crate documentation

/// Parses the quoted CSV layout into class-grouped records
pub mod loader;

/// RowSet, Split and DatasetSnapshot containers
pub mod dataset;

/// Stratified train/test and train/validation splits
pub mod splitter;

/// Shared per-feature normalisation statistics
pub mod preprocessor;

/// Channel-last reshaping and one-hot encoding
pub mod encoder;

/// Random mirror and Gaussian jitter for training batches
pub mod augment;

/// Epoch-aware minibatch cursor over the training split
pub mod iterator;
