// ============================================================
// Layer 2 — IterateUseCase
// ============================================================
// Smoke run of the full pipeline:
//
//   Step 1: Load + split + encode   (LoadUseCase)
//   Step 2: Pull training batches until `epochs` epochs complete,
//           logging "batch_idx n_batches epoch" for each call
//   Step 3: Collect the held-out sets as batches and report
//           their label sums
//
// The returned IterateSummary is what the CLI prints.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::Result;
use serde::Serialize;

use crate::application::load_use_case::{LoadUseCase, LoaderConfig};
use crate::data::iterator::BatchIterator;
use crate::domain::traits::RecordSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterateSummary {
    pub epochs:                usize,
    pub n_batches:             usize,
    pub batches_served:        usize,
    pub test_batches:          usize,
    pub validation_batches:    usize,
    pub test_label_sums:       Vec<usize>,
    pub validation_label_sums: Vec<usize>,
}

pub struct IterateUseCase {
    loader: LoadUseCase,
    epochs: usize,
}

impl IterateUseCase {
    pub fn new(config: LoaderConfig, epochs: usize) -> Self {
        Self {
            loader: LoadUseCase::new(config),
            epochs,
        }
    }

    /// Run against the configured CSV file
    pub fn execute(&self) -> Result<IterateSummary> {
        let iterator = self.loader.build_iterator()?;
        Ok(self.drive(iterator))
    }

    /// Run against any record source
    pub fn execute_with(&self, source: &dyn RecordSource) -> Result<IterateSummary> {
        let iterator = self.loader.build_iterator_from(source)?;
        Ok(self.drive(iterator))
    }

    fn drive(&self, mut iterator: BatchIterator) -> IterateSummary {
        let n_batches = iterator.n_batches();
        let mut batches_served = 0;

        while iterator.epoch() < self.epochs {
            let (_batch, batch_idx) = iterator.next_batch();
            batches_served += 1;
            tracing::info!("{} {} {}", batch_idx, n_batches, iterator.epoch());
        }

        let test_batches       = iterator.test_batches();
        let validation_batches = iterator.validation_batches();
        tracing::info!(
            "Served {} batches over {} epochs; {} test batches",
            batches_served,
            self.epochs,
            test_batches.len()
        );

        IterateSummary {
            epochs: self.epochs,
            n_batches,
            batches_served,
            test_batches: test_batches.len(),
            validation_batches: validation_batches.len(),
            test_label_sums: iterator.test_set().label_sums(),
            validation_label_sums: iterator.validation_set().label_sums(),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::CsvRecordSource;

    fn two_class_text(per_class: usize) -> String {
        let mut out = String::new();
        for i in 0..per_class {
            out.push_str(&format!("\"{}\",1,2,{},a\n", i, i % 5));
            out.push_str(&format!("\"{}\",3,1,{},b\n", -(i as i64), i % 3));
        }
        out
    }

    fn config() -> LoaderConfig {
        LoaderConfig {
            feature_width: 4,
            batch_size: 10,
            ..LoaderConfig::default()
        }
    }

    #[test]
    fn test_two_epochs_of_batches() {
        let source = CsvRecordSource::from_text(two_class_text(100), 4);
        let summary = IterateUseCase::new(config(), 2).execute_with(&source).unwrap();

        assert_eq!(summary.n_batches, 16);
        assert_eq!(summary.batches_served, 32);
        assert_eq!(summary.test_batches, 2);
        assert_eq!(summary.validation_batches, 1);
        assert_eq!(summary.test_label_sums, vec![10, 10]);
        assert_eq!(summary.validation_label_sums, vec![9, 9]);
    }

    #[test]
    fn test_augmented_run_serves_same_batch_count() {
        let source = CsvRecordSource::from_text(two_class_text(100), 4);
        let cfg = LoaderConfig { augment_data: true, ..config() };
        let summary = IterateUseCase::new(cfg, 1).execute_with(&source).unwrap();
        assert_eq!(summary.batches_served, 16);
    }

    #[test]
    fn test_zero_epochs_serves_nothing() {
        let source = CsvRecordSource::from_text(two_class_text(50), 4);
        let summary = IterateUseCase::new(config(), 0).execute_with(&source).unwrap();
        assert_eq!(summary.batches_served, 0);
    }

    #[test]
    fn test_missing_file_is_reported() {
        let cfg = LoaderConfig {
            source_path: "/no/such/database.csv".to_string(),
            ..config()
        };
        let err = IterateUseCase::new(cfg, 1).execute().unwrap_err();
        assert!(format!("{err:#}").contains("/no/such/database.csv"));
    }
}
