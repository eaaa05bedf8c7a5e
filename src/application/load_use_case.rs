// ============================================================
// Layer 2 — LoadUseCase (the dataset loader)
// ============================================================
// Orchestrates the loading pipeline in order:
//
//   Step 1: Validate config              (fail fast, before any I/O)
//   Step 2: Parse + group records        (Layer 4 - loader)
//   Step 3: Per-class train/test draw    (Layer 4 - splitter)
//   Step 4: Per-class validation carve   (Layer 4 - splitter)
//   Step 5: Check every class is present (Layer 4 - splitter)
//   Step 6: Fit blended statistics       (Layer 4 - preprocessor)
//   Step 7: Normalise, reshape, one-hot  (Layer 4 - encoder)
//
// One seeded StdRng drives every random draw. build_iterator()
// hands that same RNG on to the BatchIterator, so a run is fully
// reproducible from `random_seed`.
//
// Why split before normalising?
//   The statistics must come from rows the pipeline has
//   already assigned, so the test draw happens first and the
//   pool it leaves behind is what feeds the mean/std fit.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)
//            rand crate documentation (SeedableRng)

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{
    augment::Augmenter,
    dataset::DatasetSnapshot,
    encoder::encode_split,
    iterator::BatchIterator,
    loader::CsvRecordSource,
    preprocessor::NormStats,
    splitter::{
        check_class_shares, check_proportion, stratified_test_split,
        stratified_validation_split,
    },
};
use crate::domain::error::DatasetError;
use crate::domain::traits::RecordSource;

// ─── Loader Configuration ────────────────────────────────────────────────────
// Every knob of a load + iterate run. Serialisable so it can be
// read from a JSON file; missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub source_path:              String,
    pub batch_size:               usize,
    pub validation_proportion:    f64,
    pub test_proportion:          f64,
    pub augment_data:             bool,
    pub random_seed:              u64,
    pub skip_header:              bool,
    pub feature_width:            usize,
    pub flip_probability:         f64,
    pub noise_std:                f32,
    /// Jitter columns per sample; None means `feature_width`
    pub noise_width:              Option<usize>,
    pub allow_degenerate_classes: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            source_path:              "database.csv".to_string(),
            batch_size:               100,
            validation_proportion:    0.1,
            test_proportion:          0.1,
            augment_data:             false,
            random_seed:              1,
            skip_header:              false,
            feature_width:            200,
            flip_probability:         0.5,
            noise_std:                0.05,
            noise_width:              None,
            allow_degenerate_classes: false,
        }
    }
}

impl LoaderConfig {
    /// Range checks that do not need the data
    pub fn validate(&self) -> std::result::Result<(), DatasetError> {
        check_proportion("validation_proportion", self.validation_proportion)?;
        check_proportion("test_proportion", self.test_proportion)?;
        if self.batch_size == 0 {
            return Err(DatasetError::InvalidArgument(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.feature_width == 0 {
            return Err(DatasetError::InvalidArgument(
                "feature_width must be at least 1".to_string(),
            ));
        }
        let width = self.resolved_noise_width();
        if width != 1 && width != self.feature_width {
            return Err(DatasetError::InvalidArgument(format!(
                "noise_width {} must be 1 or feature_width {}",
                width, self.feature_width
            )));
        }
        Ok(())
    }

    /// Noise width actually used: the setting, or the feature width
    pub fn resolved_noise_width(&self) -> usize {
        self.noise_width.unwrap_or(self.feature_width)
    }

    /// The batch augmenter, when augmentation is switched on
    pub fn augmenter(&self) -> std::result::Result<Option<Augmenter>, DatasetError> {
        if !self.augment_data {
            return Ok(None);
        }
        Augmenter::new(
            self.flip_probability,
            self.noise_std,
            self.resolved_noise_width(),
        )
        .map(Some)
    }
}

// ─── LoadUseCase ──────────────────────────────────────────────────────────────
pub struct LoadUseCase {
    config: LoaderConfig,
}

impl LoadUseCase {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// The CSV source described by the config
    pub fn csv_source(&self) -> CsvRecordSource {
        CsvRecordSource::from_path(&self.config.source_path, self.config.feature_width)
            .skip_header(self.config.skip_header)
    }

    /// Load the configured file with a freshly seeded RNG
    pub fn execute(&self) -> Result<DatasetSnapshot> {
        let mut rng = StdRng::seed_from_u64(self.config.random_seed);
        self.load_from(&self.csv_source(), &mut rng)
            .with_context(|| format!("Failed to load dataset from '{}'", self.config.source_path))
    }

    /// Load the configured file and wrap it in a BatchIterator
    pub fn build_iterator(&self) -> Result<BatchIterator> {
        self.build_iterator_from(&self.csv_source())
            .with_context(|| format!("Failed to load dataset from '{}'", self.config.source_path))
    }

    /// Load any RecordSource and wrap it in a BatchIterator that
    /// continues on the loader's RNG
    pub fn build_iterator_from(
        &self,
        source: &dyn RecordSource,
    ) -> std::result::Result<BatchIterator, DatasetError> {
        let augmenter = self.config.augmenter()?;
        let mut rng   = StdRng::seed_from_u64(self.config.random_seed);
        let snapshot  = self.load_from(source, &mut rng)?;
        BatchIterator::new(snapshot, self.config.batch_size, augmenter, rng)
    }

    /// The full pipeline against an arbitrary record source
    pub fn load_from<R: Rng + ?Sized>(
        &self,
        source: &dyn RecordSource,
        rng:    &mut R,
    ) -> std::result::Result<DatasetSnapshot, DatasetError> {
        let cfg = &self.config;

        // ── Step 1: Validate ──────────────────────────────────────────────────
        cfg.validate()?;

        // ── Step 2: Parse and group by label ──────────────────────────────────
        let grouped = source.load_grouped()?;
        let classes = grouped.classes().clone();
        let num_classes = classes.len();

        // ── Step 3: Per-class test draw ───────────────────────────────────────
        let (pool, test) = stratified_test_split(&grouped, cfg.test_proportion, rng)?;

        // ── Step 4: Per-class validation carve-out ────────────────────────────
        let (train, validation) =
            stratified_validation_split(&pool, cfg.validation_proportion, num_classes, rng)?;

        // ── Step 5: Every class in every subset ───────────────────────────────
        check_class_shares(
            &classes,
            &[("train", &train), ("validation", &validation), ("test", &test)],
            cfg.allow_degenerate_classes,
        )?;

        // ── Step 6: One statistic pair for all subsets ────────────────────────
        // Fitted on the pre-validation pool and the test rows
        let stats = NormStats::fit_blended(&pool.to_matrix()?, &test.to_matrix()?)?;

        // ── Step 7: Normalise, reshape, encode ────────────────────────────────
        let snapshot = DatasetSnapshot {
            train:      encode_split(&train, &stats, num_classes)?,
            validation: encode_split(&validation, &stats, num_classes)?,
            test:       encode_split(&test, &stats, num_classes)?,
            classes,
            stats,
        };

        tracing::info!(
            "Dataset ready: {} train, {} validation, {} test rows; {} classes",
            snapshot.train.len(),
            snapshot.validation.len(),
            snapshot.test.len(),
            num_classes
        );
        Ok(snapshot)
    }
}
