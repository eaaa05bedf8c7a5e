// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `inspect` and `iterate`.
//
// Both share LoaderArgs. Every loader flag is optional: the
// base config comes from --config (or the defaults) and each
// flag given on the command line overrides one field of it.
// Boolean settings come in pairs (`--augment` / `--no-augment`)
// so a value from the file can be switched either way; when
// both appear, the later one wins.
//
// Why Option fields instead of clap defaults?
//   A default_value would be indistinguishable from a flag the
//   user typed, and would silently overwrite the config file.
//
// Reference: Rust Book §12 (Building a CLI Program)

use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::load_use_case::LoaderConfig;
use crate::infra::config_store::ConfigStore;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and split a dataset, then print a per-subset summary
    Inspect(InspectArgs),

    /// Load a dataset and pull training batches for some epochs
    Iterate(IterateArgs),
}

/// Loader settings shared by every command
#[derive(Args, Debug, Default)]
pub struct LoaderArgs {
    /// JSON file with loader settings; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Delimited file: F feature columns then a class label
    #[arg(long)]
    pub source: Option<String>,

    /// Number of feature columns per row
    #[arg(long)]
    pub feature_width: Option<usize>,

    /// Rows per training batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Share of each class held out for validation, in (0, 1)
    #[arg(long)]
    pub validation_proportion: Option<f64>,

    /// Share of each class held out for testing, in (0, 1)
    #[arg(long)]
    pub test_proportion: Option<f64>,

    /// Seed for splitting, shuffling and augmentation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Chance of mirroring a training batch, in [0, 1]
    #[arg(long)]
    pub flip_probability: Option<f64>,

    /// Std of the Gaussian jitter added to training batches
    #[arg(long)]
    pub noise_std: Option<f32>,

    /// Jitter columns per sample: 1, or the feature width (default)
    #[arg(long)]
    pub noise_width: Option<usize>,

    /// Mirror and jitter training batches
    #[arg(long, overrides_with = "no_augment")]
    pub augment: bool,

    /// Turn augmentation off even if the config file enables it
    #[arg(long, overrides_with = "augment")]
    pub no_augment: bool,

    /// Ignore the first line of the file
    #[arg(long, overrides_with = "no_skip_header")]
    pub skip_header: bool,

    /// Read the first line as data even if the config file skips it
    #[arg(long, overrides_with = "skip_header")]
    pub no_skip_header: bool,

    /// Warn instead of failing when a class is missing from a subset
    #[arg(long, overrides_with = "no_allow_degenerate")]
    pub allow_degenerate: bool,

    /// Fail on a missing class even if the config file allows it
    #[arg(long, overrides_with = "allow_degenerate")]
    pub no_allow_degenerate: bool,
}

/// Some(true) for `--x`, Some(false) for `--no-x`, None for neither
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _         => None,
    }
}

impl LoaderArgs {
    /// Base config (file or defaults) with the command-line overrides applied
    pub fn resolve(self) -> Result<LoaderConfig> {
        let base = match &self.config {
            Some(path) => ConfigStore::load(path)?,
            None       => LoaderConfig::default(),
        };
        Ok(self.apply(base))
    }

    fn apply(self, mut cfg: LoaderConfig) -> LoaderConfig {
        if let Some(v) = self.source                { cfg.source_path = v; }
        if let Some(v) = self.feature_width         { cfg.feature_width = v; }
        if let Some(v) = self.batch_size            { cfg.batch_size = v; }
        if let Some(v) = self.validation_proportion { cfg.validation_proportion = v; }
        if let Some(v) = self.test_proportion       { cfg.test_proportion = v; }
        if let Some(v) = self.seed                  { cfg.random_seed = v; }
        if let Some(v) = self.flip_probability      { cfg.flip_probability = v; }
        if let Some(v) = self.noise_std             { cfg.noise_std = v; }
        if let Some(v) = self.noise_width           { cfg.noise_width = Some(v); }

        if let Some(v) = switch(self.augment, self.no_augment)                   { cfg.augment_data = v; }
        if let Some(v) = switch(self.skip_header, self.no_skip_header)           { cfg.skip_header = v; }
        if let Some(v) = switch(self.allow_degenerate, self.no_allow_degenerate) { cfg.allow_degenerate_classes = v; }
        cfg
    }
}

/// Arguments for the `inspect` command
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub loader: LoaderArgs,

    /// Print the summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `iterate` command
#[derive(Args, Debug)]
pub struct IterateArgs {
    #[command(flatten)]
    pub loader: LoaderArgs,

    /// Number of full passes over the training set
    #[arg(long, default_value_t = 2)]
    pub epochs: usize,
}
