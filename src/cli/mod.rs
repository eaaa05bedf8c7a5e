// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All work is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `inspect` — load, split and summarise a dataset
//   2. `iterate` — drive the batch iterator through epochs
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, IterateArgs};

#[derive(Parser, Debug)]
#[command(
    name = "class-batcher",
    version = "0.1.0",
    about = "Load a labelled feature table, split it per class, and serve training batches."
)]
pub struct Cli {
    /// The subcommand to run (inspect or iterate)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route the subcommand to its use case
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Inspect(args) => run_inspect(args),
            Commands::Iterate(args) => run_iterate(args),
        }
    }
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::load_use_case::LoadUseCase;
    use crate::infra::report::SplitReport;

    let config = args.loader.resolve()?;
    tracing::info!("Inspecting dataset: {}", config.source_path);

    let snapshot = LoadUseCase::new(config).execute()?;
    let report   = SplitReport::from_snapshot(&snapshot);

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}

fn run_iterate(args: IterateArgs) -> Result<()> {
    use crate::application::iterate_use_case::IterateUseCase;

    let config = args.loader.resolve()?;
    tracing::info!(
        "Iterating {} epochs over: {}",
        args.epochs,
        config.source_path
    );

    let summary = IterateUseCase::new(config, args.epochs).execute()?;

    println!("{}", summary.test_batches);
    println!("{:?}", summary.validation_label_sums);
    println!("{:?}", summary.test_label_sums);
    Ok(())
}
