use clap::Parser;
use std::path::PathBuf;

mod clean;
mod config;
mod error;
mod filters;
mod io;
mod logging;
mod runtime;

use clean::CommandCleaner;
use config::PipelineConfig;
use logging::RunLog;

#[derive(Parser)]
#[command(name = "obsfilter")]
#[command(about = "Filters cleaned weather observations into per-predicate datasets", long_about = None)]
struct Cli {
    /// Path to the original observation dataset
    input: PathBuf,

    /// Pipeline YAML file (built-in observation slices if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The run log must exist before any pipeline work
    let log = RunLog::create(std::path::Path::new("."))?;

    let pipeline = match &cli.config {
        Some(path) => PipelineConfig::from_yaml_file(path)?,
        None => PipelineConfig::default_for(&cli.input),
    };

    let cleaner = CommandCleaner::new(pipeline.cleaner.clone());
    runtime::run_pipeline(&pipeline, &cli.input, &cleaner, &log)?;

    Ok(())
}
