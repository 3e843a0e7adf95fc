use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Parser)]
#[command(name = "cleaner", version, about = "Validate and clean the raw race-record dataset")]
struct Cli {
    /// Raw dataset to clean.
    #[arg(long, default_value = "data/raw/test_dataset.csv")]
    input: PathBuf,

    /// Destination for the cleaned dataset.
    #[arg(long, default_value = "data/processed/clean.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    cleaner::logging::init();
    let cli = Cli::parse();
    let cleaned = cleaner::pipeline::run(&cli.input, &cli.output)?;
    println!("clean: rows={} output={}", cleaned.len(), cli.output.display());
    Ok(())
}
