//! Offline model build: catalog CSV in, similarity model artifact out.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cinesim_api::{
    model::Model,
    models::{dedupe_titles, read_catalog},
};

#[derive(Parser)]
#[command(name = "build-model")]
#[command(about = "Build the genre similarity model from a movies.csv catalog")]
struct Cli {
    /// Catalog CSV with movieId,title,genres columns
    #[arg(short, long, default_value = "data/movies.csv")]
    catalog: PathBuf,

    /// Where to write the model artifact
    #[arg(short, long, default_value = "model/model.json")]
    output: PathBuf,

    /// Keep only the first row for each duplicated title instead of failing
    #[arg(long)]
    dedupe: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut items = read_catalog(&cli.catalog)
        .with_context(|| format!("Failed to read catalog {}", cli.catalog.display()))?;
    tracing::info!(items = items.len(), catalog = %cli.catalog.display(), "Read catalog");

    if cli.dedupe {
        let before = items.len();
        items = dedupe_titles(items);
        tracing::info!(dropped = before - items.len(), "Removed duplicate titles");
    }

    let model = Model::build(&items).context("Failed to build model")?;
    model
        .save(&cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!(
        "Model saved to {} ({} items, {} terms)",
        cli.output.display(),
        model.len(),
        model.vocabulary.len()
    );

    Ok(())
}
