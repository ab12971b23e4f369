//! sds-graph CLI tool
//!
//! Reads a Turtle dataset description and a JSON file catalog and prints one of the two views.
//!
//! ## Commands
//!
//! - `graph <ttl> <catalog>`: the laid-out node-link graph
//! - `tree <ttl> <catalog>`: the catalog tree with its graph references

use clap::{Args, Parser, Subcommand};
use sds_graph::{
    catalog::parse_catalog, config::SdsConfig, splinter::DatasetSplinter, SdsError,
};
use serde::Serialize;
use std::{fs::read_to_string, path::PathBuf};

#[derive(Parser)]
#[command(name = "sds-graph")]
#[command(author, version, about = "Builds graph and tree views of a dataset description", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Inputs {
    /// Turtle document describing the dataset
    turtle: PathBuf,

    /// JSON array of catalog entries
    catalog: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the node-link graph with layout hints
    Graph(Inputs),

    /// Print the catalog tree
    Tree(Inputs),
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), SdsError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn splinter(inputs: &Inputs) -> Result<DatasetSplinter, SdsError> {
    let config = match &inputs.config {
        Some(path) => SdsConfig::load(path)?,
        None => SdsConfig::default(),
    };
    let turtle = read_to_string(&inputs.turtle)?;
    let catalog = parse_catalog(&read_to_string(&inputs.catalog)?)?;
    tracing::info!(
        "Loaded {} catalog entries from {}",
        catalog.len(),
        inputs.catalog.display()
    );
    Ok(DatasetSplinter::new(turtle, catalog, config))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Graph(inputs) => runtime.block_on(async {
            let graph = splinter(&inputs)?.graph().await?;
            print_json(&graph, inputs.pretty)
        })?,
        Commands::Tree(inputs) => runtime.block_on(async {
            let tree = splinter(&inputs)?.tree().await?;
            print_json(&tree, inputs.pretty)
        })?,
    }
    Ok(())
}
