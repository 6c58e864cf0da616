// src/bin/inspect_structure.rs
//
// Prints a short overview of an extraction batch so an operator can see which
// borrowers and document types it holds before running the cleanup.

use anyhow::{bail, Context, Result};
use borrower_lib::aggregation::structure::describe_structure;
use borrower_lib::aggregation::summary::aggregate_summary_sections;
use borrower_lib::errors::json_type_name;
use borrower_lib::utils::env::load_env;
use borrower_lib::utils::io::read_json;
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Show the shape of an extraction batch", long_about = None)]
struct InspectArgs {
    /// Extraction batch (JSON) to inspect
    input: PathBuf,

    /// Number of batch items to describe
    #[arg(short, long, default_value_t = 2)]
    limit: usize,

    /// Treat the input as a single document and group its Summary sections
    /// by borrower and document type
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    load_env();
    env_logger::init();

    let args = InspectArgs::parse();
    let raw = read_json(&args.input)?;
    info!("Inspecting {}", args.input.display());

    if args.summary {
        let sections = aggregate_summary_sections(&raw);
        if sections.is_empty() {
            bail!("{} has no Summary section list", args.input.display());
        }
        for (borrower, doc_types) in &sections {
            println!("{}", borrower);
            for (doc_type, entries) in doc_types {
                println!("  {}: {} sections", doc_type, entries.len());
            }
        }
        return Ok(());
    }

    let Some(overview) = describe_structure(&raw, args.limit) else {
        bail!(
            "{} holds a {}, expected a list or mapping",
            args.input.display(),
            json_type_name(&raw)
        );
    };

    let rendered =
        serde_json::to_string_pretty(&overview).context("Failed to render structure overview")?;
    println!("{}", rendered);
    Ok(())
}
