use anyhow::{bail, Context, Result};
use borrower_lib::aggregation::aggregator::DocumentAggregator;
use borrower_lib::aggregation::filter::filter_by_type;
use borrower_lib::utils::config::PipelineConfig;
use borrower_lib::utils::env::load_env;
use borrower_lib::utils::instantiate_run::{create_cleanup_run, CleanupReport, CleanupRun};
use borrower_lib::utils::io::{cleaned_output_path, read_json, write_json};
use borrower_lib::utils::progress_bars::progress_config::ProgressConfig;
use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(author, version, about = "Consolidates borrower names and cleans extracted loan documents", long_about = None)]
struct CleanupArgs {
    /// Extraction batches (JSON) to clean
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for `<name>.cleaned.json` outputs (defaults to each input's directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Only keep these document types (case-insensitive, comma separated)
    #[arg(long, value_delimiter = ',')]
    types: Option<Vec<String>>,

    /// Keep borrowers that end up with no documents
    #[arg(long)]
    preserve_empty: bool,

    /// Let single-token names fuzzy-match
    #[arg(long)]
    allow_single_token: bool,

    /// Write a full report with run metadata, stats and the stored filtered views
    #[arg(long)]
    views: bool,
}

fn main() -> Result<()> {
    load_env();
    env_logger::init();
    info!("Starting borrower document cleanup");

    let args = CleanupArgs::parse();

    let mut config = PipelineConfig::from_env();
    config.preserve_empty_borrowers |= args.preserve_empty;
    config.thresholds.allow_single_token |= args.allow_single_token;

    let run = create_cleanup_run(args.types.as_ref().map(|t| t.join(",")).as_deref());
    let aggregator = DocumentAggregator::new(config);
    aggregator.config().log_config();
    let progress_bar = ProgressConfig::from_env().create_file_bar(args.inputs.len());
    let start = Instant::now();

    let mut failures = 0;
    for input in &args.inputs {
        if let Some(pb) = &progress_bar {
            pb.set_message(input.display().to_string());
        }
        match clean_file(input, &args, &aggregator, &run) {
            Ok(output) => info!("Wrote {}", output.display()),
            Err(e) => {
                failures += 1;
                error!("Failed to clean {}: {:#}", input.display(), e);
            }
        }
        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    }
    if let Some(pb) = &progress_bar {
        pb.finish_with_message("done");
    }

    info!(
        "Run {} finished: {} of {} files cleaned in {:.2?}",
        run.run_id,
        args.inputs.len() - failures,
        args.inputs.len(),
        start.elapsed()
    );
    if failures > 0 {
        bail!("{} of {} files failed", failures, args.inputs.len());
    }
    Ok(())
}

fn clean_file(
    input: &Path,
    args: &CleanupArgs,
    aggregator: &DocumentAggregator,
    run: &CleanupRun,
) -> Result<PathBuf> {
    let raw = read_json(input)?;
    let (mut cleaned, stats) = aggregator
        .aggregate_with_stats(&raw)
        .with_context(|| format!("Unusable batch in {}", input.display()))?;

    if let Some(types) = &args.types {
        cleaned = filter_by_type(&cleaned, types);
    }

    let output = cleaned_output_path(input, args.output_dir.as_deref());
    if args.views {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        write_json(&output, &CleanupReport::new(run, &file_name, stats, cleaned))?;
    } else {
        write_json(&output, &cleaned)?;
    }
    Ok(output)
}
