//! Process command implementation.
//!
//! The process command:
//! 1. Builds the configuration and loads source maps
//! 2. Reads the trace batch
//! 3. Rewrites in-scope stack traces
//! 4. Writes the processed batch

use super::models::ProcessArgs;
use crate::output::{read_batch, validate_output_path, write_batch};
use crate::processor::{ProcessStats, StackTraceProcessor};
use anyhow::{Context, Result};
use log::info;
use std::time::Instant;

/// Execute the process command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Invalid configuration or unreadable source map directory
/// * Unreadable or malformed input batch
/// * File write errors
pub fn execute_process(args: ProcessArgs) -> Result<ProcessStats> {
    let start_time = Instant::now();

    info!("Step 1/4: Loading source maps...");
    let config = args.source_maps.to_config()?;
    let mut processor = StackTraceProcessor::new(config);
    processor
        .start()
        .context("Failed to start stack trace processor")?;

    info!("Step 2/4: Reading trace batch from {}...", args.input.display());
    let mut batch = read_batch(&args.input).context("Failed to read trace batch")?;

    info!("Step 3/4: Rewriting stack traces...");
    let stats = processor
        .process(&mut batch)
        .context("Failed to process trace batch")?;

    info!("Step 4/4: Writing processed batch...");
    write_batch(&batch, &args.output).context("Failed to write trace batch")?;
    info!("✓ Processed batch written to: {}", args.output.display());

    processor.shutdown();

    if args.print_summary {
        println!("{}", format_summary(&stats));
    }

    let elapsed = start_time.elapsed();
    info!("Processing completed in {:.2}s", elapsed.as_secs_f64());

    Ok(stats)
}

/// Validate process arguments
///
/// **Public** - can be called before execute_process for early validation
pub fn validate_args(args: &ProcessArgs) -> Result<()> {
    if !args.input.is_file() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    if args.input == args.output {
        anyhow::bail!("Output must not overwrite the input file");
    }

    validate_output_path(&args.output)?;

    Ok(())
}

/// Human readable counters
pub fn format_summary(stats: &ProcessStats) -> String {
    format!(
        "Resources in scope:   {}\n\
         Resources skipped:    {}\n\
         Stack traces:         {} ({} rewritten)\n\
         Frames resolved:      {}\n\
         Frames unresolved:    {}",
        stats.resources_in_scope,
        stats.resources_skipped,
        stats.stack_traces,
        stats.stack_traces_changed,
        stats.frames_resolved,
        stats.frames_unresolved
    )
}
