//! Webjs Stacktrace CLI
//!
//! Rewrites minified web JS exception stack traces to original source
//! positions using source maps, either inside OTLP JSON trace batches or as
//! raw stack trace text.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use webjs_stacktrace::commands::{
    execute_process, execute_resolve, validate_args, ProcessArgs, ResolveArgs, SourceMapArgs,
};

/// Webjs Stacktrace - source-mapped exception stack traces
#[derive(Parser, Debug)]
#[command(name = "stacktrace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Source map options shared by all commands
#[derive(Args, Debug)]
struct SourceMapOpts {
    /// TOML config file
    #[arg(short, long, env = "STACKTRACE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory to scan for *.map files (repeatable)
    #[arg(short, long = "source-maps")]
    source_maps: Vec<PathBuf>,

    /// Load maps from this directory on first use instead of scanning up front
    #[arg(long)]
    lazy: Option<PathBuf>,
}

impl SourceMapOpts {
    fn into_args(self, language: Option<String>) -> SourceMapArgs {
        SourceMapArgs {
            config: self.config,
            source_map_dirs: self.source_maps,
            lazy_dir: self.lazy,
            language,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite stack traces inside an OTLP JSON trace batch
    Process {
        /// Input trace batch (OTLP JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the processed batch
        #[arg(short, long, default_value = "traces.resolved.json")]
        output: PathBuf,

        /// telemetry.sdk.language value to process
        #[arg(long)]
        language: Option<String>,

        /// Print processing counters to stdout
        #[arg(long)]
        summary: bool,

        #[command(flatten)]
        source_maps: SourceMapOpts,
    },

    /// Rewrite a raw stack trace read from a file or stdin
    Resolve {
        /// Stack trace file (stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        source_maps: SourceMapOpts,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Process {
            input,
            output,
            language,
            summary,
            source_maps,
        } => {
            let args = ProcessArgs {
                input,
                output,
                source_maps: source_maps.into_args(language),
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_process(args)?;
        }

        Commands::Resolve { input, source_maps } => {
            let args = ResolveArgs {
                input,
                source_maps: source_maps.into_args(None),
            };

            print!("{}", execute_resolve(args)?);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("Webjs Stacktrace v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Rewrites minified web JS stack traces using source maps.");
}
