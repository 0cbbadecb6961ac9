//! candela CLI - Streaming multi-timeframe OHLC candle aggregation.

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod display;
mod logging;
mod settings;

use candela_lib::Period;
use display::Format;
use settings::Settings;

#[derive(Parser)]
#[command(name = "candela")]
#[command(about = "Streaming multi-timeframe OHLC candle aggregation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (only warnings and errors, no summary)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Settings file (TOML) with [pipeline], [store] and [generator] tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate prices from the random-walk generator
    Run {
        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Pause between generator rounds in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Seed for reproducible prices
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Aggregate ticks recorded as newline-delimited JSON
    Replay {
        /// Tick file, one {"ticker","value","timestamp"} object per line
        file: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

/// Options shared by every pipeline command. Each one overrides the
/// settings file.
#[derive(Args)]
struct PipelineArgs {
    /// Tickers to track (e.g., AAPL,SBER)
    #[arg(short, long, value_delimiter = ',')]
    tickers: Vec<String>,

    /// Stage periods, finest first (e.g., 1m,2m,10m)
    #[arg(short, long, value_delimiter = ',')]
    periods: Vec<Period>,

    /// Directory receiving one candle file per period
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Candle file format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Write a CSV header to new candle files
    #[arg(long)]
    header: bool,

    /// Capacity of the channels between stages
    #[arg(long)]
    capacity: Option<usize>,

    /// Stop after this many seconds (default: until Ctrl-C or end of feed)
    #[arg(short, long)]
    duration: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    logging::init(cli.verbose, cli.quiet)?;
    let mut settings = Settings::load(cli.config.as_deref())?;

    match command {
        Commands::Run {
            pipeline,
            delay_ms,
            seed,
        } => {
            settings.apply(&pipeline);
            if let Some(delay_ms) = delay_ms {
                settings.generator.delay_ms = delay_ms;
            }
            if seed.is_some() {
                settings.generator.seed = seed;
            }
            commands::run::run(settings, pipeline.duration, cli.quiet).await
        }
        Commands::Replay { file, pipeline } => {
            settings.apply(&pipeline);
            commands::replay::replay(settings, &file, pipeline.duration, cli.quiet).await
        }
    }
}
