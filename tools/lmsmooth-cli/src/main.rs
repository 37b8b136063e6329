//! lmsmooth CLI: smooth landmark streams recorded as JSONL.
//!
//! Usage:
//!   lmsmooth smooth <INPUT> [OPTIONS]   Smooth a stream file
//!   lmsmooth info <INPUT>               Show stream information
//!   lmsmooth init-config                Write a default config file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "lmsmooth",
    about = "Temporal smoothing for landmark streams",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the standard location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Smooth a landmark stream
    Smooth {
        /// Input stream (JSONL)
        input: PathBuf,

        /// Output stream; defaults to <INPUT>.smoothed.jsonl
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Smoothing method: none|one-euro|velocity
        #[arg(long)]
        method: Option<String>,

        /// 1€ minimum cutoff frequency (Hz)
        #[arg(long)]
        min_cutoff: Option<f64>,

        /// 1€ speed coefficient
        #[arg(long)]
        beta: Option<f64>,

        /// 1€ derivative cutoff frequency (Hz)
        #[arg(long)]
        derivative_cutoff: Option<f64>,

        /// Re-stamp frames at a fixed rate instead of using their timestamps
        #[arg(long)]
        fps: Option<f64>,

        /// Copy visibility/presence through instead of filtering them
        #[arg(long)]
        no_confidence: bool,

        /// Estimate object scale from the landmarks when a frame has no region
        #[arg(long)]
        scale_from_landmarks: bool,
    },

    /// Show stream information and validation issues
    Info {
        /// Input stream (JSONL)
        input: PathBuf,
    },

    /// Write the default configuration file
    InitConfig {
        /// Destination; defaults to the standard config location
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => lmsmooth_common::config::AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => lmsmooth_common::config::AppConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    lmsmooth_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Smooth {
            input,
            output,
            method,
            min_cutoff,
            beta,
            derivative_cutoff,
            fps,
            no_confidence,
            scale_from_landmarks,
        } => commands::smooth::run(
            &config,
            commands::smooth::SmoothArgs {
                input,
                output,
                method,
                min_cutoff,
                beta,
                derivative_cutoff,
                fps,
                no_confidence,
                scale_from_landmarks,
            },
        ),
        Commands::Info { input } => commands::info::run(input),
        Commands::InitConfig { output, force } => commands::init_config::run(output, force),
    }
}
