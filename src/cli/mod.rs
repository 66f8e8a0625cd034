use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod decode;
mod info;
mod scan;

pub use config::Config;

/// phixps - PHI MultiPak XPS spectrum decoder
#[derive(Parser)]
#[command(name = "phixps")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Decoder overrides shared by commands that probe the binary segment.
#[derive(clap::Args, Debug, Default)]
pub struct DecoderArgs {
    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Magnitude above which a float counts as real data
    #[arg(long)]
    threshold: Option<f64>,

    /// Smallest accepted mean intensity
    #[arg(long)]
    min_mean: Option<f64>,

    /// Largest accepted mean intensity
    #[arg(long)]
    max_mean: Option<f64>,

    /// Probe regions in parallel (requires the parallel feature)
    #[arg(long)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a PHI file and export its spectra
    Decode {
        /// Input .spe/.pro file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory (defaults to the input's directory)
        #[arg(value_name = "OUTPUT_DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        decoder: DecoderArgs,

        /// Print the report only, write no files
        #[arg(long)]
        no_export: bool,
    },

    /// Display the text header of a PHI file
    Info {
        /// Input .spe/.pro file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Show block markers, type tags and leading floats of the binary segment
    Scan {
        /// Input .spe/.pro file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of floats to preview from the start of the binary segment
        #[arg(long, default_value = "32")]
        floats: usize,

        #[command(flatten)]
        decoder: DecoderArgs,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Decode {
            input,
            output,
            decoder,
            no_export,
        } => decode::run(input, output, decoder, no_export),
        Commands::Info { file } => info::run(file),
        Commands::Scan {
            file,
            floats,
            decoder,
        } => scan::run(file, floats, decoder),
    }
}
