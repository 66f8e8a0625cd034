//! # phixps
//!
//! Command-line front end for decoding PHI MultiPak XPS files.
//!
//! ## Usage
//!
//! ```bash
//! # Decode and export next to the input
//! phixps decode sample.spe
//!
//! # Decode into another directory with a looser edge threshold
//! phixps decode sample.spe out/ --threshold 20
//!
//! # Header summary only
//! phixps info sample.spe
//!
//! # Marker/type-tag layout and a float preview of the binary segment
//! phixps scan sample.spe --floats 64
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
