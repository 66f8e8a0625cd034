use anyhow::{Context, Result};
use std::path::PathBuf;

use phixps::phi::{read_f32_window, PhiDecoder, ProbeBase};

use super::{Config, DecoderArgs};

/// Show how the prober sees each block of a PHI file
pub fn run(file: PathBuf, floats: usize, args: DecoderArgs) -> Result<()> {
    let config = Config::resolve(&args)?;
    let decoder = PhiDecoder::new(config.decoder).context("Invalid decoder settings")?;

    let content = std::fs::read(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let inspection = decoder.inspect(&content).context("Failed to parse header")?;
    let binary_start = inspection.header.binary_start_offset;

    println!("PHI Binary Scan");
    println!("===============");
    println!("File: {}", file.display());
    println!("Binary segment starts at byte {}", binary_start);
    println!(
        "{} regions declared, {} '{}' markers found",
        inspection.header.regions.len(),
        inspection.markers.len(),
        decoder.config().marker
    );
    println!();

    println!("  #  region      marker     block end  probe base");
    for (i, block) in inspection.blocks.iter().enumerate() {
        let base = match block.base {
            ProbeBase::TypeTag(offset) => format!("tag at {}", offset),
            ProbeBase::Fallback(offset) => format!("fallback {}", offset),
        };
        println!(
            "{:3}  {:<10} {:>9}  {:>9}  {}",
            i,
            block.region.as_deref().unwrap_or("-"),
            block.marker,
            block.block_end,
            base
        );
    }
    println!();

    if floats > 0 {
        println!("First {} floats of the binary segment (f32 LE):", floats);
        let values = read_f32_window(&content[binary_start..], floats);
        for (i, value) in values.iter().enumerate() {
            println!("  [{:5}] byte {:>9}  {:e}", i, binary_start + i * 4, value);
        }
    }

    Ok(())
}
