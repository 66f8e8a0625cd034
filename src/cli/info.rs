use anyhow::{Context, Result};
use std::path::PathBuf;

use phixps::phi::parse_header;

/// Display the text header of a PHI file
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let content = std::fs::read(&file).context("Failed to read file")?;
    let header = parse_header(&content).context("Failed to parse header")?;

    println!("PHI File Information");
    println!("====================");
    println!("File: {}", file.display());
    println!("Size: {} bytes", content.len());
    println!(
        "Binary segment: byte {} ({} bytes)",
        header.binary_start_offset,
        content.len() - header.binary_start_offset
    );
    println!();

    println!("Regions:");
    for (i, region) in header.regions.iter().enumerate() {
        println!(
            "  {:3}. {:<10} {:6} pts  {:>10.3} -> {:<10.3} eV",
            i + 1,
            region.name,
            region.points,
            region.start_ev,
            region.end_ev
        );
    }
    for diagnostic in &header.diagnostics {
        println!("  (!) {}", diagnostic);
    }
    println!();

    println!("Metadata Keys:");
    for (key, value) in &header.metadata {
        let value_preview = if value.chars().count() > 100 {
            let head: String = value.chars().take(100).collect();
            format!("{}... ({} bytes)", head, value.len())
        } else {
            value.clone()
        };
        println!("  {}: {}", key, value_preview);
    }

    Ok(())
}
