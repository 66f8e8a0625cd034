use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use phixps::export::export_to_dir;
use phixps::phi::PhiDecoder;
use phixps::report::DecodeReport;

use super::{Config, DecoderArgs};

/// Decode a PHI file, print the report and export the result
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    args: DecoderArgs,
    no_export: bool,
) -> Result<()> {
    let config = Config::resolve(&args)?;
    let decoder = PhiDecoder::new(config.decoder).context("Invalid decoder settings")?;

    info!("Decoding {}", input.display());
    let result = decoder
        .decode_file(&input)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    let report = DecodeReport::from_result(&result, input.display().to_string());
    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    if report.has_failures() {
        warn!(
            "{} of {} regions could not be decoded",
            report.failure_count(),
            result.regions.len()
        );
    }

    if no_export {
        return Ok(());
    }

    let output_dir = output.unwrap_or_else(|| {
        input
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "spectrum".to_string());

    let written = export_to_dir(&output_dir, &stem, &result, &config.export)
        .with_context(|| format!("Failed to export to {}", output_dir.display()))?;
    for path in written {
        println!("Wrote {}", path.display());
    }

    Ok(())
}
