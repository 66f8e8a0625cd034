use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::phi::{DecodeResult, FileMetadata, RegionDescriptor};

use super::ExportError;

/// Version of the metadata document layout.
pub const METADATA_FORMAT_VERSION: &str = "1.0";

/// Region entry in the metadata document.
#[derive(Debug, Clone, Serialize)]
pub struct RegionEntry<'a> {
    /// The declared region
    #[serde(flatten)]
    pub descriptor: &'a RegionDescriptor,

    /// Whether a spectrum was decoded for this region
    pub decoded: bool,

    /// Byte offset of the accepted samples, when decoded
    pub data_offset: Option<usize>,

    /// Mean absolute intensity, when decoded
    pub mean_intensity: Option<f64>,
}

/// Structured metadata document written next to the spectrum table.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataDocument<'a> {
    /// Document layout version
    pub format_version: &'static str,

    /// Name of the decoded file
    pub source_file: &'a str,

    /// When the decode was exported
    pub exported_at: DateTime<Utc>,

    /// Byte offset of the binary segment
    pub binary_start_offset: usize,

    /// Header key/value pairs
    pub metadata: &'a FileMetadata,

    /// Every declared region, including ones that failed to decode
    pub regions: Vec<RegionEntry<'a>>,

    /// Human-readable diagnostics
    pub diagnostics: Vec<String>,
}

impl<'a> MetadataDocument<'a> {
    /// Describe `result` as decoded from `source_file`.
    pub fn new(result: &'a DecodeResult, source_file: &'a str) -> Self {
        let regions = result
            .regions
            .iter()
            .enumerate()
            .map(|(index, descriptor)| {
                let decoded = result.decoded_at(index);
                RegionEntry {
                    descriptor,
                    decoded: decoded.is_some(),
                    data_offset: decoded.map(|r| r.data_offset),
                    mean_intensity: decoded.map(|r| r.mean_intensity),
                }
            })
            .collect();

        Self {
            format_version: METADATA_FORMAT_VERSION,
            source_file,
            exported_at: Utc::now(),
            binary_start_offset: result.binary_start_offset,
            metadata: &result.metadata,
            regions,
            diagnostics: result.diagnostics.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Write the metadata document as pretty-printed JSON.
pub fn write_metadata_json<W: Write>(
    writer: W,
    result: &DecodeResult,
    source_file: &str,
) -> Result<(), ExportError> {
    let document = MetadataDocument::new(result, source_file);
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}
