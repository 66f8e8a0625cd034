//! # Export
//!
//! Writes a [`DecodeResult`](crate::phi::DecodeResult) as two files:
//!
//! - `<stem>.metadata.json`: header metadata, every declared region (decoded
//!   or not), and the decode diagnostics
//! - `<stem>.spectra.csv`: a name row per decoded region followed by its
//!   `binding energy, intensity` rows

mod error;
mod metadata;
mod table;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Deserializer};

use crate::phi::DecodeResult;

pub use error::ExportError;
pub use metadata::{write_metadata_json, MetadataDocument, RegionEntry, METADATA_FORMAT_VERSION};
pub use table::write_spectra_csv;

/// Which files to write and how.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write `<stem>.metadata.json`
    pub metadata: bool,

    /// Write `<stem>.spectra.csv`
    pub spectra: bool,

    /// Field delimiter for the spectrum table, a single ASCII character
    #[serde(deserialize_with = "ascii_delimiter")]
    pub delimiter: char,
}

fn ascii_delimiter<'de, D: Deserializer<'de>>(deserializer: D) -> Result<char, D::Error> {
    let delimiter = char::deserialize(deserializer)?;
    if delimiter.is_ascii() {
        Ok(delimiter)
    } else {
        Err(serde::de::Error::custom(ExportError::InvalidDelimiter(delimiter)))
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            metadata: true,
            spectra: true,
            delimiter: ',',
        }
    }
}

/// Write the enabled output files into `dir`, returning the paths written.
pub fn export_to_dir(
    dir: &Path,
    stem: &str,
    result: &DecodeResult,
    config: &ExportConfig,
) -> Result<Vec<PathBuf>, ExportError> {
    if !config.delimiter.is_ascii() {
        return Err(ExportError::InvalidDelimiter(config.delimiter));
    }
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    if config.metadata {
        let path = dir.join(format!("{}.metadata.json", stem));
        let file = BufWriter::new(File::create(&path)?);
        write_metadata_json(file, result, stem)?;
        info!("Wrote {}", path.display());
        written.push(path);
    }

    if config.spectra {
        let path = dir.join(format!("{}.spectra.csv", stem));
        let file = BufWriter::new(File::create(&path)?);
        write_spectra_csv(file, result, config.delimiter as u8)?;
        info!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phi::{DecodeDiagnostic, DecodedRegion, RegionDescriptor, Spectrum};

    fn sample_result() -> DecodeResult {
        let c1s = RegionDescriptor {
            name: "C1s".to_string(),
            points: 3,
            start_ev: 290.0,
            end_ev: 280.0,
        };
        let o1s = RegionDescriptor {
            name: "O1s".to_string(),
            points: 2,
            start_ev: 540.0,
            end_ev: 530.0,
        };
        let mut metadata = crate::phi::FileMetadata::new();
        metadata.insert("FileDesc".to_string(), "sample".to_string());

        DecodeResult {
            binary_start_offset: 120,
            regions: vec![c1s.clone(), o1s.clone()],
            metadata,
            spectra: vec![DecodedRegion {
                region_index: 0,
                spectrum: Spectrum::assemble(&c1s, vec![100.0, 250.5, 300.0]),
                descriptor: c1s,
                marker_offset: 130,
                data_offset: 180,
                mean_intensity: 216.83,
            }],
            diagnostics: vec![DecodeDiagnostic::AlignmentExhausted {
                region: "O1s".to_string(),
                marker_offset: 400,
                candidates_tried: 42,
            }],
        }
    }

    #[test]
    fn test_spectra_table_layout() {
        let mut buffer = Vec::new();
        write_spectra_csv(&mut buffer, &sample_result(), b',').unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text, "C1s\n290,100\n285,250.5\n280,300\n");
    }

    #[test]
    fn test_metadata_lists_all_regions() {
        let mut buffer = Vec::new();
        write_metadata_json(&mut buffer, &sample_result(), "sample.spe").unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(json["format_version"], METADATA_FORMAT_VERSION);
        assert_eq!(json["source_file"], "sample.spe");
        assert_eq!(json["metadata"]["FileDesc"], "sample");
        assert_eq!(json["regions"].as_array().unwrap().len(), 2);
        assert_eq!(json["regions"][0]["name"], "C1s");
        assert_eq!(json["regions"][0]["decoded"], true);
        assert_eq!(json["regions"][1]["decoded"], false);
        assert!(json["regions"][1]["data_offset"].is_null());
        assert_eq!(json["diagnostics"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_export_to_dir_respects_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            metadata: false,
            delimiter: '\t',
            ..ExportConfig::default()
        };
        let written = export_to_dir(dir.path(), "run1", &sample_result(), &config).unwrap();

        assert_eq!(written, vec![dir.path().join("run1.spectra.csv")]);
        let text = std::fs::read_to_string(&written[0]).unwrap();
        assert!(text.starts_with("C1s\n290\t100\n"));
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            delimiter: '\u{e9}',
            ..ExportConfig::default()
        };
        let err = export_to_dir(dir.path(), "run1", &sample_result(), &config).unwrap_err();

        assert!(matches!(err, ExportError::InvalidDelimiter('\u{e9}')));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
