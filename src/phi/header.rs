//! Text preamble parsing.
//!
//! A PHI file opens with newline-terminated ASCII lines:
//!
//! ```text
//! SOFH
//! FileDesc: survey + narrow scans
//! AcqFilename: sample_01.spe
//! SpectralRegDef: 1 1 Su1s 111 1356 -1.0000 1100.0000 -5.0000 ...
//! SpectralRegDef: 2 2 C1s 6 201 -0.1000 298.0000 278.0000 ...
//! EOFH
//! <binary segment>
//! ```
//!
//! Region records become [`RegionDescriptor`]s, every other `key: value` line
//! lands in [`FileMetadata`], and the byte after the `EOFH` line is where the
//! binary segment begins.

use std::borrow::Cow;
use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{DecodeDiagnostic, PhiError};

/// Line that ends the text header.
pub const HEADER_TERMINATOR: &str = "EOFH";

/// Prefix of a region declaration line.
pub const REGION_RECORD_PREFIX: &str = "SpectralRegDef:";

const NAME_TOKEN: usize = 3;
const POINTS_TOKEN: usize = 5;
const START_TOKEN: usize = 7;
const END_TOKEN: usize = 8;

/// Header `key: value` pairs outside region records. Later keys overwrite earlier ones.
pub type FileMetadata = BTreeMap<String, String>;

/// One acquired spectral region as declared in the header.
///
/// Descriptor order is the only link to the binary blocks, so it is kept
/// exactly as declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionDescriptor {
    /// Region name (e.g. `C1s`, `Su1s`, `CuLMM`)
    pub name: String,

    /// Number of samples, always > 0
    pub points: usize,

    /// Energy of the first sample in eV
    pub start_ev: f64,

    /// Energy of the last sample in eV, never equal to `start_ev`
    pub end_ev: f64,
}

impl RegionDescriptor {
    /// Parse a `SpectralRegDef:` line.
    ///
    /// Returns a human-readable reason when the record is short or malformed.
    pub fn from_record(line: &str) -> Result<Self, String> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() <= END_TOKEN {
            return Err(format!(
                "expected at least {} tokens, found {}",
                END_TOKEN + 1,
                tokens.len()
            ));
        }

        let name = tokens[NAME_TOKEN].to_string();
        let points: usize = tokens[POINTS_TOKEN]
            .parse()
            .map_err(|_| format!("point count {:?} is not an integer", tokens[POINTS_TOKEN]))?;
        let start_ev = parse_energy(tokens[START_TOKEN])?;
        let end_ev = parse_energy(tokens[END_TOKEN])?;

        if points == 0 {
            return Err("point count is zero".to_string());
        }
        if start_ev == end_ev {
            return Err(format!("start and end energy are both {}", start_ev));
        }

        Ok(Self {
            name,
            points,
            start_ev,
            end_ev,
        })
    }
}

fn parse_energy(token: &str) -> Result<f64, String> {
    match token.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("energy {:?} is not a finite number", token)),
    }
}

/// Everything recovered from the text preamble.
#[derive(Debug, Clone, Default)]
pub struct ParsedHeader {
    /// Region descriptors in declaration order
    pub regions: Vec<RegionDescriptor>,

    /// Metadata key/value pairs
    pub metadata: FileMetadata,

    /// Trimmed header lines up to and including `EOFH`
    pub lines: Vec<String>,

    /// Byte offset of the first byte after the `EOFH` line
    pub binary_start_offset: usize,

    /// Region records that were skipped
    pub diagnostics: Vec<DecodeDiagnostic>,
}

/// Decode one header line, falling back to Latin-1 when it is not valid UTF-8.
fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

/// Parse the text header at the start of `content`.
///
/// Fails with [`PhiError::MissingTerminator`] when no `EOFH` line exists; the
/// binary segment then has no defined start and nothing else can be decoded.
pub fn parse_header(content: &[u8]) -> Result<ParsedHeader, PhiError> {
    let mut header = ParsedHeader::default();
    let mut pos = 0;
    let mut line_number = 0;

    while pos < content.len() {
        let (raw, next) = match content[pos..].iter().position(|&b| b == b'\n') {
            Some(idx) => (&content[pos..pos + idx], pos + idx + 1),
            None => (&content[pos..], content.len()),
        };
        pos = next;
        line_number += 1;

        let decoded = decode_line(raw);
        let line = decoded.trim();
        header.lines.push(line.to_string());

        if line == HEADER_TERMINATOR {
            header.binary_start_offset = pos;
            debug!(
                "Header ends at line {}, binary segment starts at byte {}",
                line_number, pos
            );
            return Ok(header);
        }

        if line.starts_with(REGION_RECORD_PREFIX) {
            match RegionDescriptor::from_record(line) {
                Ok(region) => {
                    debug!(
                        "Region {}: {} points, {} -> {} eV",
                        region.name, region.points, region.start_ev, region.end_ev
                    );
                    header.regions.push(region);
                }
                Err(reason) => {
                    warn!("Skipping region record on line {}: {}", line_number, reason);
                    header.diagnostics.push(DecodeDiagnostic::MalformedRegionRecord {
                        line_number,
                        line: line.to_string(),
                        reason,
                    });
                }
            }
        } else if let Some((key, value)) = line.split_once(':') {
            let key = key.trim();
            if !key.is_empty() {
                header.metadata.insert(key.to_string(), value.trim().to_string());
            }
        }
    }

    Err(PhiError::MissingTerminator {
        scanned_bytes: content.len(),
    })
}
