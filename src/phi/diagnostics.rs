//! Recoverable, per-region findings collected during a decode.

use std::fmt;

use serde::Serialize;

/// A non-fatal problem noticed while decoding.
///
/// None of these make the decode fail; a result with fewer spectra than
/// declared regions is a valid outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeDiagnostic {
    /// A region record had too few tokens or non-numeric fields and was skipped.
    MalformedRegionRecord {
        /// 1-based header line number
        line_number: usize,
        /// The offending line, trimmed
        line: String,
        /// Why the record was rejected
        reason: String,
    },

    /// Fewer block markers than declared regions; trailing regions have no block.
    InsufficientMarkers {
        /// Number of declared regions
        declared: usize,
        /// Number of markers found in the binary segment
        found: usize,
        /// Regions left without a marker, in declaration order
        missing: Vec<String>,
    },

    /// More block markers than declared regions; the extras were ignored.
    ExcessMarkers {
        /// Number of declared regions
        declared: usize,
        /// Number of markers found in the binary segment
        found: usize,
    },

    /// No probed alignment produced an accepted sample array.
    AlignmentExhausted {
        /// Region name
        region: String,
        /// Byte offset of the block marker paired with the region
        marker_offset: usize,
        /// Number of read-start candidates that were tried
        candidates_tried: usize,
    },

    /// Marker bytes turned up inside a region's accepted samples and were not
    /// treated as block starts.
    MarkerInsideData {
        /// Region whose samples contain the marker bytes
        region: String,
        /// Byte offsets of the ignored markers
        offsets: Vec<usize>,
    },

    /// Two regions share a name; the later spectrum replaced the earlier one.
    DuplicateRegionName {
        /// The repeated region name
        region: String,
    },
}

impl DecodeDiagnostic {
    /// Name of the region this diagnostic concerns, if it concerns exactly one.
    pub fn region(&self) -> Option<&str> {
        match self {
            DecodeDiagnostic::AlignmentExhausted { region, .. }
            | DecodeDiagnostic::MarkerInsideData { region, .. }
            | DecodeDiagnostic::DuplicateRegionName { region } => Some(region),
            _ => None,
        }
    }
}

impl fmt::Display for DecodeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeDiagnostic::MalformedRegionRecord {
                line_number,
                line,
                reason,
            } => write!(f, "skipped region record on line {}: {} ({})", line_number, reason, line),
            DecodeDiagnostic::InsufficientMarkers {
                declared,
                found,
                missing,
            } => write!(
                f,
                "found {} block markers for {} declared regions; no block for: {}",
                found,
                declared,
                missing.join(", ")
            ),
            DecodeDiagnostic::ExcessMarkers { declared, found } => write!(
                f,
                "found {} block markers for {} declared regions; extra markers ignored",
                found, declared
            ),
            DecodeDiagnostic::AlignmentExhausted {
                region,
                marker_offset,
                candidates_tried,
            } => write!(
                f,
                "{}: no valid sample window near marker at byte {} ({} candidates tried)",
                region, marker_offset, candidates_tried
            ),
            DecodeDiagnostic::MarkerInsideData { region, offsets } => {
                let offsets: Vec<String> = offsets.iter().map(|o| o.to_string()).collect();
                write!(
                    f,
                    "{}: ignored marker bytes inside sample data at byte {}",
                    region,
                    offsets.join(", ")
                )
            }
            DecodeDiagnostic::DuplicateRegionName { region } => {
                write!(f, "{}: duplicate region name, earlier spectrum replaced", region)
            }
        }
    }
}
