//! Padding/data boundary detection.
//!
//! Samples are little-endian binary32. From a read start the detector
//! over-reads `points + over_read` floats and takes the first value whose
//! magnitude exceeds the intensity threshold as the first real sample.

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use super::probe::ReadStart;

pub(crate) const SAMPLE_SIZE: usize = 4;

/// Settings for the boundary search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Extra floats read past `points` to absorb unknown padding
    pub over_read: usize,

    /// Magnitude at or below which a value is treated as padding
    pub intensity_threshold: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            over_read: 1000,
            intensity_threshold: 50.0,
        }
    }
}

/// A sample array cut out of the binary segment, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// The read start this window came from
    pub read_start: ReadStart,

    /// Index of the first sample within the over-read window
    pub start_index: usize,

    /// Absolute byte offset of the first sample
    pub data_offset: usize,

    /// Exactly `points` samples, widened to f64
    pub values: Vec<f64>,
}

/// Decode little-endian binary32 values from `bytes`; a trailing partial value is dropped.
pub fn read_f32_window(bytes: &[u8], max_values: usize) -> Vec<f64> {
    bytes
        .chunks_exact(SAMPLE_SIZE)
        .take(max_values)
        .map(|chunk| LittleEndian::read_f32(chunk) as f64)
        .collect()
}

/// Locates the first real sample after a read start.
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    config: EdgeConfig,
}

impl EdgeDetector {
    /// Create a detector with the given settings.
    pub fn new(config: EdgeConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }

    /// Cut `points` samples starting at the first above-threshold value.
    ///
    /// The first sample must lie wholly before `block_end`, so a block holding
    /// only padding never reaches into the next one. The run it opens may
    /// continue past `block_end`: marker bytes can occur inside sample data.
    /// Returns `None` when no value crosses the threshold in time or fewer
    /// than `points` samples remain after the edge.
    pub fn detect(
        &self,
        content: &[u8],
        read_start: ReadStart,
        points: usize,
        block_end: usize,
    ) -> Option<Candidate> {
        let bound = block_end.min(content.len());
        if read_start.offset >= bound || points == 0 {
            return None;
        }

        let window = read_f32_window(
            &content[read_start.offset..],
            points.saturating_add(self.config.over_read),
        );
        if window.len() < points {
            return None;
        }

        let threshold = self.config.intensity_threshold;
        let edge_limit = (bound - read_start.offset) / SAMPLE_SIZE;
        let start_index = window
            .iter()
            .take(edge_limit)
            .position(|v| v.abs() > threshold)?;
        if window.len() - start_index < points {
            return None;
        }

        Some(Candidate {
            read_start,
            start_index,
            data_offset: read_start.offset + start_index * SAMPLE_SIZE,
            values: window[start_index..start_index + points].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phi::probe::ProbeBase;

    fn start(offset: usize) -> ReadStart {
        ReadStart {
            offset,
            alignment: 0,
            base: ProbeBase::Fallback(offset),
        }
    }

    fn floats(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_finds_edge_after_padding() {
        let mut values = vec![0.0f32; 7];
        values.extend_from_slice(&[1200.0, 1300.0, 1250.0]);
        let content = floats(&values);

        let detector = EdgeDetector::default();
        let candidate = detector.detect(&content, start(0), 3, content.len()).unwrap();

        assert_eq!(candidate.start_index, 7);
        assert_eq!(candidate.data_offset, 28);
        assert_eq!(candidate.values, vec![1200.0, 1300.0, 1250.0]);
    }

    #[test]
    fn test_small_values_below_threshold_are_padding() {
        let content = floats(&[3.0, -49.0, 50.0, -51.0, 60.0]);

        let detector = EdgeDetector::default();
        let candidate = detector.detect(&content, start(0), 2, content.len()).unwrap();
        assert_eq!(candidate.start_index, 3);
        assert_eq!(candidate.values, vec![-51.0, 60.0]);
    }

    #[test]
    fn test_all_padding_is_rejected() {
        let content = vec![0u8; 4 * 500];
        let detector = EdgeDetector::default();
        assert!(detector.detect(&content, start(0), 100, content.len()).is_none());
    }

    #[test]
    fn test_insufficient_samples_after_edge() {
        let content = floats(&[0.0, 0.0, 500.0, 600.0]);
        let detector = EdgeDetector::default();
        assert!(detector.detect(&content, start(0), 3, content.len()).is_none());
    }

    #[test]
    fn test_edge_must_lie_inside_block() {
        let mut values = vec![0.0f32; 4];
        values.extend_from_slice(&[900.0, 900.0, 900.0]);
        let content = floats(&values);

        let detector = EdgeDetector::default();
        assert!(detector.detect(&content, start(0), 3, 16).is_none());
        assert!(detector.detect(&content, start(0), 3, 18).is_none());
        assert!(detector.detect(&content, start(0), 3, 20).is_some());
    }

    #[test]
    fn test_samples_may_run_past_block_end() {
        let mut values = vec![0.0f32; 2];
        values.extend_from_slice(&[800.0, 62574.4375, 800.0, 800.0]);
        let content = floats(&values);

        let detector = EdgeDetector::default();
        let candidate = detector.detect(&content, start(0), 4, 12).unwrap();
        assert_eq!(candidate.data_offset, 8);
        assert_eq!(candidate.values.len(), 4);
    }

    #[test]
    fn test_over_read_limits_window() {
        let mut values = vec![0.0f32; 20];
        values.extend_from_slice(&[900.0, 900.0]);
        let content = floats(&values);

        let detector = EdgeDetector::new(EdgeConfig {
            over_read: 10,
            ..EdgeConfig::default()
        });
        assert!(detector.detect(&content, start(0), 2, content.len()).is_none());
    }

    #[test]
    fn test_nan_never_counts_as_edge() {
        let content = floats(&[f32::NAN, 0.0, 700.0]);
        let detector = EdgeDetector::default();
        let candidate = detector.detect(&content, start(0), 1, content.len()).unwrap();
        assert_eq!(candidate.start_index, 2);
    }

    #[test]
    fn test_read_window_drops_partial_tail() {
        let mut bytes = floats(&[1.5, 2.5]);
        bytes.push(0xff);
        assert_eq!(read_f32_window(&bytes, 10), vec![1.5, 2.5]);
        assert_eq!(read_f32_window(&bytes, 1), vec![1.5]);
    }
}
