//! The decode pipeline: header, markers, then a guess-and-validate search per region.

use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::edge::{EdgeConfig, EdgeDetector};
use super::markers::{pairing_mismatch, scan_markers, MarkerCursor, RegionBlock};
use super::probe::{AlignmentProber, ProbeBase, ProbeConfig};
use super::validator::{CandidateValidator, PlausibilityConfig, PlausibilityValidator};
use super::{
    parse_header, DecodeDiagnostic, DecodeResult, DecodedRegion, ParsedHeader, PhiError,
    RegionDescriptor, Spectrum,
};

/// Decoder settings.
///
/// The defaults reproduce what has been observed in PHI MultiPak output.
/// The intensity threshold and mean bounds are empirical and may need tuning
/// for other instruments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Byte signature opening every region block (ASCII)
    pub marker: String,

    /// Probe regions concurrently (needs the `parallel` feature)
    pub parallel: bool,

    /// Read-start enumeration
    pub probe: ProbeConfig,

    /// Padding/data boundary search
    pub edge: EdgeConfig,

    /// Acceptance bounds
    pub plausibility: PlausibilityConfig,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            marker: "pnt".to_string(),
            parallel: false,
            probe: ProbeConfig::default(),
            edge: EdgeConfig::default(),
            plausibility: PlausibilityConfig::default(),
        }
    }
}

impl DecoderConfig {
    /// Check settings that would make the search meaningless.
    pub fn validate(&self) -> Result<(), PhiError> {
        if self.marker.is_empty() {
            return Err(PhiError::InvalidConfig("marker must not be empty".to_string()));
        }
        if self.probe.alignment_step == 0 {
            return Err(PhiError::InvalidConfig(
                "probe.alignment_step must be greater than zero".to_string(),
            ));
        }
        if !self.edge.intensity_threshold.is_finite() || self.edge.intensity_threshold < 0.0 {
            return Err(PhiError::InvalidConfig(format!(
                "edge.intensity_threshold must be a non-negative number, got {}",
                self.edge.intensity_threshold
            )));
        }
        let PlausibilityConfig { min_mean, max_mean } = self.plausibility;
        if min_mean.is_nan() || max_mean.is_nan() || min_mean > max_mean {
            return Err(PhiError::InvalidConfig(format!(
                "plausibility range [{}, {}] is empty",
                min_mean, max_mean
            )));
        }
        Ok(())
    }
}

/// How one block looks to the prober, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct BlockProbe {
    /// Region paired with this block, if any
    pub region: Option<String>,

    /// Byte offset of the marker
    pub marker: usize,

    /// Exclusive block bound
    pub block_end: usize,

    /// Where alignment enumeration starts
    pub base: ProbeBase,
}

/// Header plus per-block probe view, without accepting any data.
#[derive(Debug, Clone)]
pub struct Inspection {
    /// Parsed text header
    pub header: ParsedHeader,

    /// Every marker position in the binary segment
    pub markers: Vec<usize>,

    /// One entry per marker
    pub blocks: Vec<BlockProbe>,
}

#[derive(Debug, Default)]
struct BlockWalk {
    decoded: Vec<DecodedRegion>,
    diagnostics: Vec<DecodeDiagnostic>,
    markers_in_use: usize,
}

/// Decodes PHI spectrum files.
pub struct PhiDecoder {
    config: DecoderConfig,
    prober: AlignmentProber,
    detector: EdgeDetector,
    validator: Box<dyn CandidateValidator>,
}

impl Default for PhiDecoder {
    fn default() -> Self {
        Self::from_parts(DecoderConfig::default())
    }
}

impl PhiDecoder {
    /// Create a decoder, rejecting unusable settings.
    pub fn new(config: DecoderConfig) -> Result<Self, PhiError> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: DecoderConfig) -> Self {
        Self {
            prober: AlignmentProber::new(config.probe.clone()),
            detector: EdgeDetector::new(config.edge.clone()),
            validator: Box::new(PlausibilityValidator::new(config.plausibility.clone())),
            config,
        }
    }

    /// Replace the acceptance predicate, keeping the search strategy.
    pub fn with_validator(mut self, validator: impl CandidateValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    /// Settings in use.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Read and decode a file.
    ///
    /// Open or read failures are reported as [`PhiError::FileAccess`].
    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<DecodeResult, PhiError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|source| PhiError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Read {} bytes from {}", content.len(), path.display());
        self.decode(&content)
    }

    /// Decode file content held in memory.
    ///
    /// Only a missing `EOFH` terminator is fatal; every per-region failure is
    /// recorded as a diagnostic and the region is left out of the result.
    pub fn decode(&self, content: &[u8]) -> Result<DecodeResult, PhiError> {
        let header = parse_header(content)?;
        let markers = scan_markers(
            content,
            header.binary_start_offset,
            self.config.marker.as_bytes(),
        );
        debug!(
            "{} markers after byte {}",
            markers.len(),
            header.binary_start_offset
        );

        let walk = self.walk_blocks(content, &header.regions, &markers);

        let mut diagnostics = header.diagnostics.clone();
        if let Some(mismatch) = pairing_mismatch(&header.regions, walk.markers_in_use) {
            warn!("{}", mismatch);
            diagnostics.push(mismatch);
        }
        diagnostics.extend(walk.diagnostics);

        let mut result = DecodeResult {
            binary_start_offset: header.binary_start_offset,
            regions: header.regions.clone(),
            metadata: header.metadata,
            spectra: Vec::with_capacity(walk.decoded.len()),
            diagnostics,
        };
        for decoded in walk.decoded {
            result.insert(decoded);
        }

        info!(
            "Decoded {} of {} regions",
            result.spectra.len(),
            result.regions.len()
        );
        Ok(result)
    }

    /// Probe every block without running the validator.
    pub fn inspect(&self, content: &[u8]) -> Result<Inspection, PhiError> {
        let header = parse_header(content)?;
        let markers = scan_markers(
            content,
            header.binary_start_offset,
            self.config.marker.as_bytes(),
        );

        let blocks = markers
            .iter()
            .enumerate()
            .map(|(index, &marker)| {
                let block_end = markers.get(index + 1).copied().unwrap_or(content.len());
                BlockProbe {
                    region: header.regions.get(index).map(|r| r.name.clone()),
                    marker,
                    block_end,
                    base: self.prober.locate_base(content, marker, block_end),
                }
            })
            .collect();

        Ok(Inspection {
            header,
            markers,
            blocks,
        })
    }

    /// Pair regions with blocks in marker order and decode each one.
    ///
    /// After a region is accepted, markers lying inside its samples are
    /// dropped, so the next region pairs with the next real block.
    fn walk_blocks(
        &self,
        content: &[u8],
        regions: &[RegionDescriptor],
        markers: &[usize],
    ) -> BlockWalk {
        let mut speculative = self.speculate(content, regions, markers);
        let mut cursor = MarkerCursor::new(markers, content.len());
        let mut walk = BlockWalk::default();

        for (index, region) in regions.iter().enumerate() {
            let positional = cursor.is_positional();
            let Some(block) = cursor.next_block(index, region) else {
                break;
            };

            let outcome = match speculative.get_mut(index).and_then(Option::take) {
                Some(outcome) if positional => outcome,
                _ => self.decode_region(content, &block),
            };

            match outcome {
                Ok(decoded) => {
                    let dropped = cursor.consume_through(decoded.data_end());
                    if !dropped.is_empty() {
                        warn!(
                            "{}: {} marker(s) inside accepted samples ignored",
                            region.name,
                            dropped.len()
                        );
                        walk.diagnostics.push(DecodeDiagnostic::MarkerInsideData {
                            region: region.name.clone(),
                            offsets: dropped,
                        });
                    }
                    walk.decoded.push(decoded);
                }
                Err(diagnostic) => walk.diagnostics.push(diagnostic),
            }
        }

        walk.markers_in_use = cursor.markers_in_use();
        walk
    }

    /// Decode every positionally paired block up front, in parallel.
    ///
    /// The walk reuses these outcomes only while no marker has been dropped.
    #[cfg(feature = "parallel")]
    fn speculate(
        &self,
        content: &[u8],
        regions: &[RegionDescriptor],
        markers: &[usize],
    ) -> Vec<Option<Result<DecodedRegion, DecodeDiagnostic>>> {
        use rayon::prelude::*;

        if !self.config.parallel {
            return Vec::new();
        }
        let (blocks, _) = super::markers::pair_blocks(regions, markers, content.len());
        // collect() on an indexed parallel iterator keeps declaration order
        blocks
            .par_iter()
            .map(|block| Some(self.decode_region(content, block)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn speculate(
        &self,
        _content: &[u8],
        _regions: &[RegionDescriptor],
        _markers: &[usize],
    ) -> Vec<Option<Result<DecodedRegion, DecodeDiagnostic>>> {
        if self.config.parallel {
            debug!("Parallel probing requested but the `parallel` feature is disabled");
        }
        Vec::new()
    }

    /// Try read starts in order and keep the first candidate the validator accepts.
    fn decode_region(
        &self,
        content: &[u8],
        block: &RegionBlock<'_>,
    ) -> Result<DecodedRegion, DecodeDiagnostic> {
        let region = block.region;
        let mut tried = 0usize;

        let accepted = self
            .prober
            .candidates(content, block)
            .inspect(|_| tried += 1)
            .filter_map(|start| {
                self.detector
                    .detect(content, start, region.points, block.block_end)
            })
            .find_map(|candidate| match self.validator.check(&candidate.values) {
                Ok(mean) => Some((candidate, mean)),
                Err(rejection) => {
                    debug!(
                        "{}: rejected window at byte {}: {}",
                        region.name, candidate.data_offset, rejection
                    );
                    None
                }
            });

        match accepted {
            Some((candidate, mean)) => {
                info!(
                    "{}: {} points at byte {} (alignment +{}, mean {:.1})",
                    region.name,
                    region.points,
                    candidate.data_offset,
                    candidate.read_start.alignment,
                    mean
                );
                Ok(DecodedRegion {
                    region_index: block.index,
                    spectrum: Spectrum::assemble(region, candidate.values),
                    descriptor: region.clone(),
                    marker_offset: block.marker,
                    data_offset: candidate.data_offset,
                    mean_intensity: mean,
                })
            }
            None => {
                warn!(
                    "{}: no valid sample window after marker at byte {}",
                    region.name, block.marker
                );
                Err(DecodeDiagnostic::AlignmentExhausted {
                    region: region.name.clone(),
                    marker_offset: block.marker,
                    candidates_tried: tried,
                })
            }
        }
    }
}

/// Decode with default settings.
pub fn decode(content: &[u8]) -> Result<DecodeResult, PhiError> {
    PhiDecoder::default().decode(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phi::validator::Rejection;

    fn block_with(points: usize, padding_words: usize, samples: &[f32]) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (label, value) in [(b"pnt\0", points as u32), (b"sar\0", 1), (b"c/s\0", 0), (b"f4\0\0", 4)] {
            bytes.extend_from_slice(label);
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend(std::iter::repeat(0u8).take(padding_words * 4));
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }

    fn block(points: usize, padding_words: usize, value: f32) -> Vec<u8> {
        let samples: Vec<f32> = (0..points).map(|i| value + i as f32).collect();
        block_with(points, padding_words, &samples)
    }

    fn file(regions: &[(&str, usize)], blocks: &[Vec<u8>]) -> Vec<u8> {
        let mut bytes = b"SOFH\nFileDesc: unit\n".to_vec();
        for (i, (name, points)) in regions.iter().enumerate() {
            bytes.extend_from_slice(
                format!(
                    "SpectralRegDef: {} {} {} 6 {} -0.1 {}.0 {}.0\n",
                    i + 1,
                    i + 1,
                    name,
                    points,
                    100 + points,
                    100
                )
                .as_bytes(),
            );
        }
        bytes.extend_from_slice(b"EOFH\n");
        for block in blocks {
            bytes.extend_from_slice(block);
        }
        bytes
    }

    #[test]
    fn test_decode_two_regions() {
        let content = file(
            &[("C1s", 11), ("O1s", 21)],
            &[block(11, 3, 1000.0), block(21, 2, 5000.0)],
        );
        let result = decode(&content).unwrap();

        assert_eq!(result.decoded_names(), vec!["C1s", "O1s"]);
        let c1s = result.get("C1s").unwrap();
        assert_eq!(c1s.spectrum.y[0], 1000.0);
        assert_eq!(c1s.spectrum.y[10], 1010.0);
        assert_eq!(c1s.spectrum.x[0], 111.0);
        assert_eq!(c1s.spectrum.x[10], 100.0);
        assert_eq!(result.spectrum("O1s").unwrap().y[0], 5000.0);
        assert_eq!(result.spectrum("O1s").unwrap().y[20], 5020.0);
        assert_eq!(c1s.region_index, 0);
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_fractional_samples_directly_after_slots() {
        let samples: Vec<f32> = (0..11).map(|i| 1234.567 + 3.1 * i as f32).collect();
        let content = file(&[("C1s", 11)], &[block_with(11, 0, &samples)]);

        let c1s = decode(&content).unwrap().spectra.remove(0);
        let expected: Vec<f64> = samples.iter().map(|&v| v as f64).collect();
        assert_eq!(c1s.spectrum.y, expected);
        assert_eq!(c1s.data_offset - c1s.marker_offset, 32);
    }

    #[test]
    fn test_marker_bytes_inside_samples_do_not_split_blocks() {
        let mut samples: Vec<f32> = (0..11).map(|i| 1000.0 + i as f32).collect();
        samples[5] = f32::from_bits(0x4774_6e70);
        let content = file(
            &[("C1s", 11), ("O1s", 21)],
            &[block_with(11, 1, &samples), block(21, 1, 5000.0)],
        );

        let result = decode(&content).unwrap();
        assert_eq!(result.decoded_names(), vec!["C1s", "O1s"]);
        assert_eq!(result.spectrum("C1s").unwrap().y[5], 62574.4375);
        assert_eq!(result.spectrum("O1s").unwrap().y[0], 5000.0);

        let c1s = result.get("C1s").unwrap();
        match &result.diagnostics[..] {
            [DecodeDiagnostic::MarkerInsideData { region, offsets }] => {
                assert_eq!(region, "C1s");
                assert_eq!(offsets, &vec![c1s.data_offset + 5 * 4]);
            }
            other => panic!("unexpected diagnostics {:?}", other),
        }
    }

    #[test]
    fn test_missing_terminator_aborts() {
        let err = decode(b"SOFH\nSpectralRegDef: 1 1 C1s 6 3 -0.1 3.0 1.0\npnt").unwrap_err();
        assert!(matches!(err, PhiError::MissingTerminator { .. }));
    }

    #[test]
    fn test_rejected_validator_exhausts_region() {
        struct RejectAll;
        impl CandidateValidator for RejectAll {
            fn check(&self, _values: &[f64]) -> Result<f64, Rejection> {
                Err(Rejection::Empty)
            }
        }

        let content = file(&[("C1s", 11)], &[block(11, 0, 1000.0)]);
        let result = PhiDecoder::default()
            .with_validator(RejectAll)
            .decode(&content)
            .unwrap();

        assert!(result.spectra.is_empty());
        match &result.diagnostics[..] {
            [DecodeDiagnostic::AlignmentExhausted {
                region,
                candidates_tried,
                ..
            }] => {
                assert_eq!(region, "C1s");
                assert!(*candidates_tried > 0);
            }
            other => panic!("unexpected diagnostics {:?}", other),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DecoderConfig {
            marker: String::new(),
            ..DecoderConfig::default()
        };
        assert!(matches!(PhiDecoder::new(config), Err(PhiError::InvalidConfig(_))));

        let mut config = DecoderConfig::default();
        config.plausibility.min_mean = 1e12;
        assert!(PhiDecoder::new(config).is_err());
    }

    #[test]
    fn test_inspect_reports_tag_bases() {
        let content = file(&[("C1s", 11)], &[block(11, 0, 1000.0), b"pnt".to_vec()]);
        let inspection = PhiDecoder::default().inspect(&content).unwrap();

        assert_eq!(inspection.markers.len(), 2);
        assert_eq!(inspection.blocks[0].region.as_deref(), Some("C1s"));
        assert!(matches!(inspection.blocks[0].base, ProbeBase::TypeTag(_)));
        assert_eq!(inspection.blocks[1].region, None);
        assert_eq!(inspection.blocks[1].block_end, content.len());
    }
}
