//! Energy axis construction and spectrum assembly.

use serde::Serialize;

use super::edge::SAMPLE_SIZE;
use super::RegionDescriptor;

/// `points` evenly spaced values from `start` to `end` inclusive.
///
/// One point yields `[start]`; zero points yield an empty axis. The last
/// value is exactly `end`.
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (end - start) / (n - 1) as f64;
            let mut axis: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            axis[n - 1] = end;
            axis
        }
    }
}

/// A decoded region: binding energy against count rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    /// Binding energy axis (eV)
    pub x: Vec<f64>,

    /// Intensity (counts or counts/s)
    pub y: Vec<f64>,
}

impl Spectrum {
    /// Pair the region's energy axis with its accepted samples.
    ///
    /// `y` must hold exactly `region.points` samples.
    pub fn assemble(region: &RegionDescriptor, y: Vec<f64>) -> Self {
        debug_assert_eq!(y.len(), region.points);
        Self {
            x: linspace(region.start_ev, region.end_ev, region.points),
            y,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// Whether the spectrum has no samples.
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Iterate `(x, y)` pairs.
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// A spectrum together with where it was found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedRegion {
    /// Position of the region among the declared regions
    pub region_index: usize,

    /// The region as declared in the header
    pub descriptor: RegionDescriptor,

    /// The decoded samples
    pub spectrum: Spectrum,

    /// Byte offset of the block marker
    pub marker_offset: usize,

    /// Byte offset of the first accepted sample
    pub data_offset: usize,

    /// Mean absolute intensity of the accepted samples
    pub mean_intensity: f64,
}

impl DecodedRegion {
    /// Region name.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Byte offset just past the last accepted sample.
    pub fn data_end(&self) -> usize {
        self.data_offset + self.spectrum.len() * SAMPLE_SIZE
    }
}
