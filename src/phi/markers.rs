//! Block marker scanning and positional region pairing.

use super::{DecodeDiagnostic, RegionDescriptor};

/// Find every occurrence of `marker` that starts at or after `binary_start`.
///
/// Occurrences inside the text header are ignored. Positions are ascending.
pub fn scan_markers(content: &[u8], binary_start: usize, marker: &[u8]) -> Vec<usize> {
    if marker.is_empty() || binary_start >= content.len() {
        return Vec::new();
    }

    content[binary_start..]
        .windows(marker.len())
        .enumerate()
        .filter(|(_, window)| *window == marker)
        .map(|(idx, _)| binary_start + idx)
        .collect()
}

/// A declared region paired with the binary block assumed to hold its samples.
#[derive(Debug, Clone, Copy)]
pub struct RegionBlock<'a> {
    /// Position of the region in the header
    pub index: usize,

    /// The declared region
    pub region: &'a RegionDescriptor,

    /// Byte offset of the block marker
    pub marker: usize,

    /// Exclusive bound of the block: the next marker, or end of input
    pub block_end: usize,
}

/// Pair regions with markers by position: the i-th marker belongs to the i-th region.
///
/// Nothing in the block content confirms this pairing; the file format gives
/// no region identifier in the binary segment. When the counts disagree the
/// returned diagnostic makes that visible instead of silently mis-pairing.
/// Surplus markers are ignored and surplus regions receive no block.
pub fn pair_blocks<'a>(
    regions: &'a [RegionDescriptor],
    markers: &[usize],
    content_len: usize,
) -> (Vec<RegionBlock<'a>>, Option<DecodeDiagnostic>) {
    let blocks = regions
        .iter()
        .zip(markers.iter().enumerate())
        .map(|(region, (index, &marker))| RegionBlock {
            index,
            region,
            marker,
            block_end: markers.get(index + 1).copied().unwrap_or(content_len),
        })
        .collect();

    (blocks, pairing_mismatch(regions, markers.len()))
}

/// Diagnostic for `found` usable markers against the declared regions, if the counts differ.
pub fn pairing_mismatch(regions: &[RegionDescriptor], found: usize) -> Option<DecodeDiagnostic> {
    if found < regions.len() {
        Some(DecodeDiagnostic::InsufficientMarkers {
            declared: regions.len(),
            found,
            missing: regions[found..].iter().map(|r| r.name.clone()).collect(),
        })
    } else if found > regions.len() {
        Some(DecodeDiagnostic::ExcessMarkers {
            declared: regions.len(),
            found,
        })
    } else {
        None
    }
}

/// Hands out one block per region in marker order.
///
/// Sample data can contain the marker bytes. Once a region's samples are
/// accepted, [`MarkerCursor::consume_through`] drops the markers lying inside
/// them so the next region pairs with the next real block.
#[derive(Debug, Clone)]
pub struct MarkerCursor<'m> {
    markers: &'m [usize],
    next: usize,
    skipped: usize,
    content_len: usize,
}

impl<'m> MarkerCursor<'m> {
    /// Start before the first marker.
    pub fn new(markers: &'m [usize], content_len: usize) -> Self {
        Self {
            markers,
            next: 0,
            skipped: 0,
            content_len,
        }
    }

    /// Block for the region at `index`, bounded by the following marker.
    pub fn next_block<'r>(
        &mut self,
        index: usize,
        region: &'r RegionDescriptor,
    ) -> Option<RegionBlock<'r>> {
        let marker = *self.markers.get(self.next)?;
        self.next += 1;
        Some(RegionBlock {
            index,
            region,
            marker,
            block_end: self
                .markers
                .get(self.next)
                .copied()
                .unwrap_or(self.content_len),
        })
    }

    /// Drop the upcoming markers that start before `data_end`, returning their offsets.
    pub fn consume_through(&mut self, data_end: usize) -> Vec<usize> {
        let dropped: Vec<usize> = self.markers[self.next..]
            .iter()
            .take_while(|&&marker| marker < data_end)
            .copied()
            .collect();
        self.next += dropped.len();
        self.skipped += dropped.len();
        dropped
    }

    /// Whether every block so far matched plain positional pairing.
    pub fn is_positional(&self) -> bool {
        self.skipped == 0
    }

    /// Markers not dropped as lying inside sample data.
    pub fn markers_in_use(&self) -> usize {
        self.markers.len() - self.skipped
    }
}
