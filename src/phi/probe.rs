//! Read-start enumeration for one region block.
//!
//! A block opens with 4-byte label/value slots on the marker's 4-byte grid:
//!
//! ```text
//! +0   pnt\0   +4  <u32>
//! +8   sar\0   +12 <u32>
//! +16  c/s\0   +20 <u32>
//! +24  f4\0\0  +28 <u32>
//! +32  padding and samples, still on the same grid
//! ```
//!
//! The padding before the first sample varies from file to file, so instead
//! of assuming a fixed offset the prober yields a short, deterministic
//! sequence of read starts on that grid for the edge detector to try.

use serde::{Deserialize, Serialize};

use super::markers::RegionBlock;

/// Settings for locating the payload inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Type tag that precedes the numeric payload (ASCII)
    pub type_tag: String,

    /// How far past the marker to look for the type tag, in bytes
    pub tag_search_window: usize,

    /// Read base relative to the marker when no type tag is found
    pub fallback_offset: usize,

    /// Width of the alignment range probed from the read base, in bytes (exclusive)
    pub alignment_span: usize,

    /// Distance between successive alignments, in bytes
    pub alignment_step: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            type_tag: "f4".to_string(),
            tag_search_window: 256,
            fallback_offset: 32,
            alignment_span: 168,
            alignment_step: 4,
        }
    }
}

/// Where alignment enumeration starts for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "offset", rename_all = "snake_case")]
pub enum ProbeBase {
    /// The type tag was found; holds the byte offset of the tag itself
    TypeTag(usize),
    /// No tag inside the window; holds marker + `fallback_offset`
    Fallback(usize),
}

impl ProbeBase {
    /// Byte offset the alignments are measured from.
    pub fn offset(&self) -> usize {
        match *self {
            ProbeBase::TypeTag(offset) | ProbeBase::Fallback(offset) => offset,
        }
    }
}

/// One candidate position for the first sample of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadStart {
    /// Absolute byte offset to start reading floats from
    pub offset: usize,

    /// Alignment relative to the probe base
    pub alignment: usize,

    /// The base this candidate was derived from
    pub base: ProbeBase,
}

/// Lazy sequence of read starts for one block.
///
/// A clone taken before iteration replays the whole sequence.
#[derive(Debug, Clone)]
pub struct AlignmentCandidates {
    base: ProbeBase,
    next_alignment: usize,
    step: usize,
    span: usize,
    limit: usize,
}

impl Iterator for AlignmentCandidates {
    type Item = ReadStart;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step == 0 || self.next_alignment >= self.span {
            return None;
        }
        let offset = self.base.offset().checked_add(self.next_alignment)?;
        if offset >= self.limit {
            return None;
        }

        let candidate = ReadStart {
            offset,
            alignment: self.next_alignment,
            base: self.base,
        };
        self.next_alignment += self.step;
        Some(candidate)
    }
}

/// Finds the probe base of a block and enumerates alignments from it.
#[derive(Debug, Clone, Default)]
pub struct AlignmentProber {
    config: ProbeConfig,
}

impl AlignmentProber {
    /// Create a prober with the given settings.
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Search forward from `marker` for the type tag, staying inside the block.
    pub fn locate_base(&self, content: &[u8], marker: usize, block_end: usize) -> ProbeBase {
        let tag = self.config.type_tag.as_bytes();
        let window_end = marker
            .saturating_add(self.config.tag_search_window)
            .min(block_end)
            .min(content.len());

        if !tag.is_empty() && marker < window_end {
            if let Some(idx) = content[marker..window_end]
                .windows(tag.len())
                .position(|window| window == tag)
            {
                return ProbeBase::TypeTag(marker + idx);
            }
        }

        ProbeBase::Fallback(marker.saturating_add(self.config.fallback_offset))
    }

    /// Read-start candidates for `block`, in the order they should be tried.
    pub fn candidates(&self, content: &[u8], block: &RegionBlock<'_>) -> AlignmentCandidates {
        let base = self.locate_base(content, block.marker, block.block_end);
        AlignmentCandidates {
            base,
            next_alignment: 0,
            step: self.config.alignment_step,
            span: self.config.alignment_span,
            limit: block.block_end.min(content.len()),
        }
    }
}
