//! # PHI MultiPak Spectrum Decoder
//!
//! PHI `.spe`/`.pro` files carry a text header followed by a binary segment
//! whose block layout is undocumented. Rather than modelling that layout, the
//! decoder searches for each region's samples and checks what it finds.
//!
//! ## File Structure
//!
//! ```text
//! SOFH
//! key: value                       (metadata, any number)
//! SpectralRegDef: ... name . points . start end ...
//! EOFH
//! ┌ pnt ... f4 <padding> <points x f32 LE>     region 0
//! ├ pnt ... f4 <padding> <points x f32 LE>     region 1
//! └ ...
//! ```
//!
//! ## Pipeline
//!
//! 1. [`parse_header`]: region descriptors, metadata, binary start offset
//! 2. [`scan_markers`]: every `pnt` marker in the binary segment
//! 3. [`pair_blocks`]: i-th marker to i-th region, by position only
//! 4. [`AlignmentProber`]: lazy read-start candidates per block
//! 5. [`EdgeDetector`]: first above-threshold sample after each read start
//! 6. [`CandidateValidator`]: first plausible window wins
//! 7. [`Spectrum::assemble`]: energy axis paired with the samples
//!
//! A missing `EOFH` aborts the decode. Everything after the header is
//! best effort: regions that cannot be located are omitted and explained in
//! [`DecodeResult::diagnostics`].

mod assemble;
mod decoder;
mod diagnostics;
mod edge;
mod error;
mod header;
mod markers;
mod probe;
mod result;
mod validator;

pub use assemble::{linspace, DecodedRegion, Spectrum};
pub use decoder::{decode, BlockProbe, DecoderConfig, Inspection, PhiDecoder};
pub use diagnostics::DecodeDiagnostic;
pub use edge::{read_f32_window, Candidate, EdgeConfig, EdgeDetector};
pub use error::PhiError;
pub use header::{
    parse_header, FileMetadata, ParsedHeader, RegionDescriptor, HEADER_TERMINATOR,
    REGION_RECORD_PREFIX,
};
pub use markers::{pair_blocks, pairing_mismatch, scan_markers, MarkerCursor, RegionBlock};
pub use probe::{AlignmentCandidates, AlignmentProber, ProbeBase, ProbeConfig, ReadStart};
pub use result::DecodeResult;
pub use validator::{CandidateValidator, PlausibilityConfig, PlausibilityValidator, Rejection};
