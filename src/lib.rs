//! # phixps - PHI MultiPak XPS Spectrum Decoder
//!
//! `phixps` reads the `.spe`/`.pro` files written by PHI MultiPak XPS
//! acquisition software. These files carry a readable text header followed by
//! a binary payload whose block layout has never been documented, so the
//! decoder locates each region's samples by searching and validating rather
//! than by reading fixed offsets.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use phixps::phi::{DecoderConfig, PhiDecoder};
//!
//! let decoder = PhiDecoder::new(DecoderConfig::default())?;
//! let result = decoder.decode_file("sample.spe")?;
//!
//! for region in &result.spectra {
//!     println!(
//!         "{}: {} points, mean {:.1} c/s",
//!         region.name(),
//!         region.spectrum.len(),
//!         region.mean_intensity
//!     );
//! }
//! for diagnostic in &result.diagnostics {
//!     eprintln!("warning: {}", diagnostic);
//! }
//! # Ok::<(), phixps::phi::PhiError>(())
//! ```
//!
//! The same decode works on bytes already in memory with
//! [`phi::decode`], which never touches the filesystem.
//!
//! ## Exporting
//!
//! ```rust,no_run
//! use std::path::Path;
//! use phixps::export::{export_to_dir, ExportConfig};
//!
//! let result = phixps::phi::decode(&std::fs::read("sample.spe")?)?;
//! export_to_dir(Path::new("out"), "sample", &result, &ExportConfig::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`phi`]: header parsing, marker scanning, alignment probing, edge
//!   detection, validation and spectrum assembly
//! - [`export`]: metadata JSON and spectrum table writers
//! - [`report`]: per-region decode summary for terminals
//!
//! ## Failure Model
//!
//! A decode fails only when the file cannot be read or the header never
//! reaches its `EOFH` terminator. Regions whose data cannot be located are
//! left out of the result and explained by a
//! [`DecodeDiagnostic`](phi::DecodeDiagnostic).

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod export;
pub mod phi;
pub mod report;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::export::{export_to_dir, ExportConfig, ExportError};
    pub use crate::phi::{
        decode, DecodeDiagnostic, DecodeResult, DecodedRegion, DecoderConfig, FileMetadata,
        PhiDecoder, PhiError, RegionDescriptor, Spectrum,
    };
    pub use crate::report::DecodeReport;
}
