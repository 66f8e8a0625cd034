//! Error types for PHI spectrum decoding.

use std::path::PathBuf;

use thiserror::Error;

/// File-level failures that abort a whole decode.
///
/// Per-region problems never surface here; they are reported as
/// [`DecodeDiagnostic`](super::DecodeDiagnostic)s on an otherwise valid result.
#[derive(Error, Debug)]
pub enum PhiError {
    /// The `EOFH` sentinel was never seen, so the binary segment has no defined start.
    #[error("Missing EOFH header terminator (scanned {scanned_bytes} bytes)")]
    MissingTerminator {
        /// Number of bytes examined before giving up
        scanned_bytes: usize,
    },

    /// The input file could not be opened or read.
    #[error("Failed to read {}: {source}", path.display())]
    FileAccess {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A decoder setting is unusable (empty marker, zero step, inverted range, ...).
    #[error("Invalid decoder configuration: {0}")]
    InvalidConfig(String),
}
