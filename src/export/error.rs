/// Errors that can occur while writing decoded output
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// I/O error creating or writing an output file
    #[error("Failed to write output: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Delimiter that cannot be written as a single ASCII byte
    #[error("Delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(char),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}
