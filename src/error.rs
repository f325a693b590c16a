/// Error types for the fastamotif scanner
use std::fmt;
use std::path::PathBuf;

/// Result type alias for scanner operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Main error type for catalog loading, FASTA scanning, and output.
#[derive(Debug)]
pub enum ScanError {
    /// The pattern catalog file could not be opened or read.
    CatalogIo { path: PathBuf, source: std::io::Error },

    /// The pattern catalog is present but malformed (missing columns, bad CSV).
    CatalogFormat(String),

    /// The FASTA input could not be opened or read.
    InputIo { path: PathBuf, source: std::io::Error },

    /// The (gzip) input stream could not be decompressed.
    Decompression(String),

    /// The CSV output stream could not be written to (e.g. a broken pipe).
    OutputIo(std::io::Error),

    /// A pattern or header exceeded a configured size bound.
    OversizedInput(String),

    /// A buffer failed to grow to the requested size.
    Allocation(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::CatalogIo { path, source } => {
                write!(f, "failed to open catalog {}: {}", path.display(), source)
            }
            ScanError::CatalogFormat(msg) => write!(f, "malformed catalog: {}", msg),
            ScanError::InputIo { path, source } => {
                write!(f, "failed to read FASTA input {}: {}", path.display(), source)
            }
            ScanError::Decompression(msg) => write!(f, "decompression error: {}", msg),
            ScanError::OutputIo(source) => write!(f, "failed to write output: {}", source),
            ScanError::OversizedInput(msg) => write!(f, "oversized input: {}", msg),
            ScanError::Allocation(msg) => write!(f, "allocation error: {}", msg),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScanError::CatalogIo { source, .. } => Some(source),
            ScanError::InputIo { source, .. } => Some(source),
            ScanError::OutputIo(source) => Some(source),
            _ => None,
        }
    }
}

impl From<csv::Error> for ScanError {
    fn from(err: csv::Error) -> Self {
        ScanError::CatalogFormat(err.to_string())
    }
}
