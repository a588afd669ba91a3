//! Error types for the pipeline

use std::fmt;
use std::io;

/// Errors raised by the raster layer and the pipeline stages
#[derive(Debug)]
pub enum PipelineError {
    /// I/O error
    IoError(io::Error),
    /// Invalid raster header
    InvalidHeader,
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// Unsupported sample layout (format code, bits per sample)
    UnsupportedSampleFormat(u16, u16),
    /// Image dimensions not found
    MissingDimensions,
    /// Raster carries no usable georeference tags
    MissingGeoreference(String),
    /// Corpus contained no readable rasters
    EmptyInput(String),
    /// Slice shape differs from the rest of the stack
    ShapeMismatch {
        item: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },
    /// Invalid stage parameter
    Config(String),
    /// Disk or directory failure
    Resource(String),
    /// JSON (de)serialization failure
    JsonError(serde_json::Error),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::IoError(e) => write!(f, "I/O error: {}", e),
            PipelineError::InvalidHeader => write!(f, "Invalid raster header"),
            PipelineError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            PipelineError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            PipelineError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            PipelineError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            PipelineError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            PipelineError::UnsupportedSampleFormat(fmt_code, bits) => {
                write!(f, "Unsupported sample layout: format {} with {} bits", fmt_code, bits)
            },
            PipelineError::MissingDimensions => write!(f, "Image dimensions not found"),
            PipelineError::MissingGeoreference(path) => {
                write!(f, "No georeference tags in {}", path)
            },
            PipelineError::EmptyInput(dir) => write!(f, "No readable rasters in {}", dir),
            PipelineError::ShapeMismatch { item, expected, actual } => {
                write!(f, "Slice shape mismatch for {}: expected {}x{}, got {}x{}",
                       item, expected.0, expected.1, actual.0, actual.1)
            },
            PipelineError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            PipelineError::Resource(msg) => write!(f, "Resource failure: {}", msg),
            PipelineError::JsonError(e) => write!(f, "JSON error: {}", e),
            PipelineError::GenericError(msg) => write!(f, "Pipeline error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<io::Error> for PipelineError {
    fn from(error: io::Error) -> Self {
        PipelineError::IoError(error)
    }
}

impl From<String> for PipelineError {
    fn from(msg: String) -> Self {
        PipelineError::GenericError(msg)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(error: serde_json::Error) -> Self {
        PipelineError::JsonError(error)
    }
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
