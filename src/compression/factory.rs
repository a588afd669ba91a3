//! Factory for creating compression handlers

use crate::raster::errors::{PipelineError, PipelineResult};
use super::handler::CompressionHandler;
use super::uncompressed::UncompressedHandler;
use super::deflate::AdobeDeflateHandler;
use super::zstd::ZstdHandler;

/// Factory resolving compression codes to handlers
pub struct CompressionFactory;

impl CompressionFactory {
    /// Create a compression handler for the given compression code
    pub fn create_handler(compression: u64) -> PipelineResult<Box<dyn CompressionHandler>> {
        match compression {
            1 => Ok(Box::new(UncompressedHandler)),
            8 => Ok(Box::new(AdobeDeflateHandler)),
            14 => Ok(Box::new(ZstdHandler::new())),
            _ => Err(PipelineError::UnsupportedCompression(compression)),
        }
    }

    /// Get a handler by name, as spelled in metadata attributes
    pub fn get_handler_by_name(name: &str) -> PipelineResult<Box<dyn CompressionHandler>> {
        match name.to_lowercase().as_str() {
            "uncompressed" | "none" => Ok(Box::new(UncompressedHandler)),
            "deflate" | "zip" | "adobe deflate" => Ok(Box::new(AdobeDeflateHandler)),
            "zstd" => Ok(Box::new(ZstdHandler::new())),
            _ => Err(PipelineError::GenericError(format!("Unknown compression type: {}", name))),
        }
    }

    /// Short lowercase name for a code, used in metadata attributes
    pub fn name_for_code(compression: u64) -> &'static str {
        match compression {
            8 => "deflate",
            14 => "zstd",
            _ => "none",
        }
    }
}
