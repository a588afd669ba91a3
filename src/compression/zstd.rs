//! Handler for Zstandard compressed data

use crate::raster::errors::{PipelineError, PipelineResult};
use super::handler::CompressionHandler;
use log::{debug, warn};

/// Zstandard compression handler (compression code 14)
pub struct ZstdHandler {
    /// Compression level (1-22, default 3)
    compression_level: i32,
}

impl ZstdHandler {
    pub fn new() -> Self {
        ZstdHandler { compression_level: 3 }
    }

    /// Create a handler with a specific compression level
    pub fn with_level(level: i32) -> Self {
        ZstdHandler { compression_level: level.clamp(1, 22) }
    }
}

impl Default for ZstdHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompressionHandler for ZstdHandler {
    fn decompress(&self, data: &[u8]) -> PipelineResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        match zstd::decode_all(data) {
            Ok(decompressed) => {
                debug!("ZSTD decompressed {} bytes to {}", data.len(), decompressed.len());
                Ok(decompressed)
            },
            Err(e) => {
                warn!("ZSTD decompression error: {}", e);
                Err(PipelineError::GenericError(format!("ZSTD decompression error: {}", e)))
            }
        }
    }

    fn compress(&self, data: &[u8]) -> PipelineResult<Vec<u8>> {
        if data.is_empty() {
            return Ok(Vec::new());
        }

        match zstd::encode_all(data, self.compression_level) {
            Ok(compressed) => {
                debug!("ZSTD compressed {} bytes to {} at level {}",
                       data.len(), compressed.len(), self.compression_level);
                Ok(compressed)
            },
            Err(e) => {
                warn!("ZSTD compression error: {}", e);
                Err(PipelineError::GenericError(format!("ZSTD compression error: {}", e)))
            }
        }
    }

    fn name(&self) -> &'static str {
        "Zstandard"
    }

    fn code(&self) -> u64 {
        14
    }
}
