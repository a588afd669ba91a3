//! Handler for Adobe Deflate compressed data

use std::io::{Read, Write};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use crate::raster::errors::{PipelineError, PipelineResult};
use super::handler::CompressionHandler;

/// Adobe Deflate (zlib) compression handler (compression code 8)
pub struct AdobeDeflateHandler;

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8]) -> PipelineResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut decompressed = Vec::new();
        match decoder.read_to_end(&mut decompressed) {
            Ok(_) => Ok(decompressed),
            Err(e) => Err(PipelineError::IoError(e)),
        }
    }

    fn compress(&self, data: &[u8]) -> PipelineResult<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        if let Err(e) = encoder.write_all(data) {
            return Err(PipelineError::IoError(e));
        }

        match encoder.finish() {
            Ok(compressed) => Ok(compressed),
            Err(e) => Err(PipelineError::IoError(e)),
        }
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u64 {
        8
    }
}
