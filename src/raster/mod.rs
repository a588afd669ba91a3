//! GeoTIFF raster handling
//!
//! Reading, decoding and writing of the single-file raster format the
//! pipeline consumes and produces, plus the profile metadata carried
//! through to derived products.

pub mod errors;
pub mod ifd;
pub mod reader;
pub mod writer;
pub mod image;
pub mod metadata;
pub mod geo_codes;
pub(crate) mod constants;

#[cfg(test)]
mod tests;

pub use errors::{PipelineError, PipelineResult};
pub use ifd::{Ifd, IfdEntry, tag_name};
pub use reader::{GeoInfo, RasterFile, RasterReader};
pub use writer::RasterWriter;
pub use image::{RasterImage, SampleDtype};
pub use metadata::RasterMetadata;
