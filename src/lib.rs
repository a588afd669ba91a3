pub mod io;
pub mod raster;
pub mod utils;
pub mod compression;
pub mod coordinate;
pub mod stages;
pub mod pipeline;
pub mod commands;

pub use pipeline::{PipelineOrchestrator, RunOptions, StageSummary};

pub use raster::{RasterImage, RasterMetadata, RasterReader, RasterWriter};
pub use coordinate::{CommonGrid, ExtentAccumulator, GeoExtent, GeoTransform};
