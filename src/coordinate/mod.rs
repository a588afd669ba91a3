//! Coordinate handling for georeferenced rasters
//!
//! Affine pixel-to-world transforms, world-space extents and the
//! common grid a raster series gets aligned onto.

mod transform;
mod extent;
mod grid;

#[cfg(test)]
mod tests;

pub use self::transform::GeoTransform;
pub use self::extent::{GeoExtent, ExtentAccumulator};
pub use self::grid::CommonGrid;
