//! The shared target grid every raster in a series is aligned onto

use crate::raster::errors::{PipelineError, PipelineResult};
use super::extent::GeoExtent;
use super::transform::GeoTransform;

/// A fixed north-up pixel grid anchored at the series extent corner
///
/// The right and bottom edges are snapped outward to whole pixels so
/// the grid dimensions and extent stay exactly consistent with the
/// resolution. Pixel (0, 0) sits at (left, top).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommonGrid {
    pub extent: GeoExtent,
    pub width: u32,
    pub height: u32,
    pub pixel_width: f64,
    pub pixel_height: f64,
}

impl CommonGrid {
    /// Build a grid covering an extent at the given resolution
    pub fn from_extent(extent: GeoExtent, pixel_width: f64, pixel_height: f64) -> PipelineResult<Self> {
        if pixel_width <= 0.0 || pixel_height >= 0.0 {
            return Err(PipelineError::Config(format!(
                "grid resolution must have positive width and negative height, got ({}, {})",
                pixel_width, pixel_height)));
        }
        if extent.width() <= 0.0 || extent.height() <= 0.0 {
            return Err(PipelineError::EmptyInput(format!(
                "degenerate extent {} cannot define a grid", extent)));
        }

        let width = (extent.width() / pixel_width).ceil() as u32;
        let height = (extent.height() / -pixel_height).ceil() as u32;

        let snapped = GeoExtent::new(
            extent.left,
            extent.top + pixel_height * height as f64,
            extent.left + pixel_width * width as f64,
            extent.top,
        );

        Ok(CommonGrid {
            extent: snapped,
            width,
            height,
            pixel_width,
            pixel_height,
        })
    }

    /// Rebuild a grid from stored corner coordinates and dimensions
    pub fn from_parts(left: f64, bottom: f64, right: f64, top: f64,
                      width: u32, height: u32) -> PipelineResult<Self> {
        if width == 0 || height == 0 {
            return Err(PipelineError::Config(
                "grid dimensions must be non-zero".to_string()));
        }

        Ok(CommonGrid {
            extent: GeoExtent::new(left, bottom, right, top),
            width,
            height,
            pixel_width: (right - left) / width as f64,
            pixel_height: (bottom - top) / height as f64,
        })
    }

    /// Transform placing pixel (0, 0) at the upper-left grid corner
    pub fn transform(&self) -> GeoTransform {
        GeoTransform::north_up(
            self.extent.left,
            self.extent.top,
            self.pixel_width,
            self.pixel_height,
        )
    }
}
