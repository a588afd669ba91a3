//! World-space extents and extent aggregation across a raster series

use log::debug;

use crate::raster::errors::{PipelineError, PipelineResult};
use super::grid::CommonGrid;
use super::transform::GeoTransform;

/// Axis-aligned extent in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoExtent {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl GeoExtent {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        GeoExtent { left, bottom, right, top }
    }

    /// Extent covered by a raster of the given dimensions
    ///
    /// All four corners are mapped through the transform and folded
    /// with min/max, so rotated rasters still produce a covering box.
    pub fn from_raster(width: u32, height: u32, transform: &GeoTransform) -> Self {
        let corners = [
            transform.apply(0.0, 0.0),
            transform.apply(width as f64, 0.0),
            transform.apply(0.0, height as f64),
            transform.apply(width as f64, height as f64),
        ];

        let mut extent = GeoExtent::new(corners[0].0, corners[0].1, corners[0].0, corners[0].1);
        for &(x, y) in &corners[1..] {
            extent.left = extent.left.min(x);
            extent.right = extent.right.max(x);
            extent.bottom = extent.bottom.min(y);
            extent.top = extent.top.max(y);
        }
        extent
    }

    /// Smallest extent containing both inputs
    pub fn union(&self, other: &GeoExtent) -> GeoExtent {
        GeoExtent {
            left: self.left.min(other.left),
            bottom: self.bottom.min(other.bottom),
            right: self.right.max(other.right),
            top: self.top.max(other.top),
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

impl std::fmt::Display for GeoExtent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.left, self.bottom, self.right, self.top)
    }
}

/// Folds per-raster extents into the common grid covering a whole series
///
/// The fold is commutative, so scan order never changes the result.
/// The target resolution is taken from the first raster observed.
pub struct ExtentAccumulator {
    extent: Option<GeoExtent>,
    resolution: Option<(f64, f64)>,
    count: usize,
}

impl ExtentAccumulator {
    pub fn new() -> Self {
        ExtentAccumulator {
            extent: None,
            resolution: None,
            count: 0,
        }
    }

    /// Fold one raster's footprint into the running extent
    pub fn observe(&mut self, width: u32, height: u32, transform: &GeoTransform) {
        let raster_extent = GeoExtent::from_raster(width, height, transform);
        debug!("Observed raster {}x{} with extent {}", width, height, raster_extent);

        self.extent = Some(match self.extent {
            Some(current) => current.union(&raster_extent),
            None => raster_extent,
        });

        if self.resolution.is_none() {
            self.resolution = Some((transform.pixel_width, transform.pixel_height));
        }
        self.count += 1;
    }

    /// Number of rasters folded so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Produce the common grid, or fail when nothing was observed
    pub fn finish(self) -> PipelineResult<CommonGrid> {
        let extent = self.extent.ok_or_else(|| {
            PipelineError::EmptyInput("no rasters contributed to the common extent".to_string())
        })?;
        let (pixel_width, pixel_height) = self.resolution.ok_or_else(|| {
            PipelineError::EmptyInput("no resolution observed for the common grid".to_string())
        })?;

        CommonGrid::from_extent(extent, pixel_width, pixel_height)
    }
}

impl Default for ExtentAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
