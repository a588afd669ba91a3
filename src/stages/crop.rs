//! Region-of-interest cropping
//!
//! Source products carry a wide collar around the acquisition
//! footprint. One band is thresholded to locate the content bounding
//! box, the box is padded by fixed margins and the window is cut from
//! every band with the geotransform shifted to match.

use log::{debug, warn};

use crate::raster::errors::{PipelineError, PipelineResult};
use crate::raster::image::RasterImage;

/// Padding applied around the detected content box, in pixels
///
/// `left` and `top` move the window origin back; `extra_width` and
/// `extra_height` extend the span measured from that shifted origin.
/// Everything is clamped to the image.
#[derive(Debug, Clone, Copy)]
pub struct CropMargins {
    pub left: u32,
    pub top: u32,
    pub extra_width: u32,
    pub extra_height: u32,
}

impl Default for CropMargins {
    fn default() -> Self {
        CropMargins {
            left: 300,
            top: 800,
            extra_width: 1000,
            extra_height: 700,
        }
    }
}

/// Content detection parameters
#[derive(Debug, Clone, Copy)]
pub struct CropConfig {
    /// One-based band used for content detection
    pub detection_band: usize,
    /// Normalized values at or below this count as content
    pub threshold: u8,
    pub margins: CropMargins,
}

impl Default for CropConfig {
    fn default() -> Self {
        CropConfig {
            detection_band: 5,
            threshold: 127,
            margins: CropMargins::default(),
        }
    }
}

/// Cuts the padded content window out of oversized source rasters
pub struct RegionCropper {
    config: CropConfig,
}

impl RegionCropper {
    pub fn new(config: CropConfig) -> Self {
        RegionCropper { config }
    }

    /// Extract the padded content window across all bands
    pub fn crop(&self, image: &RasterImage) -> PipelineResult<RasterImage> {
        let (col_off, row_off, width, height) = self.detect_window(image)?;
        debug!("Content window {}x{} at ({}, {}) of {}x{} frame",
               width, height, col_off, row_off, image.width, image.height);
        image.window(col_off, row_off, width, height)
    }

    /// Locate the padded bounding box of content pixels
    ///
    /// The detection band is normalized to 0..=255 against its own
    /// maximum; values at or below the threshold count as content.
    /// A frame with no content keeps its full extent.
    pub fn detect_window(&self, image: &RasterImage) -> PipelineResult<(u32, u32, u32, u32)> {
        let band = self.config.detection_band;
        if band == 0 || band > image.band_count() {
            return Err(PipelineError::Config(format!(
                "detection band {} out of range, raster has {} band(s)",
                band, image.band_count())));
        }

        let plane = image.band(band - 1)?;
        let (_, max) = image.band_range(band - 1)?;
        let scale = if max > 0.0 { 255.0 / max } else { 0.0 };
        let threshold = self.config.threshold as f32;

        let mut min_col = u32::MAX;
        let mut min_row = u32::MAX;
        let mut max_col = 0u32;
        let mut max_row = 0u32;
        let mut found = false;

        for row in 0..image.height {
            let offset = row as usize * image.width as usize;
            for col in 0..image.width {
                let normalized = (plane[offset + col as usize] * scale).round();
                if normalized <= threshold {
                    if col < min_col { min_col = col; }
                    if col > max_col { max_col = col; }
                    if row < min_row { min_row = row; }
                    if row > max_row { max_row = row; }
                    found = true;
                }
            }
        }

        if !found {
            warn!("No content at or below threshold {} in band {}, keeping the full frame",
                  self.config.threshold, band);
            return Ok((0, 0, image.width, image.height));
        }

        let margins = self.config.margins;
        let col_off = min_col.saturating_sub(margins.left);
        let row_off = min_row.saturating_sub(margins.top);
        let width = (max_col - min_col + 1 + margins.extra_width).min(image.width - col_off);
        let height = (max_row - min_row + 1 + margins.extra_height).min(image.height - row_off);

        Ok((col_off, row_off, width, height))
    }
}
