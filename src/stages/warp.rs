//! Alignment of rasters onto the common grid
//!
//! Every target cell center is inverse-mapped through the source
//! transform and sampled with a cubic (Catmull-Rom) kernel, so all
//! outputs share the grid's dimensions and transform. Cells landing
//! outside the source become nodata.

use log::debug;

use crate::coordinate::CommonGrid;
use crate::raster::errors::{PipelineError, PipelineResult};
use crate::raster::image::RasterImage;

/// Resamples rasters onto a shared target grid
pub struct GridWarper {
    grid: CommonGrid,
}

impl GridWarper {
    pub fn new(grid: CommonGrid) -> Self {
        GridWarper { grid }
    }

    pub fn grid(&self) -> &CommonGrid {
        &self.grid
    }

    /// Resample every band of a raster onto the target grid
    pub fn warp(&self, source: &RasterImage) -> PipelineResult<RasterImage> {
        let src_transform = source.transform.ok_or_else(|| {
            PipelineError::MissingGeoreference(
                "raster has no transform to warp through".to_string())
        })?;
        let to_source = src_transform.inverted()?;
        let target = self.grid.transform();
        let fill = source.nodata.unwrap_or(0.0) as f32;

        let mut output = RasterImage::new(self.grid.width, self.grid.height,
                                          source.band_count(), source.dtype);
        output.transform = Some(target);
        output.epsg = source.epsg;
        output.nodata = source.nodata;

        for row in 0..self.grid.height {
            for col in 0..self.grid.width {
                let (x, y) = target.apply(col as f64 + 0.5, row as f64 + 0.5);
                let (src_col, src_row) = to_source.apply(x, y);
                for band in 0..source.band_count() {
                    let value = cubic_sample(source, band, src_col - 0.5, src_row - 0.5)
                        .unwrap_or(fill);
                    output.set_sample(band, col, row, value);
                }
            }
        }

        debug!("Warped {}x{} raster onto {}x{} grid",
               source.width, source.height, self.grid.width, self.grid.height);
        Ok(output)
    }
}

/// Catmull-Rom kernel weight for a tap at distance `t`
fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t < 1.0 {
        1.5 * t * t * t - 2.5 * t * t + 1.0
    } else if t < 2.0 {
        -0.5 * t * t * t + 2.5 * t * t - 4.0 * t + 2.0
    } else {
        0.0
    }
}

/// Sample one band at a continuous pixel-center position
///
/// Taps outside the image clamp to the edge; taps equal to nodata are
/// dropped and the surviving weights renormalized. Returns None when
/// the position itself lies outside the source or no valid tap remains.
fn cubic_sample(source: &RasterImage, band: usize, u: f64, v: f64) -> Option<f32> {
    let width = source.width as i64;
    let height = source.height as i64;
    if u < -0.5 || v < -0.5 || u > width as f64 - 0.5 || v > height as f64 - 0.5 {
        return None;
    }

    let base_col = u.floor() as i64;
    let base_row = v.floor() as i64;
    let fx = u - base_col as f64;
    let fy = v - base_row as f64;

    let wx = [
        cubic_weight(fx + 1.0),
        cubic_weight(fx),
        cubic_weight(fx - 1.0),
        cubic_weight(fx - 2.0),
    ];
    let wy = [
        cubic_weight(fy + 1.0),
        cubic_weight(fy),
        cubic_weight(fy - 1.0),
        cubic_weight(fy - 2.0),
    ];

    let nodata = source.nodata.map(|value| value as f32);
    let mut sum = 0.0f64;
    let mut weight_total = 0.0f64;

    for (j, &row_weight) in wy.iter().enumerate() {
        let row = (base_row - 1 + j as i64).clamp(0, height - 1);
        for (i, &col_weight) in wx.iter().enumerate() {
            let col = (base_col - 1 + i as i64).clamp(0, width - 1);
            let tap = source.sample(band, col as u32, row as u32);
            if nodata == Some(tap) {
                continue;
            }
            let weight = row_weight * col_weight;
            sum += weight * tap as f64;
            weight_total += weight;
        }
    }

    if weight_total < 1e-6 {
        return None;
    }
    Some((sum / weight_total) as f32)
}
