//! Affine georeferencing transform
//!
//! Maps pixel coordinates (column, row) to world coordinates (x, y)
//! using the six-coefficient affine model stored in GeoTIFF pixel
//! scale and tiepoint tags. Coefficients are kept in affine order:
//! x = a*col + b*row + c, y = d*col + e*row + f.

use crate::raster::errors::{PipelineError, PipelineResult};

/// Six-coefficient affine transform between pixel and world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    /// Pixel width in world units (a)
    pub pixel_width: f64,
    /// Row rotation term (b), zero for north-up rasters
    pub row_rotation: f64,
    /// X coordinate of the upper-left corner of pixel (0, 0) (c)
    pub origin_x: f64,
    /// Column rotation term (d), zero for north-up rasters
    pub col_rotation: f64,
    /// Pixel height in world units (e), negative for north-up rasters
    pub pixel_height: f64,
    /// Y coordinate of the upper-left corner of pixel (0, 0) (f)
    pub origin_y: f64,
}

impl GeoTransform {
    /// Create a transform from all six coefficients in affine order
    pub fn new(pixel_width: f64, row_rotation: f64, origin_x: f64,
               col_rotation: f64, pixel_height: f64, origin_y: f64) -> Self {
        GeoTransform {
            pixel_width,
            row_rotation,
            origin_x,
            col_rotation,
            pixel_height,
            origin_y,
        }
    }

    /// Create a north-up transform with no rotation terms
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        GeoTransform {
            pixel_width,
            row_rotation: 0.0,
            origin_x,
            col_rotation: 0.0,
            pixel_height,
            origin_y,
        }
    }

    /// Build a transform from GeoTIFF pixel scale and tiepoint tag values
    ///
    /// The tiepoint ties raster position (i, j) to world position (x, y);
    /// the scale gives per-pixel X and Y resolution. Y resolution is stored
    /// positive in the tag and negated here for the row direction.
    pub fn from_geotiff(pixel_scale: &[f64], tiepoint: &[f64]) -> PipelineResult<Self> {
        if pixel_scale.len() < 2 {
            return Err(PipelineError::MissingGeoreference(
                "pixel scale tag needs at least 2 values".to_string()));
        }
        if tiepoint.len() < 5 {
            return Err(PipelineError::MissingGeoreference(
                "tiepoint tag needs at least 5 values".to_string()));
        }

        let scale_x = pixel_scale[0];
        let scale_y = pixel_scale[1];
        let (i, j) = (tiepoint[0], tiepoint[1]);
        let (x, y) = (tiepoint[3], tiepoint[4]);

        Ok(GeoTransform::north_up(
            x - i * scale_x,
            y + j * scale_y,
            scale_x,
            -scale_y,
        ))
    }

    /// Map a pixel position to world coordinates
    ///
    /// Positions refer to the upper-left corner of the pixel; pass
    /// fractional values for points inside a pixel.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.pixel_width * col + self.row_rotation * row + self.origin_x;
        let y = self.col_rotation * col + self.pixel_height * row + self.origin_y;
        (x, y)
    }

    /// Determinant of the 2x2 linear part
    fn determinant(&self) -> f64 {
        self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation
    }

    /// Invert the transform so it maps world coordinates to pixel positions
    pub fn inverted(&self) -> PipelineResult<GeoTransform> {
        let det = self.determinant();
        if det.abs() < f64::EPSILON {
            return Err(PipelineError::MissingGeoreference(
                "transform is singular and cannot be inverted".to_string()));
        }

        let a = self.pixel_width;
        let b = self.row_rotation;
        let c = self.origin_x;
        let d = self.col_rotation;
        let e = self.pixel_height;
        let f = self.origin_y;

        Ok(GeoTransform {
            pixel_width: e / det,
            row_rotation: -b / det,
            origin_x: (b * f - e * c) / det,
            col_rotation: -d / det,
            pixel_height: a / det,
            origin_y: (d * c - a * f) / det,
        })
    }

    /// Shift the origin to the upper-left corner of a pixel window
    pub fn shift_for_window(&self, col_off: u32, row_off: u32) -> GeoTransform {
        let (x, y) = self.apply(col_off as f64, row_off as f64);
        GeoTransform {
            origin_x: x,
            origin_y: y,
            ..*self
        }
    }

    /// Whether the rotation terms are zero
    pub fn is_north_up(&self) -> bool {
        self.row_rotation == 0.0 && self.col_rotation == 0.0
    }

    /// GeoTIFF pixel scale tag values, valid only for north-up transforms
    pub fn pixel_scale(&self) -> [f64; 3] {
        [self.pixel_width, -self.pixel_height, 0.0]
    }

    /// GeoTIFF tiepoint tag values anchoring pixel (0, 0) at the origin
    pub fn tiepoint(&self) -> [f64; 6] {
        [0.0, 0.0, 0.0, self.origin_x, self.origin_y, 0.0]
    }

    /// All six coefficients in affine order (a, b, c, d, e, f)
    pub fn coefficients(&self) -> [f64; 6] {
        [self.pixel_width, self.row_rotation, self.origin_x,
         self.col_rotation, self.pixel_height, self.origin_y]
    }
}

impl std::fmt::Display for GeoTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "origin ({}, {}), pixel ({}, {})",
               self.origin_x, self.origin_y, self.pixel_width, self.pixel_height)
    }
}
