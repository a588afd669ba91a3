//! Raster profile recorded alongside derived products
//!
//! The profile travels with the pipeline from classification through
//! vectorization and ends up as the attribute set on every vector
//! feature, so downstream consumers can tell which raster series a
//! polygon came from.

use serde::{Deserialize, Serialize};

use crate::compression::CompressionFactory;
use crate::coordinate::GeoTransform;
use crate::raster::image::RasterImage;

/// Raster profile with the fields common GIS tooling reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterMetadata {
    pub driver: String,
    pub dtype: String,
    pub nodata: f64,
    pub width: u32,
    pub height: u32,
    pub count: u32,
    pub crs: String,
    #[serde(rename = "pixel width")]
    pub pixel_width: f64,
    #[serde(rename = "row rotation")]
    pub row_rotation: f64,
    pub upperleftx_coord: f64,
    #[serde(rename = "column rotation")]
    pub column_rotation: f64,
    #[serde(rename = "pixel height")]
    pub pixel_height: f64,
    pub upperlefty_coord: f64,
    pub blockxsize: u32,
    pub blockysize: u32,
    pub tiled: bool,
    pub compress: String,
    pub interleave: String,
}

impl RasterMetadata {
    /// Describe a raster as it would land on disk with the given compression
    pub fn describe(image: &RasterImage, compression: u64) -> Self {
        let transform = image.transform
            .unwrap_or_else(|| GeoTransform::north_up(0.0, 0.0, 1.0, -1.0));

        RasterMetadata {
            driver: "GTiff".to_string(),
            dtype: image.dtype.name().to_string(),
            nodata: image.nodata.unwrap_or(0.0),
            width: image.width,
            height: image.height,
            count: image.band_count() as u32,
            crs: match image.epsg {
                Some(code) => format!("epsg:{}", code),
                None => "unknown".to_string(),
            },
            pixel_width: transform.pixel_width,
            row_rotation: transform.row_rotation,
            upperleftx_coord: transform.origin_x,
            column_rotation: transform.col_rotation,
            pixel_height: transform.pixel_height,
            upperlefty_coord: transform.origin_y,
            blockxsize: image.width,
            blockysize: image.height,
            tiled: false,
            compress: CompressionFactory::name_for_code(compression).to_string(),
            interleave: "band".to_string(),
        }
    }

    /// Rebuild the affine transform from the stored coefficients
    pub fn transform(&self) -> GeoTransform {
        GeoTransform::new(
            self.pixel_width,
            self.row_rotation,
            self.upperleftx_coord,
            self.column_rotation,
            self.pixel_height,
            self.upperlefty_coord,
        )
    }

    /// EPSG code parsed from the crs field, if present
    pub fn epsg(&self) -> Option<u16> {
        self.crs.strip_prefix("epsg:")
            .or_else(|| self.crs.strip_prefix("EPSG:"))
            .and_then(|code| code.parse().ok())
    }
}
