//! Tests for the raster profile metadata

extern crate std;

use crate::coordinate::GeoTransform;
use crate::raster::constants::compression;
use crate::raster::image::{RasterImage, SampleDtype};
use crate::raster::metadata::RasterMetadata;

fn classified_image() -> RasterImage {
    let mut image = RasterImage::new(4, 3, 1, SampleDtype::U8);
    image.transform = Some(GeoTransform::north_up(-113.7, 33.4, 0.0001, -0.0001));
    image.epsg = Some(4326);
    image.nodata = Some(0.0);
    image
}

#[test]
fn test_describe_fields() {
    let meta = RasterMetadata::describe(&classified_image(), compression::DEFLATE as u64);

    std::assert_eq!(meta.driver, "GTiff");
    std::assert_eq!(meta.dtype, "uint8");
    std::assert_eq!(meta.nodata, 0.0);
    std::assert_eq!(meta.width, 4);
    std::assert_eq!(meta.height, 3);
    std::assert_eq!(meta.count, 1);
    std::assert_eq!(meta.crs, "epsg:4326");
    std::assert_eq!(meta.pixel_width, 0.0001);
    std::assert_eq!(meta.upperleftx_coord, -113.7);
    std::assert_eq!(meta.pixel_height, -0.0001);
    std::assert_eq!(meta.upperlefty_coord, 33.4);
    std::assert_eq!(meta.compress, "deflate");
    std::assert_eq!(meta.interleave, "band");
    std::assert!(!meta.tiled);
}

#[test]
fn test_transform_round_trip() {
    let image = classified_image();
    let meta = RasterMetadata::describe(&image, compression::NONE as u64);

    std::assert_eq!(meta.transform(), image.transform.unwrap());
    std::assert_eq!(meta.epsg(), Some(4326));
}

#[test]
fn test_json_field_spellings() {
    let meta = RasterMetadata::describe(&classified_image(), compression::DEFLATE as u64);
    let json = serde_json::to_value(&meta).unwrap();

    // Attribute spellings follow the raster profile conventions
    std::assert!(json.get("pixel width").is_some());
    std::assert!(json.get("row rotation").is_some());
    std::assert!(json.get("column rotation").is_some());
    std::assert!(json.get("pixel height").is_some());
    std::assert!(json.get("upperleftx_coord").is_some());
    std::assert!(json.get("upperlefty_coord").is_some());
    std::assert!(json.get("blockxsize").is_some());
    std::assert_eq!(json.as_object().unwrap().len(), 18);
}

#[test]
fn test_json_round_trip() {
    let meta = RasterMetadata::describe(&classified_image(), compression::DEFLATE as u64);
    let json = serde_json::to_string(&meta).unwrap();
    let parsed: RasterMetadata = serde_json::from_str(&json).unwrap();

    std::assert_eq!(parsed, meta);
}
