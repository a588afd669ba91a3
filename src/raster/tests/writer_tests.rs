//! Round-trip tests for the raster writer

extern crate std;

use tempfile::tempdir;

use crate::coordinate::GeoTransform;
use crate::raster::constants::compression;
use crate::raster::image::{RasterImage, SampleDtype};
use crate::raster::reader::RasterReader;
use crate::raster::writer::RasterWriter;

fn sample_image() -> RasterImage {
    let mut image = RasterImage::from_bands(3, 2, SampleDtype::U8, vec![
        vec![0.0, 50.0, 100.0, 150.0, 200.0, 255.0],
    ]).unwrap();
    image.transform = Some(GeoTransform::north_up(-113.5, 33.25, 0.001, -0.001));
    image.epsg = Some(4326);
    image.nodata = Some(0.0);
    image
}

#[test]
fn test_round_trip_uncompressed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plain.tif");
    let path = path.to_str().unwrap();

    RasterWriter::new().write(&sample_image(), path).unwrap();

    let mut reader = RasterReader::new(path);
    let image = reader.read_image().unwrap();

    std::assert_eq!(image.width, 3);
    std::assert_eq!(image.height, 2);
    std::assert_eq!(image.dtype, SampleDtype::U8);
    std::assert_eq!(image.band(0).unwrap(), &[0.0, 50.0, 100.0, 150.0, 200.0, 255.0]);
    std::assert_eq!(image.epsg, Some(4326));
    std::assert_eq!(image.nodata, Some(0.0));

    let transform = image.transform.unwrap();
    std::assert_eq!(transform.origin_x, -113.5);
    std::assert_eq!(transform.origin_y, 33.25);
    std::assert_eq!(transform.pixel_width, 0.001);
    std::assert_eq!(transform.pixel_height, -0.001);
}

#[test]
fn test_round_trip_deflate() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("deflate.tif");
    let path = path.to_str().unwrap();

    RasterWriter::with_compression(compression::DEFLATE as u64)
        .write(&sample_image(), path).unwrap();

    let mut reader = RasterReader::new(path);
    let image = reader.read_image().unwrap();
    std::assert_eq!(image.band(0).unwrap(), &[0.0, 50.0, 100.0, 150.0, 200.0, 255.0]);
}

#[test]
fn test_round_trip_zstd() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("zstd.tif");
    let path = path.to_str().unwrap();

    RasterWriter::with_compression(compression::ZSTD as u64)
        .write(&sample_image(), path).unwrap();

    let mut reader = RasterReader::new(path);
    let image = reader.read_image().unwrap();
    std::assert_eq!(image.band(0).unwrap(), &[0.0, 50.0, 100.0, 150.0, 200.0, 255.0]);
}

#[test]
fn test_round_trip_multi_band() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bands.tif");
    let path = path.to_str().unwrap();

    let bands: Vec<Vec<f32>> = (0..5)
        .map(|b| (0..4).map(|i| (b * 10 + i) as f32).collect())
        .collect();
    let image = RasterImage::from_bands(2, 2, SampleDtype::U8, bands).unwrap();

    RasterWriter::new().write(&image, path).unwrap();

    let mut reader = RasterReader::new(path);
    let read_back = reader.read_image().unwrap();

    std::assert_eq!(read_back.band_count(), 5);
    for b in 0..5 {
        let expected: Vec<f32> = (0..4).map(|i| (b * 10 + i) as f32).collect();
        std::assert_eq!(read_back.band(b).unwrap(), expected.as_slice());
    }
}

#[test]
fn test_round_trip_u16() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("labels.tif");
    let path = path.to_str().unwrap();

    let image = RasterImage::from_bands(2, 2, SampleDtype::U16, vec![
        vec![0.0, 1.0, 512.0, 65535.0],
    ]).unwrap();

    RasterWriter::with_compression(compression::DEFLATE as u64)
        .write(&image, path).unwrap();

    let mut reader = RasterReader::new(path);
    let read_back = reader.read_image().unwrap();
    std::assert_eq!(read_back.dtype, SampleDtype::U16);
    std::assert_eq!(read_back.band(0).unwrap(), &[0.0, 1.0, 512.0, 65535.0]);
}

#[test]
fn test_round_trip_f32() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("float.tif");
    let path = path.to_str().unwrap();

    let image = RasterImage::from_bands(2, 2, SampleDtype::F32, vec![
        vec![-1.5, 0.0, 0.25, 1234.75],
    ]).unwrap();

    RasterWriter::new().write(&image, path).unwrap();

    let mut reader = RasterReader::new(path);
    let read_back = reader.read_image().unwrap();
    std::assert_eq!(read_back.dtype, SampleDtype::F32);
    std::assert_eq!(read_back.band(0).unwrap(), &[-1.5, 0.0, 0.25, 1234.75]);
}

#[test]
fn test_write_empty_image_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.tif");

    let image = RasterImage::new(0, 0, 1, SampleDtype::U8);
    let result = RasterWriter::new().write(&image, path.to_str().unwrap());
    std::assert!(result.is_err());
}

#[test]
fn test_geo_info_without_pixel_decode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("info.tif");
    let path = path.to_str().unwrap();

    RasterWriter::new().write(&sample_image(), path).unwrap();

    let mut reader = RasterReader::new(path);
    let info = reader.read_geo_info().unwrap();
    std::assert_eq!(info.width, 3);
    std::assert_eq!(info.height, 2);
    std::assert_eq!(info.epsg, Some(4326));
    std::assert_eq!(info.transform.unwrap().origin_x, -113.5);
}
