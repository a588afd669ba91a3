//! Tests for the raster reader

extern crate std;

use std::io::Cursor;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};

use crate::raster::constants::tags;
use crate::raster::errors::PipelineError;
use crate::raster::reader::RasterReader;
use crate::raster::image::SampleDtype;
use super::test_utils::{create_test_tiff_buffer, create_georeferenced_tiff_buffer};

#[test]
fn test_read_structure() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = RasterReader::new("test-buffer");

    let structure = reader.read_structure(&mut cursor).unwrap();
    std::assert_eq!(structure.ifds.len(), 1);

    let ifd = structure.main_ifd().unwrap();
    std::assert_eq!(ifd.entry_count(), 9);
    std::assert_eq!(ifd.dimensions(), Some((2, 2)));
    std::assert_eq!(ifd.samples_per_pixel(), 1);
}

#[test]
fn test_read_structure_rejects_bad_marker() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x1234).unwrap();
    buffer.write_u16::<LittleEndian>(42).unwrap();
    let mut cursor = Cursor::new(buffer);

    let mut reader = RasterReader::new("test-buffer");
    let result = reader.read_structure(&mut cursor);
    std::assert!(matches!(result, Err(PipelineError::InvalidByteOrder(0x1234))));
}

#[test]
fn test_read_structure_rejects_unknown_version() {
    let mut buffer = Vec::new();
    buffer.write_u16::<LittleEndian>(0x4949).unwrap();
    buffer.write_u16::<LittleEndian>(99).unwrap();
    buffer.write_u32::<LittleEndian>(8).unwrap();
    let mut cursor = Cursor::new(buffer);

    let mut reader = RasterReader::new("test-buffer");
    let result = reader.read_structure(&mut cursor);
    std::assert!(matches!(result, Err(PipelineError::UnsupportedVersion(99))));
}

#[test]
fn test_decode_image_pixels() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = RasterReader::new("test-buffer");

    let structure = reader.read_structure(&mut cursor).unwrap();
    let image = reader.decode_image(&mut cursor, structure.main_ifd().unwrap()).unwrap();

    std::assert_eq!(image.width, 2);
    std::assert_eq!(image.height, 2);
    std::assert_eq!(image.band_count(), 1);
    std::assert_eq!(image.dtype, SampleDtype::U8);
    std::assert_eq!(image.band(0).unwrap(), &[10.0, 20.0, 30.0, 40.0]);
    std::assert!(image.transform.is_none());
}

#[test]
fn test_decode_image_georeferencing() {
    let mut cursor = create_georeferenced_tiff_buffer();
    let mut reader = RasterReader::new("test-buffer");

    let structure = reader.read_structure(&mut cursor).unwrap();
    let image = reader.decode_image(&mut cursor, structure.main_ifd().unwrap()).unwrap();

    let transform = image.transform.unwrap();
    std::assert_eq!(transform.origin_x, 100.0);
    std::assert_eq!(transform.origin_y, 200.0);
    std::assert_eq!(transform.pixel_width, 0.5);
    std::assert_eq!(transform.pixel_height, -0.5);
    std::assert_eq!(image.epsg, Some(4326));
    std::assert_eq!(image.nodata, Some(0.0));
}

#[test]
fn test_read_tag_values_external_array() {
    let mut cursor = create_georeferenced_tiff_buffer();
    let mut reader = RasterReader::new("test-buffer");

    let structure = reader.read_structure(&mut cursor).unwrap();
    let ifd = structure.main_ifd().unwrap();

    let directory = reader.read_tag_values(&mut cursor, ifd, tags::GEO_KEY_DIRECTORY_TAG).unwrap();
    std::assert_eq!(directory, vec![1, 1, 0, 1, 2048, 0, 1, 4326]);
}

#[test]
fn test_read_tag_values_missing_tag() {
    let mut cursor = create_test_tiff_buffer();
    let mut reader = RasterReader::new("test-buffer");

    let structure = reader.read_structure(&mut cursor).unwrap();
    let ifd = structure.main_ifd().unwrap();

    let result = reader.read_tag_values(&mut cursor, ifd, tags::GDAL_NODATA);
    std::assert!(matches!(result, Err(PipelineError::TagNotFound(tags::GDAL_NODATA))));
}

#[test]
fn test_big_endian_inline_short() {
    // Big-endian file: an inline SHORT sits in the first two value
    // bytes, which a naive u32 read would scale by 65536
    let mut buffer = Vec::new();
    buffer.write_u16::<BigEndian>(0x4D4D).unwrap();
    buffer.write_u16::<BigEndian>(42).unwrap();
    buffer.write_u32::<BigEndian>(8).unwrap();

    buffer.write_u16::<BigEndian>(1).unwrap();
    buffer.write_u16::<BigEndian>(258).unwrap();  // BitsPerSample
    buffer.write_u16::<BigEndian>(3).unwrap();    // SHORT
    buffer.write_u32::<BigEndian>(1).unwrap();
    buffer.write_u16::<BigEndian>(16).unwrap();   // value in the high half
    buffer.write_u16::<BigEndian>(0).unwrap();
    buffer.write_u32::<BigEndian>(0).unwrap();

    let mut cursor = Cursor::new(buffer);
    let mut reader = RasterReader::new("test-buffer");
    let structure = reader.read_structure(&mut cursor).unwrap();
    let ifd = structure.main_ifd().unwrap();

    let values = reader.read_tag_values(&mut cursor, ifd, 258).unwrap();
    std::assert_eq!(values, vec![16]);
}
