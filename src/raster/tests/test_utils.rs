use std::io::Cursor;
use byteorder::{LittleEndian, WriteBytesExt};

/// Writes one classic TIFF IFD entry
pub fn write_entry(buffer: &mut Vec<u8>, tag: u16, field_type: u16, count: u32, value: u32) {
    buffer.write_u16::<LittleEndian>(tag).unwrap();
    buffer.write_u16::<LittleEndian>(field_type).unwrap();
    buffer.write_u32::<LittleEndian>(count).unwrap();
    buffer.write_u32::<LittleEndian>(value).unwrap();
}

/// Creates a little-endian TIFF with a 2x2 single-band u8 image
///
/// Pixel values are 10, 20, 30, 40 in row-major order, stored
/// uncompressed in one strip.
pub fn create_test_tiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    // TIFF header (little-endian)
    buffer.write_u16::<LittleEndian>(0x4949).unwrap(); // II
    buffer.write_u16::<LittleEndian>(42).unwrap();     // TIFF magic number
    buffer.write_u32::<LittleEndian>(8).unwrap();      // IFD offset

    let entry_count = 9u32;
    let data_offset = 8 + 2 + entry_count * 12 + 4;

    buffer.write_u16::<LittleEndian>(entry_count as u16).unwrap();

    write_entry(&mut buffer, 256, 4, 1, 2);            // ImageWidth = 2
    write_entry(&mut buffer, 257, 4, 1, 2);            // ImageLength = 2
    write_entry(&mut buffer, 258, 3, 1, 8);            // BitsPerSample = 8
    write_entry(&mut buffer, 259, 3, 1, 1);            // Compression = none
    write_entry(&mut buffer, 262, 3, 1, 1);            // Photometric = BlackIsZero
    write_entry(&mut buffer, 273, 4, 1, data_offset);  // StripOffsets
    write_entry(&mut buffer, 277, 3, 1, 1);            // SamplesPerPixel = 1
    write_entry(&mut buffer, 278, 4, 1, 2);            // RowsPerStrip = 2
    write_entry(&mut buffer, 279, 4, 1, 4);            // StripByteCounts = 4

    // Next IFD offset (0 = no more IFDs)
    buffer.write_u32::<LittleEndian>(0).unwrap();

    // Pixel data
    buffer.extend_from_slice(&[10u8, 20, 30, 40]);

    Cursor::new(buffer)
}

/// Creates a TIFF whose IFD also carries georeferencing tags
///
/// Same 2x2 image as `create_test_tiff_buffer`, tied to world origin
/// (100, 200) at 0.5 units per pixel in EPSG:4326, nodata 0.
pub fn create_georeferenced_tiff_buffer() -> Cursor<Vec<u8>> {
    let mut buffer = Vec::new();

    buffer.write_u16::<LittleEndian>(0x4949).unwrap();
    buffer.write_u16::<LittleEndian>(42).unwrap();
    buffer.write_u32::<LittleEndian>(8).unwrap();

    let entry_count = 13u32;
    let ifd_end = 8 + 2 + entry_count * 12 + 4;
    let scale_offset = ifd_end;                  // 3 doubles
    let tiepoint_offset = scale_offset + 24;     // 6 doubles
    let geokey_offset = tiepoint_offset + 48;    // 8 shorts
    let data_offset = geokey_offset + 16;

    buffer.write_u16::<LittleEndian>(entry_count as u16).unwrap();

    write_entry(&mut buffer, 256, 4, 1, 2);
    write_entry(&mut buffer, 257, 4, 1, 2);
    write_entry(&mut buffer, 258, 3, 1, 8);
    write_entry(&mut buffer, 259, 3, 1, 1);
    write_entry(&mut buffer, 262, 3, 1, 1);
    write_entry(&mut buffer, 273, 4, 1, data_offset);
    write_entry(&mut buffer, 277, 3, 1, 1);
    write_entry(&mut buffer, 278, 4, 1, 2);
    write_entry(&mut buffer, 279, 4, 1, 4);
    write_entry(&mut buffer, 33550, 12, 3, scale_offset);    // ModelPixelScale
    write_entry(&mut buffer, 33922, 12, 6, tiepoint_offset); // ModelTiepoint
    write_entry(&mut buffer, 34735, 3, 8, geokey_offset);    // GeoKeyDirectory
    write_entry(&mut buffer, 42113, 2, 2, 0x0030);           // GDALNoData = "0"

    buffer.write_u32::<LittleEndian>(0).unwrap();

    // Pixel scale: 0.5 x 0.5
    for value in [0.5f64, 0.5, 0.0] {
        buffer.write_f64::<LittleEndian>(value).unwrap();
    }
    // Tiepoint: pixel (0, 0) at world (100, 200)
    for value in [0.0f64, 0.0, 0.0, 100.0, 200.0, 0.0] {
        buffer.write_f64::<LittleEndian>(value).unwrap();
    }
    // GeoKey directory: header + GeographicTypeGeoKey = 4326
    for value in [1u16, 1, 0, 1, 2048, 0, 1, 4326] {
        buffer.write_u16::<LittleEndian>(value).unwrap();
    }

    buffer.extend_from_slice(&[10u8, 20, 30, 40]);

    Cursor::new(buffer)
}
