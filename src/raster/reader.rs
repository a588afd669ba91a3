//! GeoTIFF reading
//!
//! Parses the header and IFD chain of a TIFF file, then decodes strip
//! data into an in-memory `RasterImage` with every band as f32. Both
//! classic TIFF and BigTIFF structures are read; strip layout in
//! chunky or planar configuration is supported, tiled layout is not.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, SeekFrom};
use log::{debug, info, warn};

use crate::compression::CompressionFactory;
use crate::coordinate::GeoTransform;
use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::raster::constants::{header, field_types, tags, compression, planar_config, predictor, sample_format, geo_keys};
use crate::raster::errors::{PipelineError, PipelineResult};
use crate::raster::geo_codes;
use crate::raster::ifd::{Ifd, IfdEntry};
use crate::raster::image::{RasterImage, SampleDtype};

/// Maximum number of IFDs to read from a file, as a safety limit
const MAX_IFD_COUNT: usize = 100;

/// Parsed structural view of a raster file
#[derive(Debug)]
pub struct RasterFile {
    /// All IFDs found in the file, in chain order
    pub ifds: Vec<Ifd>,
}

impl RasterFile {
    /// The IFD describing the primary image
    pub fn main_ifd(&self) -> Option<&Ifd> {
        self.ifds.first()
    }
}

/// Georeferencing summary of a raster, read without decoding pixels
#[derive(Debug, Clone, Copy)]
pub struct GeoInfo {
    pub width: u32,
    pub height: u32,
    pub transform: Option<GeoTransform>,
    pub epsg: Option<u16>,
    pub nodata: Option<f64>,
}

/// Reader for GeoTIFF files
pub struct RasterReader<'a> {
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    file_path: &'a str,
    is_big_tiff: bool,
}

impl<'a> RasterReader<'a> {
    pub fn new(file_path: &'a str) -> Self {
        RasterReader {
            byte_order_handler: None,
            file_path,
            is_big_tiff: false,
        }
    }

    fn handler(&self) -> PipelineResult<&dyn ByteOrderHandler> {
        self.byte_order_handler.as_deref()
            .ok_or_else(|| PipelineError::GenericError(
                "byte order handler not initialized, header not read yet".to_string()))
    }

    /// Parse the header and IFD chain of the file
    pub fn load_structure(&mut self) -> PipelineResult<RasterFile> {
        let file = File::open(self.file_path)?;
        let mut reader = BufReader::new(file);
        self.read_structure(&mut reader)
    }

    /// Read the primary image of the file into memory
    pub fn read_image(&mut self) -> PipelineResult<RasterImage> {
        let file = File::open(self.file_path)?;
        let mut reader = BufReader::new(file);
        let structure = self.read_structure(&mut reader)?;
        let ifd = structure.main_ifd().ok_or_else(|| {
            PipelineError::GenericError(format!("no image directory in {}", self.file_path))
        })?;
        self.decode_image(&mut reader, ifd)
    }

    /// Read dimensions and georeferencing without decoding pixel data
    pub fn read_geo_info(&mut self) -> PipelineResult<GeoInfo> {
        let file = File::open(self.file_path)?;
        let mut reader = BufReader::new(file);
        let structure = self.read_structure(&mut reader)?;
        let ifd = structure.main_ifd().ok_or_else(|| {
            PipelineError::GenericError(format!("no image directory in {}", self.file_path))
        })?;

        let (width, height) = self.read_dimensions(&mut reader, ifd)?;
        let (transform, epsg, nodata) = self.read_georeferencing(&mut reader, ifd)?;

        Ok(GeoInfo {
            width,
            height,
            transform,
            epsg,
            nodata,
        })
    }

    /// Parse header and IFD chain from an open reader
    pub fn read_structure(&mut self, reader: &mut dyn SeekableReader) -> PipelineResult<RasterFile> {
        reader.seek(SeekFrom::Start(0))?;

        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        self.byte_order_handler = Some(byte_order.create_handler());

        let first_ifd_offset = self.read_version_and_offset(reader)?;
        debug!("First IFD offset: {}", first_ifd_offset);

        let ifds = self.read_ifd_chain(reader, first_ifd_offset)?;
        if ifds.is_empty() {
            return Err(PipelineError::InvalidHeader);
        }

        Ok(RasterFile { ifds })
    }

    /// Read the version field and resolve the first IFD offset
    fn read_version_and_offset(&mut self, reader: &mut dyn SeekableReader) -> PipelineResult<u64> {
        let version = self.handler()?.read_u16(reader)?;

        match version {
            header::TIFF_VERSION => {
                self.is_big_tiff = false;
                Ok(self.handler()?.read_u32(reader)? as u64)
            },
            header::BIG_TIFF_VERSION => {
                self.is_big_tiff = true;
                let offset_size = self.handler()?.read_u16(reader)?;
                if offset_size != header::BIGTIFF_OFFSET_SIZE {
                    return Err(PipelineError::InvalidHeader);
                }
                let _reserved = self.handler()?.read_u16(reader)?;
                Ok(self.handler()?.read_u64(reader)?)
            },
            other => Err(PipelineError::UnsupportedVersion(other)),
        }
    }

    /// Walk the IFD chain, stopping on damage rather than failing the
    /// whole file when at least one IFD was readable
    fn read_ifd_chain(&self, reader: &mut dyn SeekableReader, first_offset: u64) -> PipelineResult<Vec<Ifd>> {
        let file_size = reader.seek(SeekFrom::End(0))?;

        let mut ifds = Vec::new();
        let mut ifd_offset = first_offset;
        let mut ifd_number = 0;

        while ifd_offset != 0 && ifds.len() < MAX_IFD_COUNT {
            if ifd_offset >= file_size {
                warn!("IFD offset {} exceeds file size {}, stopping chain", ifd_offset, file_size);
                break;
            }

            match self.read_ifd(reader, ifd_offset, ifd_number) {
                Ok((ifd, next_offset)) => {
                    debug!("Read IFD {} with {} entries, next offset {}",
                           ifd_number, ifd.entry_count(), next_offset);

                    if next_offset != 0 && (next_offset >= file_size || next_offset < 8) {
                        warn!("Invalid next IFD offset {}, stopping chain", next_offset);
                        ifds.push(ifd);
                        break;
                    }

                    ifds.push(ifd);
                    ifd_offset = next_offset;
                    ifd_number += 1;
                },
                Err(e) => {
                    warn!("Error reading IFD {}: {}", ifd_number, e);
                    break;
                }
            }
        }

        Ok(ifds)
    }

    /// Read one IFD and the offset of the next one
    pub fn read_ifd(&self, reader: &mut dyn SeekableReader, offset: u64, number: usize) -> PipelineResult<(Ifd, u64)> {
        reader.seek(SeekFrom::Start(offset))?;

        let entry_count = self.read_entry_count(reader)?;
        let mut ifd = Ifd::new(number, offset);

        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader)?;
            ifd.add_entry(entry);
        }

        let handler = self.handler()?;
        let next_offset = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        Ok((ifd, next_offset))
    }

    fn read_entry_count(&self, reader: &mut dyn SeekableReader) -> PipelineResult<u64> {
        let handler = self.handler()?;
        if self.is_big_tiff {
            Ok(handler.read_u64(reader)?)
        } else {
            Ok(handler.read_u16(reader)? as u64)
        }
    }

    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader) -> PipelineResult<IfdEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };
        let value_offset = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        Ok(IfdEntry::new(tag, field_type, count, value_offset))
    }

    /// Reconstruct the on-disk bytes of an inline value field
    ///
    /// The entry's value field was read through the byte order handler
    /// as one integer; serializing it back with the same order gives
    /// the original bytes, which can then be decoded per field type.
    fn inline_bytes(&self, entry: &IfdEntry) -> PipelineResult<Vec<u8>> {
        let handler = self.handler()?;
        let bytes = match (handler.order(), self.is_big_tiff) {
            (ByteOrder::LittleEndian, false) => (entry.value_offset as u32).to_le_bytes().to_vec(),
            (ByteOrder::LittleEndian, true) => entry.value_offset.to_le_bytes().to_vec(),
            (ByteOrder::BigEndian, false) => (entry.value_offset as u32).to_be_bytes().to_vec(),
            (ByteOrder::BigEndian, true) => entry.value_offset.to_be_bytes().to_vec(),
        };
        Ok(bytes)
    }

    /// Read a tag's values as integers
    pub fn read_tag_values(&self, reader: &mut dyn SeekableReader, ifd: &Ifd, tag: u16) -> PipelineResult<Vec<u64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(PipelineError::TagNotFound(tag))?;

        if entry.is_value_inline(self.is_big_tiff) {
            let mut cursor = Cursor::new(self.inline_bytes(entry)?);
            self.read_value_array(&mut cursor, entry)
        } else {
            reader.seek(SeekFrom::Start(entry.value_offset))?;
            self.read_value_array(reader, entry)
        }
    }

    fn read_value_array(&self, reader: &mut dyn SeekableReader, entry: &IfdEntry) -> PipelineResult<Vec<u64>> {
        let handler = self.handler()?;
        let mut values = Vec::with_capacity(entry.count as usize);

        for _ in 0..entry.count {
            let value = match entry.field_type {
                field_types::BYTE | field_types::ASCII | field_types::UNDEFINED => {
                    let mut buf = [0u8; 1];
                    reader.read_exact(&mut buf)?;
                    buf[0] as u64
                },
                field_types::SBYTE => {
                    let mut buf = [0u8; 1];
                    reader.read_exact(&mut buf)?;
                    buf[0] as i8 as i64 as u64
                },
                field_types::SHORT => handler.read_u16(reader)? as u64,
                field_types::SSHORT => handler.read_i16(reader)? as i64 as u64,
                field_types::LONG => handler.read_u32(reader)? as u64,
                field_types::SLONG => handler.read_i32(reader)? as i64 as u64,
                field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => {
                    handler.read_u64(reader)?
                },
                other => return Err(PipelineError::UnsupportedFieldType(other)),
            };
            values.push(value);
        }

        Ok(values)
    }

    /// Read a tag's values as doubles
    pub fn read_tag_doubles(&self, reader: &mut dyn SeekableReader, ifd: &Ifd, tag: u16) -> PipelineResult<Vec<f64>> {
        let entry = ifd.get_entry(tag)
            .ok_or(PipelineError::TagNotFound(tag))?;

        if entry.is_value_inline(self.is_big_tiff) {
            let mut cursor = Cursor::new(self.inline_bytes(entry)?);
            self.read_double_array(&mut cursor, entry)
        } else {
            reader.seek(SeekFrom::Start(entry.value_offset))?;
            self.read_double_array(reader, entry)
        }
    }

    fn read_double_array(&self, reader: &mut dyn SeekableReader, entry: &IfdEntry) -> PipelineResult<Vec<f64>> {
        let handler = self.handler()?;
        let mut values = Vec::with_capacity(entry.count as usize);

        for _ in 0..entry.count {
            let value = match entry.field_type {
                field_types::DOUBLE => handler.read_f64(reader)?,
                field_types::FLOAT => handler.read_f32(reader)? as f64,
                other => return Err(PipelineError::UnsupportedFieldType(other)),
            };
            values.push(value);
        }

        Ok(values)
    }

    /// Read an ASCII tag, trimming trailing nulls
    pub fn read_ascii_string(&self, reader: &mut dyn SeekableReader, ifd: &Ifd, tag: u16) -> PipelineResult<String> {
        let entry = ifd.get_entry(tag)
            .ok_or(PipelineError::TagNotFound(tag))?;

        let mut raw = vec![0u8; entry.count as usize];
        if entry.is_value_inline(self.is_big_tiff) {
            let inline = self.inline_bytes(entry)?;
            let len = raw.len();
            raw.copy_from_slice(&inline[..len]);
        } else {
            reader.seek(SeekFrom::Start(entry.value_offset))?;
            reader.read_exact(&mut raw)?;
        }

        Ok(String::from_utf8_lossy(&raw).trim_end_matches('\0').to_string())
    }

    /// First value of a tag, or None when the tag is absent
    fn tag_value(&self, reader: &mut dyn SeekableReader, ifd: &Ifd, tag: u16) -> PipelineResult<Option<u64>> {
        match self.read_tag_values(reader, ifd, tag) {
            Ok(values) => Ok(values.first().copied()),
            Err(PipelineError::TagNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read_dimensions(&self, reader: &mut dyn SeekableReader, ifd: &Ifd) -> PipelineResult<(u32, u32)> {
        let width = self.tag_value(reader, ifd, tags::IMAGE_WIDTH)?
            .ok_or(PipelineError::MissingDimensions)?;
        let height = self.tag_value(reader, ifd, tags::IMAGE_LENGTH)?
            .ok_or(PipelineError::MissingDimensions)?;
        if width == 0 || height == 0 {
            return Err(PipelineError::MissingDimensions);
        }
        Ok((width as u32, height as u32))
    }

    /// Decode the strip data of an IFD into band planes
    pub fn decode_image(&self, reader: &mut dyn SeekableReader, ifd: &Ifd) -> PipelineResult<RasterImage> {
        let (width, height) = self.read_dimensions(reader, ifd)?;
        let samples = self.tag_value(reader, ifd, tags::SAMPLES_PER_PIXEL)?.unwrap_or(1) as usize;

        let bits_values = match self.read_tag_values(reader, ifd, tags::BITS_PER_SAMPLE) {
            Ok(values) => values,
            Err(PipelineError::TagNotFound(_)) => vec![8],
            Err(e) => return Err(e),
        };
        let bits = bits_values.first().copied().unwrap_or(8) as u16;
        if bits_values.iter().any(|&b| b != bits as u64) {
            return Err(PipelineError::GenericError(
                "bands with differing sample widths are not supported".to_string()));
        }

        let format = self.tag_value(reader, ifd, tags::SAMPLE_FORMAT)?
            .unwrap_or(sample_format::UNSIGNED as u64) as u16;
        let dtype = match (format, bits) {
            (sample_format::UNSIGNED, 8) => SampleDtype::U8,
            (sample_format::UNSIGNED, 16) => SampleDtype::U16,
            (sample_format::UNSIGNED, 32) => SampleDtype::F32,
            (sample_format::SIGNED, 8 | 16 | 32) => SampleDtype::F32,
            (sample_format::IEEEFP, 32 | 64) => SampleDtype::F32,
            _ => return Err(PipelineError::UnsupportedSampleFormat(format, bits)),
        };

        if ifd.has_tag(tags::TILE_OFFSETS) && !ifd.has_tag(tags::STRIP_OFFSETS) {
            return Err(PipelineError::GenericError(format!(
                "{} uses tiled layout, only strip layout is supported", self.file_path)));
        }

        let compression_code = self.tag_value(reader, ifd, tags::COMPRESSION)?
            .unwrap_or(compression::NONE as u64);
        let planar = self.tag_value(reader, ifd, tags::PLANAR_CONFIGURATION)?
            .unwrap_or(planar_config::CHUNKY as u64) as u16;
        let predictor_code = self.tag_value(reader, ifd, tags::PREDICTOR)?
            .unwrap_or(predictor::NONE as u64) as u16;
        let rows_per_strip = self.tag_value(reader, ifd, tags::ROWS_PER_STRIP)?
            .unwrap_or(height as u64) as u32;

        let strip_offsets = self.read_tag_values(reader, ifd, tags::STRIP_OFFSETS)?;
        let strip_byte_counts = self.read_tag_values(reader, ifd, tags::STRIP_BYTE_COUNTS)?;
        if strip_offsets.len() != strip_byte_counts.len() {
            return Err(PipelineError::GenericError(format!(
                "{} strip offsets but {} byte counts", strip_offsets.len(), strip_byte_counts.len())));
        }

        let strips_per_band = ((height + rows_per_strip - 1) / rows_per_strip) as usize;
        let expected_strips = if planar == planar_config::PLANAR {
            strips_per_band * samples
        } else {
            strips_per_band
        };
        if strip_offsets.len() != expected_strips {
            return Err(PipelineError::GenericError(format!(
                "expected {} strips, found {}", expected_strips, strip_offsets.len())));
        }

        if predictor_code == predictor::HORIZONTAL_DIFFERENCING && bits > 16 {
            return Err(PipelineError::GenericError(
                "horizontal differencing is only supported for 8 and 16 bit samples".to_string()));
        }

        let codec = CompressionFactory::create_handler(compression_code)?;
        debug!("Decoding {}x{}, {} bands, {} bits, {} compression, {} strips",
               width, height, samples, bits, codec.name(), strip_offsets.len());

        let bytes_per_sample = (bits / 8) as usize;
        let channels = if planar == planar_config::PLANAR { 1 } else { samples };
        let row_stride = width as usize * channels * bytes_per_sample;
        let byte_order = self.handler()?.order();

        let plane_len = width as usize * height as usize;
        let mut planes = vec![vec![0f32; plane_len]; samples];

        for (strip_index, (&offset, &byte_count)) in
            strip_offsets.iter().zip(strip_byte_counts.iter()).enumerate() {
            reader.seek(SeekFrom::Start(offset))?;
            let mut compressed = vec![0u8; byte_count as usize];
            reader.read_exact(&mut compressed)?;
            let mut data = codec.decompress(&compressed)?;

            let strip_in_band = strip_index % strips_per_band;
            let row_start = strip_in_band * rows_per_strip as usize;
            let rows_in_strip = (rows_per_strip as usize).min(height as usize - row_start);

            if data.len() < rows_in_strip * row_stride {
                return Err(PipelineError::GenericError(format!(
                    "strip {} decompressed to {} bytes, expected {}",
                    strip_index, data.len(), rows_in_strip * row_stride)));
            }

            if predictor_code == predictor::HORIZONTAL_DIFFERENCING {
                undo_horizontal_predictor(&mut data, row_stride, channels, bytes_per_sample, byte_order);
            }

            if planar == planar_config::PLANAR {
                let band = strip_index / strips_per_band;
                for (r, row_bytes) in data.chunks(row_stride).take(rows_in_strip).enumerate() {
                    let base = (row_start + r) * width as usize;
                    for col in 0..width as usize {
                        let sample = &row_bytes[col * bytes_per_sample..(col + 1) * bytes_per_sample];
                        planes[band][base + col] = decode_sample(sample, format, byte_order);
                    }
                }
            } else {
                for (r, row_bytes) in data.chunks(row_stride).take(rows_in_strip).enumerate() {
                    let base = (row_start + r) * width as usize;
                    for col in 0..width as usize {
                        for band in 0..samples {
                            let start = (col * samples + band) * bytes_per_sample;
                            let sample = &row_bytes[start..start + bytes_per_sample];
                            planes[band][base + col] = decode_sample(sample, format, byte_order);
                        }
                    }
                }
            }
        }

        let mut image = RasterImage::from_bands(width, height, dtype, planes)?;
        let (transform, epsg, nodata) = self.read_georeferencing(reader, ifd)?;
        image.transform = transform;
        image.epsg = epsg;
        image.nodata = nodata;

        info!("Read {}x{} raster with {} band(s) from {}",
              width, height, samples, self.file_path);
        Ok(image)
    }

    /// Extract transform, CRS code and nodata value from GeoTIFF tags
    fn read_georeferencing(&self, reader: &mut dyn SeekableReader, ifd: &Ifd)
        -> PipelineResult<(Option<GeoTransform>, Option<u16>, Option<f64>)> {
        let mut transform = None;
        if ifd.has_tag(tags::MODEL_PIXEL_SCALE_TAG) && ifd.has_tag(tags::MODEL_TIEPOINT_TAG) {
            let pixel_scale = self.read_tag_doubles(reader, ifd, tags::MODEL_PIXEL_SCALE_TAG)?;
            let tiepoint = self.read_tag_doubles(reader, ifd, tags::MODEL_TIEPOINT_TAG)?;
            transform = Some(GeoTransform::from_geotiff(&pixel_scale, &tiepoint)?);
        } else {
            debug!("No georeferencing tags in {}", self.file_path);
        }

        let mut epsg = None;
        if ifd.has_tag(tags::GEO_KEY_DIRECTORY_TAG) {
            let directory = self.read_tag_values(reader, ifd, tags::GEO_KEY_DIRECTORY_TAG)?;
            if let Some(code) = extract_epsg_code(&directory) {
                debug!("Coordinate system: {}", geo_codes::get_crs_description(code));
                epsg = Some(code);
            }
        }

        let mut nodata = None;
        if ifd.has_tag(tags::GDAL_NODATA) {
            let text = self.read_ascii_string(reader, ifd, tags::GDAL_NODATA)?;
            match text.trim().parse::<f64>() {
                Ok(value) => nodata = Some(value),
                Err(_) => warn!("Unparseable nodata value {:?} in {}", text, self.file_path),
            }
        }

        Ok((transform, epsg, nodata))
    }
}

/// Pull the EPSG code out of a GeoKey directory
///
/// The directory is a four-short header followed by four-short key
/// entries. Keys stored inline have location 0 and carry their value
/// in the last short. A projected CS code wins over a geographic one.
fn extract_epsg_code(directory: &[u64]) -> Option<u16> {
    if directory.len() < 4 {
        return None;
    }

    let mut geographic = None;
    let mut projected = None;

    for entry in directory[4..].chunks(4) {
        if entry.len() < 4 {
            break;
        }
        let key_id = entry[0] as u16;
        let location = entry[1] as u16;
        let value = entry[3] as u16;

        if location != 0 || value == 32767 {
            continue;
        }
        match key_id {
            geo_keys::GEOGRAPHIC_TYPE => geographic = Some(value),
            geo_keys::PROJECTED_CS_TYPE => projected = Some(value),
            _ => {},
        }
    }

    projected.or(geographic)
}

/// Undo TIFF predictor 2 in place, row by row
fn undo_horizontal_predictor(data: &mut [u8], row_stride: usize, channels: usize,
                             bytes_per_sample: usize, order: ByteOrder) {
    for row in data.chunks_mut(row_stride) {
        if row.len() < row_stride {
            break;
        }
        match bytes_per_sample {
            1 => {
                for i in channels..row.len() {
                    row[i] = row[i].wrapping_add(row[i - channels]);
                }
            },
            2 => {
                let samples = row.len() / 2;
                for s in channels..samples {
                    let prev = read_u16_at(row, (s - channels) * 2, order);
                    let cur = read_u16_at(row, s * 2, order);
                    write_u16_at(row, s * 2, cur.wrapping_add(prev), order);
                }
            },
            _ => {},
        }
    }
}

fn read_u16_at(data: &[u8], offset: usize, order: ByteOrder) -> u16 {
    let pair = [data[offset], data[offset + 1]];
    match order {
        ByteOrder::LittleEndian => u16::from_le_bytes(pair),
        ByteOrder::BigEndian => u16::from_be_bytes(pair),
    }
}

fn write_u16_at(data: &mut [u8], offset: usize, value: u16, order: ByteOrder) {
    let pair = match order {
        ByteOrder::LittleEndian => value.to_le_bytes(),
        ByteOrder::BigEndian => value.to_be_bytes(),
    };
    data[offset] = pair[0];
    data[offset + 1] = pair[1];
}

/// Decode one sample's bytes into f32
fn decode_sample(bytes: &[u8], format: u16, order: ByteOrder) -> f32 {
    let bits = (bytes.len() * 8) as u16;
    let mut raw: u64 = 0;
    match order {
        ByteOrder::LittleEndian => {
            for (i, &b) in bytes.iter().enumerate() {
                raw |= (b as u64) << (8 * i);
            }
        },
        ByteOrder::BigEndian => {
            for &b in bytes {
                raw = (raw << 8) | b as u64;
            }
        },
    }

    match (format, bits) {
        (sample_format::SIGNED, 8) => raw as u8 as i8 as f32,
        (sample_format::SIGNED, 16) => raw as u16 as i16 as f32,
        (sample_format::SIGNED, 32) => raw as u32 as i32 as f32,
        (sample_format::IEEEFP, 32) => f32::from_bits(raw as u32),
        (sample_format::IEEEFP, 64) => f64::from_bits(raw) as f32,
        _ => raw as f32,
    }
}
