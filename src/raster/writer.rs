//! GeoTIFF writing
//!
//! Writing a valid TIFF requires careful management of offsets,
//! ordering and alignment. The layout used here is a single IFD
//! followed by external tag data and then the strip data, one strip
//! per band in planar configuration. Output is always little-endian
//! classic TIFF.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use log::{info, warn};

use crate::compression::CompressionFactory;
use crate::raster::constants::{header, field_types, tags, compression, photometric, planar_config, geo_keys};
use crate::raster::errors::{PipelineError, PipelineResult};
use crate::raster::ifd::IfdEntry;
use crate::raster::image::{RasterImage, SampleDtype};
use crate::utils::write_utils;

/// Writer for GeoTIFF files
pub struct RasterWriter {
    compression: u64,
}

impl RasterWriter {
    /// Writer producing uncompressed output
    pub fn new() -> Self {
        RasterWriter { compression: compression::NONE as u64 }
    }

    /// Writer compressing strip data with the given compression code
    pub fn with_compression(code: u64) -> Self {
        RasterWriter { compression: code }
    }

    /// Write a raster to disk
    pub fn write(&self, image: &RasterImage, output_path: &str) -> PipelineResult<()> {
        if image.width == 0 || image.height == 0 {
            return Err(PipelineError::EmptyInput(format!(
                "raster has no pixels, nothing to write to {}", output_path)));
        }

        info!("Writing {}x{} raster with {} band(s) to {}",
              image.width, image.height, image.band_count(), output_path);

        let strips = self.encode_strips(image)?;
        let mut layout = TagLayout::new();
        self.build_entries(image, &strips, &mut layout);

        let file = File::create(output_path)?;
        let mut writer = BufWriter::with_capacity(1024 * 1024, file);
        write_file(&mut writer, layout, &strips)?;
        writer.flush()?;

        Ok(())
    }

    /// Encode and compress every band plane into its strip payload
    fn encode_strips(&self, image: &RasterImage) -> PipelineResult<Vec<Vec<u8>>> {
        let codec = CompressionFactory::create_handler(self.compression)?;
        let mut strips = Vec::with_capacity(image.band_count());

        for band_index in 0..image.band_count() {
            let plane = image.band(band_index)?;
            let raw = encode_plane(plane, image.dtype);
            strips.push(codec.compress(&raw)?);
        }

        Ok(strips)
    }

    /// Assemble the tag entries describing the image
    fn build_entries(&self, image: &RasterImage, strips: &[Vec<u8>], layout: &mut TagLayout) {
        let bands = image.band_count();
        let bits = image.dtype.bits() as u64;
        let format = image.dtype.sample_format() as u64;

        layout.add_values(tags::IMAGE_WIDTH, field_types::LONG, &[image.width as u64]);
        layout.add_values(tags::IMAGE_LENGTH, field_types::LONG, &[image.height as u64]);
        layout.add_values(tags::BITS_PER_SAMPLE, field_types::SHORT, &vec![bits; bands]);
        layout.add_values(tags::COMPRESSION, field_types::SHORT, &[self.compression]);
        layout.add_values(tags::PHOTOMETRIC_INTERPRETATION, field_types::SHORT,
                          &[photometric::BLACK_IS_ZERO as u64]);
        // Strip positions are not known yet, patched after layout
        layout.add_values(tags::STRIP_OFFSETS, field_types::LONG, &vec![0u64; strips.len()]);
        layout.add_values(tags::SAMPLES_PER_PIXEL, field_types::SHORT, &[bands as u64]);
        layout.add_values(tags::ROWS_PER_STRIP, field_types::LONG, &[image.height as u64]);

        let byte_counts: Vec<u64> = strips.iter().map(|s| s.len() as u64).collect();
        layout.add_values(tags::STRIP_BYTE_COUNTS, field_types::LONG, &byte_counts);

        let planar = if bands > 1 { planar_config::PLANAR } else { planar_config::CHUNKY };
        layout.add_values(tags::PLANAR_CONFIGURATION, field_types::SHORT, &[planar as u64]);
        layout.add_ascii(tags::SOFTWARE, "floodtrace");
        layout.add_values(tags::SAMPLE_FORMAT, field_types::SHORT, &vec![format; bands]);

        self.add_geo_tags(image, layout);

        if let Some(nodata) = image.nodata {
            layout.add_ascii(tags::GDAL_NODATA, &format!("{}", nodata));
        }

        layout.finish();
    }

    /// Add georeferencing tags when the image carries them
    fn add_geo_tags(&self, image: &RasterImage, layout: &mut TagLayout) {
        match image.transform {
            Some(t) if t.is_north_up() => {
                layout.add_doubles(tags::MODEL_PIXEL_SCALE_TAG, &t.pixel_scale());
                layout.add_doubles(tags::MODEL_TIEPOINT_TAG, &t.tiepoint());
            },
            Some(_) => {
                warn!("Rotated transforms cannot be stored as pixel scale tags, \
                       writing without georeferencing");
            },
            None => {},
        }

        if let Some(code) = image.epsg {
            let geographic = (4000..5000).contains(&code);
            let model = if geographic {
                geo_keys::MODEL_TYPE_GEOGRAPHIC
            } else {
                geo_keys::MODEL_TYPE_PROJECTED
            };
            let cs_key = if geographic {
                geo_keys::GEOGRAPHIC_TYPE
            } else {
                geo_keys::PROJECTED_CS_TYPE
            };

            let directory: Vec<u64> = vec![
                1, 1, 0, 3,
                geo_keys::MODEL_TYPE as u64, 0, 1, model as u64,
                geo_keys::RASTER_TYPE as u64, 0, 1, geo_keys::RASTER_TYPE_PIXEL_IS_AREA as u64,
                cs_key as u64, 0, 1, code as u64,
            ];
            layout.add_values(tags::GEO_KEY_DIRECTORY_TAG, field_types::SHORT, &directory);
        }
    }
}

impl Default for RasterWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Collected tag entries plus the data blocks too large to inline
struct TagLayout {
    entries: Vec<IfdEntry>,
    external: BTreeMap<u16, Vec<u8>>,
}

impl TagLayout {
    fn new() -> Self {
        TagLayout {
            entries: Vec::new(),
            external: BTreeMap::new(),
        }
    }

    /// Add an entry of integral values, packed inline when they fit
    fn add_values(&mut self, tag: u16, field_type: u16, values: &[u64]) {
        let size = field_size(field_type);
        let mut bytes = Vec::with_capacity(size * values.len());
        for &value in values {
            bytes.extend_from_slice(&value.to_le_bytes()[..size]);
        }
        self.push_entry(tag, field_type, values.len() as u64, bytes);
    }

    fn add_doubles(&mut self, tag: u16, values: &[f64]) {
        let mut bytes = Vec::with_capacity(8 * values.len());
        for &value in values {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        self.push_entry(tag, field_types::DOUBLE, values.len() as u64, bytes);
    }

    fn add_ascii(&mut self, tag: u16, text: &str) {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.push_entry(tag, field_types::ASCII, bytes.len() as u64, bytes);
    }

    /// Values of 4 bytes or fewer go in the entry itself, larger
    /// blocks into the external map keyed by tag
    fn push_entry(&mut self, tag: u16, field_type: u16, count: u64, bytes: Vec<u8>) {
        if bytes.len() <= 4 {
            let mut inline = [0u8; 4];
            inline[..bytes.len()].copy_from_slice(&bytes);
            self.entries.push(IfdEntry::new(tag, field_type, count,
                                            u32::from_le_bytes(inline) as u64));
        } else {
            self.entries.push(IfdEntry::new(tag, field_type, count, 0));
            self.external.insert(tag, bytes);
        }
    }

    /// Sort entries by tag and drop duplicates, as the format requires
    fn finish(&mut self) {
        self.entries = write_utils::get_unique_sorted_entries(&self.entries);
    }

    /// Fill in the strip positions once the file layout is known
    ///
    /// The placeholder block written earlier has the same size as the
    /// real one, so offsets computed from it stay valid.
    fn patch_strip_offsets(&mut self, positions: &[u64]) -> PipelineResult<()> {
        if let Some(block) = self.external.get_mut(&tags::STRIP_OFFSETS) {
            let mut bytes = Vec::with_capacity(4 * positions.len());
            for &position in positions {
                bytes.extend_from_slice(&(position as u32).to_le_bytes());
            }
            *block = bytes;
            return Ok(());
        }

        let entry = self.entries.iter_mut()
            .find(|e| e.tag == tags::STRIP_OFFSETS)
            .ok_or_else(|| PipelineError::GenericError(
                "strip offsets entry missing from layout".to_string()))?;
        entry.value_offset = positions.first().copied().unwrap_or(0);
        Ok(())
    }
}

/// Write header, IFD, external data and strips in file order
fn write_file(writer: &mut (impl Write + Seek), mut layout: TagLayout,
              strips: &[Vec<u8>]) -> PipelineResult<()> {
    write_header(writer)?;

    let ifd_offset: u64 = 8;
    let ifd_size = 2 + 12 * layout.entries.len() as u64 + 4;

    // Lay out external blocks, then strip data, 4-byte aligned
    let mut cursor = write_utils::align_to_4_bytes(ifd_offset + ifd_size);
    let mut external_offsets: BTreeMap<u16, u64> = BTreeMap::new();
    for (tag, data) in &layout.external {
        external_offsets.insert(*tag, cursor);
        cursor = write_utils::align_to_4_bytes(cursor + data.len() as u64);
    }

    let mut strip_positions = Vec::with_capacity(strips.len());
    for strip in strips {
        strip_positions.push(cursor);
        cursor = write_utils::align_to_4_bytes(cursor + strip.len() as u64);
    }

    layout.patch_strip_offsets(&strip_positions)?;

    // Go back and fill in the first IFD offset now that it is known
    write_first_ifd_offset(writer, ifd_offset)?;

    writer.seek(SeekFrom::Start(ifd_offset))?;
    write_ifd(writer, &layout.entries, &external_offsets)?;

    for (tag, data) in &layout.external {
        writer.seek(SeekFrom::Start(external_offsets[tag]))?;
        writer.write_all(data)?;
        write_utils::write_padding(writer, data.len())?;
    }

    for (strip, position) in strips.iter().zip(&strip_positions) {
        writer.seek(SeekFrom::Start(*position))?;
        writer.write_all(strip)?;
        write_utils::write_padding(writer, strip.len())?;
    }

    Ok(())
}

/// Write the 8-byte classic TIFF header with a placeholder IFD offset
fn write_header(writer: &mut impl Write) -> PipelineResult<()> {
    writer.write_all(&header::LITTLE_ENDIAN_MARKER)?;
    writer.write_all(&header::TIFF_VERSION.to_le_bytes())?;
    writer.write_all(&[0u8; 4])?;
    Ok(())
}

fn write_first_ifd_offset(writer: &mut (impl Write + Seek), offset: u64) -> PipelineResult<()> {
    writer.seek(SeekFrom::Start(4))?;
    writer.write_all(&(offset as u32).to_le_bytes())?;
    Ok(())
}

fn write_ifd(writer: &mut impl Write, entries: &[IfdEntry],
             external_offsets: &BTreeMap<u16, u64>) -> PipelineResult<()> {
    writer.write_all(&(entries.len() as u16).to_le_bytes())?;

    for entry in entries {
        let value_offset = external_offsets.get(&entry.tag)
            .copied()
            .unwrap_or(entry.value_offset);

        writer.write_all(&entry.tag.to_le_bytes())?;
        writer.write_all(&entry.field_type.to_le_bytes())?;
        writer.write_all(&(entry.count as u32).to_le_bytes())?;
        writer.write_all(&(value_offset as u32).to_le_bytes())?;
    }

    // No further IFDs follow
    writer.write_all(&0u32.to_le_bytes())?;
    Ok(())
}

fn field_size(field_type: u16) -> usize {
    match field_type {
        field_types::BYTE | field_types::ASCII | field_types::SBYTE
        | field_types::UNDEFINED => 1,
        field_types::SHORT | field_types::SSHORT => 2,
        field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
        field_types::DOUBLE | field_types::LONG8 | field_types::SLONG8
        | field_types::IFD8 => 8,
        _ => 1,
    }
}

/// Serialize a band plane back to its on-disk sample type
fn encode_plane(plane: &[f32], dtype: SampleDtype) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(plane.len() * dtype.bytes());
    match dtype {
        SampleDtype::U8 => {
            for &value in plane {
                bytes.push(value.round().clamp(0.0, 255.0) as u8);
            }
        },
        SampleDtype::U16 => {
            for &value in plane {
                let v = value.round().clamp(0.0, 65535.0) as u16;
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        },
        SampleDtype::F32 => {
            for &value in plane {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        },
    }
    bytes
}
