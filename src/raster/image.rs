//! In-memory raster representation
//!
//! Band planes are held as f32 regardless of the on-disk sample type,
//! which keeps stage arithmetic uniform. The source sample type is
//! remembered so writes can restore it.

use crate::coordinate::GeoTransform;
use crate::raster::errors::{PipelineError, PipelineResult};

/// On-disk sample type of a raster band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDtype {
    U8,
    U16,
    F32,
}

impl SampleDtype {
    /// Profile name matching common GIS tooling
    pub fn name(&self) -> &'static str {
        match self {
            SampleDtype::U8 => "uint8",
            SampleDtype::U16 => "uint16",
            SampleDtype::F32 => "float32",
        }
    }

    pub fn bits(&self) -> u16 {
        match self {
            SampleDtype::U8 => 8,
            SampleDtype::U16 => 16,
            SampleDtype::F32 => 32,
        }
    }

    pub fn bytes(&self) -> usize {
        (self.bits() / 8) as usize
    }

    /// TIFF sample format code for this type
    pub fn sample_format(&self) -> u16 {
        match self {
            SampleDtype::U8 | SampleDtype::U16 => crate::raster::constants::sample_format::UNSIGNED,
            SampleDtype::F32 => crate::raster::constants::sample_format::IEEEFP,
        }
    }
}

/// A georeferenced raster with one or more band planes
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub dtype: SampleDtype,
    pub transform: Option<GeoTransform>,
    pub epsg: Option<u16>,
    pub nodata: Option<f64>,
    bands: Vec<Vec<f32>>,
}

impl RasterImage {
    /// Create a zero-filled raster
    pub fn new(width: u32, height: u32, band_count: usize, dtype: SampleDtype) -> Self {
        let plane_len = width as usize * height as usize;
        RasterImage {
            width,
            height,
            dtype,
            transform: None,
            epsg: None,
            nodata: None,
            bands: vec![vec![0.0; plane_len]; band_count],
        }
    }

    /// Create a raster from existing band planes
    pub fn from_bands(width: u32, height: u32, dtype: SampleDtype,
                      bands: Vec<Vec<f32>>) -> PipelineResult<Self> {
        let plane_len = width as usize * height as usize;
        if bands.is_empty() {
            return Err(PipelineError::EmptyInput("raster needs at least one band".to_string()));
        }
        for (i, band) in bands.iter().enumerate() {
            if band.len() != plane_len {
                return Err(PipelineError::GenericError(format!(
                    "band {} has {} samples, expected {}", i + 1, band.len(), plane_len)));
            }
        }

        Ok(RasterImage {
            width,
            height,
            dtype,
            transform: None,
            epsg: None,
            nodata: None,
            bands,
        })
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Borrow a band plane (zero-based index)
    pub fn band(&self, index: usize) -> PipelineResult<&[f32]> {
        self.bands.get(index)
            .map(|b| b.as_slice())
            .ok_or_else(|| PipelineError::Resource(format!(
                "band {} out of range, raster has {}", index + 1, self.bands.len())))
    }

    pub fn band_mut(&mut self, index: usize) -> PipelineResult<&mut Vec<f32>> {
        let count = self.bands.len();
        self.bands.get_mut(index)
            .ok_or_else(|| PipelineError::Resource(format!(
                "band {} out of range, raster has {}", index + 1, count)))
    }

    pub fn bands(&self) -> &[Vec<f32>] {
        &self.bands
    }

    /// Sample value at (col, row); callers must stay in bounds
    pub fn sample(&self, band: usize, col: u32, row: u32) -> f32 {
        self.bands[band][row as usize * self.width as usize + col as usize]
    }

    pub fn set_sample(&mut self, band: usize, col: u32, row: u32, value: f32) {
        self.bands[band][row as usize * self.width as usize + col as usize] = value;
    }

    /// Bounds-checked sample access
    pub fn pixel(&self, band: usize, col: i64, row: i64) -> Option<f32> {
        if band >= self.bands.len() || col < 0 || row < 0
            || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some(self.bands[band][row as usize * self.width as usize + col as usize])
    }

    /// Minimum and maximum sample values of one band
    pub fn band_range(&self, band: usize) -> PipelineResult<(f32, f32)> {
        let plane = self.band(band)?;
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in plane {
            if v < min { min = v; }
            if v > max { max = v; }
        }
        Ok((min, max))
    }

    /// Extract a pixel window across all bands
    ///
    /// The window must lie inside the raster. The result carries a
    /// transform shifted to the window corner.
    pub fn window(&self, col_off: u32, row_off: u32, width: u32, height: u32) -> PipelineResult<RasterImage> {
        if width == 0 || height == 0 {
            return Err(PipelineError::EmptyInput("window has no pixels".to_string()));
        }
        if col_off + width > self.width || row_off + height > self.height {
            return Err(PipelineError::Resource(format!(
                "window {}x{}+{}+{} exceeds raster {}x{}",
                width, height, col_off, row_off, self.width, self.height)));
        }

        let mut bands = Vec::with_capacity(self.bands.len());
        for plane in &self.bands {
            let mut out = Vec::with_capacity(width as usize * height as usize);
            for row in row_off..row_off + height {
                let start = row as usize * self.width as usize + col_off as usize;
                out.extend_from_slice(&plane[start..start + width as usize]);
            }
            bands.push(out);
        }

        let mut result = RasterImage::from_bands(width, height, self.dtype, bands)?;
        result.transform = self.transform.map(|t| t.shift_for_window(col_off, row_off));
        result.epsg = self.epsg;
        result.nodata = self.nodata;
        Ok(result)
    }

    /// Replace all band planes with a single band
    pub fn into_single_band(mut self, index: usize) -> PipelineResult<RasterImage> {
        if index >= self.bands.len() {
            return Err(PipelineError::Resource(format!(
                "band {} out of range, raster has {}", index + 1, self.bands.len())));
        }
        let plane = self.bands.swap_remove(index);
        self.bands = vec![plane];
        Ok(self)
    }
}
