//! 3D connected-component labeling over a mask sequence
//!
//! Classified masks are stacked along a pseudo-time axis and labeled
//! as one volume, so a feature keeps a single id for as long as its
//! footprint stays connected from frame to frame.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::raster::constants::compression;
use crate::raster::errors::{PipelineError, PipelineResult};
use crate::raster::image::{RasterImage, SampleDtype};
use crate::raster::metadata::RasterMetadata;
use crate::raster::writer::RasterWriter;

/// File name of the JSON index written next to the labeled slices
pub const VOLUME_INDEX_NAME: &str = "volume_index.json";

/// Neighbor-adjacency rule for the 3D labeling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Face adjacency only
    Six,
    /// Faces and edges
    Eighteen,
    /// Faces, edges and corners
    TwentySix,
}

impl Connectivity {
    pub fn from_code(code: u8) -> PipelineResult<Self> {
        match code {
            6 => Ok(Connectivity::Six),
            18 => Ok(Connectivity::Eighteen),
            26 => Ok(Connectivity::TwentySix),
            other => Err(PipelineError::Config(format!(
                "connectivity must be 6, 18 or 26, got {}", other))),
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Connectivity::Six => 6,
            Connectivity::Eighteen => 18,
            Connectivity::TwentySix => 26,
        }
    }

    /// Neighbor offsets that precede a voxel in (t, row, col) scan order
    fn scan_offsets(&self) -> &'static [(i32, i32, i32)] {
        match self {
            Connectivity::Six => &EARLIER_6,
            Connectivity::Eighteen => &EARLIER_18,
            Connectivity::TwentySix => &EARLIER_26,
        }
    }
}

const EARLIER_6: [(i32, i32, i32); 3] = [(-1, 0, 0), (0, -1, 0), (0, 0, -1)];

const EARLIER_18: [(i32, i32, i32); 9] = [
    (-1, -1, 0), (-1, 0, -1), (-1, 0, 0), (-1, 0, 1), (-1, 1, 0),
    (0, -1, -1), (0, -1, 0), (0, -1, 1), (0, 0, -1),
];

const EARLIER_26: [(i32, i32, i32); 13] = [
    (-1, -1, -1), (-1, -1, 0), (-1, -1, 1),
    (-1, 0, -1), (-1, 0, 0), (-1, 0, 1),
    (-1, 1, -1), (-1, 1, 0), (-1, 1, 1),
    (0, -1, -1), (0, -1, 0), (0, -1, 1), (0, 0, -1),
];

/// Labeling parameters
#[derive(Debug, Clone, Copy)]
pub struct LabelConfig {
    pub connectivity: Connectivity,
    /// Component ids above this are zeroed
    pub component_cap: u32,
    /// At most this many slices enter one volume
    pub max_slices: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            connectivity: Connectivity::Six,
            component_cap: 100,
            max_slices: 200,
        }
    }
}

/// Ordered mask slices assembled into one 3D volume
#[derive(Debug, Default)]
pub struct VolumeStack {
    width: u32,
    height: u32,
    slices: Vec<Vec<u8>>,
    sources: Vec<String>,
    metadata: Vec<RasterMetadata>,
}

impl VolumeStack {
    pub fn new() -> Self {
        VolumeStack::default()
    }

    /// Normalize a mask to {0, 1} and append it as the next slice
    pub fn push(&mut self, item: &str, mask: &RasterImage,
                metadata: RasterMetadata) -> PipelineResult<()> {
        if self.slices.is_empty() {
            self.width = mask.width;
            self.height = mask.height;
        } else if (mask.width, mask.height) != (self.width, self.height) {
            return Err(PipelineError::ShapeMismatch {
                item: item.to_string(),
                expected: (self.width, self.height),
                actual: (mask.width, mask.height),
            });
        }

        let plane = mask.band(0)?;
        self.slices.push(plane.iter().map(|&v| u8::from(v != 0.0)).collect());
        self.sources.push(item.to_string());
        self.metadata.push(metadata);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Labels the stacked masks and caps the retained component ids
pub struct VolumetricLabeler {
    config: LabelConfig,
}

impl VolumetricLabeler {
    pub fn new(config: LabelConfig) -> PipelineResult<Self> {
        if config.component_cap == 0 {
            return Err(PipelineError::Config("component cap must be positive".to_string()));
        }
        Ok(VolumetricLabeler { config })
    }

    /// Label connected foreground regions across the whole volume
    ///
    /// Components are numbered from 1 in scan order; ids above the cap
    /// are zeroed, which keeps the earliest-encountered components,
    /// not the largest.
    pub fn label(&self, stack: VolumeStack) -> PipelineResult<LabeledVolume> {
        if stack.is_empty() {
            return Err(PipelineError::EmptyInput("volume stack holds no slices".to_string()));
        }

        let (width, height) = stack.dimensions();
        let depth = stack.len();
        let plane_len = width as usize * height as usize;
        let offsets = self.config.connectivity.scan_offsets();

        let mut labels: Vec<Vec<u32>> = vec![vec![0; plane_len]; depth];
        let mut parents: Vec<u32> = vec![0];

        for t in 0..depth {
            for row in 0..height as i64 {
                for col in 0..width as i64 {
                    let index = row as usize * width as usize + col as usize;
                    if stack.slices[t][index] == 0 {
                        continue;
                    }

                    let mut assigned = 0u32;
                    for &(dt, dr, dc) in offsets {
                        let nt = t as i64 + dt as i64;
                        let nr = row + dr as i64;
                        let nc = col + dc as i64;
                        if nt < 0 || nr < 0 || nc < 0
                            || nr >= height as i64 || nc >= width as i64 {
                            continue;
                        }
                        let neighbor =
                            labels[nt as usize][nr as usize * width as usize + nc as usize];
                        if neighbor == 0 {
                            continue;
                        }
                        if assigned == 0 {
                            assigned = neighbor;
                        } else if neighbor != assigned {
                            union(&mut parents, assigned, neighbor);
                        }
                    }

                    if assigned == 0 {
                        assigned = parents.len() as u32;
                        parents.push(assigned);
                    }
                    labels[t][index] = assigned;
                }
            }
        }

        // second pass: compact ids in first-touch order, apply the cap
        let cap = self.config.component_cap;
        let mut remap = vec![0u32; parents.len()];
        let mut component_count = 0u32;
        for slice in labels.iter_mut() {
            for value in slice.iter_mut() {
                if *value == 0 {
                    continue;
                }
                let root = find(&mut parents, *value);
                if remap[root as usize] == 0 {
                    component_count += 1;
                    remap[root as usize] = component_count;
                }
                let id = remap[root as usize];
                *value = if id > cap { 0 } else { id };
            }
        }

        info!("Labeled {} component(s) across {} slice(s), keeping ids 1..={}",
              component_count, depth, cap);

        Ok(LabeledVolume {
            width,
            height,
            slices: labels,
            sources: stack.sources,
            metadata: stack.metadata,
            connectivity: self.config.connectivity,
            component_cap: cap,
            component_count,
        })
    }
}

fn find(parents: &mut [u32], mut node: u32) -> u32 {
    while parents[node as usize] != node {
        parents[node as usize] = parents[parents[node as usize] as usize];
        node = parents[node as usize];
    }
    node
}

fn union(parents: &mut [u32], a: u32, b: u32) {
    let root_a = find(parents, a);
    let root_b = find(parents, b);
    if root_a == root_b {
        return;
    }
    let (low, high) = if root_a < root_b {
        (root_a, root_b)
    } else {
        (root_b, root_a)
    };
    parents[high as usize] = low;
}

/// Component ids per voxel plus the per-slice provenance
#[derive(Debug)]
pub struct LabeledVolume {
    pub width: u32,
    pub height: u32,
    slices: Vec<Vec<u32>>,
    sources: Vec<String>,
    metadata: Vec<RasterMetadata>,
    connectivity: Connectivity,
    component_cap: u32,
    pub component_count: u32,
}

impl LabeledVolume {
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn slice(&self, index: usize) -> &[u32] {
        &self.slices[index]
    }

    pub fn source(&self, index: usize) -> &str {
        &self.sources[index]
    }

    /// Write one 16-bit slice per source plus the JSON index
    pub fn write(&self, dir: &Path) -> PipelineResult<VolumeIndex> {
        std::fs::create_dir_all(dir)?;
        let writer = RasterWriter::with_compression(compression::DEFLATE as u64);
        let mut records = Vec::with_capacity(self.slices.len());

        for (index, slice) in self.slices.iter().enumerate() {
            let file_name = format!("{}.tif", self.sources[index]);
            let meta = &self.metadata[index];

            let plane: Vec<f32> = slice.iter().map(|&v| v as f32).collect();
            let mut image = RasterImage::from_bands(self.width, self.height,
                                                    SampleDtype::U16, vec![plane])?;
            image.transform = Some(meta.transform());
            image.epsg = meta.epsg();
            image.nodata = Some(0.0);

            let path = dir.join(&file_name);
            writer.write(&image, &path.to_string_lossy())?;
            debug!("Wrote labeled slice {}", path.display());

            records.push(SliceRecord {
                file: file_name,
                source: self.sources[index].clone(),
                metadata: meta.clone(),
            });
        }

        let index = VolumeIndex {
            connectivity: self.connectivity.code(),
            component_cap: self.component_cap,
            component_count: self.component_count,
            slices: records,
        };
        index.save(&dir.join(VOLUME_INDEX_NAME))?;
        Ok(index)
    }
}

/// One labeled slice on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceRecord {
    pub file: String,
    pub source: String,
    pub metadata: RasterMetadata,
}

/// Sidecar descriptor tying labeled slices back to their sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeIndex {
    pub connectivity: u8,
    pub component_cap: u32,
    pub component_count: u32,
    pub slices: Vec<SliceRecord>,
}

impl VolumeIndex {
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
