//! Boundary tracing and polygon output for labeled slices
//!
//! Each labeled slice is binarized and its region boundaries traced
//! at full resolution. Short boundaries are noise and get dropped,
//! the rest are decimated to every nth point, mapped to world
//! coordinates through the slice transform and written as one
//! MultiPolygon feature carrying the slice profile as attributes.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::raster::errors::{PipelineError, PipelineResult};
use crate::raster::image::RasterImage;
use crate::raster::metadata::RasterMetadata;

/// Filtering and decimation parameters
#[derive(Debug, Clone, Copy)]
pub struct VectorizeConfig {
    /// Boundaries with fewer traced points than this are dropped
    pub min_contour_len: usize,
    /// Every nth traced point survives decimation
    pub stride: usize,
}

impl Default for VectorizeConfig {
    fn default() -> Self {
        VectorizeConfig {
            min_contour_len: 400,
            stride: 15,
        }
    }
}

/// GeoJSON feature collection holding one slice's polygons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: RasterMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<Vec<[f64; 2]>>>,
}

impl FeatureCollection {
    pub fn single(feature: Feature) -> Self {
        FeatureCollection {
            kind: "FeatureCollection".to_string(),
            features: vec![feature],
        }
    }

    pub fn save(&self, path: &Path) -> PipelineResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load(path: &Path) -> PipelineResult<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Traces region boundaries and turns them into polygon features
pub struct ContourVectorizer {
    config: VectorizeConfig,
}

impl ContourVectorizer {
    pub fn new(config: VectorizeConfig) -> PipelineResult<Self> {
        if config.stride == 0 {
            return Err(PipelineError::Config("decimation stride must be positive".to_string()));
        }
        Ok(ContourVectorizer { config })
    }

    /// Trace, filter and decimate the rings of one labeled slice
    ///
    /// Returns None when no ring survives filtering; such slices write
    /// no feature file.
    pub fn vectorize_slice(&self, item: &str, image: &RasterImage,
                           metadata: &RasterMetadata) -> PipelineResult<Option<Feature>> {
        let plane = image.band(0)?;
        let binary: Vec<u8> = plane.iter().map(|&v| u8::from(v != 0.0)).collect();

        let transform = metadata.transform();
        let rings = trace_rings(&binary, image.width as usize, image.height as usize);
        let total = rings.len();

        let mut polygons = Vec::new();
        for ring in rings {
            if ring.len() < self.config.min_contour_len {
                debug!("Ring of {} point(s) below minimum {}, dropped",
                       ring.len(), self.config.min_contour_len);
                continue;
            }
            let points = decimate(&ring, self.config.stride);
            if points.len() < 3 {
                debug!("Ring of {} point(s) decimated below 3, dropped", ring.len());
                continue;
            }

            let mut positions: Vec<[f64; 2]> = points.iter()
                .map(|&(col, row)| {
                    let (x, y) = transform.apply(col as f64 + 0.5, row as f64 + 0.5);
                    [x, y]
                })
                .collect();
            positions.push(positions[0]); // close the ring
            polygons.push(vec![positions]);
        }

        if polygons.is_empty() {
            info!("No ring of {} survived filtering for {}, no feature written", total, item);
            return Ok(None);
        }

        debug!("{}: kept {} of {} ring(s)", item, polygons.len(), total);
        Ok(Some(Feature {
            kind: "Feature".to_string(),
            geometry: Geometry {
                kind: "MultiPolygon".to_string(),
                coordinates: polygons,
            },
            properties: metadata.clone(),
        }))
    }
}

/// Every nth point of a ring, starting with the nth
fn decimate(ring: &[(i64, i64)], stride: usize) -> Vec<(i64, i64)> {
    ring.iter().skip(stride - 1).step_by(stride).copied().collect()
}

/// Boundaries of every connected foreground region
///
/// Moore neighbor tracing, clockwise, with Jacob's stopping
/// criterion. Scan-line starts mark visited boundary pixels so each
/// ring is traced once; hole boundaries inside a region emerge as
/// their own rings.
fn trace_rings(plane: &[u8], width: usize, height: usize) -> Vec<Vec<(i64, i64)>> {
    let mut visited = vec![false; plane.len()];
    let mut rings = Vec::new();

    for row in 0..height as i64 {
        for col in 0..width as i64 {
            let index = row as usize * width + col as usize;
            if plane[index] == 0 || visited[index] {
                continue;
            }
            if col > 0 && plane[index - 1] != 0 {
                continue;
            }

            let ring = trace_boundary(plane, width, height, (col, row));
            for &(c, r) in &ring {
                visited[r as usize * width + c as usize] = true;
            }
            rings.push(ring);
        }
    }
    rings
}

// clockwise 8-neighborhood starting west
const NEIGHBORS: [(i64, i64); 8] = [
    (-1, 0), (-1, -1), (0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1),
];

fn trace_boundary(plane: &[u8], width: usize, height: usize,
                  start: (i64, i64)) -> Vec<(i64, i64)> {
    let at = |col: i64, row: i64| -> u8 {
        if col < 0 || row < 0 || col >= width as i64 || row >= height as i64 {
            0
        } else {
            plane[row as usize * width + col as usize]
        }
    };

    // a boundary pixel re-enters the ring at most once per direction
    let limit = 4 * width * height + 8;
    let mut ring = vec![start];
    let mut current = start;
    let mut backtrack = 0usize; // search starts at the west neighbor
    let mut first_move: Option<usize> = None;

    loop {
        let mut advance = None;
        for step in 1..=8 {
            let dir = (backtrack + step) % 8;
            let (dc, dr) = NEIGHBORS[dir];
            let next = (current.0 + dc, current.1 + dr);
            if at(next.0, next.1) != 0 {
                advance = Some((dir, next));
                break;
            }
        }

        let (dir, next) = match advance {
            Some(found) => found,
            None => break, // isolated pixel
        };

        // stop when the opening move is about to repeat
        if current == start && first_move == Some(dir) {
            break;
        }
        if first_move.is_none() {
            first_move = Some(dir);
        }

        ring.push(next);
        current = next;
        backtrack = rewind(dir);

        if ring.len() >= limit {
            warn!("Boundary trace from ({}, {}) exceeded {} points, truncating",
                  start.0, start.1, limit);
            break;
        }
    }

    ring
}

/// Direction back toward the last background neighbor, seen from the
/// pixel just entered via `dir`
fn rewind(dir: usize) -> usize {
    if dir % 2 == 0 {
        (dir + 6) % 8
    } else {
        (dir + 5) % 8
    }
}
