//! Durable record of the common grid between runs
//!
//! The grid is computed from a full pass over the corpus, which is the
//! most expensive part of a cold start. Once written, a resumed run
//! reads the grid back instead of re-scanning every source.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::coordinate::CommonGrid;
use crate::raster::errors::{PipelineError, PipelineResult};

pub const CHECKPOINT_NAME: &str = "common_grid.txt";

/// Plain-text grid record under the destination root
///
/// One `key: value` per line with keys left, top, right, bottom,
/// width and height. Written once per corpus, read at startup.
pub struct PipelineCheckpoint {
    path: PathBuf,
}

impl PipelineCheckpoint {
    pub fn new(destination: &Path) -> Self {
        PipelineCheckpoint {
            path: destination.join(CHECKPOINT_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored grid, or None when no checkpoint exists yet
    pub fn load(&self) -> PipelineResult<Option<CommonGrid>> {
        if !self.path.is_file() {
            debug!("No grid checkpoint at {}", self.path.display());
            return Ok(None);
        }

        let text = fs::read_to_string(&self.path)?;
        let mut left = None;
        let mut top = None;
        let mut right = None;
        let mut bottom = None;
        let mut width = None;
        let mut height = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = line.split_once(':').ok_or_else(|| {
                PipelineError::Resource(format!(
                    "malformed checkpoint line '{}' in {}", line, self.path.display()))
            })?;
            let value = value.trim();
            match key.trim() {
                "left" => left = Some(parse_float(value, &self.path)?),
                "top" => top = Some(parse_float(value, &self.path)?),
                "right" => right = Some(parse_float(value, &self.path)?),
                "bottom" => bottom = Some(parse_float(value, &self.path)?),
                "width" => width = Some(parse_int(value, &self.path)?),
                "height" => height = Some(parse_int(value, &self.path)?),
                other => {
                    return Err(PipelineError::Resource(format!(
                        "unknown checkpoint key '{}' in {}", other, self.path.display())));
                }
            }
        }

        let grid = CommonGrid::from_parts(
            require(left, "left", &self.path)?,
            require(bottom, "bottom", &self.path)?,
            require(right, "right", &self.path)?,
            require(top, "top", &self.path)?,
            require(width, "width", &self.path)?,
            require(height, "height", &self.path)?,
        )?;
        info!("Loaded grid checkpoint: {}x{} over {}",
              grid.width, grid.height, grid.extent);
        Ok(Some(grid))
    }

    /// Write the grid record, replacing any previous one
    pub fn save(&self, grid: &CommonGrid) -> PipelineResult<()> {
        let text = format!(
            "left: {}\ntop: {}\nright: {}\nbottom: {}\nwidth: {}\nheight: {}\n",
            grid.extent.left, grid.extent.top, grid.extent.right,
            grid.extent.bottom, grid.width, grid.height,
        );
        fs::write(&self.path, text)?;
        info!("Saved grid checkpoint to {}", self.path.display());
        Ok(())
    }
}

fn parse_float(value: &str, path: &Path) -> PipelineResult<f64> {
    value.parse().map_err(|_| PipelineError::Resource(format!(
        "checkpoint value '{}' in {} is not a number", value, path.display())))
}

fn parse_int(value: &str, path: &Path) -> PipelineResult<u32> {
    value.parse().map_err(|_| PipelineError::Resource(format!(
        "checkpoint value '{}' in {} is not an integer", value, path.display())))
}

fn require<T>(value: Option<T>, key: &str, path: &Path) -> PipelineResult<T> {
    value.ok_or_else(|| PipelineError::Resource(format!(
        "checkpoint {} is missing key '{}'", path.display(), key)))
}
