//! Per-stage manifests of completed items
//!
//! Each stage appends the stem of every item it finished to a manifest
//! file next to its output directory. A resumed run consults the
//! manifest instead of probing for output files, so partially written
//! outputs from an interrupted run are never mistaken for finished work.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::raster::errors::PipelineResult;

/// Append-only list of completed item stems for one stage
pub struct StageManifest {
    path: PathBuf,
    completed: HashSet<String>,
}

impl StageManifest {
    /// Manifest file for a stage, kept next to the stage directory
    pub fn for_stage(destination: &Path, stage: &str) -> PipelineResult<Self> {
        Self::load(destination.join(format!("{}.manifest", stage)))
    }

    /// Read an existing manifest, or start empty when none exists
    pub fn load(path: PathBuf) -> PipelineResult<Self> {
        let mut completed = HashSet::new();
        if path.is_file() {
            for line in fs::read_to_string(&path)?.lines() {
                let stem = line.trim();
                if !stem.is_empty() {
                    completed.insert(stem.to_string());
                }
            }
            debug!("Manifest {} lists {} completed item(s)",
                   path.display(), completed.len());
        }
        Ok(StageManifest { path, completed })
    }

    pub fn contains(&self, stem: &str) -> bool {
        self.completed.contains(stem)
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    /// Record one completed item, appending it to the file immediately
    pub fn record(&mut self, stem: &str) -> PipelineResult<()> {
        if !self.completed.insert(stem.to_string()) {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", stem)?;
        Ok(())
    }
}
