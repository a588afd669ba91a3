//! Corpus discovery and time ordering
//!
//! Product file names carry an acquisition timestamp
//! (`AZPHD-000615_20160628T184704Z_00000.tif`). The corpus is ordered
//! by that stamp so the stack axis follows acquisition time even when
//! the directory listing does not.

use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

use crate::raster::errors::{PipelineError, PipelineResult};

lazy_static! {
    static ref ACQUISITION_STAMP: Regex =
        Regex::new(r"\d{8}T\d{6}").expect("valid timestamp regex");
}

/// Item identity used in manifests and derived file names
pub fn item_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Acquisition timestamp embedded in a file name, if any
pub fn acquisition_stamp(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy().into_owned();
    ACQUISITION_STAMP.find(&name).map(|m| m.as_str().to_string())
}

/// Every TIFF raster in a directory, ordered by acquisition time
///
/// Files without an embedded timestamp sort by name among themselves,
/// ahead of stamped files, so mixed corpora still order deterministically.
pub fn discover_rasters(dir: &Path) -> PipelineResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(PipelineError::Resource(format!(
            "input directory {} does not exist", dir.display())));
    }

    let mut rasters = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_raster_name(&path) {
            rasters.push(path);
        }
    }

    rasters.sort_by_cached_key(|path| {
        let name = path.file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        (acquisition_stamp(path).unwrap_or_default(), name)
    });

    info!("Discovered {} raster(s) in {}", rasters.len(), dir.display());
    for path in &rasters {
        debug!("  {}", path.display());
    }
    Ok(rasters)
}

fn is_raster_name(path: &Path) -> bool {
    match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy().to_lowercase();
            ext == "tif" || ext == "tiff"
        }
        None => false,
    }
}
