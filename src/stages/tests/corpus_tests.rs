//! Tests for corpus discovery and naming helpers

extern crate std;

use std::fs;
use std::path::Path;

use crate::raster::errors::PipelineError;
use crate::stages::corpus::{acquisition_stamp, discover_rasters, item_stem};

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"stub").unwrap();
}

#[test]
fn test_item_stem_strips_extension() {
    let stem = item_stem(Path::new("/data/S1A_20160628T184704_flood.tif"));
    std::assert_eq!(stem, "S1A_20160628T184704_flood");
}

#[test]
fn test_acquisition_stamp_extraction() {
    let stamp = acquisition_stamp(Path::new("S1A_20160628T184704_flood.tif"));
    std::assert_eq!(stamp.as_deref(), Some("20160628T184704"));

    let none = acquisition_stamp(Path::new("mosaic_final.tif"));
    std::assert!(none.is_none());
}

#[test]
fn test_discover_orders_by_acquisition_stamp() {
    let dir = tempfile::tempdir().unwrap();
    // lexicographic order would put "a_" first; the stamp puts "z_" first
    touch(dir.path(), "z_20160610T052000_scene.tif");
    touch(dir.path(), "a_20160628T184704_scene.tif");
    touch(dir.path(), "m_20160615T120000_scene.tiff");

    let found = discover_rasters(dir.path()).unwrap();
    let stems: Vec<String> = found.iter().map(|p| item_stem(p)).collect();
    std::assert_eq!(
        stems,
        vec![
            "z_20160610T052000_scene",
            "m_20160615T120000_scene",
            "a_20160628T184704_scene",
        ]
    );
}

#[test]
fn test_discover_skips_non_raster_files() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "scene_20160628T184704.tif");
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "preview.png");
    fs::create_dir(dir.path().join("nested")).unwrap();

    let found = discover_rasters(dir.path()).unwrap();
    std::assert_eq!(found.len(), 1);
    std::assert_eq!(item_stem(&found[0]), "scene_20160628T184704");
}

#[test]
fn test_discover_accepts_uppercase_extensions() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "SCENE_20160628T184704.TIF");

    let found = discover_rasters(dir.path()).unwrap();
    std::assert_eq!(found.len(), 1);
}

#[test]
fn test_discover_missing_directory_fails() {
    let result = discover_rasters(Path::new("/definitely/not/a/real/corpus"));
    std::assert!(matches!(result, Err(PipelineError::Resource(_))));
}

#[test]
fn test_discover_unstamped_names_sort_first_by_name() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "b_base.tif");
    touch(dir.path(), "a_base.tif");
    touch(dir.path(), "c_20160628T184704.tif");

    let found = discover_rasters(dir.path()).unwrap();
    let stems: Vec<String> = found.iter().map(|p| item_stem(p)).collect();
    std::assert_eq!(stems, vec!["a_base", "b_base", "c_20160628T184704"]);
}
