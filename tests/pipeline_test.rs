//! End-to-end pipeline tests over a small synthetic corpus
//!
//! Three 100x100 scenes with known georeferencing run through crop,
//! classify, label and vectorize. The middle scene carries a 40x40
//! bright square, the outer two a 12x12 square inside its footprint,
//! so the volume labels as one component and only the middle slice's
//! outline survives contour filtering.

extern crate std;

use std::path::Path;

use floodtrace::coordinate::{GeoExtent, GeoTransform};
use floodtrace::pipeline::{PipelineCheckpoint, PipelineOrchestrator, RunOptions};
use floodtrace::raster::image::{RasterImage, SampleDtype};
use floodtrace::raster::writer::RasterWriter;
use floodtrace::stages::classify::ClassifyConfig;
use floodtrace::stages::crop::{CropConfig, CropMargins};
use floodtrace::stages::label::{VolumeIndex, VOLUME_INDEX_NAME};
use floodtrace::stages::vectorize::{FeatureCollection, VectorizeConfig};

/// A dim 100x100 scene with one bright square at the given pixel
fn scene(origin_x: f64, origin_y: f64, square: (u32, u32, u32)) -> RasterImage {
    let (left, top, size) = square;
    let mut plane = vec![10.0f32; 100 * 100];
    for row in top..top + size {
        for col in left..left + size {
            plane[(row * 100 + col) as usize] = 200.0;
        }
    }
    let mut image = RasterImage::from_bands(100, 100, SampleDtype::U8, vec![plane]).unwrap();
    image.transform = Some(GeoTransform::north_up(origin_x, origin_y, 1.0, -1.0));
    image.epsg = Some(32614);
    image
}

/// Three scenes whose union extent spans x 990..1100, y 1900..2010
fn write_corpus(dir: &Path) {
    std::fs::create_dir_all(dir).unwrap();
    let writer = RasterWriter::new();
    let scenes = [
        ("flood_20160601T000000.tif", scene(990.0, 2010.0, (44, 44, 12))),
        ("flood_20160602T000000.tif", scene(1000.0, 2000.0, (30, 30, 40))),
        ("flood_20160603T000000.tif", scene(1000.0, 2000.0, (34, 34, 12))),
    ];
    for (name, image) in &scenes {
        writer.write(image, &dir.join(name).to_string_lossy()).unwrap();
    }
}

fn pipeline_options(source: &Path, destination: &Path) -> RunOptions {
    let mut options = RunOptions::new(source, destination);
    options.crop = CropConfig {
        detection_band: 1,
        threshold: 127,
        margins: CropMargins { left: 0, top: 0, extra_width: 0, extra_height: 0 },
    };
    options.classify = ClassifyConfig {
        band: 1,
        clusters: 2,
        max_iterations: 10,
        epsilon: 0.0001,
        restarts: 5,
        blur_sigma: 0.0,
    };
    options.vectorize = VectorizeConfig { min_contour_len: 100, stride: 15 };
    options
}

fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir).unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_full_pipeline_traces_flood_outline() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("scenes");
    let destination = root.path().join("out");
    write_corpus(&source);

    let orchestrator = PipelineOrchestrator::new(pipeline_options(&source, &destination));
    let summaries = orchestrator.run().unwrap();

    std::assert_eq!(summaries.len(), 4);
    for summary in &summaries {
        std::assert_eq!(summary.attempted, 3, "{} attempted", summary.stage);
        std::assert_eq!(summary.succeeded, 3, "{} succeeded", summary.stage);
        std::assert_eq!(summary.skipped, 0, "{} skipped", summary.stage);
    }

    // the checkpointed grid covers the union of all three scenes
    let grid = PipelineCheckpoint::new(&destination).load().unwrap().unwrap();
    std::assert_eq!(grid.width, 110);
    std::assert_eq!(grid.height, 110);
    std::assert_eq!(grid.extent, GeoExtent::new(990.0, 1900.0, 1100.0, 2010.0));

    // intermediates are retained by default
    std::assert_eq!(list_files(&destination.join("cropped")).len(), 3);
    std::assert_eq!(list_files(&destination.join("classified")).len(), 3);

    // the overlapping squares label as one component through time
    let index = VolumeIndex::load(&destination.join("labeled").join(VOLUME_INDEX_NAME)).unwrap();
    std::assert_eq!(index.component_count, 1);
    std::assert_eq!(index.slices.len(), 3);

    // only the middle slice's boundary is long enough to keep
    let vectors = list_files(&destination.join("vectors"));
    std::assert_eq!(vectors, vec!["flood_20160602T000000.geojson".to_string()]);

    let collection = FeatureCollection::load(
        &destination.join("vectors").join("flood_20160602T000000.geojson")).unwrap();
    std::assert_eq!(collection.features.len(), 1);
    let geometry = &collection.features[0].geometry;
    std::assert_eq!(geometry.kind, "MultiPolygon");
    std::assert_eq!(geometry.coordinates.len(), 1);
    std::assert_eq!(geometry.coordinates[0].len(), 1);

    let ring = &geometry.coordinates[0][0];
    std::assert_eq!(ring.len(), 11);
    std::assert_eq!(ring.first(), ring.last());

    // the 40x40 square sits at x 1030..1070, y 1930..1970; traced pixel
    // centers pull each edge in by half a pixel
    let min_x = ring.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
    let max_x = ring.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
    let min_y = ring.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
    let max_y = ring.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);
    std::assert!((min_x - 1030.5).abs() < 1e-6, "min x was {}", min_x);
    std::assert!((max_x - 1069.5).abs() < 1e-6, "max x was {}", max_x);
    std::assert!((min_y - 1930.5).abs() < 1e-6, "min y was {}", min_y);
    std::assert!((max_y - 1969.5).abs() < 1e-6, "max y was {}", max_y);
}

#[test]
fn test_second_run_skips_all_completed_work() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("scenes");
    let destination = root.path().join("out");
    write_corpus(&source);

    let options = pipeline_options(&source, &destination);
    PipelineOrchestrator::new(options.clone()).run().unwrap();

    let vector_path = destination.join("vectors").join("flood_20160602T000000.geojson");
    let before = std::fs::read(&vector_path).unwrap();

    let summaries = PipelineOrchestrator::new(options).run().unwrap();
    for summary in &summaries {
        std::assert_eq!(summary.attempted, 3, "{} attempted", summary.stage);
        std::assert_eq!(summary.skipped, 3, "{} skipped", summary.stage);
        std::assert_eq!(summary.succeeded, 0, "{} succeeded", summary.stage);
    }

    let after = std::fs::read(&vector_path).unwrap();
    std::assert_eq!(before, after);
}

#[test]
fn test_discarding_intermediates_keeps_only_vectors() {
    let root = tempfile::tempdir().unwrap();
    let source = root.path().join("scenes");
    let destination = root.path().join("out");
    write_corpus(&source);

    let mut options = pipeline_options(&source, &destination);
    options.keep_intermediates = false;
    PipelineOrchestrator::new(options).run().unwrap();

    std::assert!(!destination.join("cropped").exists());
    std::assert!(!destination.join("classified").exists());
    std::assert!(!destination.join("labeled").exists());
    std::assert!(destination.join("common_grid.txt").is_file());
    std::assert_eq!(list_files(&destination.join("vectors")).len(), 1);
}
