//! Linear stage machine driving a whole corpus through the pipeline
//!
//! Crop/Warp, Classify, Label and Vectorize run in order under one
//! destination root. The common grid is checkpointed after the first
//! extent scan and every stage keeps a manifest of finished items, so
//! an interrupted run resumes where it stopped instead of redoing work.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::coordinate::{CommonGrid, ExtentAccumulator, GeoTransform};
use crate::raster::constants::compression;
use crate::raster::errors::{PipelineError, PipelineResult};
use crate::raster::image::RasterImage;
use crate::raster::metadata::RasterMetadata;
use crate::raster::reader::RasterReader;
use crate::raster::writer::RasterWriter;
use crate::stages::classify::{ClassifyConfig, FrameAccumulator, PixelClassifier};
use crate::stages::corpus::{discover_rasters, item_stem};
use crate::stages::crop::{CropConfig, RegionCropper};
use crate::stages::label::{LabelConfig, SliceRecord, VolumeIndex, VolumeStack,
                           VolumetricLabeler, VOLUME_INDEX_NAME};
use crate::stages::vectorize::{ContourVectorizer, FeatureCollection, VectorizeConfig};
use crate::stages::warp::GridWarper;
use crate::utils::progress::ProgressTracker;
use super::checkpoint::PipelineCheckpoint;
use super::manifest::StageManifest;

pub const CROPPED_DIR: &str = "cropped";
pub const CLASSIFIED_DIR: &str = "classified";
pub const LABELED_DIR: &str = "labeled";
pub const VECTORS_DIR: &str = "vectors";

/// Everything a run needs: directories, stage parameters and switches
///
/// Intermediates are kept by default; discarding them reclaims disk at
/// the cost of losing the ability to rerun a single later stage.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub crop: CropConfig,
    pub classify: ClassifyConfig,
    pub label: LabelConfig,
    pub vectorize: VectorizeConfig,
    pub accumulate: bool,
    pub keep_intermediates: bool,
}

impl RunOptions {
    pub fn new(source: &Path, destination: &Path) -> Self {
        RunOptions {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            crop: CropConfig::default(),
            classify: ClassifyConfig::default(),
            label: LabelConfig::default(),
            vectorize: VectorizeConfig::default(),
            accumulate: false,
            keep_intermediates: true,
        }
    }
}

/// Per-stage outcome counts reported after a run
#[derive(Debug, Clone, Copy)]
pub struct StageSummary {
    pub stage: &'static str,
    pub attempted: usize,
    pub succeeded: usize,
    pub skipped: usize,
}

impl StageSummary {
    fn new(stage: &'static str) -> Self {
        StageSummary { stage, attempted: 0, succeeded: 0, skipped: 0 }
    }
}

/// Drives the four stages over one corpus
pub struct PipelineOrchestrator {
    options: RunOptions,
}

impl PipelineOrchestrator {
    pub fn new(options: RunOptions) -> Self {
        PipelineOrchestrator { options }
    }

    /// Run the full pipeline, returning one summary per stage
    pub fn run(&self) -> PipelineResult<Vec<StageSummary>> {
        fs::create_dir_all(&self.options.destination)?;
        let sources = discover_rasters(&self.options.source)?;
        if sources.is_empty() {
            return Err(PipelineError::EmptyInput(format!(
                "no rasters found under {}", self.options.source.display())));
        }
        info!("Running pipeline over {} raster(s) into {}",
              sources.len(), self.options.destination.display());

        let grid = self.resolve_grid(&sources)?;
        let crop = self.crop_series(&sources, &grid)?;

        let classify = self.classify_series(&discover_rasters(&self.stage_dir(CROPPED_DIR))?)?;
        if !self.options.keep_intermediates {
            self.discard_stage_dir(CROPPED_DIR)?;
        }

        let label = self.label_series(&discover_rasters(&self.stage_dir(CLASSIFIED_DIR))?)?;
        if !self.options.keep_intermediates {
            self.discard_stage_dir(CLASSIFIED_DIR)?;
        }

        let labeled_dir = self.stage_dir(LABELED_DIR);
        let vectorize = self.vectorize_series(&labeled_dir)?;
        if !self.options.keep_intermediates {
            self.discard_stage_dir(LABELED_DIR)?;
        }

        Ok(vec![crop, classify, label, vectorize])
    }

    /// Crop and warp the configured source corpus
    pub fn crop(&self) -> PipelineResult<StageSummary> {
        fs::create_dir_all(&self.options.destination)?;
        let sources = discover_rasters(&self.options.source)?;
        if sources.is_empty() {
            return Err(PipelineError::EmptyInput(format!(
                "no rasters found under {}", self.options.source.display())));
        }
        let grid = self.resolve_grid(&sources)?;
        self.crop_series(&sources, &grid)
    }

    /// Classify rasters from the configured source directory
    pub fn classify(&self) -> PipelineResult<StageSummary> {
        fs::create_dir_all(&self.options.destination)?;
        self.classify_series(&discover_rasters(&self.options.source)?)
    }

    /// Label masks from the configured source directory
    pub fn label(&self) -> PipelineResult<StageSummary> {
        fs::create_dir_all(&self.options.destination)?;
        self.label_series(&discover_rasters(&self.options.source)?)
    }

    /// Vectorize a labeled volume from the configured source directory
    pub fn vectorize(&self) -> PipelineResult<StageSummary> {
        fs::create_dir_all(&self.options.destination)?;
        self.vectorize_series(&self.options.source)
    }

    fn stage_dir(&self, name: &str) -> PathBuf {
        self.options.destination.join(name)
    }

    /// Load the checkpointed grid or compute it with a full extent scan
    fn resolve_grid(&self, sources: &[PathBuf]) -> PipelineResult<CommonGrid> {
        let checkpoint = PipelineCheckpoint::new(&self.options.destination);
        if let Some(grid) = checkpoint.load()? {
            return Ok(grid);
        }

        let cropper = RegionCropper::new(self.options.crop);
        let mut accumulator = ExtentAccumulator::new();
        let tracker = ProgressTracker::new(sources.len() as u64, "Measuring extents");
        for path in sources {
            let stem = item_stem(path);
            tracker.set_message(&stem);
            match measure_extent(&cropper, path) {
                Ok((width, height, transform)) => {
                    accumulator.observe(width, height, &transform);
                }
                Err(error) => warn!("Skipping {} during extent scan: {}", stem, error),
            }
            tracker.increment(1);
        }
        tracker.finish_with(&format!("Measured {} extent(s)", accumulator.count()));

        let grid = accumulator.finish()?;
        info!("Common grid is {}x{} over {}", grid.width, grid.height, grid.extent);
        checkpoint.save(&grid)?;
        Ok(grid)
    }

    fn crop_series(&self, sources: &[PathBuf], grid: &CommonGrid) -> PipelineResult<StageSummary> {
        let mut summary = StageSummary::new("crop");
        let output = self.stage_dir(CROPPED_DIR);
        fs::create_dir_all(&output)?;
        let mut manifest = StageManifest::for_stage(&self.options.destination, CROPPED_DIR)?;

        let cropper = RegionCropper::new(self.options.crop);
        let warper = GridWarper::new(*grid);
        let writer = RasterWriter::with_compression(compression::DEFLATE as u64);

        let tracker = ProgressTracker::new(sources.len() as u64, "Cropping rasters");
        for path in sources {
            let stem = item_stem(path);
            summary.attempted += 1;
            tracker.set_message(&stem);
            if manifest.contains(&stem) {
                debug!("Skipping {} via the crop manifest", stem);
                summary.skipped += 1;
                tracker.increment(1);
                continue;
            }

            match crop_one(&cropper, &warper, &writer, path, &output, &stem) {
                Ok(()) => {
                    manifest.record(&stem)?;
                    summary.succeeded += 1;
                }
                Err(error) => warn!("Cropping {} failed: {}", stem, error),
            }
            tracker.increment(1);
        }
        tracker.finish_with(&format!("Cropped {} raster(s)", summary.succeeded));
        Ok(summary)
    }

    fn classify_series(&self, inputs: &[PathBuf]) -> PipelineResult<StageSummary> {
        let mut summary = StageSummary::new("classify");
        let output = self.stage_dir(CLASSIFIED_DIR);
        fs::create_dir_all(&output)?;
        let mut manifest = StageManifest::for_stage(&self.options.destination, CLASSIFIED_DIR)?;

        let classifier = PixelClassifier::new(self.options.classify)?;
        let writer = RasterWriter::with_compression(compression::DEFLATE as u64);
        let mut accumulator = if self.options.accumulate {
            info!("Accumulation is on, frames merge with their predecessors");
            Some(FrameAccumulator::new())
        } else {
            None
        };

        let tracker = ProgressTracker::new(inputs.len() as u64, "Classifying frames");
        for path in inputs {
            let stem = item_stem(path);
            summary.attempted += 1;
            tracker.set_message(&stem);
            if manifest.contains(&stem) {
                debug!("Skipping {} via the classify manifest", stem);
                summary.skipped += 1;
                tracker.increment(1);
                continue;
            }

            match classify_one(&classifier, &writer, path, &output, &stem,
                               accumulator.as_mut()) {
                Ok(()) => {
                    manifest.record(&stem)?;
                    summary.succeeded += 1;
                }
                Err(error) => warn!("Classifying {} failed: {}", stem, error),
            }
            tracker.increment(1);
        }
        tracker.finish_with(&format!("Classified {} frame(s)", summary.succeeded));
        Ok(summary)
    }

    fn label_series(&self, inputs: &[PathBuf]) -> PipelineResult<StageSummary> {
        let mut summary = StageSummary::new("label");
        let output = self.stage_dir(LABELED_DIR);
        let mut manifest = StageManifest::for_stage(&self.options.destination, LABELED_DIR)?;

        let limit = self.options.label.max_slices;
        let selected = if inputs.len() > limit {
            warn!("Volume holds {} slice(s), keeping the first {}", inputs.len(), limit);
            &inputs[..limit]
        } else {
            inputs
        };
        summary.attempted = selected.len();

        if !selected.is_empty()
            && selected.iter().all(|path| manifest.contains(&item_stem(path))) {
            info!("Labeling already complete for all {} slice(s)", selected.len());
            summary.skipped = selected.len();
            return Ok(summary);
        }

        let labeler = VolumetricLabeler::new(self.options.label)?;
        let mut stack = VolumeStack::new();
        let tracker = ProgressTracker::new(selected.len() as u64, "Stacking masks");
        for path in selected {
            let stem = item_stem(path);
            tracker.set_message(&stem);
            match read_raster(path) {
                Ok(mask) => {
                    let metadata = RasterMetadata::describe(&mask, compression::DEFLATE as u64);
                    stack.push(&stem, &mask, metadata)?;
                }
                Err(error) => warn!("Skipping {} during stack assembly: {}", stem, error),
            }
            tracker.increment(1);
        }
        tracker.finish_with(&format!("Stacked {} mask(s)", stack.len()));

        let volume = labeler.label(stack)?;
        volume.write(&output)?;
        for index in 0..volume.len() {
            manifest.record(volume.source(index))?;
        }
        summary.succeeded = volume.len();
        Ok(summary)
    }

    fn vectorize_series(&self, labeled_dir: &Path) -> PipelineResult<StageSummary> {
        let mut summary = StageSummary::new("vectorize");
        let output = self.stage_dir(VECTORS_DIR);
        fs::create_dir_all(&output)?;
        let mut manifest = StageManifest::for_stage(&self.options.destination, VECTORS_DIR)?;

        let index = VolumeIndex::load(&labeled_dir.join(VOLUME_INDEX_NAME))?;
        let vectorizer = ContourVectorizer::new(self.options.vectorize)?;

        let tracker = ProgressTracker::new(index.slices.len() as u64, "Vectorizing slices");
        for record in &index.slices {
            summary.attempted += 1;
            tracker.set_message(&record.source);
            if manifest.contains(&record.source) {
                debug!("Skipping {} via the vectorize manifest", record.source);
                summary.skipped += 1;
                tracker.increment(1);
                continue;
            }

            match vectorize_one(&vectorizer, labeled_dir, &output, record) {
                Ok(()) => {
                    manifest.record(&record.source)?;
                    summary.succeeded += 1;
                }
                Err(error) => warn!("Vectorizing {} failed: {}", record.source, error),
            }
            tracker.increment(1);
        }
        tracker.finish_with(&format!("Vectorized {} slice(s)", summary.succeeded));
        Ok(summary)
    }

    fn discard_stage_dir(&self, name: &str) -> PipelineResult<()> {
        let dir = self.stage_dir(name);
        if dir.is_dir() {
            fs::remove_dir_all(&dir)?;
            info!("Discarded intermediate directory {}", dir.display());
        }
        Ok(())
    }
}

fn read_raster(path: &Path) -> PipelineResult<RasterImage> {
    let path_text = path.to_string_lossy();
    let mut reader = RasterReader::new(&path_text);
    reader.read_image()
}

fn measure_extent(cropper: &RegionCropper,
                  path: &Path) -> PipelineResult<(u32, u32, GeoTransform)> {
    let image = read_raster(path)?;
    let transform = image.transform.ok_or_else(|| {
        PipelineError::MissingGeoreference(format!(
            "{} has no transform for the extent scan", path.display()))
    })?;
    let (col_off, row_off, width, height) = cropper.detect_window(&image)?;
    Ok((width, height, transform.shift_for_window(col_off, row_off)))
}

fn crop_one(cropper: &RegionCropper, warper: &GridWarper, writer: &RasterWriter,
            path: &Path, output: &Path, stem: &str) -> PipelineResult<()> {
    let image = read_raster(path)?;
    let cropped = cropper.crop(&image)?;
    let aligned = warper.warp(&cropped)?;
    let out_path = output.join(format!("{}.tif", stem));
    writer.write(&aligned, &out_path.to_string_lossy())
}

fn classify_one(classifier: &PixelClassifier, writer: &RasterWriter,
                path: &Path, output: &Path, stem: &str,
                accumulator: Option<&mut FrameAccumulator>) -> PipelineResult<()> {
    let image = read_raster(path)?;
    let mask = classifier.classify(stem, &image, accumulator)?;
    let out_path = output.join(format!("{}.tif", stem));
    writer.write(&mask, &out_path.to_string_lossy())
}

fn vectorize_one(vectorizer: &ContourVectorizer, labeled_dir: &Path,
                 output: &Path, record: &SliceRecord) -> PipelineResult<()> {
    let image = read_raster(&labeled_dir.join(&record.file))?;
    if let Some(feature) = vectorizer.vectorize_slice(&record.source, &image,
                                                      &record.metadata)? {
        let out_path = output.join(format!("{}.geojson", record.source));
        FeatureCollection::single(feature).save(&out_path)?;
    }
    Ok(())
}
