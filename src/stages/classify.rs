//! Per-image unsupervised pixel classification
//!
//! One band is smoothed and clustered into k groups by scalar
//! k-means; the cluster with the brightest centroid becomes 255
//! foreground, everything else 0. An optional accumulator carries the
//! elementwise maximum across a time series so the mask never shrinks
//! between frames.

use image::{imageops, ImageBuffer, Luma};
use log::debug;

use crate::raster::errors::{PipelineError, PipelineResult};
use crate::raster::image::{RasterImage, SampleDtype};

/// Clustering parameters
#[derive(Debug, Clone, Copy)]
pub struct ClassifyConfig {
    /// One-based band to classify
    pub band: usize,
    pub clusters: usize,
    pub max_iterations: usize,
    pub epsilon: f64,
    pub restarts: usize,
    pub blur_sigma: f32,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        ClassifyConfig {
            band: 1,
            clusters: 5,
            max_iterations: 5,
            epsilon: 0.0001,
            restarts: 5,
            blur_sigma: 5.0,
        }
    }
}

/// Carries the running elementwise maximum across a frame sequence
///
/// Explicit state: the caller owns one accumulator per run and passes
/// it to every classify call in sequence order.
#[derive(Debug, Default)]
pub struct FrameAccumulator {
    frame: Vec<f32>,
    shape: Option<(u32, u32)>,
}

impl FrameAccumulator {
    pub fn new() -> Self {
        FrameAccumulator { frame: Vec::new(), shape: None }
    }

    /// Merge the held frame into `plane` by elementwise maximum, then
    /// hold the merged result for the next call
    pub fn fold(&mut self, item: &str, width: u32, height: u32,
                plane: &mut [f32]) -> PipelineResult<()> {
        if let Some(expected) = self.shape {
            if expected != (width, height) {
                return Err(PipelineError::ShapeMismatch {
                    item: item.to_string(),
                    expected,
                    actual: (width, height),
                });
            }
            for (value, prev) in plane.iter_mut().zip(&self.frame) {
                if *prev > *value {
                    *value = *prev;
                }
            }
        }
        self.shape = Some((width, height));
        self.frame.clear();
        self.frame.extend_from_slice(plane);
        Ok(())
    }
}

/// Clusters one band per image into a binary foreground mask
pub struct PixelClassifier {
    config: ClassifyConfig,
}

impl PixelClassifier {
    pub fn new(config: ClassifyConfig) -> PipelineResult<Self> {
        if config.clusters == 0 {
            return Err(PipelineError::Config("cluster count must be positive".to_string()));
        }
        if config.max_iterations == 0 {
            return Err(PipelineError::Config("iteration count must be positive".to_string()));
        }
        if config.restarts == 0 {
            return Err(PipelineError::Config("restart count must be positive".to_string()));
        }
        Ok(PixelClassifier { config })
    }

    /// Classify one frame into a 255/0 foreground mask
    pub fn classify(&self, item: &str, image: &RasterImage,
                    accumulator: Option<&mut FrameAccumulator>) -> PipelineResult<RasterImage> {
        let band = self.config.band;
        if band == 0 || band > image.band_count() {
            return Err(PipelineError::Config(format!(
                "classify band {} out of range, raster has {} band(s)",
                band, image.band_count())));
        }

        let mut plane = image.band(band - 1)?.to_vec();
        if let Some(accumulator) = accumulator {
            accumulator.fold(item, image.width, image.height, &mut plane)?;
        }

        let samples = self.smooth(image.width, image.height, plane)?;
        let outcome = cluster_samples(&samples, self.config.clusters,
                                      self.config.max_iterations, self.config.epsilon,
                                      self.config.restarts)?;

        let quantized: Vec<u8> = outcome.centroids.iter()
            .map(|c| c.round().clamp(0.0, 255.0) as u8)
            .collect();
        let mut foreground = 0;
        for (cluster, &value) in quantized.iter().enumerate() {
            if value > quantized[foreground] {
                foreground = cluster;
            }
        }
        debug!("Centroids {:?}, foreground cluster {} at value {}",
               quantized, foreground, quantized[foreground]);

        let mask: Vec<f32> = outcome.assignments.iter()
            .map(|&cluster| if cluster == foreground { 255.0 } else { 0.0 })
            .collect();

        let mut result = RasterImage::from_bands(image.width, image.height,
                                                 SampleDtype::U8, vec![mask])?;
        result.transform = image.transform;
        result.epsg = image.epsg;
        result.nodata = image.nodata.or(Some(0.0));
        Ok(result)
    }

    fn smooth(&self, width: u32, height: u32, plane: Vec<f32>) -> PipelineResult<Vec<f32>> {
        if self.config.blur_sigma <= 0.0 {
            return Ok(plane);
        }
        let buffer: ImageBuffer<Luma<f32>, Vec<f32>> =
            ImageBuffer::from_raw(width, height, plane).ok_or_else(|| {
                PipelineError::GenericError(
                    "band plane does not match raster dimensions".to_string())
            })?;
        Ok(imageops::blur(&buffer, self.config.blur_sigma).into_raw())
    }
}

struct KMeansOutcome {
    assignments: Vec<usize>,
    centroids: Vec<f32>,
    compactness: f64,
}

/// Scalar Lloyd clustering with random restarts
///
/// Runs `restarts` independent attempts from different centroid seeds
/// and keeps the one with the lowest sum of squared distances.
fn cluster_samples(samples: &[f32], k: usize, max_iterations: usize,
                   epsilon: f64, restarts: usize) -> PipelineResult<KMeansOutcome> {
    if samples.is_empty() {
        return Err(PipelineError::EmptyInput("no samples to cluster".to_string()));
    }

    let mut best: Option<KMeansOutcome> = None;
    for attempt in 0..restarts {
        let outcome = run_attempt(samples, k, max_iterations, epsilon, attempt as u64);
        let better = match &best {
            None => true,
            Some(current) => outcome.compactness < current.compactness,
        };
        if better {
            best = Some(outcome);
        }
    }

    best.ok_or_else(|| PipelineError::Config("restart count must be positive".to_string()))
}

fn run_attempt(samples: &[f32], k: usize, max_iterations: usize,
               epsilon: f64, seed: u64) -> KMeansOutcome {
    let mut rng = SplitMix64::new(seed.wrapping_add(1));
    let mut centroids: Vec<f32> = (0..k)
        .map(|_| samples[rng.next_index(samples.len())])
        .collect();
    let mut assignments = vec![0usize; samples.len()];

    for _ in 0..max_iterations {
        for (index, &value) in samples.iter().enumerate() {
            assignments[index] = nearest(&centroids, value).0;
        }

        let mut sums = vec![0.0f64; k];
        let mut counts = vec![0usize; k];
        for (&value, &cluster) in samples.iter().zip(&assignments) {
            sums[cluster] += value as f64;
            counts[cluster] += 1;
        }

        let mut movement = 0.0f64;
        for cluster in 0..k {
            let updated = if counts[cluster] == 0 {
                // re-seed clusters that lost every sample
                samples[rng.next_index(samples.len())]
            } else {
                (sums[cluster] / counts[cluster] as f64) as f32
            };
            movement = movement.max((updated - centroids[cluster]).abs() as f64);
            centroids[cluster] = updated;
        }
        if movement <= epsilon {
            break;
        }
    }

    let mut compactness = 0.0f64;
    for (index, &value) in samples.iter().enumerate() {
        let (cluster, distance) = nearest(&centroids, value);
        assignments[index] = cluster;
        compactness += (distance as f64) * (distance as f64);
    }

    KMeansOutcome { assignments, centroids, compactness }
}

fn nearest(centroids: &[f32], value: f32) -> (usize, f32) {
    let mut best = 0;
    let mut best_distance = f32::INFINITY;
    for (cluster, &centroid) in centroids.iter().enumerate() {
        let distance = (value - centroid).abs();
        if distance < best_distance {
            best_distance = distance;
            best = cluster;
        }
    }
    (best, best_distance)
}

/// Deterministic 64-bit mix stream for centroid seeding
///
/// Fixed seeds keep repeated runs over the same corpus identical.
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        SplitMix64 { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut mixed = self.state;
        mixed = (mixed ^ (mixed >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        mixed = (mixed ^ (mixed >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        mixed ^ (mixed >> 31)
    }

    fn next_index(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}
