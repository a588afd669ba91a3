//! The four pipeline stages and their corpus helpers

pub mod classify;
pub mod corpus;
pub mod crop;
pub mod label;
pub mod vectorize;
pub mod warp;

#[cfg(test)]
mod tests;

pub use classify::{ClassifyConfig, FrameAccumulator, PixelClassifier};
pub use crop::{CropConfig, CropMargins, RegionCropper};
pub use label::{Connectivity, LabelConfig, LabeledVolume, SliceRecord, VolumeIndex,
                VolumeStack, VolumetricLabeler, VOLUME_INDEX_NAME};
pub use vectorize::{ContourVectorizer, Feature, FeatureCollection, Geometry, VectorizeConfig};
pub use warp::GridWarper;
