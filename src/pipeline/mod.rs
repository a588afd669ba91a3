//! Checkpointed orchestration of the pipeline stages

pub mod checkpoint;
pub mod manifest;
pub mod orchestrator;

pub use checkpoint::{PipelineCheckpoint, CHECKPOINT_NAME};
pub use manifest::StageManifest;
pub use orchestrator::{PipelineOrchestrator, RunOptions, StageSummary,
                       CLASSIFIED_DIR, CROPPED_DIR, LABELED_DIR, VECTORS_DIR};

#[cfg(test)]
mod tests;
