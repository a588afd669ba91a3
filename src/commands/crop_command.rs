//! Crop and warp command
//!
//! This module implements the command that detects the content window
//! of every source raster and aligns the crops onto the common grid.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::stage_args;
use crate::pipeline::{PipelineOrchestrator, RunOptions};
use crate::raster::errors::PipelineResult;
use crate::utils::logger::Logger;

/// Command for cropping and aligning a raster corpus
pub struct CropCommand<'a> {
    options: RunOptions,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> CropCommand<'a> {
    /// Create a new crop command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> PipelineResult<Self> {
        let source = stage_args::require_path(args, "input")?;
        let destination = stage_args::require_path(args, "output")?;

        let mut options = RunOptions::new(&source, &destination);
        options.crop = stage_args::crop_config(args)?;

        Ok(CropCommand { options, logger })
    }
}

impl<'a> Command for CropCommand<'a> {
    fn execute(&self) -> PipelineResult<()> {
        info!("Cropping corpus {} into {}",
              self.options.source.display(), self.options.destination.display());

        let summary = PipelineOrchestrator::new(self.options.clone()).crop()?;
        self.logger.log_stage_report(summary.stage, summary.attempted,
                                     summary.succeeded, summary.skipped)?;
        Ok(())
    }
}
