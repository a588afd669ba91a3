//! Foreground classification command
//!
//! This module implements the command that clusters one band of every
//! cropped raster and writes the resulting binary foreground masks.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::stage_args;
use crate::pipeline::{PipelineOrchestrator, RunOptions};
use crate::raster::errors::PipelineResult;
use crate::utils::logger::Logger;

/// Command for classifying cropped rasters into foreground masks
pub struct ClassifyCommand<'a> {
    options: RunOptions,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ClassifyCommand<'a> {
    /// Create a new classify command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> PipelineResult<Self> {
        let source = stage_args::require_path(args, "input")?;
        let destination = stage_args::require_path(args, "output")?;

        let mut options = RunOptions::new(&source, &destination);
        options.classify = stage_args::classify_config(args)?;
        options.accumulate = args.get_flag("accumulate");

        Ok(ClassifyCommand { options, logger })
    }
}

impl<'a> Command for ClassifyCommand<'a> {
    fn execute(&self) -> PipelineResult<()> {
        info!("Classifying rasters from {} into {}",
              self.options.source.display(), self.options.destination.display());

        let summary = PipelineOrchestrator::new(self.options.clone()).classify()?;
        self.logger.log_stage_report(summary.stage, summary.attempted,
                                     summary.succeeded, summary.skipped)?;
        Ok(())
    }
}
