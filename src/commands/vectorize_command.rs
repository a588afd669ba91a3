//! Vectorization command
//!
//! This module implements the command that traces component boundaries
//! in a labeled volume and writes one polygon file per slice.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::stage_args;
use crate::pipeline::{PipelineOrchestrator, RunOptions};
use crate::raster::errors::PipelineResult;
use crate::utils::logger::Logger;

/// Command for turning labeled slices into polygon features
pub struct VectorizeCommand<'a> {
    options: RunOptions,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> VectorizeCommand<'a> {
    /// Create a new vectorize command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> PipelineResult<Self> {
        let source = stage_args::require_path(args, "input")?;
        let destination = stage_args::require_path(args, "output")?;

        let mut options = RunOptions::new(&source, &destination);
        options.vectorize = stage_args::vectorize_config(args)?;

        Ok(VectorizeCommand { options, logger })
    }
}

impl<'a> Command for VectorizeCommand<'a> {
    fn execute(&self) -> PipelineResult<()> {
        info!("Vectorizing labeled volume {} into {}",
              self.options.source.display(), self.options.destination.display());

        let summary = PipelineOrchestrator::new(self.options.clone()).vectorize()?;
        self.logger.log_stage_report(summary.stage, summary.attempted,
                                     summary.succeeded, summary.skipped)?;
        Ok(())
    }
}
