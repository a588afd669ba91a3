//! Volumetric labeling command
//!
//! This module implements the command that stacks classified masks
//! into a volume and labels its connected foreground components.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::stage_args;
use crate::pipeline::{PipelineOrchestrator, RunOptions};
use crate::raster::errors::PipelineResult;
use crate::utils::logger::Logger;

/// Command for labeling connected components across a mask series
pub struct LabelCommand<'a> {
    options: RunOptions,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> LabelCommand<'a> {
    /// Create a new label command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> PipelineResult<Self> {
        let source = stage_args::require_path(args, "input")?;
        let destination = stage_args::require_path(args, "output")?;

        let mut options = RunOptions::new(&source, &destination);
        options.label = stage_args::label_config(args)?;

        Ok(LabelCommand { options, logger })
    }
}

impl<'a> Command for LabelCommand<'a> {
    fn execute(&self) -> PipelineResult<()> {
        info!("Labeling masks from {} into {}",
              self.options.source.display(), self.options.destination.display());

        let summary = PipelineOrchestrator::new(self.options.clone()).label()?;
        self.logger.log_stage_report(summary.stage, summary.attempted,
                                     summary.succeeded, summary.skipped)?;
        Ok(())
    }
}
