//! Full pipeline command
//!
//! This module implements the command that drives a corpus through all
//! four stages under one destination root, resuming from checkpoint
//! and manifest state where possible.

use clap::ArgMatches;
use log::info;

use crate::commands::command_traits::Command;
use crate::commands::stage_args;
use crate::pipeline::{PipelineOrchestrator, RunOptions};
use crate::raster::errors::PipelineResult;
use crate::utils::logger::Logger;

/// Command for running the whole checkpointed pipeline
pub struct RunCommand<'a> {
    options: RunOptions,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> RunCommand<'a> {
    /// Create a new run command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> PipelineResult<Self> {
        let source = stage_args::require_path(args, "input")?;
        let destination = stage_args::require_path(args, "output")?;

        let mut options = RunOptions::new(&source, &destination);
        options.crop = stage_args::crop_config(args)?;
        options.classify = stage_args::classify_config(args)?;
        options.label = stage_args::label_config(args)?;
        options.vectorize = stage_args::vectorize_config(args)?;
        options.accumulate = args.get_flag("accumulate");
        options.keep_intermediates = stage_args::parsed(args, "keep-intermediates")?;

        Ok(RunCommand { options, logger })
    }
}

impl<'a> Command for RunCommand<'a> {
    fn execute(&self) -> PipelineResult<()> {
        info!("Running the pipeline from {} into {}",
              self.options.source.display(), self.options.destination.display());

        let summaries = PipelineOrchestrator::new(self.options.clone()).run()?;
        for summary in &summaries {
            self.logger.log_stage_report(summary.stage, summary.attempted,
                                         summary.succeeded, summary.skipped)?;
        }

        info!("Pipeline finished");
        Ok(())
    }
}
