//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod crop_command;
pub mod classify_command;
pub mod label_command;
pub mod vectorize_command;
pub mod run_command;
pub(crate) mod stage_args;

pub use command_traits::{Command, CommandFactory};
pub use crop_command::CropCommand;
pub use classify_command::ClassifyCommand;
pub use label_command::LabelCommand;
pub use vectorize_command::VectorizeCommand;
pub use run_command::RunCommand;

use clap::ArgMatches;
use crate::utils::logger::Logger;
use crate::raster::errors::{PipelineError, PipelineResult};

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the chosen subcommand and creates
/// the appropriate command instance for execution.
pub struct FloodtraceCommandFactory;

impl FloodtraceCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        FloodtraceCommandFactory
    }
}

impl<'a> CommandFactory<'a> for FloodtraceCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> PipelineResult<Box<dyn Command + 'a>> {
        match args.subcommand() {
            Some(("crop", sub)) => Ok(Box::new(CropCommand::new(sub, logger)?)),
            Some(("classify", sub)) => Ok(Box::new(ClassifyCommand::new(sub, logger)?)),
            Some(("label", sub)) => Ok(Box::new(LabelCommand::new(sub, logger)?)),
            Some(("vectorize", sub)) => Ok(Box::new(VectorizeCommand::new(sub, logger)?)),
            Some(("run", sub)) => Ok(Box::new(RunCommand::new(sub, logger)?)),
            _ => Err(PipelineError::Config("No subcommand given".to_string())),
        }
    }
}
