//! Shared parsing of stage parameters from CLI matches

use std::path::PathBuf;
use std::str::FromStr;

use clap::ArgMatches;

use crate::raster::errors::{PipelineError, PipelineResult};
use crate::stages::classify::ClassifyConfig;
use crate::stages::crop::{CropConfig, CropMargins};
use crate::stages::label::{Connectivity, LabelConfig};
use crate::stages::vectorize::VectorizeConfig;

/// Parse one argument that always carries a value or a default
pub(crate) fn parsed<T: FromStr>(args: &ArgMatches, name: &str) -> PipelineResult<T> {
    let raw = args.get_one::<String>(name)
        .ok_or_else(|| PipelineError::Config(format!("Missing {} argument", name)))?;
    raw.parse().map_err(|_| PipelineError::Config(format!(
        "Invalid {} value: {}", name, raw)))
}

pub(crate) fn require_path(args: &ArgMatches, name: &str) -> PipelineResult<PathBuf> {
    args.get_one::<String>(name)
        .map(PathBuf::from)
        .ok_or_else(|| PipelineError::Config(format!("Missing {} argument", name)))
}

pub(crate) fn crop_config(args: &ArgMatches) -> PipelineResult<CropConfig> {
    Ok(CropConfig {
        detection_band: parsed(args, "detect-band")?,
        threshold: parsed(args, "threshold")?,
        margins: CropMargins {
            left: parsed(args, "margin-left")?,
            top: parsed(args, "margin-top")?,
            extra_width: parsed(args, "extra-width")?,
            extra_height: parsed(args, "extra-height")?,
        },
    })
}

pub(crate) fn classify_config(args: &ArgMatches) -> PipelineResult<ClassifyConfig> {
    Ok(ClassifyConfig {
        band: parsed(args, "band")?,
        clusters: parsed(args, "clusters")?,
        max_iterations: parsed(args, "iterations")?,
        epsilon: parsed(args, "epsilon")?,
        restarts: parsed(args, "restarts")?,
        blur_sigma: parsed(args, "sigma")?,
    })
}

pub(crate) fn label_config(args: &ArgMatches) -> PipelineResult<LabelConfig> {
    Ok(LabelConfig {
        connectivity: Connectivity::from_code(parsed(args, "connectivity")?)?,
        component_cap: parsed(args, "components")?,
        max_slices: parsed(args, "max-slices")?,
    })
}

pub(crate) fn vectorize_config(args: &ArgMatches) -> PipelineResult<VectorizeConfig> {
    Ok(VectorizeConfig {
        min_contour_len: parsed(args, "min-contour")?,
        stride: parsed(args, "stride")?,
    })
}
