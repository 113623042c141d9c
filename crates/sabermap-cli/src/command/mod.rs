use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sabermap_analysis::AnalysisConfig;
use sabermap_model::{OrderPolicy, loader::LoadOptions};
use sabermap_validator::ObstacleSeverity;

use self::{batch::BatchArg, features::FeaturesArg, summary::SummaryArg, validate::ValidateArg};
use crate::util;

mod batch;
mod features;
mod summary;
mod validate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Check whether each hand can play a map
    Validate(#[clap(flatten)] ValidateArg),
    /// Extract windowed feature vectors from a map
    Features(#[clap(flatten)] FeaturesArg),
    /// Summarize note placement and timing of a map
    Summary(#[clap(flatten)] SummaryArg),
    /// Analyze every map in a custom songs folder
    Batch(#[clap(flatten)] BatchArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Validate(arg) => validate::run(&arg)?,
        Mode::Features(arg) => features::run(&arg)?,
        Mode::Summary(arg) => summary::run(&arg)?,
        Mode::Batch(arg) => batch::run(&arg)?,
    }
    Ok(())
}

/// Options for reading map files.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct LoadArg {
    /// Tempo in BPM, used when the map file has none and overriding it otherwise
    #[arg(long)]
    bpm: Option<f64>,
    /// Reject maps whose notes are out of time order instead of sorting them
    #[arg(long)]
    strict_order: bool,
}

impl LoadArg {
    pub(crate) fn options(&self) -> LoadOptions {
        LoadOptions {
            bpm_override: self.bpm,
            difficulty: None,
            ordering: if self.strict_order {
                OrderPolicy::Strict
            } else {
                OrderPolicy::Sort
            },
        }
    }
}

/// Analysis thresholds: a JSON config file, then individual overrides.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// Analysis config JSON file; missing values keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Feature window length in beats
    #[arg(long)]
    window_size: Option<f64>,
    /// Shortest allowed gap between notes of one hand, in beats
    #[arg(long)]
    min_interval: Option<f64>,
    /// Largest allowed direction reversal between swings, in degrees
    #[arg(long)]
    max_angle: Option<f64>,
    /// Fastest allowed hand travel, in grid units per second
    #[arg(long)]
    max_speed: Option<f64>,
    /// How obstacles in a swing path are reported (error, warning, ignore)
    #[arg(long)]
    obstacle_severity: Option<ObstacleSeverity>,
}

impl ConfigArg {
    pub(crate) fn load(&self) -> anyhow::Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file::<AnalysisConfig, _>("analysis config", path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(size) = self.window_size {
            config.features.window_size_beats = size;
        }
        if let Some(interval) = self.min_interval {
            config.validator.min_inter_note_interval_beats = interval;
        }
        if let Some(angle) = self.max_angle {
            config.validator.max_angle_reversal_degrees = angle;
        }
        if let Some(speed) = self.max_speed {
            config.validator.max_limb_speed = speed;
        }
        if let Some(severity) = self.obstacle_severity {
            config.validator.obstacle_severity = severity;
        }
        log::debug!("analysis config: {config:?}");
        Ok(config)
    }
}
