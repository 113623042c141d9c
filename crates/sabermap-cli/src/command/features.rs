use std::path::PathBuf;

use anyhow::Context;
use sabermap_analysis::{FEATURE_COLUMNS, FeatureExtractor, WindowFeatures};
use sabermap_validator::validate_parallel;

use super::{ConfigArg, LoadArg};
use crate::{
    schema::{FeaturesOutput, Generated},
    util::{self, Output},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum OutputFormat {
    /// Full window records with metadata
    #[default]
    Json,
    /// One row per window, one column per feature
    Csv,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct FeaturesArg {
    /// Difficulty file of the map (e.g. `ExpertPlus.json`)
    map: PathBuf,
    #[clap(flatten)]
    load: LoadArg,
    #[clap(flatten)]
    config: ConfigArg,
    /// Output format (json, csv)
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &FeaturesArg) -> anyhow::Result<()> {
    let FeaturesArg {
        map: map_path,
        load,
        config,
        format,
        output,
    } = arg;

    let config = config.load()?;
    let map = util::load_map_file(map_path, &load.options())?;
    let report = validate_parallel(&map, &config.validator);
    let extractor = FeatureExtractor::new(&map, &report, &config.features)
        .context("Invalid feature window size")?;
    let windows = extractor.windows().collect::<Vec<_>>();
    log::info!(
        "Extracted {} windows of {} beats",
        windows.len(),
        extractor.window_size_beats()
    );

    match format {
        OutputFormat::Json => {
            let output_value = Generated::now(FeaturesOutput {
                map: map_path.display().to_string(),
                window_size_beats: extractor.window_size_beats(),
                columns: &FEATURE_COLUMNS,
                windows,
            });
            Output::save_json(&output_value, output.clone())?;
        }
        OutputFormat::Csv => {
            let mut output = Output::from_output_path(output.clone())?;
            output.write_csv(csv_header(), windows.iter().map(csv_row))?;
        }
    }
    Ok(())
}

fn csv_header() -> impl Iterator<Item = &'static str> {
    ["window", "start_beat", "end_beat"]
        .into_iter()
        .chain(FEATURE_COLUMNS)
}

fn csv_row(window: &WindowFeatures) -> Vec<String> {
    [
        window.index.to_string(),
        window.start_beat.to_string(),
        window.end_beat.to_string(),
    ]
    .into_iter()
    .chain(window.to_vector().iter().map(f32::to_string))
    .collect()
}
