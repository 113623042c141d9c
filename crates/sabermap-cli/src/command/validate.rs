use std::path::PathBuf;

use sabermap_model::Side;
use sabermap_validator::{ValidatorConfig, validate_parallel};

use super::{ConfigArg, LoadArg};
use crate::{
    schema::{Generated, ValidationOutput},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ValidateArg {
    /// Difficulty file of the map (e.g. `ExpertPlus.json`)
    map: PathBuf,
    #[clap(flatten)]
    load: LoadArg,
    #[clap(flatten)]
    config: ConfigArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ValidateArg) -> anyhow::Result<()> {
    let ValidateArg {
        map: map_path,
        load,
        config,
        output,
    } = arg;

    let config: ValidatorConfig = config.load()?.validator;
    let map = util::load_map_file(map_path, &load.options())?;
    let report = validate_parallel(&map, &config);

    for side in Side::ALL {
        let side_report = report.side(side);
        log::info!(
            "{}: {} ({} transitions, {} errors, {} warnings)",
            side.name(),
            if side_report.is_performable() {
                "performable"
            } else {
                "not performable"
            },
            side_report.transition_count,
            side_report.error_count,
            side_report.warning_count
        );
    }

    let output_value = Generated::now(ValidationOutput {
        map: map_path.display().to_string(),
        performable: report.is_performable(),
        config,
        report,
    });
    Output::save_json(&output_value, output.clone())?;
    Ok(())
}
