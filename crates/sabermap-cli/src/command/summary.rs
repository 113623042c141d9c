use std::path::PathBuf;

use sabermap_analysis::MapSummary;

use super::{ConfigArg, LoadArg};
use crate::{
    schema::{Generated, SummaryOutput},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SummaryArg {
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

pub(crate) fn run(arg: &SummaryArg) -> anyhow::Result<()> {
    let SummaryArg {
        map: map_path,
        load,
        config,
        output,
    } = arg;

    let config = config.load()?;
    let map = util::load_map_file(map_path, &load.options())?;
    let summary = MapSummary::new(&map, &config.summary);
    log::info!(
        "{} notes ({} left, {} right), {} bombs, leaning {:.3}",
        summary.notes.counts.normal,
        summary.notes.counts.left,
        summary.notes.counts.right,
        summary.notes.counts.bombs,
        summary.notes.leaning
    );

    let output_value = Generated::now(SummaryOutput {
        map: map_path.display().to_string(),
        summary,
    });
    Output::save_json(&output_value, output.clone())?;
    Ok(())
}
