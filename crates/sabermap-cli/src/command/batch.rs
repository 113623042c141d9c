use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use sabermap_analysis::{CollectionSummary, MapAnalysis, MapSource, analyze_batch};
use sabermap_model::Difficulty;

use super::{ConfigArg, LoadArg};
use crate::{
    schema::{BatchEntry, BatchOperation, BatchOutput, EntryStatus, Generated},
    util::{self, Output},
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BatchArg {
    /// Custom songs folder, laid out as `<id>-<title>/<song>/<Difficulty>.json`
    #[arg(long)]
    path: PathBuf,
    /// Maximum number of map files to analyze
    #[arg(long)]
    limit: Option<usize>,
    /// Only analyze this difficulty (e.g. `expertplus`)
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Only analyze songs whose folder name contains this text
    #[arg(long)]
    filter: Option<String>,
    /// What to report: `cumulative` (one pooled summary) or `single` (every map)
    #[arg(long, default_value = "cumulative")]
    operation: BatchOperation,
    #[clap(flatten)]
    load: LoadArg,
    #[clap(flatten)]
    config: ConfigArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &BatchArg) -> anyhow::Result<()> {
    let BatchArg {
        path,
        limit,
        difficulty,
        filter,
        operation,
        load,
        config,
        output,
    } = arg;

    let config = config.load()?;
    let map_paths = discover_maps(path, *difficulty, filter.as_deref(), *limit)?;
    log::info!("Found {} map files under {}", map_paths.len(), path.display());

    let mut sources = vec![];
    let mut source_slots = vec![];
    let mut unreadable = vec![];
    for (slot, map_path) in map_paths.iter().enumerate() {
        let id = map_id(path, map_path);
        let difficulty = util::difficulty_of(map_path);
        match fs::read_to_string(map_path) {
            Ok(json) => {
                sources.push(MapSource {
                    id,
                    difficulty,
                    json,
                });
                source_slots.push(slot);
            }
            Err(err) => {
                log::warn!("Failed to read map file {}: {err}", map_path.display());
                unreadable.push((
                    slot,
                    BatchEntry {
                        id,
                        difficulty,
                        status: EntryStatus::Error {
                            error: err.to_string(),
                        },
                    },
                ));
            }
        }
    }

    let results = analyze_batch(&sources, &load.options(), &config);
    let collection = match operation {
        BatchOperation::Cumulative => Some(CollectionSummary::from_maps(
            results
                .iter()
                .filter_map(|r| r.outcome.as_ref().ok())
                .map(|report| &report.map),
            &config.summary,
        )),
        BatchOperation::Single => None,
    };
    let analyzed = source_slots
        .into_iter()
        .zip(results)
        .map(|(slot, analysis)| (slot, entry(analysis, *operation)));
    let maps = in_discovery_order(analyzed.chain(unreadable));

    let failed_count = maps
        .iter()
        .filter(|entry| matches!(entry.status, EntryStatus::Error { .. }))
        .count();
    log::info!(
        "Analyzed {} maps, {} failed",
        maps.len() - failed_count,
        failed_count
    );

    let output_value = Generated::now(BatchOutput {
        path: path.display().to_string(),
        operation: *operation,
        map_count: maps.len(),
        failed_count,
        maps,
        collection,
    });
    Output::save_json(&output_value, output.clone())?;
    Ok(())
}

fn entry(analysis: MapAnalysis, operation: BatchOperation) -> BatchEntry {
    let status = match analysis.outcome {
        Ok(report) => {
            let detailed = operation == BatchOperation::Single;
            EntryStatus::Ok {
                performable: report.validation.is_performable(),
                note_count: report.map.notes().len(),
                violation_count: report.validation.violations.len(),
                window_count: report.windows.len(),
                validation: detailed.then_some(report.validation),
                summary: detailed.then_some(report.summary),
            }
        }
        Err(err) => EntryStatus::Error {
            error: err.to_string(),
        },
    };
    BatchEntry {
        id: analysis.id,
        difficulty: analysis.difficulty,
        status,
    }
}

/// Orders entries by the position of their file in the discovered list.
fn in_discovery_order<I>(entries: I) -> Vec<BatchEntry>
where
    I: IntoIterator<Item = (usize, BatchEntry)>,
{
    let mut entries = entries.into_iter().collect::<Vec<_>>();
    entries.sort_by_key(|(slot, _)| *slot);
    entries.into_iter().map(|(_, entry)| entry).collect()
}

fn map_id(root: &Path, map_path: &Path) -> String {
    map_path
        .strip_prefix(root)
        .unwrap_or(map_path)
        .display()
        .to_string()
}

/// Lists difficulty files under a custom songs folder.
///
/// Songs live in `<root>/<id>/<name>/`, where the id folder name contains a
/// `-` and holds one folder per song. Only files named after a difficulty
/// (`Expert.json`, ...) are maps. Folders are visited in name order.
fn discover_maps(
    root: &Path,
    difficulty: Option<Difficulty>,
    filter: Option<&str>,
    limit: Option<usize>,
) -> anyhow::Result<Vec<PathBuf>> {
    let limit = limit.unwrap_or(usize::MAX);
    let difficulties = match difficulty {
        Some(difficulty) => vec![difficulty],
        None => Difficulty::ALL.to_vec(),
    };

    let mut maps = vec![];
    for id_dir in sorted_subdirs(root)? {
        if !file_name_of(&id_dir).contains('-') {
            log::debug!("skipping {}: not a song folder", id_dir.display());
            continue;
        }
        for song_dir in sorted_subdirs(&id_dir)? {
            if let Some(filter) = filter
                && !file_name_of(&song_dir).contains(filter)
            {
                continue;
            }
            for difficulty in &difficulties {
                if maps.len() >= limit {
                    return Ok(maps);
                }
                let map_path = song_dir.join(format!("{}.json", difficulty.name()));
                if map_path.is_file() {
                    maps.push(map_path);
                }
            }
        }
    }
    Ok(maps)
}

fn sorted_subdirs(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut dirs = fs::read_dir(path)
        .with_context(|| format!("Failed to read directory: {}", path.display()))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to list directory: {}", path.display()))?;
    dirs.retain(|path| path.is_dir());
    dirs.sort();
    Ok(dirs)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
