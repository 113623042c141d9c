//! Analysis of many maps at once.
//!
//! Each map is loaded, validated, windowed and summarized on its own; maps
//! share nothing, so the batch is split across scoped worker threads. A map
//! that fails to load yields an error entry and the rest of the batch goes on.

use std::{num::NonZeroUsize, thread};

use sabermap_model::{
    Beatmap, Difficulty, MalformedMapError,
    loader::{self, LoadOptions},
};
use sabermap_validator::{ValidationReport, validate};

use crate::{
    config::AnalysisConfig,
    summary::MapSummary,
    window::{FeatureExtractor, InvalidWindowSize, WindowFeatures},
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AnalysisError {
    #[display("{_0}")]
    Malformed(MalformedMapError),
    #[display("{_0}")]
    WindowSize(InvalidWindowSize),
}

/// A map file to analyze, already read into memory.
#[derive(Debug, Clone)]
pub struct MapSource {
    /// Label used in reports, e.g. the song directory and file name.
    pub id: String,
    pub difficulty: Option<Difficulty>,
    pub json: String,
}

/// Everything computed for one map.
#[derive(Debug, Clone)]
pub struct MapReport {
    pub map: Beatmap,
    pub validation: ValidationReport,
    pub windows: Vec<WindowFeatures>,
    pub summary: MapSummary,
}

#[derive(Debug, Clone)]
pub struct MapAnalysis {
    pub id: String,
    pub difficulty: Option<Difficulty>,
    pub outcome: Result<MapReport, AnalysisError>,
}

/// Validates, windows and summarizes a loaded map.
pub fn analyze_map(map: Beatmap, config: &AnalysisConfig) -> Result<MapReport, InvalidWindowSize> {
    let validation = validate(&map, &config.validator);
    let windows = FeatureExtractor::new(&map, &validation, &config.features)?
        .windows()
        .collect();
    let summary = MapSummary::new(&map, &config.summary);
    Ok(MapReport {
        map,
        validation,
        windows,
        summary,
    })
}

/// Loads and analyzes one source.
pub fn analyze_source(
    source: &MapSource,
    options: &LoadOptions,
    config: &AnalysisConfig,
) -> MapAnalysis {
    let options = LoadOptions {
        difficulty: source.difficulty.or(options.difficulty),
        ..options.clone()
    };
    let outcome = loader::load_from_str(&source.json, &options)
        .map_err(AnalysisError::from)
        .and_then(|map| analyze_map(map, config).map_err(AnalysisError::from));
    match &outcome {
        Ok(report) => log::debug!(
            "analyzed {}: {} notes, {} violations, {} windows",
            source.id,
            report.map.notes().len(),
            report.validation.violations.len(),
            report.windows.len()
        ),
        Err(err) => log::warn!("skipping {}: {err}", source.id),
    }
    MapAnalysis {
        id: source.id.clone(),
        difficulty: options.difficulty,
        outcome,
    }
}

/// Analyzes every source, in parallel, keeping input order.
#[must_use]
pub fn analyze_batch(
    sources: &[MapSource],
    options: &LoadOptions,
    config: &AnalysisConfig,
) -> Vec<MapAnalysis> {
    let workers = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    analyze_batch_with_workers(sources, options, config, workers)
}

/// Like [`analyze_batch`] with at most `workers` threads.
#[must_use]
pub fn analyze_batch_with_workers(
    sources: &[MapSource],
    options: &LoadOptions,
    config: &AnalysisConfig,
    workers: usize,
) -> Vec<MapAnalysis> {
    if sources.is_empty() {
        return vec![];
    }
    let chunk_size = sources.len().div_ceil(workers.max(1));
    let chunks = sources.chunks(chunk_size).collect::<Vec<_>>();
    let mut results: Vec<Vec<MapAnalysis>> = vec![vec![]; chunks.len()];
    log::debug!(
        "analyzing {} maps on {} workers",
        sources.len(),
        chunks.len()
    );
    thread::scope(|s| {
        for (chunk, result) in chunks.into_iter().zip(&mut results) {
            s.spawn(move || {
                *result = chunk
                    .iter()
                    .map(|source| analyze_source(source, options, config))
                    .collect();
            });
        }
    });
    results.into_iter().flatten().collect()
}
