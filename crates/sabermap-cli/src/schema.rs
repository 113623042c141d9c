//! JSON documents written by the subcommands.

use chrono::{DateTime, Utc};
use sabermap_analysis::{CollectionSummary, MapSummary, WindowFeatures};
use sabermap_model::Difficulty;
use sabermap_validator::{ValidationReport, ValidatorConfig};
use serde::Serialize;

/// A report stamped with the time and tool version that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Generated<T> {
    /// Timestamp when the report was created (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    pub tool_version: &'static str,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Generated<T> {
    pub fn now(body: T) -> Self {
        Self {
            generated_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION"),
            body,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutput {
    pub map: String,
    pub config: ValidatorConfig,
    pub performable: bool,
    pub report: ValidationReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeaturesOutput {
    pub map: String,
    pub window_size_beats: f64,
    /// Names of the entries of each window's feature vector, in order
    pub columns: &'static [&'static str],
    pub windows: Vec<WindowFeatures>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutput {
    pub map: String,
    pub summary: MapSummary,
}

/// What a batch run reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, derive_more::FromStr)]
#[serde(rename_all = "snake_case")]
pub enum BatchOperation {
    /// One summary aggregated over every map that loaded
    #[default]
    Cumulative,
    /// Validation and summary for each map
    Single,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchOutput {
    pub path: String,
    pub operation: BatchOperation,
    pub map_count: usize,
    pub failed_count: usize,
    pub maps: Vec<BatchEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub id: String,
    pub difficulty: Option<Difficulty>,
    #[serde(flatten)]
    pub status: EntryStatus,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    Ok {
        performable: bool,
        note_count: usize,
        violation_count: usize,
        window_count: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        validation: Option<ValidationReport>,
        #[serde(skip_serializing_if = "Option::is_none")]
        summary: Option<MapSummary>,
    },
    Error {
        error: String,
    },
}
