use sabermap_validator::ValidatorConfig;
use serde::{Deserialize, Serialize};

use crate::summary::SummaryConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Length of a feature window, in beats (default: 4, one bar of 4/4).
    pub window_size_beats: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            window_size_beats: 4.0,
        }
    }
}

/// Every threshold of one analysis run.
///
/// Loaded from JSON with `#[serde(default)]`, so a file only needs the
/// values it changes:
///
/// ```
/// use sabermap_analysis::AnalysisConfig;
///
/// let config: AnalysisConfig =
///     serde_json::from_str(r#"{ "features": { "window_size_beats": 8.0 } }"#).unwrap();
/// assert_eq!(config.features.window_size_beats, 8.0);
/// assert_eq!(config.validator.max_angle_reversal_degrees, 90.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub validator: ValidatorConfig,
    pub features: FeatureConfig,
    pub summary: SummaryConfig,
}
