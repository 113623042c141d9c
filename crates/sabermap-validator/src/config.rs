use serde::{Deserialize, Serialize};

/// How obstacle interference is reported.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleSeverity {
    /// Blocked paths make the side unperformable.
    #[display("error")]
    Error,
    /// Blocked paths are recorded but do not change the verdict.
    #[default]
    #[display("warning")]
    Warning,
    /// Obstacles are not checked at all.
    #[display("ignore")]
    Ignore,
}

/// Performability thresholds.
///
/// None of these are properties of the map format; they model what a player
/// can execute and are meant to be tuned per analysis run. Any field missing
/// from a JSON config keeps its default.
///
/// ```
/// use sabermap_validator::{ObstacleSeverity, ValidatorConfig};
///
/// let config: ValidatorConfig = serde_json::from_str(r#"{ "max_limb_speed": 6.0 }"#).unwrap();
/// assert_eq!(config.max_limb_speed, 6.0);
/// assert_eq!(config.min_inter_note_interval_beats, 0.125);
/// assert_eq!(config.obstacle_severity, ObstacleSeverity::Warning);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Shortest allowed gap between two notes of one side, in beats (default: 1/8 beat).
    pub min_inter_note_interval_beats: f64,
    /// Largest allowed direction reversal between two swings, in degrees (default: 90).
    pub max_angle_reversal_degrees: f64,
    /// Gap in seconds after which the arm is considered reset and direction
    /// continuity is no longer checked (default: 0.5).
    pub angle_reset_seconds: f64,
    /// Fastest allowed hand travel, in normalized grid units per second (default: 10).
    pub max_limb_speed: f64,
    pub obstacle_severity: ObstacleSeverity,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            min_inter_note_interval_beats: 0.125,
            max_angle_reversal_degrees: 90.0,
            angle_reset_seconds: 0.5,
            max_limb_speed: 10.0,
            obstacle_severity: ObstacleSeverity::Warning,
        }
    }
}
