use sabermap_model::Side;
use serde::Serialize;

/// The constraint a transition between two notes broke.
///
/// Variant order is the tie-break order of merged reports.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Notes closer in time than the minimum interval.
    #[display("too_fast")]
    TooFast,
    /// The next cut reverses the previous swing too sharply.
    #[display("impossible_angle")]
    ImpossibleAngle,
    /// The hand would have to travel faster than the speed limit.
    #[display("unreachable_distance")]
    UnreachableDistance,
    /// An obstacle sits on the straight path between the two notes.
    #[display("obstacle_blocked")]
    ObstacleBlocked,
}

impl ViolationKind {
    pub const ALL: [Self; 4] = [
        Self::TooFast,
        Self::ImpossibleAngle,
        Self::UnreachableDistance,
        Self::ObstacleBlocked,
    ];
    pub const COUNT: usize = Self::ALL.len();

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[display("error")]
    Error,
    #[display("warning")]
    Warning,
}

/// One broken constraint between two consecutive notes of a side.
///
/// Note indices refer to [`sabermap_model::Beatmap::notes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub side: Side,
    pub note_indices: (usize, usize),
    pub kind: ViolationKind,
    /// Observed value: seconds, degrees, grid units per second or a path
    /// fraction depending on `kind`.
    pub measured: f64,
    /// The configured limit `measured` was compared against, in the same unit.
    pub threshold: f64,
    pub severity: Severity,
    /// Index into [`sabermap_model::Beatmap::obstacles`] for obstacle violations.
    pub obstacle_index: Option<usize>,
}

impl Violation {
    /// Key that orders a merged report: by second note, then first note,
    /// kind and obstacle.
    #[must_use]
    pub fn order_key(&self) -> (usize, usize, ViolationKind, Option<usize>) {
        (
            self.note_indices.1,
            self.note_indices.0,
            self.kind,
            self.obstacle_index,
        )
    }
}
