use sabermap_model::Side;
use serde::Serialize;

use crate::{
    swing::{SideValidation, SwingState},
    violation::{Violation, ViolationKind},
};

/// Summary of one side's state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SideReport {
    pub side: Side,
    pub state: SwingState,
    pub note_count: usize,
    pub transition_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

impl SideReport {
    /// `true` unless an error-severity violation was found.
    #[must_use]
    pub fn is_performable(&self) -> bool {
        !self.state.is_violation()
    }
}

/// Validation result for a whole map.
///
/// `violations` merges both sides, ordered by second note index, first note
/// index, kind and obstacle index. An empty list means the map is fully
/// performable under the thresholds used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Indexed by [`Side::index`].
    pub sides: [SideReport; 2],
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    #[must_use]
    pub fn merge(left: SideValidation, right: SideValidation) -> Self {
        let mut violations = left.violations;
        violations.extend(right.violations);
        violations.sort_by_key(Violation::order_key);
        Self {
            sides: [left.report, right.report],
            violations,
        }
    }

    #[must_use]
    pub fn side(&self, side: Side) -> &SideReport {
        &self.sides[side.index()]
    }

    #[must_use]
    pub fn is_performable(&self) -> bool {
        self.sides.iter().all(SideReport::is_performable)
    }

    #[must_use]
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Violation counts indexed by [`ViolationKind::index`].
    #[must_use]
    pub fn counts_by_kind(&self) -> [usize; ViolationKind::COUNT] {
        let mut counts = [0; ViolationKind::COUNT];
        for violation in &self.violations {
            counts[violation.kind.index()] += 1;
        }
        counts
    }

    pub fn violations_for_side(&self, side: Side) -> impl Iterator<Item = &Violation> + '_ {
        self.violations.iter().filter(move |v| v.side == side)
    }
}
