//! Per-side swing tracking.
//!
//! A side's notes are folded left to right. The accumulator carries the
//! previous note (its position, cut direction and time), the verdict so far
//! and every violation found; each new note is checked against the previous
//! one and then becomes the previous note itself.
//!
//! ```text
//! Start --first note--> Ok --clean transition--> Ok
//!                        |
//!                        +--error violation--> Violation (sticky)
//! ```
//!
//! Warnings are recorded but never move the state machine.

use arrayvec::ArrayVec;
use sabermap_model::{Beatmap, Note, Side, angle_between, vector_of};
use serde::Serialize;

use crate::{
    config::{ObstacleSeverity, ValidatorConfig},
    report::SideReport,
    violation::{Severity, Violation, ViolationKind},
};

/// Verdict of a side's state machine.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum SwingState {
    /// No note seen yet.
    #[default]
    #[display("start")]
    Start,
    #[display("ok")]
    Ok,
    #[display("violation")]
    Violation,
}

impl SwingState {
    #[must_use]
    pub fn advance(self, failed: bool) -> Self {
        match self {
            Self::Violation => Self::Violation,
            _ if failed => Self::Violation,
            Self::Start | Self::Ok => Self::Ok,
        }
    }
}

/// Result of validating one side.
#[derive(Debug, Clone, PartialEq)]
pub struct SideValidation {
    pub report: SideReport,
    /// Violations in transition order.
    pub violations: Vec<Violation>,
}

impl SideValidation {
    /// The result for a side without notes.
    #[must_use]
    pub fn empty(side: Side) -> Self {
        SwingTracker::new(side).finish()
    }
}

/// Fold accumulator for one side.
#[derive(Debug)]
struct SwingTracker<'a> {
    side: Side,
    state: SwingState,
    previous: Option<(usize, &'a Note)>,
    note_count: usize,
    transition_count: usize,
    violations: Vec<Violation>,
}

impl<'a> SwingTracker<'a> {
    fn new(side: Side) -> Self {
        Self {
            side,
            state: SwingState::Start,
            previous: None,
            note_count: 0,
            transition_count: 0,
            violations: vec![],
        }
    }

    fn step(mut self, map: &Beatmap, config: &ValidatorConfig, index: usize, note: &'a Note) -> Self {
        self.note_count += 1;
        let failed = match self.previous.replace((index, note)) {
            None => false,
            Some(previous) => {
                self.transition_count += 1;
                let found = self.violations.len();
                let transition = Transition {
                    side: self.side,
                    from: previous,
                    to: (index, note),
                };
                self.violations.extend(transition.check_kinematics(map, config));
                transition.check_obstacles(map, config, &mut self.violations);
                for violation in &self.violations[found..] {
                    log::trace!(
                        "{} {} between notes {} and {}: measured {:.4}, threshold {:.4}",
                        violation.severity,
                        violation.kind,
                        violation.note_indices.0,
                        violation.note_indices.1,
                        violation.measured,
                        violation.threshold
                    );
                }
                self.violations[found..]
                    .iter()
                    .any(|v| v.severity.is_error())
            }
        };
        self.state = self.state.advance(failed);
        self
    }

    fn finish(self) -> SideValidation {
        let error_count = self
            .violations
            .iter()
            .filter(|v| v.severity.is_error())
            .count();
        let report = SideReport {
            side: self.side,
            state: self.state,
            note_count: self.note_count,
            transition_count: self.transition_count,
            error_count,
            warning_count: self.violations.len() - error_count,
        };
        SideValidation {
            report,
            violations: self.violations,
        }
    }
}

/// Two consecutive notes of one side.
#[derive(Debug, Clone, Copy)]
struct Transition<'a> {
    side: Side,
    from: (usize, &'a Note),
    to: (usize, &'a Note),
}

impl Transition<'_> {
    fn violation(&self, kind: ViolationKind, measured: f64, threshold: f64) -> Violation {
        Violation {
            side: self.side,
            note_indices: (self.from.0, self.to.0),
            kind,
            measured,
            threshold,
            severity: Severity::Error,
            obstacle_index: None,
        }
    }

    /// Timing, direction and distance checks; each fires at most once.
    fn check_kinematics(&self, map: &Beatmap, config: &ValidatorConfig) -> ArrayVec<Violation, 3> {
        let (from, to) = (self.from.1, self.to.1);
        let mut found = ArrayVec::new();

        let dt_seconds = map.beats_to_seconds(to.time - from.time);
        let min_interval = map.beats_to_seconds(config.min_inter_note_interval_beats);
        if dt_seconds < min_interval {
            found.push(self.violation(ViolationKind::TooFast, dt_seconds, min_interval));
        }
        // Simultaneous notes cannot be judged by angle or speed.
        if dt_seconds <= 0.0 {
            return found;
        }

        if dt_seconds < config.angle_reset_seconds
            && let (Some(exit), Some(entry)) = (vector_of(from.direction), vector_of(to.direction))
        {
            let reversal = 180.0 - angle_between(exit, entry);
            if reversal > config.max_angle_reversal_degrees {
                found.push(self.violation(
                    ViolationKind::ImpossibleAngle,
                    reversal,
                    config.max_angle_reversal_degrees,
                ));
            }
        }

        let speed = from.point().distance(to.point()) / dt_seconds;
        if speed > config.max_limb_speed {
            found.push(self.violation(
                ViolationKind::UnreachableDistance,
                speed,
                config.max_limb_speed,
            ));
        }
        found
    }

    fn check_obstacles(&self, map: &Beatmap, config: &ValidatorConfig, out: &mut Vec<Violation>) {
        let severity = match config.obstacle_severity {
            ObstacleSeverity::Ignore => return,
            ObstacleSeverity::Error => Severity::Error,
            ObstacleSeverity::Warning => Severity::Warning,
        };
        let (from, to) = (self.from.1, self.to.1);
        let (a, b) = (from.point(), to.point());
        for (index, obstacle) in map.obstacles_overlapping(from.time, to.time) {
            let fraction = obstacle.span.rect().segment_overlap(a, b);
            if fraction > 0.0 {
                out.push(Violation {
                    severity,
                    obstacle_index: Some(index),
                    ..self.violation(ViolationKind::ObstacleBlocked, fraction, 0.0)
                });
            }
        }
    }
}

/// Validates the notes of one side.
#[must_use]
pub fn validate_side(map: &Beatmap, side: Side, config: &ValidatorConfig) -> SideValidation {
    let validation = map
        .notes_for_side(side)
        .fold(SwingTracker::new(side), |tracker, (index, note)| {
            tracker.step(map, config, index, note)
        })
        .finish();
    log::debug!(
        "{} side: {} notes, {} errors, {} warnings, state {}",
        side.name(),
        validation.report.note_count,
        validation.report.error_count,
        validation.report.warning_count,
        validation.report.state
    );
    validation
}
