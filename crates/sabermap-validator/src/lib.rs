//! Swing-path performability checks.
//!
//! Each side's notes are checked pairwise, left to right, against the
//! thresholds in [`ValidatorConfig`]:
//!
//! - [`ViolationKind::TooFast`]: the gap is shorter than the minimum interval.
//! - [`ViolationKind::ImpossibleAngle`]: within the reset time, the next cut
//!   reverses the previous one by more than the allowed angle. Notes with the
//!   `Any` direction are never checked.
//! - [`ViolationKind::UnreachableDistance`]: the hand would have to move
//!   faster than the speed limit.
//! - [`ViolationKind::ObstacleBlocked`]: an obstacle present during the
//!   transition lies on the straight path between the two notes.
//!
//! A performability finding is data, not an error: every violation is
//! collected and returned in a [`ValidationReport`].
//!
//! # Example
//!
//! ```
//! use sabermap_model::{BeatmapBuilder, CutDirection, GridPosition, Note, Side};
//! use sabermap_validator::{ValidatorConfig, ViolationKind, validate};
//!
//! let pos = GridPosition::new(1, 0)?;
//! let map = BeatmapBuilder::new(120.0)
//!     .note(Note::new(0.0, pos, Side::Left, CutDirection::South))
//!     .note(Note::new(0.05, pos, Side::Left, CutDirection::North))
//!     .build()?;
//! let config = ValidatorConfig {
//!     min_inter_note_interval_beats: 0.1,
//!     ..ValidatorConfig::default()
//! };
//!
//! let report = validate(&map, &config);
//! assert_eq!(report.violations.len(), 1);
//! assert_eq!(report.violations[0].kind, ViolationKind::TooFast);
//! assert_eq!(report.violations[0].note_indices, (0, 1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::thread;

use sabermap_model::{Beatmap, Side};

pub use self::{config::*, report::*, swing::*, violation::*};

mod config;
mod report;
mod swing;
mod violation;

/// Validates both sides one after the other.
#[must_use]
pub fn validate(map: &Beatmap, config: &ValidatorConfig) -> ValidationReport {
    let [left, right] = Side::ALL.map(|side| validate_side(map, side, config));
    ValidationReport::merge(left, right)
}

/// Validates both sides on scoped threads.
///
/// Gives the same report as [`validate`].
#[must_use]
pub fn validate_parallel(map: &Beatmap, config: &ValidatorConfig) -> ValidationReport {
    let mut results = Side::ALL.map(SideValidation::empty);
    thread::scope(|s| {
        for (side, result) in Side::ALL.into_iter().zip(&mut results) {
            s.spawn(move || {
                *result = validate_side(map, side, config);
            });
        }
    });
    let [left, right] = results;
    ValidationReport::merge(left, right)
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;
    use sabermap_model::{
        BeatmapBuilder, CutDirection, GridPosition, Note, Obstacle, ObstacleKind, ObstacleSpan,
    };

    use super::*;

    fn random_map(rng: &mut Pcg64Mcg, note_count: usize) -> Beatmap {
        let mut time = 0.0;
        let notes = (0..note_count)
            .map(|_| {
                time += f64::from(rng.random_range(0..8_u8)) * 0.0625;
                let position = GridPosition::new(
                    rng.random_range(0..GridPosition::COLUMNS),
                    rng.random_range(0..GridPosition::LAYERS),
                )
                .unwrap();
                let side = Side::ALL[rng.random_range(0..2)];
                let direction = CutDirection::ALL[rng.random_range(0..CutDirection::COUNT)];
                Note::new(time, position, side, direction)
            })
            .collect::<Vec<_>>();
        let wall = Obstacle {
            time: 2.0,
            duration: 3.0,
            kind: ObstacleKind::FullHeight,
            span: ObstacleSpan::new(1, 2, ObstacleKind::FullHeight).unwrap(),
        };
        BeatmapBuilder::new(f64::from(rng.random_range(90..200_u8)))
            .notes(notes)
            .obstacle(wall)
            .build()
            .unwrap()
    }

    #[test]
    fn test_any_notes_on_both_sides_are_clean() {
        let pos = GridPosition::new(0, 0).unwrap();
        let map = BeatmapBuilder::new(120.0)
            .note(Note::new(0.0, pos, Side::Left, CutDirection::Any))
            .note(Note::new(0.0, pos, Side::Right, CutDirection::Any))
            .build()
            .unwrap();
        let report = validate(&map, &ValidatorConfig::default());
        assert!(report.violations.is_empty());
        assert!(report.is_performable());
        assert_eq!(report.side(Side::Left).state, SwingState::Ok);
    }

    #[test]
    fn test_merged_violations_are_ordered() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        let map = random_map(&mut rng, 200);
        let report = validate(&map, &ValidatorConfig::default());
        assert!(!report.violations.is_empty());
        assert!(
            report
                .violations
                .is_sorted_by_key(Violation::order_key)
        );
        for violation in &report.violations {
            let (a, b) = violation.note_indices;
            assert!(a < b);
            assert_eq!(map.notes()[a].side, violation.side);
            assert_eq!(map.notes()[b].side, violation.side);
        }
        let counted = report.counts_by_kind().iter().sum::<usize>();
        assert_eq!(counted, report.violations.len());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        for _ in 0..10 {
            let map = random_map(&mut rng, 120);
            let config = ValidatorConfig::default();
            assert_eq!(validate(&map, &config), validate_parallel(&map, &config));
        }
    }

    #[test]
    fn test_validation_is_idempotent() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let map = random_map(&mut rng, 150);
        let config = ValidatorConfig::default();
        let first = validate(&map, &config);
        let second = validate(&map, &config);
        assert_eq!(first, second);
        let bits = |r: &ValidationReport| {
            r.violations
                .iter()
                .map(|v| (v.measured.to_bits(), v.threshold.to_bits()))
                .collect::<Vec<_>>()
        };
        assert_eq!(bits(&first), bits(&second));
    }

    #[test]
    fn test_raising_min_interval_never_lowers_too_fast_count() {
        let mut rng = Pcg64Mcg::seed_from_u64(11);
        for _ in 0..20 {
            let map = random_map(&mut rng, 80);
            let mut previous = 0;
            for step in 0..10 {
                let config = ValidatorConfig {
                    min_inter_note_interval_beats: f64::from(step) * 0.05,
                    ..ValidatorConfig::default()
                };
                let count = validate(&map, &config).count(ViolationKind::TooFast);
                assert!(count >= previous);
                previous = count;
            }
        }
    }

    #[test]
    fn test_report_serializes() {
        let pos = GridPosition::new(1, 1).unwrap();
        let map = BeatmapBuilder::new(120.0)
            .note(Note::new(0.0, pos, Side::Right, CutDirection::South))
            .note(Note::new(0.01, pos, Side::Right, CutDirection::North))
            .build()
            .unwrap();
        let report = validate(&map, &ValidatorConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["violations"][0]["kind"], "too_fast");
        assert_eq!(json["violations"][0]["side"], "right");
        assert_eq!(json["sides"][1]["state"], "violation");
    }
}
