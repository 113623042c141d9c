//! Fixed-length window features.
//!
//! The map's time range `[0, end)` is cut into windows of
//! [`FeatureConfig::window_size_beats`]. Every window produces the same
//! fixed-shape [`WindowFeatures`], so feature vectors of maps with different
//! lengths and densities can be compared directly. Windows without notes or
//! obstacles produce zeros, never errors.
//!
//! # Feature Layout
//!
//! [`WindowFeatures::to_vector`] flattens a window into `[f32; FEATURE_DIM]`
//! with the column ids in [`FEATURE_COLUMNS`]:
//!
//! ```text
//! left:  note_count, dir_s .. dir_any (9 fractions), interval_mean, interval_variance
//! right: (same 12 columns)
//! violation_count, violations per kind (4)
//! obstacle_coverage, symmetry
//! ```

use std::{iter, iter::FusedIterator, ops::Range};

use sabermap_model::{Beatmap, CutDirection, Note, Side};
use sabermap_stats::{
    descriptive::DescriptiveStats,
    similarity::{normalize_counts, normalized_cross_correlation},
};
use sabermap_validator::{ValidationReport, Violation, ViolationKind};
use serde::Serialize;

use crate::config::FeatureConfig;

const SIDE_DIM: usize = 3 + CutDirection::COUNT;

/// Length of [`WindowFeatures::to_vector`].
pub const FEATURE_DIM: usize = 2 * SIDE_DIM + 1 + ViolationKind::COUNT + 2;

/// Column ids of [`WindowFeatures::to_vector`], in order.
pub const FEATURE_COLUMNS: [&str; FEATURE_DIM] = [
    "left_note_count",
    "left_dir_s",
    "left_dir_n",
    "left_dir_e",
    "left_dir_w",
    "left_dir_se",
    "left_dir_sw",
    "left_dir_ne",
    "left_dir_nw",
    "left_dir_any",
    "left_interval_mean",
    "left_interval_variance",
    "right_note_count",
    "right_dir_s",
    "right_dir_n",
    "right_dir_e",
    "right_dir_w",
    "right_dir_se",
    "right_dir_sw",
    "right_dir_ne",
    "right_dir_nw",
    "right_dir_any",
    "right_interval_mean",
    "right_interval_variance",
    "violation_count",
    "violations_too_fast",
    "violations_impossible_angle",
    "violations_unreachable_distance",
    "violations_obstacle_blocked",
    "obstacle_coverage",
    "symmetry",
];

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
#[display("window size must be a positive number of beats, got {window_size_beats}")]
pub struct InvalidWindowSize {
    pub window_size_beats: f64,
}

/// Features of one side within one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SideFeatures {
    pub note_count: u32,
    /// Fraction of the side's notes per cut direction, indexed by [`CutDirection::bin`].
    pub direction_histogram: [f32; CutDirection::COUNT],
    /// Mean gap between consecutive notes of the side inside the window, in beats.
    pub interval_mean: f32,
    /// Population variance of the same gaps, in beats squared.
    pub interval_variance: f32,
}

impl SideFeatures {
    #[expect(clippy::cast_possible_truncation)]
    fn from_notes<'n, I>(notes: I) -> Self
    where
        I: IntoIterator<Item = &'n Note>,
    {
        let mut counts = [0_u32; CutDirection::COUNT];
        let mut note_count = 0;
        let mut previous = None;
        let mut intervals = vec![];
        for note in notes {
            note_count += 1;
            counts[note.direction.bin()] += 1;
            if let Some(previous) = previous.replace(note.time) {
                intervals.push((note.time - previous) as f32);
            }
        }
        let (interval_mean, interval_variance) = DescriptiveStats::mean_variance_or_zero(intervals);
        Self {
            note_count,
            direction_histogram: normalize_counts(&counts),
            interval_mean,
            interval_variance,
        }
    }
}

/// Features of one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowFeatures {
    pub index: usize,
    pub start_beat: f64,
    pub end_beat: f64,
    /// Indexed by [`Side::index`].
    pub sides: [SideFeatures; 2],
    /// Violations whose second note lies in the window, warnings included.
    pub violation_count: u32,
    /// Indexed by [`ViolationKind::index`].
    pub violations_by_kind: [u32; ViolationKind::COUNT],
    /// Fraction of the window during which at least one obstacle is present.
    pub obstacle_coverage: f32,
    /// Normalized cross-correlation of the two sides' direction histograms.
    pub symmetry: f32,
}

impl WindowFeatures {
    #[must_use]
    pub fn side(&self, side: Side) -> &SideFeatures {
        &self.sides[side.index()]
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn to_vector(&self) -> [f32; FEATURE_DIM] {
        let values = self
            .sides
            .iter()
            .flat_map(|side| {
                iter::once(side.note_count as f32)
                    .chain(side.direction_histogram)
                    .chain([side.interval_mean, side.interval_variance])
            })
            .chain(iter::once(self.violation_count as f32))
            .chain(self.violations_by_kind.map(|count| count as f32))
            .chain([self.obstacle_coverage, self.symmetry]);
        let mut vector = [0.0; FEATURE_DIM];
        for (slot, value) in vector.iter_mut().zip(values) {
            *slot = value;
        }
        vector
    }
}

/// Computes window features of one map from its validation report.
///
/// The extractor only borrows its inputs; [`FeatureExtractor::windows`] can
/// be called any number of times and always starts from the first window.
///
/// ```
/// use sabermap_analysis::{FeatureConfig, FeatureExtractor};
/// use sabermap_model::{BeatmapBuilder, CutDirection, GridPosition, Note, Side};
/// use sabermap_validator::{ValidatorConfig, validate};
///
/// let pos = GridPosition::new(0, 0)?;
/// let map = BeatmapBuilder::new(120.0)
///     .note(Note::new(0.0, pos, Side::Left, CutDirection::Any))
///     .note(Note::new(0.0, pos, Side::Right, CutDirection::Any))
///     .build()?;
/// let report = validate(&map, &ValidatorConfig::default());
/// let extractor = FeatureExtractor::new(&map, &report, &FeatureConfig::default())?;
///
/// let windows = extractor.windows().collect::<Vec<_>>();
/// assert_eq!(windows.len(), 1);
/// assert_eq!(windows[0].symmetry, 1.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FeatureExtractor<'a> {
    map: &'a Beatmap,
    /// Sorted by second note index.
    violations: &'a [Violation],
    window_size: f64,
    window_count: usize,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(
        map: &'a Beatmap,
        report: &'a ValidationReport,
        config: &FeatureConfig,
    ) -> Result<Self, InvalidWindowSize> {
        let window_size = config.window_size_beats;
        if !window_size.is_finite() || window_size <= 0.0 {
            return Err(InvalidWindowSize {
                window_size_beats: window_size,
            });
        }
        Ok(Self {
            map,
            violations: &report.violations,
            window_size,
            window_count: window_count(map, window_size),
        })
    }

    #[must_use]
    pub fn window_count(&self) -> usize {
        self.window_count
    }

    #[must_use]
    pub fn window_size_beats(&self) -> f64 {
        self.window_size
    }

    /// Lazily computes every window, in time order.
    #[must_use]
    pub fn windows(&self) -> WindowIter<'a> {
        WindowIter {
            extractor: *self,
            indices: 0..self.window_count,
        }
    }

    #[must_use]
    pub fn window(&self, index: usize) -> Option<WindowFeatures> {
        (index < self.window_count).then(|| self.compute(index))
    }

    #[expect(clippy::cast_precision_loss)]
    fn compute(&self, index: usize) -> WindowFeatures {
        let start = index as f64 * self.window_size;
        let end = (index + 1) as f64 * self.window_size;
        // The last window also takes notes lost to rounding at its upper edge.
        let note_end = if index + 1 == self.window_count {
            f64::INFINITY
        } else {
            end
        };
        let range = self.map.note_range_in_window(start, note_end);
        let notes = &self.map.notes()[range.clone()];
        let sides =
            Side::ALL.map(|side| SideFeatures::from_notes(notes.iter().filter(|n| n.side == side)));

        let mut violations_by_kind = [0; ViolationKind::COUNT];
        for violation in self.violations_in(&range) {
            violations_by_kind[violation.kind.index()] += 1;
        }
        let symmetry = normalized_cross_correlation(
            &sides[Side::Left.index()].direction_histogram,
            &sides[Side::Right.index()].direction_histogram,
        );

        WindowFeatures {
            index,
            start_beat: start,
            end_beat: end,
            sides,
            violation_count: violations_by_kind.iter().sum(),
            violations_by_kind,
            obstacle_coverage: self.obstacle_coverage(start, end),
            symmetry,
        }
    }

    fn violations_in(&self, notes: &Range<usize>) -> &'a [Violation] {
        let lo = self
            .violations
            .partition_point(|v| v.note_indices.1 < notes.start);
        let hi = self
            .violations
            .partition_point(|v| v.note_indices.1 < notes.end);
        &self.violations[lo..hi.max(lo)]
    }

    #[expect(clippy::cast_possible_truncation)]
    fn obstacle_coverage(&self, start: f64, end: f64) -> f32 {
        // Overlapping obstacles come in start order, so the union is swept in one pass.
        let mut covered = 0.0;
        let mut reach = start;
        for (_, obstacle) in self.map.obstacles_overlapping(start, end) {
            let from = obstacle.time.max(reach);
            let to = obstacle.end_time().min(end);
            if to > from {
                covered += to - from;
                reach = to;
            }
        }
        (covered / (end - start)).clamp(0.0, 1.0) as f32
    }
}

/// Smallest window count covering every note, bomb and obstacle.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn window_count(map: &Beatmap, window_size: f64) -> usize {
    // An instant needs the window containing it; an obstacle end only needs to be reached.
    let instants = map
        .notes()
        .iter()
        .map(|n| n.time)
        .chain(map.bombs().iter().map(|b| b.time))
        .chain(map.obstacles().iter().map(|o| o.time))
        .map(|t| (t / window_size).floor() + 1.0);
    let ends = map
        .obstacles()
        .iter()
        .map(|o| (o.end_time() / window_size).ceil());
    instants.chain(ends).fold(0.0, f64::max) as usize
}

/// Iterator over the windows of a [`FeatureExtractor`].
#[derive(Debug, Clone)]
pub struct WindowIter<'a> {
    extractor: FeatureExtractor<'a>,
    indices: Range<usize>,
}

impl Iterator for WindowIter<'_> {
    type Item = WindowFeatures;

    fn next(&mut self) -> Option<Self::Item> {
        self.indices.next().map(|i| self.extractor.compute(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl DoubleEndedIterator for WindowIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.indices.next_back().map(|i| self.extractor.compute(i))
    }
}

impl ExactSizeIterator for WindowIter<'_> {}

impl FusedIterator for WindowIter<'_> {}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;
    use sabermap_model::{BeatmapBuilder, GridPosition, Obstacle, ObstacleKind, ObstacleSpan};
    use sabermap_validator::{ValidatorConfig, validate};

    use super::*;

    fn note(time: f64, side: Side, direction: CutDirection) -> Note {
        Note::new(time, GridPosition::new(1, 0).unwrap(), side, direction)
    }

    fn wall(time: f64, duration: f64) -> Obstacle {
        Obstacle {
            time,
            duration,
            kind: ObstacleKind::Crouch,
            span: ObstacleSpan::new(0, 4, ObstacleKind::Crouch).unwrap(),
        }
    }

    fn windows(map: &Beatmap) -> Vec<WindowFeatures> {
        let report = validate(map, &ValidatorConfig::default());
        FeatureExtractor::new(map, &report, &FeatureConfig::default())
            .unwrap()
            .windows()
            .collect()
    }

    #[test]
    fn test_feature_columns_are_unique() {
        let ids = FEATURE_COLUMNS.iter().collect::<HashSet<_>>();
        assert_eq!(ids.len(), FEATURE_DIM);
    }

    #[test]
    fn test_empty_map_has_no_windows() {
        let map = BeatmapBuilder::new(120.0).build().unwrap();
        assert!(windows(&map).is_empty());
    }

    #[test]
    fn test_window_count_covers_notes_and_obstacle_ends() {
        let map = BeatmapBuilder::new(120.0)
            .note(note(4.0, Side::Left, CutDirection::South))
            .build()
            .unwrap();
        assert_eq!(windows(&map).len(), 2);

        let map = BeatmapBuilder::new(120.0)
            .note(note(1.0, Side::Left, CutDirection::South))
            .obstacle(wall(2.0, 6.0))
            .build()
            .unwrap();
        assert_eq!(windows(&map).len(), 2);

        let map = BeatmapBuilder::new(120.0)
            .obstacle(wall(2.0, 6.5))
            .build()
            .unwrap();
        assert_eq!(windows(&map).len(), 3);
    }

    #[test]
    fn test_empty_windows_are_zero_vectors() {
        let map = BeatmapBuilder::new(120.0)
            .note(note(9.0, Side::Right, CutDirection::North))
            .build()
            .unwrap();
        let windows = windows(&map);
        assert_eq!(windows.len(), 3);
        for window in &windows[..2] {
            assert_eq!(window.to_vector(), [0.0; FEATURE_DIM]);
        }
        assert_eq!(windows[2].side(Side::Right).note_count, 1);
        assert_eq!(windows[2].side(Side::Left), &SideFeatures::default());
    }

    #[test]
    fn test_any_notes_are_symmetric() {
        let map = BeatmapBuilder::new(120.0)
            .note(note(0.0, Side::Left, CutDirection::Any))
            .note(note(0.0, Side::Right, CutDirection::Any))
            .build()
            .unwrap();
        let windows = windows(&map);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].symmetry, 1.0);
        assert_eq!(windows[0].violation_count, 0);
        assert_eq!(windows[0].side(Side::Left).direction_histogram[8], 1.0);
    }

    #[test]
    fn test_side_intervals_and_histogram() {
        let map = BeatmapBuilder::new(120.0)
            .note(note(0.0, Side::Left, CutDirection::South))
            .note(note(0.5, Side::Right, CutDirection::South))
            .note(note(1.0, Side::Left, CutDirection::North))
            .note(note(1.5, Side::Left, CutDirection::South))
            .build()
            .unwrap();
        let left = windows(&map)[0].side(Side::Left).clone();
        assert_eq!(left.note_count, 3);
        assert!((left.interval_mean - 0.75).abs() < 1e-6);
        assert!((left.interval_variance - 0.0625).abs() < 1e-6);
        assert!((left.direction_histogram[CutDirection::South.bin()] - 2.0 / 3.0).abs() < 1e-6);
        assert!((left.direction_histogram[CutDirection::North.bin()] - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_obstacle_coverage_is_a_union() {
        let map = BeatmapBuilder::new(120.0)
            .obstacle(wall(1.0, 2.0))
            .obstacle(wall(2.0, 3.0))
            .build()
            .unwrap();
        let windows = windows(&map);
        assert_eq!(windows.len(), 2);
        assert!((windows[0].obstacle_coverage - 0.75).abs() < 1e-6);
        assert!((windows[1].obstacle_coverage - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_violation_counted_at_second_note() {
        let map = BeatmapBuilder::new(120.0)
            .note(note(3.99, Side::Left, CutDirection::South))
            .note(note(4.0, Side::Left, CutDirection::North))
            .build()
            .unwrap();
        let windows = windows(&map);
        assert_eq!(windows[0].violation_count, 0);
        assert_eq!(windows[1].violation_count, 1);
        assert_eq!(
            windows[1].violations_by_kind[ViolationKind::TooFast.index()],
            1
        );
    }

    #[test]
    fn test_rejects_bad_window_size() {
        let map = BeatmapBuilder::new(120.0).build().unwrap();
        let report = validate(&map, &ValidatorConfig::default());
        for size in [0.0, -1.0, f64::NAN] {
            let config = FeatureConfig {
                window_size_beats: size,
            };
            assert!(FeatureExtractor::new(&map, &report, &config).is_err());
        }
    }

    #[test]
    fn test_windows_cover_every_note_and_restart() {
        let mut rng = Pcg64Mcg::seed_from_u64(5);
        for _ in 0..20 {
            let mut time = 0.0;
            let notes = (0..rng.random_range(0..300))
                .map(|_| {
                    time += rng.random_range(0.0..1.0);
                    let side = Side::ALL[rng.random_range(0..2)];
                    let direction = CutDirection::ALL[rng.random_range(0..CutDirection::COUNT)];
                    note(time, side, direction)
                })
                .collect::<Vec<_>>();
            let map = BeatmapBuilder::new(140.0).notes(notes).build().unwrap();
            let report = validate(&map, &ValidatorConfig::default());
            let config = FeatureConfig {
                window_size_beats: rng.random_range(0.5..8.0),
            };
            let extractor = FeatureExtractor::new(&map, &report, &config).unwrap();

            let iter = extractor.windows();
            assert_eq!(iter.len(), extractor.window_count());
            let first = iter.collect::<Vec<_>>();
            let second = extractor.windows().collect::<Vec<_>>();
            assert_eq!(first, second);

            for side in Side::ALL {
                let total = first
                    .iter()
                    .map(|w| w.side(side).note_count as usize)
                    .sum::<usize>();
                assert_eq!(total, map.notes_for_side(side).count());
            }
            let violations = first.iter().map(|w| w.violation_count as usize).sum::<usize>();
            assert_eq!(violations, report.violations.len());
            for window in &first {
                let vector = window.to_vector();
                assert!(vector.iter().all(|v| v.is_finite()));
                assert!((0.0..=1.0).contains(&window.symmetry));
                assert!((0.0..=1.0).contains(&window.obstacle_coverage));
            }
        }
    }

    #[test]
    fn test_partially_consumed_iterator_clones() {
        let map = BeatmapBuilder::new(120.0)
            .notes((0..10).map(|i| note(f64::from(i) * 2.0, Side::Left, CutDirection::South)))
            .build()
            .unwrap();
        let report = validate(&map, &ValidatorConfig::default());
        let extractor = FeatureExtractor::new(&map, &report, &FeatureConfig::default()).unwrap();
        let mut iter = extractor.windows();
        iter.next();
        let rest = iter.clone().collect::<Vec<_>>();
        assert_eq!(rest.len(), iter.len());
        assert_eq!(rest, iter.collect::<Vec<_>>());
        assert_eq!(extractor.window(rest.len() + 1), None);
    }
}
