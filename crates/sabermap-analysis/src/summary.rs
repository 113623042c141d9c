//! Whole-map statistics.
//!
//! [`MapSummary`] describes a single map: note counts, how much it leans to
//! one hand, note spacing, where on the grid notes and bombs land, which cut
//! directions are used and how notes are spread over time.
//! [`CollectionSummary`] pools the same statistics over many maps and
//! averages their tempo metadata.

use sabermap_model::{Beatmap, CutDirection, Difficulty, GridPosition, MapMetadata, Side};
use sabermap_stats::{
    descriptive::DescriptiveStats, histogram::Histogram, percentiles::Percentiles,
    similarity::normalize_counts,
};
use serde::{Deserialize, Serialize};

/// Fractions per grid cell. Rows are layers, top layer first; columns are
/// tile indices, left to right.
pub type Heatmap = [[f32; GridPosition::COLUMNS as usize]; GridPosition::LAYERS as usize];

/// Percentile points reported for note intervals.
pub const INTERVAL_PERCENTILES: [f32; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Number of bins of the note time histogram (default: 60).
    pub time_histogram_bins: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            time_histogram_bins: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NoteCounts {
    pub left: usize,
    pub right: usize,
    pub bombs: usize,
    /// Left plus right.
    pub normal: usize,
}

/// Note statistics of one map or of a pooled collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteStatistics {
    pub counts: NoteCounts,
    /// Left fraction minus right fraction of normal notes, in `[-1, 1]`.
    pub leaning: f32,
    /// Mean gap between consecutive normal notes, in beats.
    pub average_interval_beats: f32,
    pub average_interval_seconds: f32,
    /// Percentiles of the same gaps, in beats.
    pub interval_percentiles: Percentiles,
    /// Normal notes per cell divided by the normal note count.
    pub note_heatmap: Heatmap,
    /// Bombs per cell divided by the bomb count.
    pub bomb_heatmap: Heatmap,
    /// Fraction of normal notes per cut direction, indexed by [`CutDirection::bin`].
    pub direction_fractions: [f32; CutDirection::COUNT],
    /// Note and bomb times, in beats.
    pub time_histogram: Histogram,
}

/// Raw counts collected from one or more maps.
#[derive(Debug, Default)]
struct NoteTally {
    counts: NoteCounts,
    intervals_beats: Vec<f32>,
    intervals_seconds: Vec<f32>,
    note_cells: [u32; GridPosition::CELL_COUNT],
    bomb_cells: [u32; GridPosition::CELL_COUNT],
    directions: [u32; CutDirection::COUNT],
    times: Vec<f32>,
}

impl NoteTally {
    #[expect(clippy::cast_possible_truncation)]
    fn add_map(&mut self, map: &Beatmap) {
        for note in map.notes() {
            match note.side {
                Side::Left => self.counts.left += 1,
                Side::Right => self.counts.right += 1,
            }
            self.note_cells[note.position.cell_index()] += 1;
            self.directions[note.direction.bin()] += 1;
            self.times.push(note.time as f32);
        }
        self.counts.normal = self.counts.left + self.counts.right;
        for bomb in map.bombs() {
            self.counts.bombs += 1;
            self.bomb_cells[bomb.position.cell_index()] += 1;
            self.times.push(bomb.time as f32);
        }
        for pair in map.notes().windows(2) {
            let beats = (pair[1].time - pair[0].time).abs();
            self.intervals_beats.push(beats as f32);
            self.intervals_seconds
                .push(map.beats_to_seconds(beats) as f32);
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn finish(self, config: &SummaryConfig) -> NoteStatistics {
        let counts = self.counts;
        let leaning = if counts.normal == 0 {
            0.0
        } else {
            (counts.left as f32 - counts.right as f32) / counts.normal as f32
        };
        let mean = |values: &[f32]| {
            DescriptiveStats::new(values.iter().copied()).map_or(0.0, |stats| stats.mean)
        };
        NoteStatistics {
            counts,
            leaning,
            average_interval_beats: mean(&self.intervals_beats),
            average_interval_seconds: mean(&self.intervals_seconds),
            interval_percentiles: Percentiles::new(&self.intervals_beats, &INTERVAL_PERCENTILES),
            note_heatmap: heatmap(&self.note_cells),
            bomb_heatmap: heatmap(&self.bomb_cells),
            direction_fractions: normalize_counts(&self.directions),
            time_histogram: Histogram::new(self.times, config.time_histogram_bins, None),
        }
    }
}

fn heatmap(cells: &[u32; GridPosition::CELL_COUNT]) -> Heatmap {
    let fractions = normalize_counts(cells);
    let mut heatmap = Heatmap::default();
    for position in GridPosition::all() {
        let row = usize::from(GridPosition::LAYERS - 1 - position.tile_layer());
        heatmap[row][usize::from(position.tile_index())] = fractions[position.cell_index()];
    }
    heatmap
}

/// Statistics of a single map.
///
/// ```
/// use sabermap_analysis::{MapSummary, SummaryConfig};
/// use sabermap_model::{BeatmapBuilder, CutDirection, GridPosition, Note, Side};
///
/// let map = BeatmapBuilder::new(120.0)
///     .note(Note::new(0.0, GridPosition::new(0, 0)?, Side::Left, CutDirection::South))
///     .note(Note::new(1.0, GridPosition::new(3, 2)?, Side::Left, CutDirection::North))
///     .note(Note::new(2.0, GridPosition::new(3, 2)?, Side::Right, CutDirection::North))
///     .build()?;
/// let summary = MapSummary::new(&map, &SummaryConfig::default());
///
/// assert_eq!(summary.notes.counts.normal, 3);
/// assert!((summary.notes.leaning - 1.0 / 3.0).abs() < 1e-6);
/// assert_eq!(summary.notes.average_interval_seconds, 0.5);
/// // Top row first.
/// assert!((summary.notes.note_heatmap[0][3] - 2.0 / 3.0).abs() < 1e-6);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSummary {
    pub bpm: f64,
    pub difficulty: Option<Difficulty>,
    pub metadata: MapMetadata,
    #[serde(flatten)]
    pub notes: NoteStatistics,
}

impl MapSummary {
    #[must_use]
    pub fn new(map: &Beatmap, config: &SummaryConfig) -> Self {
        let mut tally = NoteTally::default();
        tally.add_map(map);
        Self {
            bpm: map.bpm(),
            difficulty: map.difficulty(),
            metadata: map.metadata().clone(),
            notes: tally.finish(config),
        }
    }
}

/// Statistics pooled over a set of maps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSummary {
    pub map_count: usize,
    /// Averages over the maps that carry each value.
    pub average_bpm: Option<f64>,
    pub average_beats_per_bar: Option<f64>,
    pub average_note_jump_speed: Option<f64>,
    pub average_shuffle: Option<f64>,
    pub average_shuffle_period: Option<f64>,
    #[serde(flatten)]
    pub notes: NoteStatistics,
}

impl CollectionSummary {
    #[must_use]
    pub fn from_maps<'a, I>(maps: I, config: &SummaryConfig) -> Self
    where
        I: IntoIterator<Item = &'a Beatmap>,
    {
        let maps = maps.into_iter().collect::<Vec<_>>();
        let mut tally = NoteTally::default();
        for map in &maps {
            tally.add_map(map);
        }
        let mean_of = |value: fn(&Beatmap) -> Option<f64>| {
            average(maps.iter().filter_map(|&map| value(map)))
        };
        Self {
            map_count: maps.len(),
            average_bpm: mean_of(|m| Some(m.bpm())),
            average_beats_per_bar: mean_of(|m| m.metadata().beats_per_bar),
            average_note_jump_speed: mean_of(|m| m.metadata().note_jump_speed),
            average_shuffle: mean_of(|m| m.metadata().shuffle),
            average_shuffle_period: mean_of(|m| m.metadata().shuffle_period),
            notes: tally.finish(config),
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn average<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use sabermap_model::{BeatmapBuilder, Bomb, Note};

    use super::*;

    fn note(time: f64, index: u8, layer: u8, side: Side, direction: CutDirection) -> Note {
        Note::new(
            time,
            GridPosition::new(index, layer).unwrap(),
            side,
            direction,
        )
    }

    fn sample_map(bpm: f64, beats_per_bar: Option<f64>) -> Beatmap {
        BeatmapBuilder::new(bpm)
            .metadata(MapMetadata {
                beats_per_bar,
                ..MapMetadata::default()
            })
            .note(note(0.0, 0, 0, Side::Left, CutDirection::South))
            .note(note(1.0, 1, 1, Side::Right, CutDirection::North))
            .note(note(3.0, 1, 1, Side::Right, CutDirection::North))
            .note(note(4.0, 2, 2, Side::Right, CutDirection::Any))
            .bomb(Bomb {
                time: 2.0,
                position: GridPosition::new(3, 0).unwrap(),
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_map_summary_values() {
        let summary = MapSummary::new(&sample_map(60.0, None), &SummaryConfig::default());
        let notes = &summary.notes;
        assert_eq!(
            notes.counts,
            NoteCounts {
                left: 1,
                right: 3,
                bombs: 1,
                normal: 4
            }
        );
        assert!((notes.leaning + 0.5).abs() < 1e-6);
        // Gaps 1, 2, 1 beats; 60 bpm makes beats and seconds equal.
        assert!((notes.average_interval_beats - 4.0 / 3.0).abs() < 1e-6);
        assert!((notes.average_interval_seconds - 4.0 / 3.0).abs() < 1e-6);
        assert_eq!(notes.interval_percentiles.get(50.0), Some(1.0));

        assert!((notes.note_heatmap[2][0] - 0.25).abs() < 1e-6);
        assert!((notes.note_heatmap[1][1] - 0.5).abs() < 1e-6);
        assert!((notes.note_heatmap[0][2] - 0.25).abs() < 1e-6);
        assert_eq!(notes.bomb_heatmap[2][3], 1.0);

        let north = notes.direction_fractions[CutDirection::North.bin()];
        assert!((north - 0.5).abs() < 1e-6);
        assert_eq!(notes.direction_fractions.iter().sum::<f32>(), 1.0);
        assert_eq!(notes.time_histogram.total(), 5);
        assert_eq!(notes.time_histogram.bins.len(), 60);
    }

    #[test]
    fn test_empty_map_summary_is_zero() {
        let map = BeatmapBuilder::new(100.0).build().unwrap();
        let summary = MapSummary::new(&map, &SummaryConfig::default());
        assert_eq!(summary.notes.leaning, 0.0);
        assert_eq!(summary.notes.average_interval_beats, 0.0);
        assert_eq!(summary.notes.note_heatmap, Heatmap::default());
        assert_eq!(summary.notes.direction_fractions, [0.0; CutDirection::COUNT]);
        assert!(summary.notes.time_histogram.bins.is_empty());
    }

    #[test]
    fn test_collection_pools_notes_and_averages_metadata() {
        let a = sample_map(100.0, Some(4.0));
        let b = sample_map(200.0, None);
        let summary = CollectionSummary::from_maps([&a, &b], &SummaryConfig::default());
        assert_eq!(summary.map_count, 2);
        assert_eq!(summary.average_bpm, Some(150.0));
        assert_eq!(summary.average_beats_per_bar, Some(4.0));
        assert_eq!(summary.average_note_jump_speed, None);
        assert_eq!(summary.notes.counts.normal, 8);
        assert_eq!(summary.notes.counts.bombs, 2);
        // Intervals are taken within each map only.
        assert!((summary.notes.average_interval_beats - 4.0 / 3.0).abs() < 1e-6);
        let single = MapSummary::new(&a, &SummaryConfig::default());
        assert_eq!(summary.notes.note_heatmap, single.notes.note_heatmap);
    }

    #[test]
    fn test_empty_collection() {
        let summary = CollectionSummary::from_maps(Vec::<&Beatmap>::new(), &SummaryConfig::default());
        assert_eq!(summary.map_count, 0);
        assert_eq!(summary.average_bpm, None);
        assert_eq!(summary.notes.counts, NoteCounts::default());
    }

    #[test]
    fn test_summary_serializes_flat() {
        let summary = MapSummary::new(&sample_map(60.0, None), &SummaryConfig::default());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["counts"]["bombs"], 1);
        assert_eq!(json["bpm"], 60.0);
    }
}
