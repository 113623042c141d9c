use std::{fmt, ops::Range};

use serde::Serialize;

use super::{Bomb, Event, Note, Obstacle, Side};
use crate::error::{MalformedKind, MalformedMapError, MapField, RecordLocation};

/// Difficulty label of a map.
///
/// Parses case-insensitively from its name (`"expertplus"`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, derive_more::FromStr,
)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Expert,
    ExpertPlus,
}

impl Difficulty {
    pub const ALL: [Self; 5] = [
        Self::Easy,
        Self::Normal,
        Self::Hard,
        Self::Expert,
        Self::ExpertPlus,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
            Self::Expert => "Expert",
            Self::ExpertPlus => "ExpertPlus",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    /// Difficulty encoded in a difficulty file name such as `ExpertPlus.json`.
    ///
    /// ```
    /// use sabermap_model::Difficulty;
    ///
    /// assert_eq!(Difficulty::from_file_name("ExpertPlus.json"), Some(Difficulty::ExpertPlus));
    /// assert_eq!(Difficulty::from_file_name("info.json"), None);
    /// ```
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);
        Self::from_name(stem)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Optional pass-through values found in the map file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapMetadata {
    pub version: Option<String>,
    pub beats_per_bar: Option<f64>,
    pub note_jump_speed: Option<f64>,
    pub shuffle: Option<f64>,
    pub shuffle_period: Option<f64>,
}

/// How the builder treats notes that are not in time order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Stable-sort by time, keeping input order for ties.
    #[default]
    Sort,
    /// Reject decreasing note times.
    Strict,
}

/// An immutable, fully validated map.
///
/// Notes are sorted by time; notes with equal time keep their input order.
/// Obstacles are sorted by start time, bombs and events by time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Beatmap {
    bpm: f64,
    difficulty: Option<Difficulty>,
    metadata: MapMetadata,
    notes: Vec<Note>,
    bombs: Vec<Bomb>,
    obstacles: Vec<Obstacle>,
    /// `obstacle_reach[i]` is the latest end time among `obstacles[..=i]`.
    #[serde(skip)]
    obstacle_reach: Vec<f64>,
    events: Vec<Event>,
}

impl Beatmap {
    #[must_use]
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    #[must_use]
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.bpm
    }

    #[must_use]
    pub fn beats_to_seconds(&self, beats: f64) -> f64 {
        beats * self.seconds_per_beat()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    #[must_use]
    pub fn metadata(&self) -> &MapMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Notes struck by `side`, in time order, paired with their index in [`Beatmap::notes`].
    pub fn notes_for_side(&self, side: Side) -> impl Iterator<Item = (usize, &Note)> + Clone + '_ {
        self.notes
            .iter()
            .enumerate()
            .filter(move |(_, note)| note.side == side)
    }

    /// Index range of the notes with `t_start <= time < t_end`.
    #[must_use]
    pub fn note_range_in_window(&self, t_start: f64, t_end: f64) -> Range<usize> {
        let start = self.notes.partition_point(|n| n.time < t_start);
        let end = self.notes.partition_point(|n| n.time < t_end).max(start);
        start..end
    }

    /// Notes with `t_start <= time < t_end`, in time order.
    #[must_use]
    pub fn notes_in_window(&self, t_start: f64, t_end: f64) -> &[Note] {
        &self.notes[self.note_range_in_window(t_start, t_end)]
    }

    /// Obstacles present at `t` (bounds included).
    pub fn obstacles_active_at(&self, t: f64) -> impl Iterator<Item = &Obstacle> + '_ {
        self.obstacles.iter().filter(move |o| o.is_active_at(t))
    }

    /// Obstacles overlapping `(start, end)` in start order, with their indices.
    ///
    /// See [`Obstacle::overlaps`] for how touching bounds are treated.
    pub fn obstacles_overlapping(
        &self,
        start: f64,
        end: f64,
    ) -> impl Iterator<Item = (usize, &Obstacle)> + '_ {
        // Nothing starting after `end` can overlap, nor anything before the
        // first obstacle whose running end time reaches `start`.
        let upper = self.obstacles.partition_point(|o| o.time <= end);
        let lower = self.obstacle_reach.partition_point(|&t| t < start).min(upper);
        self.obstacles[lower..upper]
            .iter()
            .enumerate()
            .map(move |(offset, o)| (lower + offset, o))
            .filter(move |(_, o)| o.overlaps(start, end))
    }

    /// Latest gameplay moment: last note or bomb, or the end of the last obstacle.
    ///
    /// `None` for a map without notes, bombs or obstacles.
    #[must_use]
    pub fn end_time(&self) -> Option<f64> {
        let notes = self.notes.last().map(|n| n.time);
        let bombs = self.bombs.last().map(|b| b.time);
        let obstacles = self
            .obstacles
            .iter()
            .map(Obstacle::end_time)
            .max_by(f64::total_cmp);
        [notes, bombs, obstacles]
            .into_iter()
            .flatten()
            .max_by(f64::total_cmp)
    }
}

/// Collects the parts of a [`Beatmap`] and validates them in one step.
///
/// [`BeatmapBuilder::build`] either returns a complete map or an error; no
/// partially built map is ever observable.
#[derive(Debug, Clone, Default)]
pub struct BeatmapBuilder {
    bpm: Option<f64>,
    difficulty: Option<Difficulty>,
    metadata: MapMetadata,
    ordering: OrderPolicy,
    notes: Vec<Note>,
    bombs: Vec<Bomb>,
    obstacles: Vec<Obstacle>,
    events: Vec<Event>,
}

impl BeatmapBuilder {
    #[must_use]
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm: Some(bpm),
            ..Self::default()
        }
    }

    /// A builder without a tempo; `build` fails unless one is set later.
    #[must_use]
    pub fn without_bpm() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = Some(bpm);
        self
    }

    #[must_use]
    pub fn difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn metadata(mut self, metadata: MapMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn ordering(mut self, ordering: OrderPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    #[must_use]
    pub fn note(mut self, note: Note) -> Self {
        self.notes.push(note);
        self
    }

    #[must_use]
    pub fn notes<I>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = Note>,
    {
        self.notes.extend(notes);
        self
    }

    #[must_use]
    pub fn bomb(mut self, bomb: Bomb) -> Self {
        self.bombs.push(bomb);
        self
    }

    #[must_use]
    pub fn obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    #[must_use]
    pub fn event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn build(self) -> Result<Beatmap, MalformedMapError> {
        let bpm = self.bpm.ok_or_else(|| MalformedMapError::missing(MapField::Bpm))?;
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(MalformedMapError::new(
                MapField::Bpm,
                MalformedKind::OutOfRange,
                bpm,
            ));
        }

        for (index, note) in self.notes.iter().enumerate() {
            check_time(note.time).map_err(|e| e.at(RecordLocation::note(index)))?;
        }
        if self.ordering == OrderPolicy::Strict
            && let Some(index) = self.notes.windows(2).position(|w| w[1].time < w[0].time)
        {
            return Err(MalformedMapError::new(
                MapField::Time,
                MalformedKind::Unordered,
                self.notes[index + 1].time,
            )
            .at(RecordLocation::note(index + 1)));
        }
        for bomb in &self.bombs {
            check_time(bomb.time)?;
        }
        for (index, obstacle) in self.obstacles.iter().enumerate() {
            check_time(obstacle.time).map_err(|e| e.at(RecordLocation::obstacle(index)))?;
            if !obstacle.duration.is_finite() || obstacle.duration < 0.0 {
                return Err(MalformedMapError::new(
                    MapField::Duration,
                    MalformedKind::OutOfRange,
                    obstacle.duration,
                )
                .at(RecordLocation::obstacle(index)));
            }
        }
        for (index, event) in self.events.iter().enumerate() {
            if !event.time.is_finite() {
                return Err(MalformedMapError::new(
                    MapField::Time,
                    MalformedKind::Invalid,
                    event.time,
                )
                .at(RecordLocation::event(index)));
            }
        }

        let mut notes = self.notes;
        if !notes.is_sorted_by(|a, b| a.time <= b.time) {
            log::warn!("notes are not in time order, sorting {} notes", notes.len());
            // `sort_by` is stable: simultaneous notes keep their input order.
            notes.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
        let mut bombs = self.bombs;
        bombs.sort_by(|a, b| a.time.total_cmp(&b.time));
        let mut obstacles = self.obstacles;
        obstacles.sort_by(|a, b| a.time.total_cmp(&b.time));
        let obstacle_reach = obstacles
            .iter()
            .scan(f64::NEG_INFINITY, |reach, o| {
                *reach = reach.max(o.end_time());
                Some(*reach)
            })
            .collect();
        let mut events = self.events;
        events.sort_by(|a, b| a.time.total_cmp(&b.time));

        Ok(Beatmap {
            bpm,
            difficulty: self.difficulty,
            metadata: self.metadata,
            notes,
            bombs,
            obstacles,
            obstacle_reach,
            events,
        })
    }
}

fn check_time(time: f64) -> Result<(), MalformedMapError> {
    if !time.is_finite() || time < 0.0 {
        return Err(MalformedMapError::new(
            MapField::Time,
            MalformedKind::OutOfRange,
            time,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CutDirection, GridPosition, ObstacleKind, ObstacleSpan};

    fn note(time: f64, index: u8, side: Side) -> Note {
        Note::new(
            time,
            GridPosition::new(index, 0).unwrap(),
            side,
            CutDirection::South,
        )
    }

    fn wall(time: f64, duration: f64) -> Obstacle {
        Obstacle {
            time,
            duration,
            kind: ObstacleKind::FullHeight,
            span: ObstacleSpan::new(0, 1, ObstacleKind::FullHeight).unwrap(),
        }
    }

    #[test]
    fn test_sort_is_stable_for_simultaneous_notes() {
        let map = BeatmapBuilder::new(100.0)
            .note(note(1.0, 0, Side::Left))
            .note(note(0.5, 1, Side::Right))
            .note(note(0.5, 2, Side::Left))
            .build()
            .unwrap();
        let order = map
            .notes()
            .iter()
            .map(|n| n.position.tile_index())
            .collect::<Vec<_>>();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[test]
    fn test_strict_ordering_rejects_decreasing_time() {
        let err = BeatmapBuilder::new(100.0)
            .ordering(OrderPolicy::Strict)
            .note(note(1.0, 0, Side::Left))
            .note(note(0.5, 1, Side::Right))
            .build()
            .unwrap_err();
        assert_eq!(err.kind, MalformedKind::Unordered);
        assert_eq!(err.location, Some(RecordLocation::note(1)));
    }

    #[test]
    fn test_missing_or_bad_bpm() {
        let err = BeatmapBuilder::without_bpm().build().unwrap_err();
        assert_eq!(err.field, MapField::Bpm);
        assert!(err.kind.is_missing());
        let err = BeatmapBuilder::new(0.0).build().unwrap_err();
        assert!(err.kind.is_out_of_range());
        assert!(BeatmapBuilder::new(f64::NAN).build().is_err());
    }

    #[test]
    fn test_negative_time_is_rejected() {
        let err = BeatmapBuilder::new(120.0)
            .note(note(-0.5, 0, Side::Left))
            .build()
            .unwrap_err();
        assert_eq!(err.field, MapField::Time);
        assert_eq!(err.location, Some(RecordLocation::note(0)));
    }

    #[test]
    fn test_notes_for_side_keeps_global_indices() {
        let map = BeatmapBuilder::new(120.0)
            .note(note(0.0, 0, Side::Left))
            .note(note(1.0, 1, Side::Right))
            .note(note(2.0, 2, Side::Left))
            .build()
            .unwrap();
        let left = map
            .notes_for_side(Side::Left)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        assert_eq!(left, vec![0, 2]);
    }

    #[test]
    fn test_notes_in_window_is_half_open() {
        let map = BeatmapBuilder::new(120.0)
            .notes([0.0, 1.0, 2.0, 3.0].map(|t| note(t, 0, Side::Left)))
            .build()
            .unwrap();
        assert_eq!(map.notes_in_window(1.0, 3.0).len(), 2);
        assert_eq!(map.note_range_in_window(1.0, 3.0), 1..3);
        assert!(map.notes_in_window(5.0, 1.0).is_empty());
    }

    #[test]
    fn test_obstacle_queries_and_end_time() {
        let map = BeatmapBuilder::new(120.0)
            .note(note(1.0, 0, Side::Left))
            .obstacle(wall(4.0, 2.0))
            .obstacle(wall(0.0, 1.0))
            .build()
            .unwrap();
        assert_eq!(map.obstacles_active_at(0.5).count(), 1);
        assert_eq!(map.obstacles_active_at(3.0).count(), 0);
        let overlapping = map
            .obstacles_overlapping(0.5, 4.5)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        assert_eq!(overlapping, vec![0, 1]);
        assert_eq!(map.end_time(), Some(6.0));
    }

    #[test]
    fn test_obstacles_overlapping_skips_finished_walls() {
        let map = BeatmapBuilder::new(120.0)
            .obstacle(wall(0.0, 1.0))
            .obstacle(wall(1.0, 1.0))
            .obstacle(wall(2.0, 8.0))
            .obstacle(wall(3.0, 0.5))
            .obstacle(wall(12.0, 1.0))
            .build()
            .unwrap();
        let overlapping = |start, end| {
            map.obstacles_overlapping(start, end)
                .map(|(i, _)| i)
                .collect::<Vec<_>>()
        };
        // Walls ending exactly at the start only touch the interval.
        assert_eq!(overlapping(2.0, 2.5), vec![2]);
        assert_eq!(overlapping(3.5, 12.0), vec![2]);
        assert_eq!(overlapping(0.5, 1.5), vec![0, 1]);
        assert_eq!(overlapping(3.2, 3.2), vec![2, 3]);
        assert!(overlapping(20.0, 30.0).is_empty());
    }

    #[test]
    fn test_empty_map_has_no_end() {
        let map = BeatmapBuilder::new(120.0).build().unwrap();
        assert_eq!(map.end_time(), None);
    }
}
