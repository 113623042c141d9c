//! Loader for the v2 JSON difficulty format (`_notes`, `_obstacles`, `_events`).
//!
//! The raw records mirror the file layout field for field; every field is
//! optional and untyped at this level so that a missing value is reported as
//! [`MalformedKind::Missing`] and a wrongly typed one as
//! [`MalformedKind::Invalid`] on the exact field, instead of a generic parse
//! failure.
//!
//! # Example
//!
//! ```
//! use sabermap_model::{MapField, loader::{LoadOptions, load_from_str}};
//!
//! let json = r#"{
//!     "_beatsPerMinute": 120,
//!     "_notes": [
//!         { "_time": 0.0, "_lineIndex": 1, "_lineLayer": 0, "_type": 0, "_cutDirection": 1 },
//!         { "_time": 1.0, "_lineIndex": 2, "_lineLayer": 0, "_type": 3, "_cutDirection": 0 }
//!     ]
//! }"#;
//! let map = load_from_str(json, &LoadOptions::default())?;
//! assert_eq!(map.notes().len(), 1);
//! assert_eq!(map.bombs().len(), 1);
//!
//! let err = load_from_str(r#"{ "_notes": [] }"#, &LoadOptions::default()).unwrap_err();
//! assert_eq!(err.field, MapField::Bpm);
//! # Ok::<(), sabermap_model::MalformedMapError>(())
//! ```

use std::io;

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{MalformedKind, MalformedMapError, MapField, RecordLocation},
    geometry::{CutDirection, GridPosition},
    model::{
        Beatmap, BeatmapBuilder, Bomb, Difficulty, Event, MapMetadata, Note, NoteKind, Obstacle,
        ObstacleKind, ObstacleSpan, OrderPolicy, Side,
    },
};

/// Caller-supplied information that is not (or not reliably) in the file.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Tempo to use instead of `_beatsPerMinute`; newer maps keep it in `info.dat`.
    pub bpm_override: Option<f64>,
    pub difficulty: Option<Difficulty>,
    pub ordering: OrderPolicy,
}

/// Scalar fields are kept as raw JSON values and converted per field, so that
/// a missing or wrongly typed value is reported against that field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBeatmap {
    #[serde(rename = "_version")]
    pub version: Option<Value>,
    #[serde(rename = "_beatsPerMinute")]
    pub beats_per_minute: Option<Value>,
    #[serde(rename = "_beatsPerBar")]
    pub beats_per_bar: Option<Value>,
    #[serde(rename = "_noteJumpSpeed")]
    pub note_jump_speed: Option<Value>,
    #[serde(rename = "_shuffle")]
    pub shuffle: Option<Value>,
    #[serde(rename = "_shufflePeriod")]
    pub shuffle_period: Option<Value>,
    #[serde(rename = "_notes")]
    pub notes: Option<Vec<RawNote>>,
    #[serde(rename = "_obstacles", default)]
    pub obstacles: Vec<RawObstacle>,
    #[serde(rename = "_events", default)]
    pub events: Vec<RawEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNote {
    #[serde(rename = "_time")]
    pub time: Option<Value>,
    #[serde(rename = "_lineIndex")]
    pub line_index: Option<Value>,
    #[serde(rename = "_lineLayer")]
    pub line_layer: Option<Value>,
    #[serde(rename = "_type")]
    pub kind: Option<Value>,
    #[serde(rename = "_cutDirection")]
    pub cut_direction: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawObstacle {
    #[serde(rename = "_time")]
    pub time: Option<Value>,
    #[serde(rename = "_lineIndex")]
    pub line_index: Option<Value>,
    #[serde(rename = "_type")]
    pub kind: Option<Value>,
    #[serde(rename = "_duration")]
    pub duration: Option<Value>,
    #[serde(rename = "_width")]
    pub width: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "_time")]
    pub time: Option<Value>,
    #[serde(rename = "_type")]
    pub kind: Option<Value>,
    #[serde(rename = "_value")]
    pub value: Option<Value>,
}

/// The checked fields of a `_notes` record; the format stores bombs alongside notes.
#[derive(Debug, Clone, Copy)]
enum NoteRecord {
    Note {
        time: f64,
        position: GridPosition,
        side: Side,
        direction: CutDirection,
    },
    Bomb {
        time: f64,
        position: GridPosition,
    },
}

impl NoteRecord {
    fn time(&self) -> f64 {
        match *self {
            Self::Note { time, .. } | Self::Bomb { time, .. } => time,
        }
    }
}

fn required<T>(value: Option<T>, field: MapField) -> Result<T, MalformedMapError> {
    value.ok_or_else(|| MalformedMapError::missing(field))
}

/// A JSON number, or `None` when the field is absent or `null`.
fn number(value: Option<&Value>, field: MapField) -> Result<Option<f64>, MalformedMapError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| MalformedMapError::new(field, MalformedKind::Invalid, n)),
        Some(other) => Err(MalformedMapError::new(field, MalformedKind::Invalid, other)),
    }
}

/// A whole JSON number; `2.0` is accepted as `2`, `1.5` is not.
#[expect(clippy::cast_possible_truncation)]
fn integer(value: Option<&Value>, field: MapField) -> Result<Option<i64>, MalformedMapError> {
    if let Some(Value::Number(n)) = value
        && let Some(i) = n.as_i64()
    {
        return Ok(Some(i));
    }
    match number(value, field)? {
        None => Ok(None),
        Some(x) if x.fract() == 0.0 && x.abs() < 9.0e15 => Ok(Some(x as i64)),
        Some(x) => Err(MalformedMapError::new(field, MalformedKind::Invalid, x)),
    }
}

fn text(value: Option<&Value>, field: MapField) -> Result<Option<String>, MalformedMapError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(MalformedMapError::new(field, MalformedKind::Invalid, other)),
    }
}

fn time_field(value: Option<&Value>) -> Result<f64, MalformedMapError> {
    let time = required(number(value, MapField::Time)?, MapField::Time)?;
    if !time.is_finite() || time < 0.0 {
        return Err(MalformedMapError::new(
            MapField::Time,
            MalformedKind::OutOfRange,
            time,
        ));
    }
    Ok(time)
}

fn required_integer(value: Option<&Value>, field: MapField) -> Result<i64, MalformedMapError> {
    required(integer(value, field)?, field)
}

impl RawNote {
    fn parse(&self) -> Result<NoteRecord, MalformedMapError> {
        let time = time_field(self.time.as_ref())?;
        let kind = NoteKind::from_code(required_integer(self.kind.as_ref(), MapField::NoteType)?)?;
        let position = GridPosition::from_raw(
            required_integer(self.line_index.as_ref(), MapField::TileIndex)?,
            required_integer(self.line_layer.as_ref(), MapField::TileLayer)?,
        )?;
        Ok(match kind {
            NoteKind::Normal(side) => {
                let direction = CutDirection::from_code(required_integer(
                    self.cut_direction.as_ref(),
                    MapField::CutDirection,
                )?)?;
                NoteRecord::Note {
                    time,
                    position,
                    side,
                    direction,
                }
            }
            NoteKind::Bomb => NoteRecord::Bomb { time, position },
        })
    }
}

impl RawObstacle {
    fn parse(&self) -> Result<Obstacle, MalformedMapError> {
        let time = time_field(self.time.as_ref())?;
        let kind =
            ObstacleKind::from_code(required_integer(self.kind.as_ref(), MapField::ObstacleType)?)?;
        let duration = required(
            number(self.duration.as_ref(), MapField::Duration)?,
            MapField::Duration,
        )?;
        if !duration.is_finite() || duration < 0.0 {
            return Err(MalformedMapError::new(
                MapField::Duration,
                MalformedKind::OutOfRange,
                duration,
            ));
        }
        let span = ObstacleSpan::new(
            required_integer(self.line_index.as_ref(), MapField::TileIndex)?,
            required_integer(self.width.as_ref(), MapField::Width)?,
            kind,
        )?;
        Ok(Obstacle {
            time,
            duration,
            kind,
            span,
        })
    }
}

impl RawEvent {
    fn parse(&self) -> Result<Event, MalformedMapError> {
        let time = required(number(self.time.as_ref(), MapField::Time)?, MapField::Time)?;
        if !time.is_finite() {
            return Err(MalformedMapError::new(
                MapField::Time,
                MalformedKind::Invalid,
                time,
            ));
        }
        Ok(Event {
            time,
            kind: required_integer(self.kind.as_ref(), MapField::NoteType)?,
            value: integer(self.value.as_ref(), MapField::EventValue)?.unwrap_or(0),
        })
    }
}

impl RawBeatmap {
    /// Validates every record and builds the map.
    ///
    /// Document-level fields are checked first, then each record in file
    /// order; the first problem aborts the whole load. The builder only sees
    /// the records once all of them are valid.
    pub fn into_beatmap(self, options: &LoadOptions) -> Result<Beatmap, MalformedMapError> {
        let bpm = match options.bpm_override {
            Some(bpm) => bpm,
            None => required(
                number(self.beats_per_minute.as_ref(), MapField::Bpm)?,
                MapField::Bpm,
            )?,
        };
        let metadata = MapMetadata {
            version: text(self.version.as_ref(), MapField::Version)?,
            beats_per_bar: number(self.beats_per_bar.as_ref(), MapField::BeatsPerBar)?,
            note_jump_speed: number(self.note_jump_speed.as_ref(), MapField::NoteJumpSpeed)?,
            shuffle: number(self.shuffle.as_ref(), MapField::Shuffle)?,
            shuffle_period: number(self.shuffle_period.as_ref(), MapField::ShufflePeriod)?,
        };
        let raw_notes = required(self.notes, MapField::Notes)?;

        let records = raw_notes
            .iter()
            .enumerate()
            .map(|(index, raw)| raw.parse().map_err(|e| e.at(RecordLocation::note(index))))
            .collect::<Result<Vec<_>, _>>()?;
        let obstacles = self
            .obstacles
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                raw.parse()
                    .map_err(|e| e.at(RecordLocation::obstacle(index)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let events = self
            .events
            .iter()
            .enumerate()
            .map(|(index, raw)| raw.parse().map_err(|e| e.at(RecordLocation::event(index))))
            .collect::<Result<Vec<_>, _>>()?;

        if options.ordering == OrderPolicy::Strict {
            check_record_order(&records)?;
        }

        let mut builder = BeatmapBuilder::new(bpm)
            .difficulty(options.difficulty)
            .metadata(metadata)
            .ordering(options.ordering);
        for record in records {
            builder = match record {
                NoteRecord::Note {
                    time,
                    position,
                    side,
                    direction,
                } => builder.note(Note::new(time, position, side, direction)),
                NoteRecord::Bomb { time, position } => builder.bomb(Bomb { time, position }),
            };
        }
        for obstacle in obstacles {
            builder = builder.obstacle(obstacle);
        }
        for event in events {
            builder = builder.event(event);
        }

        let map = builder.build()?;
        log::debug!(
            "loaded map: bpm={} notes={} bombs={} obstacles={} events={}",
            map.bpm(),
            map.notes().len(),
            map.bombs().len(),
            map.obstacles().len(),
            map.events().len()
        );
        Ok(map)
    }
}

/// Strict mode checks `_notes` as a whole, bombs included, against file indices.
fn check_record_order(records: &[NoteRecord]) -> Result<(), MalformedMapError> {
    match records.windows(2).position(|w| w[1].time() < w[0].time()) {
        Some(index) => Err(MalformedMapError::new(
            MapField::Time,
            MalformedKind::Unordered,
            records[index + 1].time(),
        )
        .at(RecordLocation::note(index + 1))),
        None => Ok(()),
    }
}

pub fn load_from_str(json: &str, options: &LoadOptions) -> Result<Beatmap, MalformedMapError> {
    let raw = serde_json::from_str::<RawBeatmap>(json).map_err(|e| MalformedMapError::syntax(&e))?;
    raw.into_beatmap(options)
}

pub fn load_from_reader<R>(reader: R, options: &LoadOptions) -> Result<Beatmap, MalformedMapError>
where
    R: io::Read,
{
    let raw =
        serde_json::from_reader::<_, RawBeatmap>(reader).map_err(|e| MalformedMapError::syntax(&e))?;
    raw.into_beatmap(options)
}
