//! Structural errors raised while building a map.
//!
//! Performability findings are not errors; see the validator crate.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("grid position ({tile_index}, {tile_layer}) is outside the 4x3 grid")]
pub struct InvalidGridPosition {
    pub tile_index: i64,
    pub tile_layer: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown cut direction code {code}")]
pub struct InvalidDirectionCode {
    pub code: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown note type {code}")]
pub struct InvalidNoteType {
    pub code: i64,
}

/// The map field a [`MalformedMapError`] refers to.
///
/// Most fields display as their map-format key without the leading underscore
/// (`_cutDirection` is `cutDirection`). Some use model names instead:
///
/// - `_beatsPerMinute` is `bpm`.
/// - `_lineIndex` and `_lineLayer` are the grid coordinates `tileIndex` and
///   `tileLayer`, for obstacles as well as notes.
/// - An obstacle's `_type` is `obstacleType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MapField {
    #[display("document")]
    Document,
    #[display("bpm")]
    Bpm,
    #[display("notes")]
    Notes,
    #[display("time")]
    Time,
    #[display("tileIndex")]
    TileIndex,
    #[display("tileLayer")]
    TileLayer,
    #[display("type")]
    NoteType,
    #[display("cutDirection")]
    CutDirection,
    #[display("duration")]
    Duration,
    #[display("width")]
    Width,
    #[display("obstacleType")]
    ObstacleType,
    #[display("value")]
    EventValue,
    #[display("version")]
    Version,
    #[display("beatsPerBar")]
    BeatsPerBar,
    #[display("noteJumpSpeed")]
    NoteJumpSpeed,
    #[display("shuffle")]
    Shuffle,
    #[display("shufflePeriod")]
    ShufflePeriod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum MalformedKind {
    #[display("missing")]
    Missing,
    #[display("out of range")]
    OutOfRange,
    #[display("unknown")]
    Unknown,
    #[display("invalid")]
    Invalid,
    #[display("out of order")]
    Unordered,
    #[display("unparsable")]
    Syntax,
}

/// Which record of the map an error points at, e.g. `notes[3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLocation {
    pub collection: &'static str,
    pub index: usize,
}

impl RecordLocation {
    #[must_use]
    pub const fn note(index: usize) -> Self {
        Self {
            collection: "notes",
            index,
        }
    }

    #[must_use]
    pub const fn obstacle(index: usize) -> Self {
        Self {
            collection: "obstacles",
            index,
        }
    }

    #[must_use]
    pub const fn event(index: usize) -> Self {
        Self {
            collection: "events",
            index,
        }
    }
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.collection, self.index)
    }
}

/// A map could not be built.
///
/// Carries the offending field and its raw value so callers can report
/// exactly what was wrong with the input.
#[derive(Debug, Clone, PartialEq, derive_more::Error)]
pub struct MalformedMapError {
    pub field: MapField,
    pub kind: MalformedKind,
    /// The offending value as written in the input (empty for missing fields).
    pub value: String,
    pub location: Option<RecordLocation>,
}

impl MalformedMapError {
    #[must_use]
    pub fn new(field: MapField, kind: MalformedKind, value: impl ToString) -> Self {
        Self {
            field,
            kind,
            value: value.to_string(),
            location: None,
        }
    }

    #[must_use]
    pub fn missing(field: MapField) -> Self {
        Self::new(field, MalformedKind::Missing, "")
    }

    #[must_use]
    pub fn syntax(err: &serde_json::Error) -> Self {
        Self::new(MapField::Document, MalformedKind::Syntax, err)
    }

    #[must_use]
    pub fn at(mut self, location: RecordLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for MalformedMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed map: {} {}", self.kind, self.field)?;
        if !self.value.is_empty() {
            write!(f, " `{}`", self.value)?;
        }
        if let Some(location) = self.location {
            write!(f, " at {location}")?;
        }
        Ok(())
    }
}

impl From<InvalidGridPosition> for MalformedMapError {
    fn from(err: InvalidGridPosition) -> Self {
        // Report the first coordinate that is actually out of range.
        if (0..4).contains(&err.tile_index) {
            Self::new(MapField::TileLayer, MalformedKind::OutOfRange, err.tile_layer)
        } else {
            Self::new(MapField::TileIndex, MalformedKind::OutOfRange, err.tile_index)
        }
    }
}

impl From<InvalidDirectionCode> for MalformedMapError {
    fn from(err: InvalidDirectionCode) -> Self {
        Self::new(MapField::CutDirection, MalformedKind::Unknown, err.code)
    }
}

impl From<InvalidNoteType> for MalformedMapError {
    fn from(err: InvalidNoteType) -> Self {
        Self::new(MapField::NoteType, MalformedKind::Unknown, err.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_field_value_and_location() {
        let err = MalformedMapError::from(InvalidGridPosition {
            tile_index: 5,
            tile_layer: 0,
        })
        .at(RecordLocation::note(3));
        assert_eq!(
            err.to_string(),
            "malformed map: out of range tileIndex `5` at notes[3]"
        );
    }

    #[test]
    fn test_grid_error_points_at_layer_when_index_is_valid() {
        let err = MalformedMapError::from(InvalidGridPosition {
            tile_index: 2,
            tile_layer: -1,
        });
        assert_eq!(err.field, MapField::TileLayer);
        assert_eq!(err.value, "-1");
    }

    #[test]
    fn test_field_names() {
        assert_eq!(MapField::TileIndex.to_string(), "tileIndex");
        assert_eq!(MapField::CutDirection.to_string(), "cutDirection");
        assert_eq!(MapField::NoteJumpSpeed.to_string(), "noteJumpSpeed");
    }

    #[test]
    fn test_missing_field_has_no_value() {
        let err = MalformedMapError::missing(MapField::Bpm);
        assert_eq!(err.to_string(), "malformed map: missing bpm");
    }
}
