use serde::Serialize;

use crate::{
    error::InvalidNoteType,
    geometry::{CutDirection, GridPosition, Vec2, position_of},
};

/// Which hand must strike a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Self; 2] = [Self::Left, Self::Right];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// The `_type` of a note record in the map format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum NoteKind {
    Normal(Side),
    Bomb,
}

impl NoteKind {
    /// ```
    /// use sabermap_model::{NoteKind, Side};
    ///
    /// assert_eq!(NoteKind::from_code(0), Ok(NoteKind::Normal(Side::Left)));
    /// assert_eq!(NoteKind::from_code(3), Ok(NoteKind::Bomb));
    /// assert!(NoteKind::from_code(2).is_err());
    /// ```
    pub fn from_code(code: i64) -> Result<Self, InvalidNoteType> {
        match code {
            0 => Ok(Self::Normal(Side::Left)),
            1 => Ok(Self::Normal(Side::Right)),
            3 => Ok(Self::Bomb),
            _ => Err(InvalidNoteType { code }),
        }
    }
}

/// A timed target struck by one hand, at one grid cell, in one direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Note {
    /// Time in beats.
    pub time: f64,
    pub position: GridPosition,
    pub side: Side,
    pub direction: CutDirection,
}

impl Note {
    #[must_use]
    pub const fn new(time: f64, position: GridPosition, side: Side, direction: CutDirection) -> Self {
        Self {
            time,
            position,
            side,
            direction,
        }
    }

    #[must_use]
    pub fn point(&self) -> Vec2 {
        position_of(self.position)
    }
}

/// A hazard that must not be struck. Never a swing target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bomb {
    pub time: f64,
    pub position: GridPosition,
}
