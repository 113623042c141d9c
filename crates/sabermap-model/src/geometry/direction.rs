use std::f64::consts::FRAC_1_SQRT_2;

use serde::Serialize;

use super::Vec2;
use crate::error::InvalidDirectionCode;

/// Direction a note must be cut through.
///
/// Discriminants are the codes used by the map format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum CutDirection {
    #[serde(rename = "S")]
    South = 0,
    #[serde(rename = "N")]
    North = 1,
    #[serde(rename = "E")]
    East = 2,
    #[serde(rename = "W")]
    West = 3,
    #[serde(rename = "SE")]
    SouthEast = 4,
    #[serde(rename = "SW")]
    SouthWest = 5,
    #[serde(rename = "NE")]
    NorthEast = 6,
    #[serde(rename = "NW")]
    NorthWest = 7,
    #[serde(rename = "ANY")]
    Any = 8,
}

impl CutDirection {
    pub const COUNT: usize = 9;

    /// Every direction, ordered by code.
    pub const ALL: [Self; Self::COUNT] = [
        Self::South,
        Self::North,
        Self::East,
        Self::West,
        Self::SouthEast,
        Self::SouthWest,
        Self::NorthEast,
        Self::NorthWest,
        Self::Any,
    ];

    /// ```
    /// use sabermap_model::CutDirection;
    ///
    /// assert_eq!(CutDirection::from_code(6), Ok(CutDirection::NorthEast));
    /// assert!(CutDirection::from_code(9).is_err());
    /// ```
    pub fn from_code(code: i64) -> Result<Self, InvalidDirectionCode> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(InvalidDirectionCode { code })
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Histogram bin of this direction (equal to its code).
    #[must_use]
    pub const fn bin(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::South => "S",
            Self::North => "N",
            Self::East => "E",
            Self::West => "W",
            Self::SouthEast => "SE",
            Self::SouthWest => "SW",
            Self::NorthEast => "NE",
            Self::NorthWest => "NW",
            Self::Any => "ANY",
        }
    }

    #[must_use]
    pub const fn is_any(self) -> bool {
        matches!(self, Self::Any)
    }

    #[must_use]
    pub const fn opposite(self) -> Option<Self> {
        Some(match self {
            Self::South => Self::North,
            Self::North => Self::South,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::SouthEast => Self::NorthWest,
            Self::SouthWest => Self::NorthEast,
            Self::NorthEast => Self::SouthWest,
            Self::NorthWest => Self::SouthEast,
            Self::Any => return None,
        })
    }

    /// Unit swing vector, `None` for [`CutDirection::Any`].
    #[must_use]
    pub const fn vector(self) -> Option<Vec2> {
        const D: f64 = FRAC_1_SQRT_2;
        let (x, y) = match self {
            Self::South => (0.0, -1.0),
            Self::North => (0.0, 1.0),
            Self::East => (1.0, 0.0),
            Self::West => (-1.0, 0.0),
            Self::SouthEast => (D, -D),
            Self::SouthWest => (-D, -D),
            Self::NorthEast => (D, D),
            Self::NorthWest => (-D, D),
            Self::Any => return None,
        };
        Some(Vec2::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_all() {
        for (idx, direction) in CutDirection::ALL.into_iter().enumerate() {
            assert_eq!(usize::from(direction.code()), idx);
            assert_eq!(direction.bin(), idx);
        }
    }

    #[test]
    fn test_rejects_negative_code() {
        assert_eq!(
            CutDirection::from_code(-1),
            Err(InvalidDirectionCode { code: -1 })
        );
    }

    #[test]
    fn test_serializes_as_symbol() {
        let json = serde_json::to_string(&CutDirection::SouthWest).unwrap();
        assert_eq!(json, "\"SW\"");
    }
}
