use serde::Serialize;

use crate::error::InvalidGridPosition;

/// A cell of the 4x3 note grid.
///
/// `tile_index` is the column (0 = leftmost), `tile_layer` the row
/// (0 = bottom). Values outside the grid cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPosition {
    tile_index: u8,
    tile_layer: u8,
}

impl GridPosition {
    pub const COLUMNS: u8 = 4;
    pub const LAYERS: u8 = 3;
    pub const CELL_COUNT: usize = (Self::COLUMNS as usize) * (Self::LAYERS as usize);
    /// Edge length of a cell in the normalized plane.
    pub const CELL_SIZE: f64 = 1.0 / (Self::COLUMNS as f64 - 1.0);

    pub fn new(tile_index: u8, tile_layer: u8) -> Result<Self, InvalidGridPosition> {
        Self::from_raw(i64::from(tile_index), i64::from(tile_layer))
    }

    /// Builds a position from raw (possibly negative) coordinates.
    ///
    /// ```
    /// use sabermap_model::GridPosition;
    ///
    /// assert!(GridPosition::from_raw(3, 2).is_ok());
    /// assert!(GridPosition::from_raw(4, 0).is_err());
    /// assert!(GridPosition::from_raw(0, -1).is_err());
    /// ```
    pub fn from_raw(tile_index: i64, tile_layer: i64) -> Result<Self, InvalidGridPosition> {
        let err = InvalidGridPosition {
            tile_index,
            tile_layer,
        };
        let index = u8::try_from(tile_index).map_err(|_| err)?;
        let layer = u8::try_from(tile_layer).map_err(|_| err)?;
        if index >= Self::COLUMNS || layer >= Self::LAYERS {
            return Err(err);
        }
        Ok(Self {
            tile_index: index,
            tile_layer: layer,
        })
    }

    /// All 12 cells, bottom row first, left to right.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::LAYERS).flat_map(|tile_layer| {
            (0..Self::COLUMNS).map(move |tile_index| Self {
                tile_index,
                tile_layer,
            })
        })
    }

    #[must_use]
    pub const fn tile_index(self) -> u8 {
        self.tile_index
    }

    #[must_use]
    pub const fn tile_layer(self) -> u8 {
        self.tile_layer
    }

    /// Row-major cell index in `0..12`, bottom row first.
    #[must_use]
    pub const fn cell_index(self) -> usize {
        self.tile_layer as usize * Self::COLUMNS as usize + self.tile_index as usize
    }
}
