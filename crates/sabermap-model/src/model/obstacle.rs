use std::ops::Range;

use serde::Serialize;

use crate::{
    error::{MalformedKind, MalformedMapError, MapField},
    geometry::{GridPosition, Rect, Vec2},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Covers every layer of its columns.
    FullHeight,
    /// Covers only the top layer.
    Crouch,
}

impl ObstacleKind {
    pub fn from_code(code: i64) -> Result<Self, MalformedMapError> {
        match code {
            0 => Ok(Self::FullHeight),
            1 => Ok(Self::Crouch),
            _ => Err(MalformedMapError::new(
                MapField::ObstacleType,
                MalformedKind::Unknown,
                code,
            )),
        }
    }

    #[must_use]
    pub fn layers(self) -> Range<u8> {
        match self {
            Self::FullHeight => 0..GridPosition::LAYERS,
            Self::Crouch => GridPosition::LAYERS - 1..GridPosition::LAYERS,
        }
    }
}

/// Grid cells covered by an obstacle, as half-open column and layer ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObstacleSpan {
    pub columns: Range<u8>,
    pub layers: Range<u8>,
}

impl ObstacleSpan {
    /// Builds a span starting at `line_index` and `width` columns wide.
    ///
    /// The span is clipped to the grid; `line_index` must be a grid column and
    /// `width` must be positive.
    pub fn new(line_index: i64, width: i64, kind: ObstacleKind) -> Result<Self, MalformedMapError> {
        let start = u8::try_from(line_index)
            .ok()
            .filter(|&c| c < GridPosition::COLUMNS)
            .ok_or_else(|| {
                MalformedMapError::new(MapField::TileIndex, MalformedKind::OutOfRange, line_index)
            })?;
        if width <= 0 {
            return Err(MalformedMapError::new(
                MapField::Width,
                MalformedKind::OutOfRange,
                width,
            ));
        }
        let end = i64::from(start)
            .saturating_add(width)
            .min(i64::from(GridPosition::COLUMNS));
        Ok(Self {
            columns: start..u8::try_from(end).unwrap_or(GridPosition::COLUMNS),
            layers: kind.layers(),
        })
    }

    #[must_use]
    pub fn contains(&self, position: GridPosition) -> bool {
        self.columns.contains(&position.tile_index()) && self.layers.contains(&position.tile_layer())
    }

    /// Rectangle covering the span's cells in the normalized plane.
    ///
    /// Each cell extends half a cell around its center point.
    #[must_use]
    pub fn rect(&self) -> Rect {
        let cell = GridPosition::CELL_SIZE;
        let edge = |v: u8| (f64::from(v) - 0.5) * cell;
        Rect {
            min: Vec2::new(edge(self.columns.start), edge(self.layers.start)),
            max: Vec2::new(edge(self.columns.end), edge(self.layers.end)),
        }
    }
}

/// A wall blocking part of the grid for an interval of beats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Obstacle {
    /// Start time in beats.
    pub time: f64,
    /// Length in beats.
    pub duration: f64,
    pub kind: ObstacleKind,
    pub span: ObstacleSpan,
}

impl Obstacle {
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.time + self.duration
    }

    /// Whether the obstacle is present at `t`, bounds included.
    #[must_use]
    pub fn is_active_at(&self, t: f64) -> bool {
        self.time <= t && t <= self.end_time()
    }

    /// Whether the obstacle is present at some moment strictly between `start` and `end`.
    ///
    /// A wall that ends at `start` or begins at `end` only touches the interval
    /// and does not overlap it. An empty interval overlaps the obstacles
    /// active at that instant.
    #[must_use]
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        if start < end {
            self.time < end && start < self.end_time()
        } else {
            self.is_active_at(start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_is_clipped_to_grid() {
        let span = ObstacleSpan::new(2, 5, ObstacleKind::FullHeight).unwrap();
        assert_eq!(span.columns, 2..4);
        assert_eq!(span.layers, 0..3);
    }

    #[test]
    fn test_crouch_wall_covers_top_layer_only() {
        let span = ObstacleSpan::new(0, 4, ObstacleKind::Crouch).unwrap();
        assert!(span.contains(GridPosition::new(1, 2).unwrap()));
        assert!(!span.contains(GridPosition::new(1, 1).unwrap()));
    }

    #[test]
    fn test_rejects_bad_width_and_column() {
        let err = ObstacleSpan::new(0, 0, ObstacleKind::FullHeight).unwrap_err();
        assert_eq!(err.field, MapField::Width);
        let err = ObstacleSpan::new(4, 1, ObstacleKind::FullHeight).unwrap_err();
        assert_eq!(err.field, MapField::TileIndex);
    }

    #[test]
    fn test_rect_surrounds_cell_centers() {
        let span = ObstacleSpan::new(1, 1, ObstacleKind::FullHeight).unwrap();
        let rect = span.rect();
        for layer in 0..3 {
            let p = crate::position_of(GridPosition::new(1, layer).unwrap());
            assert!(rect.contains(p));
        }
        let outside = crate::position_of(GridPosition::new(0, 0).unwrap());
        assert!(!rect.contains(outside));
    }

    #[test]
    fn test_activity_window_is_closed() {
        let obstacle = Obstacle {
            time: 2.0,
            duration: 1.0,
            kind: ObstacleKind::FullHeight,
            span: ObstacleSpan::new(0, 1, ObstacleKind::FullHeight).unwrap(),
        };
        assert!(obstacle.is_active_at(2.0));
        assert!(obstacle.is_active_at(3.0));
        assert!(!obstacle.is_active_at(3.5));
        assert!(obstacle.overlaps(0.0, 2.5));
        assert!(!obstacle.overlaps(0.0, 1.9));
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        let obstacle = Obstacle {
            time: 2.0,
            duration: 1.0,
            kind: ObstacleKind::FullHeight,
            span: ObstacleSpan::new(0, 1, ObstacleKind::FullHeight).unwrap(),
        };
        assert!(!obstacle.overlaps(0.0, 2.0));
        assert!(!obstacle.overlaps(3.0, 4.0));
        assert!(obstacle.overlaps(2.9, 4.0));
        assert!(obstacle.overlaps(3.0, 3.0));
        assert!(!obstacle.overlaps(3.5, 3.5));
    }
}
