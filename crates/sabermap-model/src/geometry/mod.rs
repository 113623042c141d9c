//! Grid and cut-direction geometry.
//!
//! All functions here are pure. Grid cells are mapped into a normalized plane
//! where both axes share one scale, so Euclidean distances between cells are
//! comparable horizontally, vertically and diagonally:
//!
//! ```text
//!  y
//! 2/3  (0,2) (1,2) (2,2) (3,2)
//! 1/3  (0,1) (1,1) (2,1) (3,1)
//!  0   (0,0) (1,0) (2,0) (3,0)
//!       0    1/3   2/3    1    x
//! ```

pub use self::{direction::*, grid::*, vec2::*};

mod direction;
mod grid;
mod vec2;

/// Position of a grid cell in the normalized plane.
///
/// ```
/// use sabermap_model::{GridPosition, position_of};
///
/// let p = position_of(GridPosition::new(3, 0)?);
/// assert_eq!((p.x, p.y), (1.0, 0.0));
/// # Ok::<(), sabermap_model::InvalidGridPosition>(())
/// ```
#[must_use]
pub fn position_of(position: GridPosition) -> Vec2 {
    Vec2::new(
        f64::from(position.tile_index()) * GridPosition::CELL_SIZE,
        f64::from(position.tile_layer()) * GridPosition::CELL_SIZE,
    )
}

/// Unit swing vector of a cut direction, `None` for [`CutDirection::Any`].
///
/// ```
/// use sabermap_model::{CutDirection, vector_of};
///
/// assert_eq!(vector_of(CutDirection::North).map(|v| (v.x, v.y)), Some((0.0, 1.0)));
/// assert!(vector_of(CutDirection::Any).is_none());
/// ```
#[must_use]
pub fn vector_of(direction: CutDirection) -> Option<Vec2> {
    direction.vector()
}

/// Angle between two non-zero vectors, in degrees within `[0, 180]`.
#[must_use]
pub fn angle_between(a: Vec2, b: Vec2) -> f64 {
    let denom = a.length() * b.length();
    if denom <= 0.0 {
        return 0.0;
    }
    // Rounding can push the cosine slightly outside [-1, 1].
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_position_of_is_injective() {
        let positions = GridPosition::all().map(position_of).collect::<Vec<_>>();
        assert_eq!(positions.len(), 12);
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!(a.distance(*b) > EPS, "{a:?} and {b:?} collide");
            }
        }
    }

    #[test]
    fn test_positions_lie_in_unit_square() {
        for p in GridPosition::all().map(position_of) {
            assert!((0.0..=1.0).contains(&p.x));
            assert!((0.0..=1.0).contains(&p.y));
        }
    }

    #[test]
    fn test_compass_vectors_are_unit_length() {
        for direction in CutDirection::ALL {
            match vector_of(direction) {
                Some(v) => assert!((v.length() - 1.0).abs() < EPS, "{direction:?}"),
                None => assert_eq!(direction, CutDirection::Any),
            }
        }
    }

    #[test]
    fn test_opposite_directions_are_antiparallel() {
        for direction in CutDirection::ALL {
            let Some(opposite) = direction.opposite() else {
                assert_eq!(direction, CutDirection::Any);
                continue;
            };
            let a = vector_of(direction).unwrap();
            let b = vector_of(opposite).unwrap();
            assert!((a.dot(b) + 1.0).abs() < EPS, "{direction:?} / {opposite:?}");
            assert!((angle_between(a, b) - 180.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_angle_between_diagonal_and_axis() {
        let n = vector_of(CutDirection::North).unwrap();
        let ne = vector_of(CutDirection::NorthEast).unwrap();
        let e = vector_of(CutDirection::East).unwrap();
        assert!((angle_between(n, ne) - 45.0).abs() < 1e-6);
        assert!((angle_between(n, e) - 90.0).abs() < 1e-6);
        assert_eq!(angle_between(n, n), 0.0);
    }
}
