use std::ops::{Add, Mul, Sub};

use serde::Serialize;

/// A point or direction in the normalized grid plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle in the normalized grid plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[must_use]
    pub fn contains(&self, p: Vec2) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }

    /// Fraction of the segment `a → b` that lies inside the rectangle, in `[0, 1]`.
    ///
    /// Liang-Barsky clipping. A degenerate segment counts as fully inside
    /// when its point is inside.
    ///
    /// ```
    /// use sabermap_model::{Rect, Vec2};
    ///
    /// let rect = Rect { min: Vec2::new(0.4, -1.0), max: Vec2::new(0.6, 1.0) };
    /// let f = rect.segment_overlap(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
    /// assert!((f - 0.2).abs() < 1e-9);
    /// assert_eq!(rect.segment_overlap(Vec2::new(0.0, 0.0), Vec2::new(0.3, 0.0)), 0.0);
    /// ```
    #[must_use]
    pub fn segment_overlap(&self, a: Vec2, b: Vec2) -> f64 {
        let d = b - a;
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        let edges = [
            (-d.x, a.x - self.min.x),
            (d.x, self.max.x - a.x),
            (-d.y, a.y - self.min.y),
            (d.y, self.max.y - a.y),
        ];
        for (p, q) in edges {
            if p == 0.0 {
                // Parallel to this edge.
                if q < 0.0 {
                    return 0.0;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return 0.0;
            }
        }
        if d.length() == 0.0 {
            return if self.contains(a) { 1.0 } else { 0.0 };
        }
        (t1 - t0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect {
            min: Vec2::new(x0, y0),
            max: Vec2::new(x1, y1),
        }
    }

    #[test]
    fn test_segment_fully_inside() {
        let r = rect(0.0, 0.0, 1.0, 1.0);
        let f = r.segment_overlap(Vec2::new(0.2, 0.2), Vec2::new(0.8, 0.5));
        assert!((f - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_diagonal_crossing_corner_region() {
        let r = rect(0.5, 0.5, 1.5, 1.5);
        let f = r.segment_overlap(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        assert!((f - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_segment_beside_rect() {
        let r = rect(0.0, 0.5, 1.0, 1.0);
        assert_eq!(
            r.segment_overlap(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.2)),
            0.0
        );
    }

    #[test]
    fn test_point_segment() {
        let r = rect(0.0, 0.0, 1.0, 1.0);
        let p = Vec2::new(0.5, 0.5);
        assert_eq!(r.segment_overlap(p, p), 1.0);
        let q = Vec2::new(2.0, 0.5);
        assert_eq!(r.segment_overlap(q, q), 0.0);
    }
}
