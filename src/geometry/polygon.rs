use crate::error::{GeometryError, Result};
use crate::math::polygon_2d::{
    clean_ring, collect_simple_loops, rotate_to_canonical_start, signed_area_2d,
};
use crate::math::{Point2, TOLERANCE};

/// A simple (non-self-intersecting) straight-edged polygon.
///
/// The boundary is a closed ring of vertices in counter-clockwise order; the
/// last vertex connects back to the first. The ring is normalized at
/// construction and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    ring: Vec<Point2>,
}

impl Polygon {
    /// Creates a polygon from a closed ring of vertices.
    ///
    /// Consecutive duplicate and collinear vertices are dropped, a
    /// clockwise ring is reversed to the counter-clockwise convention, and
    /// the ring is rotated to start at its leftmost-bottommost vertex so
    /// equal shapes compare equal regardless of input vertex order.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if fewer than three distinct
    /// vertices remain or the enclosed area vanishes.
    pub fn new(ring: Vec<Point2>) -> Result<Self> {
        let cleaned = clean_ring(&ring);
        if cleaned.len() < 3 {
            return Err(GeometryError::Degenerate(format!(
                "ring reduced to {} vertices",
                cleaned.len()
            ))
            .into());
        }
        let area = signed_area_2d(&cleaned);
        if area.abs() < TOLERANCE {
            return Err(GeometryError::Degenerate("ring encloses no area".to_owned()).into());
        }
        let oriented: Vec<Point2> = if area < 0.0 {
            cleaned.into_iter().rev().collect()
        } else {
            cleaned
        };
        Ok(Self {
            ring: rotate_to_canonical_start(&oriented),
        })
    }

    /// Repairs a possibly self-intersecting ring into zero or more simple
    /// polygons.
    ///
    /// This is the single normalization pass applied to raw survey input:
    /// the ring is cleaned, and if it crosses itself it is decomposed into
    /// its simple loops, keeping those that wind with the ring's dominant
    /// orientation. A ring beyond salvage yields an empty list.
    #[must_use]
    pub fn repair(ring: &[Point2]) -> Vec<Self> {
        let cleaned = clean_ring(ring);
        if cleaned.len() < 3 {
            return Vec::new();
        }
        let winding = signed_area_2d(&cleaned).signum();
        let winding = if winding.abs() < 0.5 { 1.0 } else { winding };
        collect_simple_loops(&cleaned, winding)
            .into_iter()
            .filter_map(|l| Self::new(l).ok())
            .collect()
    }

    /// The boundary ring in counter-clockwise order (implicitly closed).
    #[must_use]
    pub fn ring(&self) -> &[Point2] {
        &self.ring
    }

    /// The enclosed (unsigned) area.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area_2d(&self.ring).abs()
    }

    /// Iterates the boundary edges as `(start, end)` vertex pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let n = self.ring.len();
        (0..n).map(move |i| (self.ring[i], self.ring[(i + 1) % n]))
    }

    /// Axis-aligned bounding box as `(min, max)` corners.
    #[must_use]
    pub fn bounds(&self) -> (Point2, Point2) {
        let mut min = self.ring[0];
        let mut max = self.ring[0];
        for p in &self.ring[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }
}
