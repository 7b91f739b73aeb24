use crate::error::{OperationError, Result};
use crate::geometry::Polygon;
use crate::math::distance_2d::point_to_segment_witness;
use crate::math::{Point2, TOLERANCE};

/// How far a chord endpoint may sit from the boundary before the split is
/// rejected. Endpoints normally come from exact boundary intersections.
const ON_BOUNDARY_TOLERANCE: f64 = 1e-6;

/// Position of a point on a polygon boundary: edge index plus parameter.
#[derive(Debug, Clone, Copy)]
struct RingPosition {
    edge: usize,
    t: f64,
}

/// Splits a simple polygon into two along a chord whose endpoints lie on the
/// boundary.
///
/// Each endpoint is located on its boundary edge, then the two sub-rings are
/// assembled by walking the ring between the endpoints in both directions
/// and closing each walk with the chord. Degenerate (non-area) fragments are
/// discarded, so the result can contain fewer than two polygons when the
/// chord grazes the boundary.
#[derive(Debug)]
pub struct SplitAtChord<'a> {
    polygon: &'a Polygon,
    start: Point2,
    end: Point2,
}

impl<'a> SplitAtChord<'a> {
    /// Creates a new chord-split operation.
    #[must_use]
    pub fn new(polygon: &'a Polygon, start: Point2, end: Point2) -> Self {
        Self {
            polygon,
            start,
            end,
        }
    }

    /// Executes the split, returning the surviving fragments.
    ///
    /// On a genuine partition the fragment areas sum to the input area.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if either chord endpoint does
    /// not lie on the polygon boundary or the chord has zero length.
    pub fn execute(&self) -> Result<Vec<Polygon>> {
        if (self.end - self.start).norm() < TOLERANCE {
            return Err(
                OperationError::InvalidInput("chord endpoints coincide".to_owned()).into(),
            );
        }

        let ring = self.polygon.ring();
        let pos_a = locate_on_ring(ring, &self.start)?;
        let pos_b = locate_on_ring(ring, &self.end)?;

        // Walk the boundary from one chord endpoint to the other, both ways.
        let mut ring_a = vec![self.start];
        ring_a.extend(walk_forward(ring, pos_a, pos_b));
        ring_a.push(self.end);

        let mut ring_b = vec![self.end];
        ring_b.extend(walk_forward(ring, pos_b, pos_a));
        ring_b.push(self.start);

        let fragments = [ring_a, ring_b]
            .into_iter()
            .filter_map(|r| Polygon::new(r).ok())
            .collect();
        Ok(fragments)
    }
}

/// Finds the boundary edge carrying `point`, with its edge parameter.
fn locate_on_ring(ring: &[Point2], point: &Point2) -> Result<RingPosition> {
    let n = ring.len();
    let mut best: Option<(RingPosition, f64)> = None;

    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        let (witness, dist) = point_to_segment_witness(point.x, point.y, a.x, a.y, b.x, b.y);
        let seg_len = (b - a).norm();
        let t = if seg_len < TOLERANCE {
            0.0
        } else {
            (witness - a).norm() / seg_len
        };
        match &best {
            Some((_, bd)) if *bd <= dist => {}
            _ => best = Some((RingPosition { edge: i, t }, dist)),
        }
    }

    match best {
        Some((pos, dist)) if dist <= ON_BOUNDARY_TOLERANCE => Ok(pos),
        _ => Err(OperationError::InvalidInput(format!(
            "chord endpoint ({}, {}) is not on the polygon boundary",
            point.x, point.y
        ))
        .into()),
    }
}

/// Collects the ring vertices strictly between two boundary positions,
/// travelling in ring order.
fn walk_forward(ring: &[Point2], from: RingPosition, to: RingPosition) -> Vec<Point2> {
    let n = ring.len();
    let mut out = Vec::new();
    if from.edge == to.edge && to.t >= from.t {
        return out;
    }
    let mut idx = (from.edge + 1) % n;
    loop {
        out.push(ring[idx]);
        if idx == to.edge {
            break;
        }
        idx = (idx + 1) % n;
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn rect(w: f64, h: f64) -> Polygon {
        Polygon::new(vec![p(0.0, 0.0), p(w, 0.0), p(w, h), p(0.0, h)]).unwrap()
    }

    #[test]
    fn vertical_chord_halves_rectangle() {
        let poly = rect(4.0, 2.0);
        let fragments = SplitAtChord::new(&poly, p(2.0, 0.0), p(2.0, 2.0))
            .execute()
            .unwrap();
        assert_eq!(fragments.len(), 2);
        for f in &fragments {
            assert!((f.area() - 4.0).abs() < 1e-9, "area={}", f.area());
        }
    }

    #[test]
    fn split_conserves_area() {
        let poly = rect(6.0, 3.0);
        let fragments = SplitAtChord::new(&poly, p(1.5, 0.0), p(4.5, 3.0))
            .execute()
            .unwrap();
        assert_eq!(fragments.len(), 2);
        let total: f64 = fragments.iter().map(Polygon::area).sum();
        assert!((total - poly.area()).abs() < 1e-9, "total={total}");
    }

    #[test]
    fn chord_through_vertex_still_splits() {
        let poly = rect(4.0, 4.0);
        // Diagonal chord between opposite corners.
        let fragments = SplitAtChord::new(&poly, p(0.0, 0.0), p(4.0, 4.0))
            .execute()
            .unwrap();
        assert_eq!(fragments.len(), 2);
        for f in &fragments {
            assert!((f.area() - 8.0).abs() < 1e-9);
        }
    }

    #[test]
    fn endpoint_off_boundary_rejected() {
        let poly = rect(4.0, 4.0);
        let result = SplitAtChord::new(&poly, p(2.0, 1.0), p(2.0, 4.0)).execute();
        assert!(result.is_err());
    }

    #[test]
    fn zero_length_chord_rejected() {
        let poly = rect(4.0, 4.0);
        assert!(SplitAtChord::new(&poly, p(2.0, 0.0), p(2.0, 0.0))
            .execute()
            .is_err());
    }

    #[test]
    fn grazing_chord_yields_single_fragment() {
        let poly = rect(4.0, 4.0);
        // Chord along a boundary edge cuts off nothing.
        let fragments = SplitAtChord::new(&poly, p(1.0, 0.0), p(3.0, 0.0))
            .execute()
            .unwrap();
        assert_eq!(fragments.len(), 1);
        assert!((fragments[0].area() - 16.0).abs() < 1e-9);
    }
}
