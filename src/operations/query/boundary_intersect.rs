use crate::geometry::Polygon;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::Point2;

/// Points within this distance of each other count as one crossing.
/// A segment passing exactly through a ring vertex registers on both
/// adjacent edges; without merging, such a crossing would appear twice.
const MERGE_TOLERANCE: f64 = 1e-9;

/// Collects every intersection point of a segment with a polygon's boundary
/// ring.
///
/// The crossings are returned in boundary order, deduplicated within
/// `MERGE_TOLERANCE`.
#[derive(Debug)]
pub struct BoundaryIntersections<'a> {
    polygon: &'a Polygon,
    start: Point2,
    end: Point2,
}

impl<'a> BoundaryIntersections<'a> {
    /// Creates a new boundary intersection query for the segment
    /// `start`–`end`.
    #[must_use]
    pub fn new(polygon: &'a Polygon, start: Point2, end: Point2) -> Self {
        Self {
            polygon,
            start,
            end,
        }
    }

    /// Executes the query, returning all distinct crossing points.
    #[must_use]
    pub fn execute(&self) -> Vec<Point2> {
        let mut crossings: Vec<Point2> = Vec::new();
        for (a, b) in self.polygon.edges() {
            if let Some((pt, _, _)) = segment_segment_intersect_2d(&self.start, &self.end, &a, &b)
            {
                let duplicate = crossings
                    .iter()
                    .any(|c| (c - pt).norm() < MERGE_TOLERANCE);
                if !duplicate {
                    crossings.push(pt);
                }
            }
        }
        crossings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square(size: f64) -> Polygon {
        Polygon::new(vec![p(0.0, 0.0), p(size, 0.0), p(size, size), p(0.0, size)]).unwrap()
    }

    #[test]
    fn transversal_crosses_twice() {
        let poly = square(4.0);
        let crossings = BoundaryIntersections::new(&poly, p(-1.0, 2.0), p(5.0, 2.0)).execute();
        assert_eq!(crossings.len(), 2);
        let mut xs: Vec<f64> = crossings.iter().map(|c| c.x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        assert!((xs[0]).abs() < 1e-9);
        assert!((xs[1] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn miss_yields_no_crossings() {
        let poly = square(4.0);
        let crossings = BoundaryIntersections::new(&poly, p(-1.0, 5.0), p(5.0, 5.0)).execute();
        assert!(crossings.is_empty());
    }

    #[test]
    fn crossing_through_vertex_counted_once() {
        let poly = square(4.0);
        // Diagonal through the corner (0, 0).
        let crossings =
            BoundaryIntersections::new(&poly, p(-1.0, -1.0), p(5.0, 5.0)).execute();
        // Corner (0,0) and corner (4,4), each registered once.
        assert_eq!(crossings.len(), 2);
    }

    #[test]
    fn concave_outline_crosses_four_times() {
        // U-shape: a transversal through the opening crosses four walls.
        let poly = Polygon::new(vec![
            p(0.0, 0.0),
            p(6.0, 0.0),
            p(6.0, 4.0),
            p(4.0, 4.0),
            p(4.0, 1.0),
            p(2.0, 1.0),
            p(2.0, 4.0),
            p(0.0, 4.0),
        ])
        .unwrap();
        let crossings = BoundaryIntersections::new(&poly, p(-1.0, 0.5), p(7.0, 0.5)).execute();
        assert_eq!(crossings.len(), 2);
        let crossings = BoundaryIntersections::new(&poly, p(-1.0, 2.0), p(7.0, 2.0)).execute();
        assert_eq!(crossings.len(), 4);
    }
}
