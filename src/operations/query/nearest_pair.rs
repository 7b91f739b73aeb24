use crate::error::Result;
use crate::geometry::Polygon;
use crate::math::distance_2d::segment_segment_nearest;
use crate::math::Point2;

/// Result of a nearest-pair query between two polygon boundaries.
#[derive(Debug, Clone, Copy)]
pub struct NearestPairResult {
    /// The closest point on the first polygon's boundary.
    pub point_on_first: Point2,
    /// The closest point on the second polygon's boundary.
    pub point_on_second: Point2,
    /// The distance between the two points.
    pub distance: f64,
}

/// Finds the nearest pair of boundary points between two disjoint polygons.
///
/// Examines every edge pair; the minimum is realized either at a vertex of
/// one boundary projected onto an edge of the other, or between two
/// vertices. Ties keep the first pair in edge order, which makes the result
/// deterministic for symmetric inputs.
#[derive(Debug)]
pub struct NearestPair<'a> {
    first: &'a Polygon,
    second: &'a Polygon,
}

impl<'a> NearestPair<'a> {
    /// Creates a new nearest-pair query.
    #[must_use]
    pub fn new(first: &'a Polygon, second: &'a Polygon) -> Self {
        Self { first, second }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Infallible for valid polygons; kept fallible to match the operation
    /// surface of the other queries.
    pub fn execute(&self) -> Result<NearestPairResult> {
        let mut best: Option<NearestPairResult> = None;

        for (a0, a1) in self.first.edges() {
            for (b0, b1) in self.second.edges() {
                let (pa, pb, d) = segment_segment_nearest(&a0, &a1, &b0, &b1);
                match &best {
                    Some(r) if r.distance <= d => {}
                    _ => {
                        best = Some(NearestPairResult {
                            point_on_first: pa,
                            point_on_second: pb,
                            distance: d,
                        });
                    }
                }
            }
        }

        // Valid polygons have at least three edges, so `best` is always set.
        best.ok_or_else(|| {
            crate::error::OperationError::Failed("nearest pair on empty boundary".to_owned()).into()
        })
    }
}
