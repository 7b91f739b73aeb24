use crate::error::{OperationError, Result};
use crate::math::hull_2d::convex_hull;
use crate::math::{Point2, TOLERANCE};

/// Result of a minimum-area bounding rectangle query.
#[derive(Debug, Clone, Copy)]
pub struct MinAreaRectResult {
    /// Center of the rectangle.
    pub center: Point2,
    /// Edge length along the rectangle's local x-axis.
    pub width: f64,
    /// Edge length along the rectangle's local y-axis.
    pub height: f64,
    /// Rotation angle in radians (counter-clockwise from positive x-axis).
    pub angle: f64,
}

impl MinAreaRectResult {
    /// The longer of the two adjacent edge lengths.
    #[must_use]
    pub fn longer_edge(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Computes the minimum-area oriented bounding rectangle of a point set.
///
/// Builds the convex hull, then rotates calipers over its edges: the optimal
/// rectangle is aligned with one hull edge. Two collinear points degrade to
/// a zero-height rectangle along their segment.
#[derive(Debug)]
pub struct MinAreaRect<'a> {
    points: &'a [Point2],
}

impl<'a> MinAreaRect<'a> {
    /// Creates a new minimum-area rectangle query.
    #[must_use]
    pub fn new(points: &'a [Point2]) -> Self {
        Self { points }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if fewer than 2 distinct
    /// points are provided.
    pub fn execute(&self) -> Result<MinAreaRectResult> {
        let hull = convex_hull(self.points);

        if hull.len() == 2 {
            // Degenerate case: all points collinear.
            let a = hull[0];
            let b = hull[1];
            let d = b - a;
            let len = d.norm();
            if len < TOLERANCE {
                return Err(OperationError::InvalidInput(
                    "minimum-area rectangle needs at least 2 distinct points".to_owned(),
                )
                .into());
            }
            return Ok(MinAreaRectResult {
                center: Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5),
                width: len,
                height: 0.0,
                angle: d.y.atan2(d.x),
            });
        }
        if hull.len() < 2 {
            return Err(OperationError::InvalidInput(
                "minimum-area rectangle needs at least 2 distinct points".to_owned(),
            )
            .into());
        }

        let n = hull.len();
        let mut best: Option<MinAreaRectResult> = None;
        let mut best_area = f64::INFINITY;

        // The minimum-area rectangle shares an orientation with a hull edge.
        for i in 0..n {
            let j = (i + 1) % n;
            let edge = hull[j] - hull[i];
            let edge_len = edge.norm();
            if edge_len < TOLERANCE {
                continue;
            }

            let ux = edge.x / edge_len;
            let uy = edge.y / edge_len;
            // Perpendicular axis.
            let vx = -uy;
            let vy = ux;

            let mut min_u = f64::INFINITY;
            let mut max_u = f64::NEG_INFINITY;
            let mut min_v = f64::INFINITY;
            let mut max_v = f64::NEG_INFINITY;

            for p in &hull {
                let u = p.x * ux + p.y * uy;
                let v = p.x * vx + p.y * vy;
                min_u = min_u.min(u);
                max_u = max_u.max(u);
                min_v = min_v.min(v);
                max_v = max_v.max(v);
            }

            let width = max_u - min_u;
            let height = max_v - min_v;
            let area = width * height;

            if area < best_area {
                best_area = area;
                let center_u = (min_u + max_u) * 0.5;
                let center_v = (min_v + max_v) * 0.5;
                best = Some(MinAreaRectResult {
                    center: Point2::new(
                        center_u * ux + center_v * vx,
                        center_u * uy + center_v * vy,
                    ),
                    width,
                    height,
                    angle: uy.atan2(ux),
                });
            }
        }

        best.ok_or_else(|| {
            OperationError::Failed("no rectangle orientation found".to_owned()).into()
        })
    }
}
