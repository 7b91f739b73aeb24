use crate::error::{OperationError, Result};
use crate::geometry::{Polygon, Region};
use crate::math::distance_2d::point_to_ring_dist;
use crate::math::intersect_2d::{line_line_intersect_2d, point_at};
use crate::math::polygon_2d::{collect_simple_loops, left_normal, segment_direction};
use crate::math::{Point2, Vector2, TOLERANCE};

/// When `cos(angle between consecutive segments) < this`, use a flat cap
/// instead of a miter join. Only for near-180° reversals (> ~169°).
const FLAT_CAP_COS: f64 = -0.98;

/// Maximum miter distance as a multiple of the inset distance. When the
/// miter extends further than this, a bevel (two points) is used instead.
/// A limit of 4.0 clips at ~30° turn angles (matches SVG default).
const MITER_LIMIT: f64 = 4.0;

/// Fraction of the inset distance a loop must reach away from the original
/// boundary to count as genuine eroded material rather than an offset
/// artifact hugging the ring.
const KEEP_DEPTH_FRACTION: f64 = 0.5;

/// Uniform inward offset (erosion) of a region.
///
/// Each component ring is offset toward its interior by `distance` and the
/// raw result is decomposed into simple loops. Every loop that winds with
/// the input and reaches meaningful depth is kept, so the result can have
/// **more components than the input** — that is the topological-split signal
/// the erosion search watches. An empty result means the region eroded away
/// entirely.
///
/// # Algorithm
///
/// 1. Offset each boundary segment perpendicular to its direction.
/// 2. Join consecutive offset segments: miter at normal corners, bevel when
///    the miter exceeds `MITER_LIMIT`, flat cap at near-reversals.
/// 3. Decompose the raw ring at its self-intersections and keep the
///    counter-clockwise loops; inverted loops are collapsed features.
/// 4. Discard loops that never leave the `KEEP_DEPTH_FRACTION` band around
///    the original boundary.
#[derive(Debug)]
pub struct RegionInset<'a> {
    region: &'a Region,
    distance: f64,
}

impl<'a> RegionInset<'a> {
    /// Creates a new inset operation.
    #[must_use]
    pub fn new(region: &'a Region, distance: f64) -> Self {
        Self { region, distance }
    }

    /// Executes the inset, returning the surviving component polygons.
    ///
    /// A zero distance returns the input components unchanged. An empty
    /// vector is a legal outcome: the region was annihilated.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a negative distance.
    pub fn execute(&self) -> Result<Vec<Polygon>> {
        if self.distance < 0.0 {
            return Err(OperationError::InvalidInput(
                "inset distance must be non-negative".to_owned(),
            )
            .into());
        }
        if self.distance < TOLERANCE {
            return Ok(self.region.polygons().to_vec());
        }

        let mut components = Vec::new();
        for polygon in self.region.polygons() {
            components.extend(inset_ring(polygon, self.distance)?);
        }
        Ok(components)
    }
}

/// Insets a single ring and collects the surviving loops.
fn inset_ring(polygon: &Polygon, distance: f64) -> Result<Vec<Polygon>> {
    let ring = polygon.ring();
    let raw = build_raw_inset(ring, distance)?;
    if raw.len() < 3 {
        return Ok(Vec::new());
    }

    // Rings are CCW by construction, so surviving loops must be CCW too.
    let loops = collect_simple_loops(&raw, 1.0);

    let keep_threshold = distance * KEEP_DEPTH_FRACTION;
    let mut out = Vec::new();
    for lp in loops {
        let depth = lp
            .iter()
            .map(|p| point_to_ring_dist(p.x, p.y, ring))
            .fold(0.0_f64, f64::max);
        if depth < keep_threshold {
            continue;
        }
        if let Ok(p) = Polygon::new(lp) {
            out.push(p);
        }
    }
    Ok(out)
}

/// Offsets every segment of a closed CCW ring inward by `distance` and joins
/// them into the raw (possibly self-intersecting) offset ring.
fn build_raw_inset(points: &[Point2], distance: f64) -> Result<Vec<Point2>> {
    let n = points.len();

    let mut offset_segments: Vec<(Point2, Point2)> = Vec::with_capacity(n);
    let mut directions: Vec<Vector2> = Vec::with_capacity(n);

    for i in 0..n {
        let j = (i + 1) % n;
        let dir = segment_direction(&points[i], &points[j])?;
        // For a CCW ring the left normal points into the interior.
        let offset = left_normal(dir) * distance;

        let a = Point2::new(points[i].x + offset.x, points[i].y + offset.y);
        let b = Point2::new(points[j].x + offset.x, points[j].y + offset.y);
        offset_segments.push((a, b));
        directions.push(dir);
    }

    let mut raw = Vec::with_capacity(n * 2);
    for i in 0..n {
        let prev = if i == 0 { n - 1 } else { i - 1 };
        push_corner(
            &mut raw,
            &offset_segments[prev],
            &offset_segments[i],
            &directions[prev],
            &directions[i],
            &points[i],
            distance,
        );
    }

    Ok(raw)
}

/// Pushes corner point(s) into `raw`.
///
/// - Near-antiparallel segments: flat cap (two points).
/// - Miter exceeding `MITER_LIMIT`: bevel (two points).
/// - Normal corners: single miter intersection point.
fn push_corner(
    raw: &mut Vec<Point2>,
    seg_prev: &(Point2, Point2),
    seg_next: &(Point2, Point2),
    dir_prev: &Vector2,
    dir_next: &Vector2,
    original_corner: &Point2,
    distance: f64,
) {
    let cos_angle = dir_prev.x * dir_next.x + dir_prev.y * dir_next.y;

    if cos_angle < FLAT_CAP_COS {
        raw.push(seg_prev.1);
        raw.push(seg_next.0);
        return;
    }

    let corner = intersect_offset_lines(seg_prev, seg_next, original_corner, distance);
    let dx = corner.x - original_corner.x;
    let dy = corner.y - original_corner.y;
    let miter_dist_sq = dx * dx + dy * dy;
    let limit = MITER_LIMIT * distance;

    if miter_dist_sq > limit * limit {
        raw.push(seg_prev.1);
        raw.push(seg_next.0);
    } else {
        raw.push(corner);
    }
}

/// Intersects two offset lines and returns the corner point.
///
/// Falls back to shifting the original corner if the lines are parallel.
fn intersect_offset_lines(
    seg_prev: &(Point2, Point2),
    seg_next: &(Point2, Point2),
    original_corner: &Point2,
    distance: f64,
) -> Point2 {
    let d_prev = seg_prev.1 - seg_prev.0;
    let d_next = seg_next.1 - seg_next.0;

    if let Some((t, _u)) = line_line_intersect_2d(&seg_prev.1, &d_prev, &seg_next.0, &d_next) {
        point_at(&seg_prev.1, &d_prev, t)
    } else {
        let normal = left_normal(
            d_prev
                .try_normalize(TOLERANCE)
                .unwrap_or_else(|| Vector2::new(1.0, 0.0)),
        );
        Point2::new(
            original_corner.x + normal.x * distance,
            original_corner.y + normal.y * distance,
        )
    }
}
