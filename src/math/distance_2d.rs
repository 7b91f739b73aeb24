use super::Point2;
use crate::math::intersect_2d::segment_segment_intersect_2d;

/// Returns the minimum distance from point `(px, py)` to the line segment
/// from `(ax, ay)` to `(bx, by)`.
#[must_use]
pub fn point_to_segment_dist(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    point_to_segment_witness(px, py, ax, ay, bx, by).1
}

/// Returns the closest point on the segment `(ax, ay)`–`(bx, by)` to the
/// point `(px, py)`, together with the distance.
#[must_use]
pub fn point_to_segment_witness(
    px: f64,
    py: f64,
    ax: f64,
    ay: f64,
    bx: f64,
    by: f64,
) -> (Point2, f64) {
    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        let d = ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
        return (Point2::new(ax, ay), d);
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((px - ax) * dx + (py - ay) * dy) / len_sq;
    let t = t.clamp(0.0, 1.0);

    let closest = Point2::new(ax + t * dx, ay + t * dy);
    let d = ((px - closest.x).powi(2) + (py - closest.y).powi(2)).sqrt();
    (closest, d)
}

/// Returns the nearest pair of points between two segments, together with
/// their distance.
///
/// Crossing segments yield the crossing point on both sides (distance zero);
/// otherwise the minimum is realized at an endpoint of one segment projected
/// onto the other.
#[must_use]
pub fn segment_segment_nearest(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> (Point2, Point2, f64) {
    if let Some((pt, _, _)) = segment_segment_intersect_2d(a0, a1, b0, b1) {
        return (pt, pt, 0.0);
    }

    let mut best: Option<(Point2, Point2, f64)> = None;
    let candidates = [
        (a0, (b0, b1), true),
        (a1, (b0, b1), true),
        (b0, (a0, a1), false),
        (b1, (a0, a1), false),
    ];
    for (pt, (s0, s1), point_is_on_a) in candidates {
        let (witness, d) = point_to_segment_witness(pt.x, pt.y, s0.x, s0.y, s1.x, s1.y);
        let pair = if point_is_on_a {
            (*pt, witness, d)
        } else {
            (witness, *pt, d)
        };
        match &best {
            Some((_, _, bd)) if *bd <= d => {}
            _ => best = Some(pair),
        }
    }

    // The candidate list is non-empty, so `best` is always set.
    best.unwrap_or((*a0, *b0, (b0 - a0).norm()))
}

/// Returns the minimum distance from a point to a closed ring's boundary.
#[must_use]
pub fn point_to_ring_dist(px: f64, py: f64, ring: &[Point2]) -> f64 {
    let n = ring.len();
    if n == 0 {
        return f64::MAX;
    }
    if n == 1 {
        return ((px - ring[0].x).powi(2) + (py - ring[0].y).powi(2)).sqrt();
    }
    let mut min_d = f64::MAX;
    for i in 0..n {
        let j = (i + 1) % n;
        let d = point_to_segment_dist(px, py, ring[i].x, ring[i].y, ring[j].x, ring[j].y);
        if d < min_d {
            min_d = d;
        }
    }
    min_d
}
