use super::intersect_2d::segment_segment_intersect_2d;
use super::{Point2, Vector2, TOLERANCE};
use crate::error::{OperationError, Result};

/// Computes the signed area of a closed ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Rotates a closed ring so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output for tests.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    if best == 0 {
        return points.to_vec();
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = (d.x * d.x + d.y * d.y).sqrt();
    if len < TOLERANCE {
        return Err(OperationError::InvalidInput(format!(
            "zero-length segment between ({}, {}) and ({}, {})",
            a.x, a.y, b.x, b.y
        ))
        .into());
    }
    Ok(Vector2::new(d.x / len, d.y / len))
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Removes degenerate vertices from a closed ring: consecutive duplicates
/// and collinear (on-edge) points.
///
/// Essential after splitting at intersections that land on existing vertices,
/// which create duplicate and collinear vertices in sub-rings.
#[must_use]
pub fn clean_ring(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    // Step 1: Remove consecutive near-duplicates.
    let tol_sq = TOLERANCE * TOLERANCE * 100.0;
    let mut deduped: Vec<Point2> = Vec::with_capacity(points.len());
    for &pt in points {
        if let Some(&last) = deduped.last() {
            if (pt.x - last.x).powi(2) + (pt.y - last.y).powi(2) < tol_sq {
                continue;
            }
        }
        deduped.push(pt);
    }
    // Wrap-around: check last vs first.
    if deduped.len() > 1 {
        let first = deduped[0];
        let last = deduped[deduped.len() - 1];
        if (last.x - first.x).powi(2) + (last.y - first.y).powi(2) < tol_sq {
            deduped.pop();
        }
    }

    if deduped.len() < 3 {
        return deduped;
    }

    // Step 2: Remove collinear vertices (single pass, cross-product check).
    let n = deduped.len();
    let mut cleaned = Vec::with_capacity(n);
    for i in 0..n {
        let prev = if i == 0 { n - 1 } else { i - 1 };
        let next = (i + 1) % n;
        let cross = (deduped[i].x - deduped[prev].x) * (deduped[next].y - deduped[i].y)
            - (deduped[i].y - deduped[prev].y) * (deduped[next].x - deduped[i].x);
        if cross.abs() >= TOLERANCE {
            cleaned.push(deduped[i]);
        }
    }

    // Don't reduce below 3 vertices — return deduped as fallback.
    if cleaned.len() < 3 {
        return deduped;
    }
    cleaned
}

/// Checks whether segments i and j are adjacent in a closed ring.
fn are_adjacent(i: usize, j: usize, n: usize) -> bool {
    let diff = i.abs_diff(j);
    diff == 1 || diff == n - 1
}

/// Finds the first self-intersection between non-adjacent segments of a
/// closed ring.
///
/// Skips endpoint-to-endpoint touches (both `t` and `u` near 0 or 1) which
/// occur when the ring revisits the same geometric point at non-adjacent
/// vertex positions. Only genuine crossings (at least one parameter in the
/// interior) are reported.
///
/// Returns `(i, j, intersection_point)` where `i < j` are segment indices.
#[must_use]
pub fn find_first_self_intersection(points: &[Point2]) -> Option<(usize, usize, Point2)> {
    let n = points.len();
    if n < 4 {
        return None;
    }
    let eps = TOLERANCE * 100.0;
    for i in 0..n {
        let i_next = (i + 1) % n;
        for j in (i + 2)..n {
            if are_adjacent(i, j, n) {
                continue;
            }
            let j_next = (j + 1) % n;
            if let Some((pt, t, u)) = segment_segment_intersect_2d(
                &points[i],
                &points[i_next],
                &points[j],
                &points[j_next],
            ) {
                let t_at_end = t < eps || t > 1.0 - eps;
                let u_at_end = u < eps || u > 1.0 - eps;
                if t_at_end && u_at_end {
                    continue;
                }
                return Some((i, j, pt));
            }
        }
    }
    None
}

/// Splits a closed ring at the intersection of segments `i` and `j` into two
/// sub-rings.
///
/// Assumes `i < j`. Returns the two loops created by the split:
/// - Sub-path A: `[intersection, P(i+1), ..., P(j)]`
/// - Sub-path B: `[intersection, P(j+1), ..., P(i)]` (wrapping around)
#[must_use]
pub fn split_ring_at_intersection(
    points: &[Point2],
    seg_i: usize,
    seg_j: usize,
    intersection: Point2,
) -> (Vec<Point2>, Vec<Point2>) {
    let n = points.len();

    // Sub-path A: intersection, then vertices (seg_i+1) through seg_j inclusive.
    let mut a = Vec::with_capacity(seg_j - seg_i + 1);
    a.push(intersection);
    a.extend_from_slice(&points[(seg_i + 1)..=seg_j]);

    // Sub-path B: intersection, then vertices (seg_j+1)%n through seg_i inclusive (wrapping).
    let b_vertex_count = n - (seg_j - seg_i);
    let mut b = Vec::with_capacity(b_vertex_count + 1);
    b.push(intersection);
    let mut idx = (seg_j + 1) % n;
    loop {
        b.push(points[idx]);
        if idx == seg_i {
            break;
        }
        idx = (idx + 1) % n;
    }

    (a, b)
}

/// Recursively decomposes a self-intersecting closed ring into simple loops,
/// keeping every loop whose winding matches `winding_sign` and whose area
/// survives the tolerance.
///
/// At each self-intersection the ring is split into two sub-rings and both
/// sides are decomposed further. Loops that wind against the original ring
/// are inversion artifacts of a collapsed feature and are discarded.
/// Convergence is guaranteed because each split strictly reduces vertex count.
///
/// `winding_sign` is `+1.0` for CCW rings, `-1.0` for CW.
#[must_use]
pub fn collect_simple_loops(points: &[Point2], winding_sign: f64) -> Vec<Vec<Point2>> {
    let pts = clean_ring(points);
    if pts.len() < 3 {
        return Vec::new();
    }
    match find_first_self_intersection(&pts) {
        None => {
            let area = signed_area_2d(&pts);
            if area * winding_sign > TOLERANCE {
                vec![pts]
            } else {
                Vec::new()
            }
        }
        Some((i, j, pt)) => {
            let (a, b) = split_ring_at_intersection(&pts, i, j, pt);
            let mut loops = collect_simple_loops(&a, winding_sign);
            loops.extend(collect_simple_loops(&b, winding_sign));
            loops
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn signed_area_ccw_square() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let area = signed_area_2d(&pts);
        assert!((area - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_cw_square() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ];
        let area = signed_area_2d(&pts);
        assert!((area + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!((signed_area_2d(&[Point2::new(0.0, 0.0)])).abs() < TOLERANCE);
        assert!((signed_area_2d(&[])).abs() < TOLERANCE);
    }

    #[test]
    fn canonical_start_rotation() {
        let pts = vec![
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
            Point2::new(0.0, 0.0),
        ];
        let rotated = rotate_to_canonical_start(&pts);
        assert!((rotated[0].x).abs() < TOLERANCE);
        assert!((rotated[0].y).abs() < TOLERANCE);
    }

    #[test]
    fn segment_direction_basic() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(3.0, 4.0);
        let dir = segment_direction(&a, &b).unwrap();
        assert!((dir.x - 0.6).abs() < TOLERANCE);
        assert!((dir.y - 0.8).abs() < TOLERANCE);
    }

    #[test]
    fn segment_direction_zero_length() {
        let a = Point2::new(1.0, 1.0);
        let b = Point2::new(1.0, 1.0);
        assert!(segment_direction(&a, &b).is_err());
    }

    #[test]
    fn left_normal_basic() {
        let dir = Vector2::new(1.0, 0.0);
        let n = left_normal(dir);
        assert!((n.x).abs() < TOLERANCE);
        assert!((n.y - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn clean_ring_removes_duplicates_and_collinear() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let cleaned = clean_ring(&pts);
        // Duplicate (0,0) and collinear (1,0) removed.
        assert_eq!(cleaned.len(), 4);
    }

    #[test]
    fn simple_ring_no_self_intersection() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ];
        assert!(find_first_self_intersection(&pts).is_none());
    }

    #[test]
    fn figure_eight_decomposes_into_two_loops() {
        // Bowtie: two triangles sharing a crossing at (2, 1).
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(4.0, 2.0),
        ];
        let (i, j, pt) = find_first_self_intersection(&pts).unwrap();
        assert!(i < j);
        assert!((pt.x - 2.0).abs() < 1e-9);
        assert!((pt.y - 1.0).abs() < 1e-9);

        // The bowtie traversal winds its two lobes in opposite directions,
        // so exactly one of them survives a one-sided winding filter.
        let ccw = collect_simple_loops(&pts, 1.0);
        let cw = collect_simple_loops(&pts, -1.0);
        assert_eq!(ccw.len() + cw.len(), 2);
    }

    #[test]
    fn collect_simple_loops_keeps_matching_winding() {
        let ccw = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let kept = collect_simple_loops(&ccw, 1.0);
        assert_eq!(kept.len(), 1);
        // Same ring against the opposite winding is discarded.
        let dropped = collect_simple_loops(&ccw, -1.0);
        assert!(dropped.is_empty());
    }
}
