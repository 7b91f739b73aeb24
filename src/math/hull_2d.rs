use super::Point2;

/// Computes the convex hull of a set of points using Andrew's monotone chain
/// algorithm.
///
/// Returns the hull vertices in counter-clockwise order. The first and last
/// points are NOT the same (the hull is implicitly closed). Collinear input
/// collapses to its two extreme points.
#[must_use]
pub fn convex_hull(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    // Sort points lexicographically.
    let mut sorted: Vec<Point2> = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    sorted.dedup_by(|a, b| (a.x - b.x).abs() < 1e-14 && (a.y - b.y).abs() < 1e-14);

    if sorted.len() < 3 {
        return sorted;
    }

    // Build lower hull.
    let mut lower: Vec<Point2> = Vec::new();
    for &p in &sorted {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], &p) <= 0.0
        {
            lower.pop();
        }
        lower.push(p);
    }

    // Build upper hull.
    let mut upper: Vec<Point2> = Vec::new();
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], &p) <= 0.0
        {
            upper.pop();
        }
        upper.push(p);
    }

    // Concatenate, dropping the duplicated endpoints of each chain.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Cross product of (b - a) × (c - a).
fn cross(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}
