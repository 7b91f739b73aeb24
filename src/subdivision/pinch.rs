use crate::error::{PinchError, Result};
use crate::geometry::{Polygon, Region};
use crate::math::{Point2, Vector2, TOLERANCE};
use crate::operations::modification::SplitAtChord;
use crate::operations::query::{BoundaryIntersections, NearestPair};

/// Reconstructs an exact cutting chord from a located split and partitions
/// the original polygon along it.
///
/// The eroded split only approximates where the pinch sits; the cut itself
/// must land on the original, un-eroded boundary:
///
/// 1. The nearest pair of points between the two split components marks the
///    throat — its segment carries the pinch's local width and orientation.
/// 2. Rotating that segment 90° about its midpoint gives the natural cutting
///    direction, across the throat.
/// 3. The rotated segment is extended well past the original boundary and
///    intersected with it; of all crossings, the two nearest to the throat
///    midpoint bound the *local* constriction — farther crossings belong to
///    other parts of a concave outline and must not be cut.
/// 4. The chord between those two crossings splits the original polygon;
///    degenerate fragments are dropped.
#[derive(Debug)]
pub struct ResolvePinch<'a> {
    split: &'a Region,
    original: &'a Polygon,
}

impl<'a> ResolvePinch<'a> {
    /// Creates a resolver for a split region against the pre-erosion
    /// polygon it came from.
    #[must_use]
    pub fn new(split: &'a Region, original: &'a Polygon) -> Self {
        Self { split, original }
    }

    /// Executes the resolution, returning the child fragments.
    ///
    /// On success the fragment areas sum to the original polygon's area
    /// within numerical tolerance.
    ///
    /// # Errors
    ///
    /// - `PinchError::MultiPinchUnsupported` if the split has anything other
    ///   than exactly two components.
    /// - `PinchError::UnresolvablePinchGeometry` if the cutting line crosses
    ///   the boundary fewer than two times, the throat degenerates, or the
    ///   cut fails to produce two fragments.
    pub fn execute(&self) -> Result<Vec<Polygon>> {
        let components = self.split.polygons();
        if components.len() != 2 {
            return Err(PinchError::MultiPinchUnsupported(components.len()).into());
        }

        let near = NearestPair::new(&components[0], &components[1]).execute()?;
        let throat = near.point_on_second - near.point_on_first;
        if throat.norm() < TOLERANCE {
            return Err(PinchError::UnresolvablePinchGeometry(
                "split components touch; throat has no width".to_owned(),
            )
            .into());
        }
        let midpoint = Point2::new(
            (near.point_on_first.x + near.point_on_second.x) * 0.5,
            (near.point_on_first.y + near.point_on_second.y) * 0.5,
        );

        // Perpendicular to the throat, long enough to leave the polygon on
        // both sides regardless of where the pinch sits.
        let perpendicular = Vector2::new(-throat.y, throat.x).normalize();
        let (min, max) = self.original.bounds();
        let reach = (max - min).norm() * 2.0;
        let cut_start = midpoint - perpendicular * reach;
        let cut_end = midpoint + perpendicular * reach;

        let mut crossings =
            BoundaryIntersections::new(self.original, cut_start, cut_end).execute();
        if crossings.len() < 2 {
            return Err(PinchError::UnresolvablePinchGeometry(format!(
                "cutting line crosses the boundary {} time(s)",
                crossings.len()
            ))
            .into());
        }

        // The two crossings nearest the throat midpoint bound the local
        // constriction.
        crossings.sort_by(|a, b| {
            let da = (a - midpoint).norm();
            let db = (b - midpoint).norm();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
        log::debug!(
            "pinch at ({:.3}, {:.3}): {} boundary crossing(s)",
            midpoint.x,
            midpoint.y,
            crossings.len()
        );

        let fragments = SplitAtChord::new(self.original, crossings[0], crossings[1]).execute()?;
        if fragments.len() < 2 {
            return Err(PinchError::UnresolvablePinchGeometry(
                "cut did not partition the polygon".to_owned(),
            )
            .into());
        }
        Ok(fragments)
    }
}
