use crate::error::{GeometryError, Result};
use crate::geometry::Polygon;
use crate::math::Point2;

/// An ordered set of one or more disjoint simple polygons.
///
/// A region is the uniform shape representation throughout the kernel: a
/// single-polygon result is always a one-element region, so callers never
/// branch between "polygon" and "multi-polygon" cases. The component count
/// is the topological signal the erosion search watches.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    polygons: Vec<Polygon>,
}

impl Region {
    /// Creates a region from one or more polygons.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::EmptyRegion` if `polygons` is empty.
    pub fn new(polygons: Vec<Polygon>) -> Result<Self> {
        if polygons.is_empty() {
            return Err(GeometryError::EmptyRegion.into());
        }
        Ok(Self { polygons })
    }

    /// Creates a single-component region.
    #[must_use]
    pub fn from_polygon(polygon: Polygon) -> Self {
        Self {
            polygons: vec![polygon],
        }
    }

    /// Builds a region from raw vertex rings, applying one repair pass to
    /// each ring (the only input normalization the kernel performs).
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::EmptyRegion` if no ring survives repair.
    pub fn from_rings(rings: &[Vec<Point2>]) -> Result<Self> {
        let polygons: Vec<Polygon> = rings.iter().flat_map(|r| Polygon::repair(r)).collect();
        Self::new(polygons)
    }

    /// The component polygons, in order.
    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    /// Number of disjoint components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.polygons.len()
    }

    /// Sum of the component areas.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }
}
