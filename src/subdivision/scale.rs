use crate::error::{Result, ScaleError};
use crate::geometry::Polygon;
use crate::math::TOLERANCE;
use crate::operations::query::MinAreaRect;

/// Derives a real-world-per-geometry-unit scale factor from reference
/// objects of known approximate width.
///
/// Each reference polygon (typically a door) is measured by the longer edge
/// of its minimum-area bounding rectangle; the median across all references
/// keeps outliers (mislabelled or partially traced objects) from skewing the
/// estimate. The result is `assumed_width / median(measured)`.
#[derive(Debug)]
pub struct EstimateScale<'a> {
    references: &'a [Polygon],
    assumed_width: f64,
}

impl<'a> EstimateScale<'a> {
    /// Creates a new scale estimation over `references`, each assumed to be
    /// `assumed_width` real-world units across its longer dimension.
    #[must_use]
    pub fn new(references: &'a [Polygon], assumed_width: f64) -> Self {
        Self {
            references,
            assumed_width,
        }
    }

    /// Executes the estimation.
    ///
    /// # Errors
    ///
    /// Returns `ScaleError::EmptyReferenceSet` if no references are given
    /// (the median is undefined), and `ScaleError::DegenerateReferences` if
    /// the median measured dimension vanishes.
    pub fn execute(&self) -> Result<f64> {
        if self.references.is_empty() {
            return Err(ScaleError::EmptyReferenceSet.into());
        }

        let mut measured: Vec<f64> = Vec::with_capacity(self.references.len());
        for reference in self.references {
            let rect = MinAreaRect::new(reference.ring()).execute()?;
            measured.push(rect.longer_edge());
        }

        let med = median(&mut measured);
        if med < TOLERANCE {
            return Err(ScaleError::DegenerateReferences.into());
        }

        Ok(self.assumed_width / med)
    }
}

/// Median of a non-empty slice; even sizes average the two central values.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) * 0.5
    }
}
