use crate::error::{PinchError, Result};
use crate::geometry::Region;
use crate::operations::offset::RegionInset;

/// What a marching search should return once it detects a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarchMode {
    /// Return the last non-splitting erosion — the caller will refine from
    /// there with a finer step sequence.
    StopBeforeSplit,
    /// Return the splitting erosion itself for pinch resolution.
    ReturnSplit,
}

/// Terminal result of one marching erosion search.
#[derive(Debug, Clone)]
pub enum MarchOutcome {
    /// A split was detected. Depending on the mode, `region` is the last
    /// intact erosion or the split one; `step_gap` is the distance between
    /// the last intact and first splitting candidates.
    Located { region: Region, step_gap: f64 },
    /// No candidate distance split the region (or it eroded away first).
    NoPinchFound,
}

/// The "marching buffer": erodes a region by an ascending sequence of
/// candidate distances until it topologically splits.
///
/// A split is an erosion result with more than one disjoint polygon — that
/// is the pinch-detection signal, not an error. Results with exactly one
/// polygon are normalized to a one-element region so downstream handling is
/// uniform.
#[derive(Debug)]
pub struct MarchingInset<'a> {
    region: &'a Region,
    steps: &'a [f64],
    mode: MarchMode,
}

impl<'a> MarchingInset<'a> {
    /// Creates a new marching search over `steps` (ascending distances).
    #[must_use]
    pub fn new(region: &'a Region, steps: &'a [f64], mode: MarchMode) -> Self {
        Self {
            region,
            steps,
            mode,
        }
    }

    /// Runs the march.
    ///
    /// # Errors
    ///
    /// Returns `PinchError::FirstStepIntersection` if the very first
    /// candidate distance already splits the region — there is no prior
    /// non-splitting result to localize from, and the caller must retry
    /// with finer steps. Kernel failures from the erosion itself propagate.
    pub fn execute(&self) -> Result<MarchOutcome> {
        let mut last_intact: Option<Region> = None;

        for (i, &step) in self.steps.iter().enumerate() {
            let components = RegionInset::new(self.region, step).execute()?;
            log::trace!(
                "march step {i}: distance {step}, {} component(s)",
                components.len()
            );

            if components.is_empty() {
                // The region eroded away before splitting; nothing left to
                // localize.
                log::debug!("march: region annihilated at distance {step}");
                return Ok(MarchOutcome::NoPinchFound);
            }

            if components.len() > 1 {
                if i == 0 {
                    return Err(PinchError::FirstStepIntersection(step).into());
                }
                let step_gap = step - self.steps[i - 1];
                log::debug!("march: split at distance {step} (gap {step_gap})");
                let region = match self.mode {
                    MarchMode::StopBeforeSplit => match last_intact {
                        Some(r) => r,
                        // `last_intact` is always set once i > 0.
                        None => return Ok(MarchOutcome::NoPinchFound),
                    },
                    MarchMode::ReturnSplit => Region::new(components)?,
                };
                return Ok(MarchOutcome::Located { region, step_gap });
            }

            last_intact = Some(Region::new(components)?);
        }

        log::debug!(
            "march: no split within {} candidate distances",
            self.steps.len()
        );
        Ok(MarchOutcome::NoPinchFound)
    }
}
