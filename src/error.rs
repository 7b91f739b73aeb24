use thiserror::Error;

/// Top-level error type for the roomcut subdivision kernel.
#[derive(Debug, Error)]
pub enum RoomcutError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Scale(#[from] ScaleError),

    #[error(transparent)]
    Pinch(#[from] PinchError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("a region must contain at least one polygon")]
    EmptyRegion,
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors related to the region-node registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("region node not found")]
    NodeNotFound,
}

/// Errors related to scale estimation from reference objects.
#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("no reference polygons to estimate a scale from")]
    EmptyReferenceSet,

    #[error("reference polygons have no measurable extent")]
    DegenerateReferences,
}

/// Per-node failures of the pinch detection and resolution pipeline.
///
/// The subdivision engine converts all of these into permanent leaves;
/// they never abort a run.
#[derive(Debug, Error)]
pub enum PinchError {
    #[error("erosion by the first step distance {0} already split the region; use finer steps")]
    FirstStepIntersection(f64),

    #[error("erosion produced {0} components; only a single two-way pinch is supported")]
    MultiPinchUnsupported(usize),

    #[error("pinch geometry could not be resolved: {0}")]
    UnresolvablePinchGeometry(String),
}

/// Convenience type alias for results using [`RoomcutError`].
pub type Result<T> = std::result::Result<T, RoomcutError>;
