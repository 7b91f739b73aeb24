/// Observer notified at defined points of a subdivision run.
///
/// All methods default to no-ops; implement only what you need. The engine
/// never depends on observer behavior — this is a one-way sink for tracing
/// and visual front-ends living outside the kernel.
pub trait SubdivisionObserver {
    /// A marching erosion pass is about to run for `label`.
    ///
    /// `pass` counts the refinement passes for this node from zero;
    /// `limit` is the largest candidate distance of the pass.
    fn erosion_attempted(&mut self, label: &str, pass: usize, limit: f64) {
        let _ = (label, pass, limit);
    }

    /// A pinch was localized for `label`; `step_gap` is the residual
    /// distance uncertainty after the final refinement pass.
    fn pinch_found(&mut self, label: &str, step_gap: f64) {
        let _ = (label, step_gap);
    }

    /// Processing of `label` finished with `children` child nodes
    /// (zero for a permanent leaf).
    fn node_resolved(&mut self, label: &str, children: usize) {
        let _ = (label, children);
    }
}

/// The default observer: ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl SubdivisionObserver for SilentObserver {}
