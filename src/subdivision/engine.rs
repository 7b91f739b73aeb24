use std::collections::VecDeque;

use crate::error::{OperationError, Result, RoomcutError};
use crate::geometry::{Polygon, Region};
use crate::subdivision::events::{SilentObserver, SubdivisionObserver};
use crate::subdivision::march::{MarchMode, MarchOutcome, MarchingInset};
use crate::subdivision::node::{RegionNode, RegionStore};
use crate::subdivision::pinch::ResolvePinch;

/// Why a subdivision run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The work queue drained; every node was processed.
    Completed,
    /// The iteration cap interrupted the traversal; unprocessed nodes
    /// remain in the output as they were.
    MaxIterationsReached,
}

/// Flat value snapshot of a forest node, as handed to callers.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    /// Lineage label (`"seed"`, `"seed_0"`, `"seed_0_1"`, …).
    pub id: String,
    /// The node's geometry.
    pub region: Region,
    /// Depth from the seed region.
    pub level: u32,
    /// Lineage label of the parent, or `None` for the root.
    pub parent: Option<String>,
    /// Lineage labels of the children, in sibling order.
    pub children: Vec<String>,
    /// Area cached at node creation.
    pub area: f64,
}

/// Result of a subdivision run: records sorted by area descending, plus the
/// stop reason.
#[derive(Debug, Clone)]
pub struct SubdivisionOutcome {
    pub records: Vec<NodeRecord>,
    pub reason: StopReason,
}

/// Parameters of a subdivision run.
#[derive(Debug, Clone)]
pub struct SubdivisionConfig {
    scale: f64,
    min_pinch_size: f64,
    max_iterations: usize,
    leaves_only: bool,
    step_count: usize,
    refinement_passes: usize,
    step_reduction: f64,
}

impl SubdivisionConfig {
    /// Creates a configuration with the given scale (real-world units per
    /// geometry unit) and minimum pinch size (real-world units), using the
    /// default traversal parameters.
    #[must_use]
    pub fn new(scale: f64, min_pinch_size: f64) -> Self {
        Self {
            scale,
            min_pinch_size,
            max_iterations: 5,
            leaves_only: true,
            step_count: 20,
            refinement_passes: 3,
            step_reduction: 10.0,
        }
    }

    /// Caps the number of nodes the traversal may dequeue.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Selects whether the output keeps only leaf nodes (default) or the
    /// whole forest.
    #[must_use]
    pub fn with_leaves_only(mut self, leaves_only: bool) -> Self {
        self.leaves_only = leaves_only;
        self
    }

    /// Number of evenly spaced candidate distances per marching pass.
    #[must_use]
    pub fn with_step_count(mut self, step_count: usize) -> Self {
        self.step_count = step_count;
        self
    }

    /// Number of chained marching passes per node; each pass divides the
    /// step sequence by the reduction factor.
    #[must_use]
    pub fn with_refinement_passes(mut self, refinement_passes: usize) -> Self {
        self.refinement_passes = refinement_passes;
        self
    }

    /// Factor by which each refinement pass shrinks the step sequence.
    #[must_use]
    pub fn with_step_reduction(mut self, step_reduction: f64) -> Self {
        self.step_reduction = step_reduction;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.scale <= 0.0 || !self.scale.is_finite() {
            return Err(
                OperationError::InvalidInput("scale must be positive and finite".to_owned()).into(),
            );
        }
        if self.min_pinch_size <= 0.0 {
            return Err(
                OperationError::InvalidInput("minimum pinch size must be positive".to_owned())
                    .into(),
            );
        }
        if self.max_iterations == 0 {
            return Err(
                OperationError::InvalidInput("iteration cap must be at least 1".to_owned()).into(),
            );
        }
        if self.step_count < 2 {
            return Err(
                OperationError::InvalidInput("step count must be at least 2".to_owned()).into(),
            );
        }
        if self.refinement_passes == 0 {
            return Err(OperationError::InvalidInput(
                "at least one refinement pass is required".to_owned(),
            )
            .into());
        }
        if self.step_reduction <= 1.0 {
            return Err(OperationError::InvalidInput(
                "step reduction factor must exceed 1".to_owned(),
            )
            .into());
        }
        Ok(())
    }
}

/// Queue-driven subdivision of a region into room-like leaves.
///
/// The engine owns a forest of region nodes. Starting from the seed it
/// repeatedly dequeues an unprocessed node, localizes a pinch with chained
/// marching passes, cuts the node's polygon there, and enqueues the
/// fragments as children. A node that cannot be split — no pinch below the
/// threshold, an unsupported multi-pinch, or any geometric failure — becomes
/// a permanent leaf and the traversal moves on. The traversal is plain FIFO,
/// so identical input always produces the identical forest.
#[derive(Debug)]
pub struct SubdivisionEngine {
    config: SubdivisionConfig,
}

impl SubdivisionEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: SubdivisionConfig) -> Self {
        Self { config }
    }

    /// Runs the subdivision on `seed` without an observer.
    ///
    /// # Errors
    ///
    /// Returns an error only for an invalid configuration; per-node
    /// failures degrade to leaves instead of aborting the run.
    pub fn run(&self, seed: Region) -> Result<SubdivisionOutcome> {
        self.run_with_observer(seed, &mut SilentObserver)
    }

    /// Runs the subdivision on `seed`, notifying `observer` at each defined
    /// point.
    ///
    /// # Errors
    ///
    /// Returns an error only for an invalid configuration; per-node
    /// failures degrade to leaves instead of aborting the run.
    pub fn run_with_observer(
        &self,
        seed: Region,
        observer: &mut dyn SubdivisionObserver,
    ) -> Result<SubdivisionOutcome> {
        self.config.validate()?;

        let mut store = RegionStore::new();
        let mut queue = VecDeque::new();
        let seed_key = store.insert(RegionNode::new("seed".to_owned(), seed, 0, None));
        queue.push_back(seed_key);

        let mut reason = StopReason::Completed;
        let mut iterations = 0_usize;

        while let Some(key) = queue.pop_front() {
            let (label, region, level) = {
                let node = store.node(key)?;
                (node.label.clone(), node.region.clone(), node.level)
            };
            log::debug!("processing node {label} (level {level})");

            let fragments = match self.subdivide_node(&label, &region, observer) {
                Ok(Some(fragments)) => fragments,
                Ok(None) => Vec::new(),
                Err(RoomcutError::Pinch(err)) => {
                    log::debug!("node {label}: {err}; keeping as leaf");
                    Vec::new()
                }
                Err(err) => {
                    log::warn!("node {label}: {err}; keeping as leaf");
                    Vec::new()
                }
            };

            let mut child_keys = Vec::with_capacity(fragments.len());
            for (j, fragment) in fragments.into_iter().enumerate() {
                let child = RegionNode::new(
                    format!("{label}_{j}"),
                    Region::from_polygon(fragment),
                    level + 1,
                    Some(key),
                );
                let child_key = store.insert(child);
                child_keys.push(child_key);
                queue.push_back(child_key);
            }

            observer.node_resolved(&label, child_keys.len());
            {
                let node = store.node_mut(key)?;
                node.children = child_keys;
                node.subdivided = true;
            }

            iterations += 1;
            if iterations == self.config.max_iterations {
                reason = StopReason::MaxIterationsReached;
                break;
            }
        }

        log::debug!(
            "subdivision finished after {iterations} node(s): {} in forest",
            store.len()
        );
        self.collect_records(&store, reason)
    }

    /// Attempts to split one node. `Ok(None)` means no pinch was found —
    /// the node is a well-formed leaf, not a failure.
    fn subdivide_node(
        &self,
        label: &str,
        region: &Region,
        observer: &mut dyn SubdivisionObserver,
    ) -> Result<Option<Vec<Polygon>>> {
        let limit = self.config.min_pinch_size / self.config.scale;
        let mut steps = evenly_spaced(limit, self.config.step_count);
        let mut current = region.clone();
        let mut step_gap = 0.0;

        // Each pass marches the previous pass's eroded region with a finer
        // sequence, so the total inset accumulates while the localization
        // error shrinks. Only the final pass keeps the split itself.
        for pass in 0..self.config.refinement_passes {
            let mode = if pass + 1 == self.config.refinement_passes {
                MarchMode::ReturnSplit
            } else {
                MarchMode::StopBeforeSplit
            };
            observer.erosion_attempted(label, pass, steps[steps.len() - 1]);

            match MarchingInset::new(&current, &steps, mode).execute()? {
                MarchOutcome::NoPinchFound => return Ok(None),
                MarchOutcome::Located { region, step_gap: gap } => {
                    current = region;
                    step_gap = gap;
                }
            }

            for step in &mut steps {
                *step /= self.config.step_reduction;
            }
        }
        observer.pinch_found(label, step_gap);

        let fragments = ResolvePinch::new(&current, &region.polygons()[0]).execute()?;
        Ok(Some(fragments))
    }

    /// Snapshots the forest into output records: optionally leaves only,
    /// sorted by area descending (stable, so ties keep creation order).
    fn collect_records(&self, store: &RegionStore, reason: StopReason) -> Result<SubdivisionOutcome> {
        let mut records = Vec::new();
        for &key in store.keys() {
            let node = store.node(key)?;
            if self.config.leaves_only && !node.children.is_empty() {
                continue;
            }
            let parent = match node.parent {
                Some(pk) => Some(store.node(pk)?.label.clone()),
                None => None,
            };
            let children = node
                .children
                .iter()
                .map(|&ck| store.node(ck).map(|n| n.label.clone()))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            records.push(NodeRecord {
                id: node.label.clone(),
                region: node.region.clone(),
                level: node.level,
                parent,
                children,
                area: node.area,
            });
        }
        records.sort_by(|a, b| b.area.partial_cmp(&a.area).unwrap_or(std::cmp::Ordering::Equal));
        Ok(SubdivisionOutcome { records, reason })
    }
}

/// `count` evenly spaced distances from zero to `limit` inclusive.
#[allow(clippy::cast_precision_loss)]
fn evenly_spaced(limit: f64, count: usize) -> Vec<f64> {
    (0..count)
        .map(|k| limit * k as f64 / (count - 1) as f64)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square_region(size: f64) -> Region {
        Region::from_polygon(
            Polygon::new(vec![p(0.0, 0.0), p(size, 0.0), p(size, size), p(0.0, size)]).unwrap(),
        )
    }

    /// Two 10×10 lobes joined by a 4×1 corridor; area 204.
    fn dumbbell_region() -> Region {
        Region::from_polygon(
            Polygon::new(vec![
                p(0.0, 0.0),
                p(10.0, 0.0),
                p(10.0, 4.5),
                p(14.0, 4.5),
                p(14.0, 0.0),
                p(24.0, 0.0),
                p(24.0, 10.0),
                p(14.0, 10.0),
                p(14.0, 5.5),
                p(10.0, 5.5),
                p(10.0, 10.0),
                p(0.0, 10.0),
            ])
            .unwrap(),
        )
    }

    /// Three 10×10 lobes in a row: a 4×1 corridor joins the first pair, a
    /// 4×2 corridor the second; area 312. Two splits fully resolve it.
    fn triple_lobe_region() -> Region {
        Region::from_polygon(
            Polygon::new(vec![
                p(0.0, 0.0),
                p(10.0, 0.0),
                p(10.0, 4.5),
                p(14.0, 4.5),
                p(14.0, 0.0),
                p(24.0, 0.0),
                p(24.0, 4.0),
                p(28.0, 4.0),
                p(28.0, 0.0),
                p(38.0, 0.0),
                p(38.0, 10.0),
                p(28.0, 10.0),
                p(28.0, 6.0),
                p(24.0, 6.0),
                p(24.0, 10.0),
                p(14.0, 10.0),
                p(14.0, 5.5),
                p(10.0, 5.5),
                p(10.0, 10.0),
                p(0.0, 10.0),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn convex_region_single_node_completed() {
        let engine = SubdivisionEngine::new(SubdivisionConfig::new(1.0, 2.0));
        let outcome = engine.run(square_region(10.0)).unwrap();
        assert_eq!(outcome.reason, StopReason::Completed);
        assert_eq!(outcome.records.len(), 1);
        let record = &outcome.records[0];
        assert_eq!(record.id, "seed");
        assert_eq!(record.level, 0);
        assert!(record.parent.is_none());
        assert!(record.children.is_empty());
        assert!((record.area - 100.0).abs() < 1e-9);
    }

    #[test]
    fn dumbbell_splits_into_two_leaves() {
        let engine = SubdivisionEngine::new(SubdivisionConfig::new(1.0, 2.0));
        let outcome = engine.run(dumbbell_region()).unwrap();
        assert_eq!(outcome.reason, StopReason::Completed);
        assert_eq!(outcome.records.len(), 2);

        let total: f64 = outcome.records.iter().map(|r| r.area).sum();
        assert!((total - 204.0).abs() < 1e-6, "leaf areas sum to {total}");
        for record in &outcome.records {
            assert_eq!(record.level, 1);
            assert_eq!(record.parent.as_deref(), Some("seed"));
            assert!((record.area - 102.0).abs() < 1e-6, "area={}", record.area);
        }
    }

    #[test]
    fn dumbbell_full_forest_links_are_consistent() {
        let config = SubdivisionConfig::new(1.0, 2.0).with_leaves_only(false);
        let engine = SubdivisionEngine::new(config);
        let outcome = engine.run(dumbbell_region()).unwrap();
        assert_eq!(outcome.records.len(), 3);

        let root = outcome.records.iter().find(|r| r.id == "seed").unwrap();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.level, 0);

        for child_id in &root.children {
            let child = outcome.records.iter().find(|r| &r.id == child_id).unwrap();
            assert_eq!(child.level, root.level + 1);
            assert_eq!(child.parent.as_deref(), Some("seed"));
            assert!(child.id.starts_with("seed_"));
        }

        // Labels are unique across the forest.
        let mut ids: Vec<&str> = outcome.records.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), outcome.records.len());
    }

    #[test]
    fn two_level_subdivision_resolves_three_rooms() {
        let config = SubdivisionConfig::new(1.0, 2.5).with_max_iterations(10);
        let engine = SubdivisionEngine::new(config);
        let outcome = engine.run(triple_lobe_region()).unwrap();
        assert_eq!(outcome.reason, StopReason::Completed);
        assert_eq!(outcome.records.len(), 3);

        let total: f64 = outcome.records.iter().map(|r| r.area).sum();
        assert!((total - 312.0).abs() < 1e-6, "leaf areas sum to {total}");

        // Sorted by area descending.
        for pair in outcome.records.windows(2) {
            assert!(pair[0].area >= pair[1].area);
        }
        // One leaf from the first split, two from the second.
        let levels: Vec<u32> = {
            let mut l: Vec<u32> = outcome.records.iter().map(|r| r.level).collect();
            l.sort_unstable();
            l
        };
        assert_eq!(levels, vec![1, 2, 2]);
    }

    #[test]
    fn iteration_cap_interrupts_traversal() {
        let config = SubdivisionConfig::new(1.0, 2.5)
            .with_max_iterations(1)
            .with_leaves_only(false);
        let engine = SubdivisionEngine::new(config);
        let outcome = engine.run(triple_lobe_region()).unwrap();
        assert_eq!(outcome.reason, StopReason::MaxIterationsReached);
        // Only the root was processed: it has children, which stay
        // unprocessed.
        assert_eq!(outcome.records.len(), 3);
        let processed: Vec<_> = outcome
            .records
            .iter()
            .filter(|r| !r.children.is_empty())
            .collect();
        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].id, "seed");
    }

    #[test]
    fn multi_part_seed_degrades_to_single_leaf() {
        // A two-component seed splits at the zero step by definition; the
        // per-node failure makes it a permanent leaf without aborting.
        let seed = Region::new(vec![
            Polygon::new(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)]).unwrap(),
            Polygon::new(vec![p(8.0, 0.0), p(12.0, 0.0), p(12.0, 4.0), p(8.0, 4.0)]).unwrap(),
        ])
        .unwrap();
        let engine = SubdivisionEngine::new(SubdivisionConfig::new(1.0, 2.0));
        let outcome = engine.run(seed).unwrap();
        assert_eq!(outcome.reason, StopReason::Completed);
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.records[0].children.is_empty());
    }

    #[test]
    fn identical_input_identical_forest() {
        let run = || {
            let config = SubdivisionConfig::new(1.0, 2.5)
                .with_max_iterations(10)
                .with_leaves_only(false);
            SubdivisionEngine::new(config)
                .run(triple_lobe_region())
                .unwrap()
        };
        let first = run();
        let second = run();
        assert_eq!(first.reason, second.reason);
        assert_eq!(first.records.len(), second.records.len());
        for (a, b) in first.records.iter().zip(second.records.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.level, b.level);
            assert_eq!(a.parent, b.parent);
            assert_eq!(a.children, b.children);
            assert!((a.area - b.area).abs() < 1e-12);
            assert_eq!(a.region, b.region);
        }
    }

    #[test]
    fn observer_sees_erosions_pinches_and_resolutions() {
        #[derive(Default)]
        struct Recorder {
            erosions: usize,
            pinches: Vec<String>,
            resolved: Vec<(String, usize)>,
        }
        impl SubdivisionObserver for Recorder {
            fn erosion_attempted(&mut self, _label: &str, _pass: usize, _limit: f64) {
                self.erosions += 1;
            }
            fn pinch_found(&mut self, label: &str, _step_gap: f64) {
                self.pinches.push(label.to_owned());
            }
            fn node_resolved(&mut self, label: &str, children: usize) {
                self.resolved.push((label.to_owned(), children));
            }
        }

        let mut recorder = Recorder::default();
        let engine = SubdivisionEngine::new(SubdivisionConfig::new(1.0, 2.0));
        let outcome = engine
            .run_with_observer(dumbbell_region(), &mut recorder)
            .unwrap();
        assert_eq!(outcome.records.len(), 2);

        // Root ran all three passes; each leaf stopped during its first.
        assert_eq!(recorder.erosions, 5);
        assert_eq!(recorder.pinches, vec!["seed".to_owned()]);
        assert_eq!(recorder.resolved.len(), 3);
        assert_eq!(recorder.resolved[0], ("seed".to_owned(), 2));
        assert_eq!(recorder.resolved[1].1, 0);
        assert_eq!(recorder.resolved[2].1, 0);
    }

    #[test]
    fn estimated_scale_drives_subdivision() {
        use crate::subdivision::scale::EstimateScale;

        // Survey data in pixels: doors are 45 px wide and assumed 0.9 m,
        // so one pixel is 0.02 m.
        let doors = vec![
            Polygon::new(vec![p(300.0, 0.0), p(345.0, 0.0), p(345.0, 6.0), p(300.0, 6.0)])
                .unwrap(),
            Polygon::new(vec![p(400.0, 0.0), p(445.0, 0.0), p(445.0, 6.0), p(400.0, 6.0)])
                .unwrap(),
        ];
        let scale = EstimateScale::new(&doors, 0.9).execute().unwrap();
        assert!((scale - 0.02).abs() < 1e-12);

        // Two 100 px lobes joined by a 40 × 30 px corridor (0.6 m wide,
        // well under the 2 m pinch threshold).
        let seed = Region::from_polygon(
            Polygon::new(vec![
                p(0.0, 0.0),
                p(100.0, 0.0),
                p(100.0, 35.0),
                p(140.0, 35.0),
                p(140.0, 0.0),
                p(240.0, 0.0),
                p(240.0, 100.0),
                p(140.0, 100.0),
                p(140.0, 65.0),
                p(100.0, 65.0),
                p(100.0, 100.0),
                p(0.0, 100.0),
            ])
            .unwrap(),
        );

        let engine = SubdivisionEngine::new(SubdivisionConfig::new(scale, 2.0));
        let outcome = engine.run(seed).unwrap();
        assert_eq!(outcome.reason, StopReason::Completed);
        assert_eq!(outcome.records.len(), 2);
        let total: f64 = outcome.records.iter().map(|r| r.area).sum();
        assert!((total - 21_200.0).abs() < 1e-6, "leaf areas sum to {total}");
    }

    #[test]
    fn invalid_config_rejected_before_any_work() {
        let engine = SubdivisionEngine::new(SubdivisionConfig::new(0.0, 2.0));
        assert!(engine.run(square_region(4.0)).is_err());
        let engine = SubdivisionEngine::new(SubdivisionConfig::new(1.0, 2.0).with_max_iterations(0));
        assert!(engine.run(square_region(4.0)).is_err());
    }
}
