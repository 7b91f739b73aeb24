use crate::error::RegistryError;
use crate::geometry::Region;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Key of a region node in the [`RegionStore`] arena.
    pub struct RegionKey;
}

/// A node of the subdivision forest.
///
/// Nodes are created once and never mutated except for the one-shot
/// `subdivided` transition and the accompanying `children` assignment;
/// geometry and cached area are fixed at creation.
#[derive(Debug, Clone)]
pub struct RegionNode {
    /// Lineage token: the seed node is `"seed"`, children append
    /// `_<sibling index>` to their parent's label.
    pub label: String,
    /// The node's geometry.
    pub region: Region,
    /// Depth from the seed region (root = 0).
    pub level: u32,
    /// Parent key, or `None` for the root.
    pub parent: Option<RegionKey>,
    /// Ordered child keys; empty until a successful split.
    pub children: Vec<RegionKey>,
    /// Set true exactly once, after processing was attempted.
    pub subdivided: bool,
    /// Area measured once at creation.
    pub area: f64,
}

impl RegionNode {
    /// Creates a fresh, unprocessed node; the area is measured here.
    #[must_use]
    pub fn new(label: String, region: Region, level: u32, parent: Option<RegionKey>) -> Self {
        let area = region.total_area();
        Self {
            label,
            region,
            level,
            parent,
            children: Vec::new(),
            subdivided: false,
            area,
        }
    }
}

/// Central arena that owns every node of a subdivision forest.
///
/// Nodes reference each other via keys (generational indices), so there are
/// no ownership cycles and lookup is O(1). Insertion order is recorded so
/// traversal and output stay deterministic.
#[derive(Debug, Default)]
pub struct RegionStore {
    nodes: SlotMap<RegionKey, RegionNode>,
    order: Vec<RegionKey>,
}

impl RegionStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node and returns its key.
    pub fn insert(&mut self, node: RegionNode) -> RegionKey {
        let key = self.nodes.insert(node);
        self.order.push(key);
        key
    }

    /// Returns a reference to the node, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not resolve to a node.
    pub fn node(&self, key: RegionKey) -> Result<&RegionNode, RegistryError> {
        self.nodes.get(key).ok_or(RegistryError::NodeNotFound)
    }

    /// Returns a mutable reference to the node, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not resolve to a node.
    pub fn node_mut(&mut self, key: RegionKey) -> Result<&mut RegionNode, RegistryError> {
        self.nodes.get_mut(key).ok_or(RegistryError::NodeNotFound)
    }

    /// Keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> &[RegionKey] {
        &self.order
    }

    /// Number of nodes in the forest.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the store holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
