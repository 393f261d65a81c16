//! Warehouse graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for adjacency.
//! Given a `NodeId n`, its neighbors occupy the slice:
//!
//! ```text
//! adj_node[ adj_start[n] .. adj_start[n+1] ]
//! ```
//!
//! `adj_node` and `adj_weight` run in parallel and are sorted by source node.
//! Undirected edges are stored in both directions, so iteration over a
//! node's neighbors is a contiguous memory scan — ideal for the Dijkstra
//! inner loop.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps floor positions to the nearest `NodeId`.
//! Hosts use it to turn pointer clicks into target nodes; the engine uses it
//! for spawn spacing.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use agv_core::{NodeId, Point};

// ── MapData ───────────────────────────────────────────────────────────────────

/// A node as produced by the map generator.  Positions are integer pixels;
/// the node's id is its index in [`MapData::nodes`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapNode {
    pub x: i32,
    pub y: i32,
    pub label: String,
}

/// An undirected edge between two generated nodes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapEdge {
    pub source: NodeId,
    pub target: NodeId,
    /// Positive traversal cost (distance scaled by the generator's
    /// cost multiplier).
    pub weight: u32,
}

/// The immutable output of map generation: nodes plus undirected edges.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapData {
    pub nodes: Vec<MapNode>,
    pub edges: Vec<MapEdge>,
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D point with the associated
/// `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// Undirected warehouse graph in CSR format plus a spatial index.
///
/// Construct via [`GraphBuilder`] or [`Graph::from_map`].
pub struct Graph {
    /// Floor position of each node.  Indexed by `NodeId`.
    node_pos: Vec<Point>,

    /// Display label of each node, in placement order.
    node_label: Vec<String>,

    /// CSR row pointer.  Neighbors of node `n` are at positions
    /// `adj_start[n] .. adj_start[n+1]`.  Length = `node_count + 1`.
    adj_start: Vec<u32>,

    /// Neighbor node of each adjacency entry.
    adj_node: Vec<NodeId>,

    /// Weight of each adjacency entry (same for both directions).
    adj_weight: Vec<u32>,

    spatial_idx: RTree<NodeEntry>,
}

impl Graph {
    /// Construct an empty graph with no nodes or edges.
    pub fn empty() -> Self {
        GraphBuilder::new().build()
    }

    /// Build the runtime graph from generated map data.
    pub fn from_map(map: &MapData) -> Self {
        let mut b = GraphBuilder::new();
        for node in &map.nodes {
            b.add_node(Point::new(node.x as f64, node.y as f64), node.label.clone());
        }
        for edge in &map.edges {
            b.add_link(edge.source, edge.target, edge.weight);
        }
        b.build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Iterator over all `NodeId`s in placement order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_pos.len() as u32).map(NodeId)
    }

    // ── Node attributes ───────────────────────────────────────────────────

    /// Floor position of `node`, or `None` for an out-of-range id.
    #[inline]
    pub fn position(&self, node: NodeId) -> Option<Point> {
        self.node_pos.get(node.index()).copied()
    }

    /// Display label of `node` (empty string for an out-of-range id).
    pub fn label(&self, node: NodeId) -> &str {
        self.node_label
            .get(node.index())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over `(neighbor, weight)` pairs of all links from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, u32)> + '_ {
        let start = self.adj_start[node.index()] as usize;
        let end = self.adj_start[node.index() + 1] as usize;
        (start..end).map(|i| (self.adj_node[i], self.adj_weight[i]))
    }

    /// Number of links from `node`.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        let start = self.adj_start[node.index()] as usize;
        let end = self.adj_start[node.index() + 1] as usize;
        end - start
    }

    /// `true` if `a` and `b` are directly linked.
    pub fn are_adjacent(&self, a: NodeId, b: NodeId) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        self.neighbors(a).any(|(n, _)| n == b)
    }

    /// Weight of the link `a`–`b`, or `None` if the nodes are not linked.
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<u32> {
        if !self.contains(a) {
            return None;
        }
        self.neighbors(a).find(|&(n, _)| n == b).map(|(_, w)| w)
    }

    /// Euclidean length in pixels of the link `a`–`b`.
    ///
    /// This is the physical edge length used by the kinematics; the graph
    /// `weight` is a traversal cost and may differ from it.
    pub fn edge_length(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let pa = self.position(a)?;
        let pb = self.position(b)?;
        Some(pa.distance(pb))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` nearest to `pos`.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn snap_to_node(&self, pos: Point) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest(&self, pos: Point, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.x, pos.y])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── GraphBuilder ──────────────────────────────────────────────────────────────

/// Construct a [`Graph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and undirected links in any order.  `build()`
/// sorts the per-direction entries by source node, constructs the CSR
/// arrays, and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use agv_core::Point;
/// use agv_map::GraphBuilder;
///
/// let mut b = GraphBuilder::new();
/// let a = b.add_node(Point::new(0.0, 0.0), "A".into());
/// let c = b.add_node(Point::new(100.0, 0.0), "B".into());
/// b.add_link(a, c, 100);
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert!(graph.are_adjacent(a, c));
/// ```
pub struct GraphBuilder {
    nodes: Vec<(Point, String)>,
    raw_links: Vec<RawLink>,
}

struct RawLink {
    from: NodeId,
    to: NodeId,
    weight: u32,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            raw_links: Vec::new(),
        }
    }

    /// Pre-allocate for the expected number of nodes and links.
    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            raw_links: Vec::with_capacity(links * 2),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Point, label: String) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push((pos, label));
        id
    }

    /// Add an undirected link: both directions are stored.
    pub fn add_link(&mut self, a: NodeId, b: NodeId, weight: u32) {
        self.raw_links.push(RawLink { from: a, to: b, weight });
        self.raw_links.push(RawLink { from: b, to: a, weight });
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Consume the builder and produce a [`Graph`].
    ///
    /// Time complexity: O(E log E) for the link sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> Graph {
        let node_count = self.nodes.len();
        let link_count = self.raw_links.len();

        // Sort links by (source, target) for CSR construction and stable
        // neighbor ordering.
        let mut raw = self.raw_links;
        raw.sort_unstable_by_key(|l| (l.from.0, l.to.0));

        let adj_node: Vec<NodeId> = raw.iter().map(|l| l.to).collect();
        let adj_weight: Vec<u32> = raw.iter().map(|l| l.weight).collect();

        // Build CSR row pointer.
        let mut adj_start = vec![0u32; node_count + 1];
        for l in &raw {
            adj_start[l.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }
        debug_assert_eq!(adj_start[node_count] as usize, link_count);

        // Bulk-load the R-tree (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, (pos, _))| NodeEntry {
                point: [pos.x, pos.y],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let (node_pos, node_label) = self.nodes.into_iter().unzip();

        Graph {
            node_pos,
            node_label,
            adj_start,
            adj_node,
            adj_weight,
            spatial_idx,
        }
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
