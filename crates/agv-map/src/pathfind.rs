//! Constrained shortest-path planning.
//!
//! Two planners share the [`Avoid`] constraint set:
//!
//! - [`find_path`] — single-source Dijkstra.  The workhorse; use it for
//!   everything routine.
//! - [`find_ranked_paths`] — bounded DFS enumeration of simple paths,
//!   returned cheapest-first.  Exponential in the worst case; the `limit`
//!   is the safety valve.  Use it only for ranked detour fallback.
//!
//! Both return paths **excluding the start node**: the result is the
//! sequence of steps to take.  `start == goal` is an empty path, not an
//! error.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use agv_core::NodeId;

use crate::error::{MapError, MapResult};
use crate::graph::Graph;

/// Default cap on the number of simple paths the DFS enumerator collects.
pub const DEFAULT_PATH_LIMIT: usize = 10;

// ── Avoid ─────────────────────────────────────────────────────────────────────

/// Constraint set for a planning query: nodes treated as absent and
/// undirected edges skipped in both directions.
#[derive(Clone, Debug, Default)]
pub struct Avoid {
    nodes: Vec<NodeId>,
    edges: Vec<(NodeId, NodeId)>,
}

impl Avoid {
    /// No constraints.
    pub fn none() -> Self {
        Self::default()
    }

    /// Avoid a single node.
    pub fn node(n: NodeId) -> Self {
        Avoid {
            nodes: vec![n],
            edges: Vec::new(),
        }
    }

    /// Avoid a single undirected edge.
    pub fn edge(a: NodeId, b: NodeId) -> Self {
        Avoid {
            nodes: Vec::new(),
            edges: vec![(a, b)],
        }
    }

    pub fn with_node(mut self, n: NodeId) -> Self {
        self.nodes.push(n);
        self
    }

    pub fn with_edge(mut self, a: NodeId, b: NodeId) -> Self {
        self.edges.push((a, b));
        self
    }

    #[inline]
    fn blocks_node(&self, n: NodeId) -> bool {
        self.nodes.contains(&n)
    }

    #[inline]
    fn blocks_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edges
            .iter()
            .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
    }
}

// ── Dijkstra ──────────────────────────────────────────────────────────────────

/// Constrained single-source shortest path.
///
/// Returns the minimum-cost node sequence from `start` to `goal` excluding
/// `start`, honoring `avoid`.  Ties between equal-cost relaxations go to the
/// first-discovered predecessor.
pub fn find_path(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    avoid: &Avoid,
) -> MapResult<Vec<NodeId>> {
    if !graph.contains(start) {
        return Err(MapError::NodeNotFound(start));
    }
    if !graph.contains(goal) {
        return Err(MapError::NodeNotFound(goal));
    }
    if start == goal {
        return Ok(vec![]);
    }

    let n = graph.node_count();
    let mut dist = vec![u64::MAX; n];
    // prev[v] = node that reached v; NodeId::INVALID for unreached nodes.
    let mut prev = vec![NodeId::INVALID; n];

    dist[start.index()] = 0;

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, start)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == goal {
            return Ok(reconstruct(prev, start, goal));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (neighbor, weight) in graph.neighbors(node) {
            if avoid.blocks_node(neighbor) || avoid.blocks_edge(node, neighbor) {
                continue;
            }
            let new_cost = cost.saturating_add(weight as u64);
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = node;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    Err(MapError::NoRoute { from: start, to: goal })
}

fn reconstruct(prev: Vec<NodeId>, start: NodeId, goal: NodeId) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut cur = goal;
    while cur != start {
        path.push(cur);
        cur = prev[cur.index()];
    }
    path.reverse();
    path
}

// ── Ranked simple-path enumeration ────────────────────────────────────────────

/// One enumerated simple path with its total cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedPath {
    /// Node sequence excluding the start node.
    pub nodes: Vec<NodeId>,
    /// Sum of edge weights along the path.
    pub cost: u64,
}

/// Enumerate up to `limit` simple paths from `start` to `goal`, returned
/// sorted by total cost ascending.
///
/// The DFS visits neighbors in ascending `(weight, id)` order, so the
/// cheapest continuations are explored first and the collected set skews
/// cheap even when the cap truncates the search.  An empty result means
/// `goal` is unreachable under `avoid` (or an endpoint id is unknown).
pub fn find_ranked_paths(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    avoid: &Avoid,
    limit: usize,
) -> Vec<RankedPath> {
    if !graph.contains(start) || !graph.contains(goal) || limit == 0 {
        return vec![];
    }
    if start == goal {
        return vec![RankedPath { nodes: vec![], cost: 0 }];
    }

    let mut visited = vec![false; graph.node_count()];
    visited[start.index()] = true;

    let mut found: Vec<RankedPath> = Vec::new();
    let mut trail: Vec<NodeId> = Vec::new();

    dfs(graph, start, goal, avoid, limit, &mut visited, &mut trail, 0, &mut found);

    // Stable sort keeps discovery order among equal-cost paths.
    found.sort_by(|a, b| a.cost.cmp(&b.cost));
    found
}

#[allow(clippy::too_many_arguments)]
fn dfs(
    graph: &Graph,
    node: NodeId,
    goal: NodeId,
    avoid: &Avoid,
    limit: usize,
    visited: &mut Vec<bool>,
    trail: &mut Vec<NodeId>,
    cost: u64,
    found: &mut Vec<RankedPath>,
) {
    if found.len() >= limit {
        return;
    }

    let mut next: Vec<(u32, NodeId)> = graph
        .neighbors(node)
        .filter(|&(n, _)| !visited[n.index()])
        .filter(|&(n, _)| !avoid.blocks_node(n) && !avoid.blocks_edge(node, n))
        .map(|(n, w)| (w, n))
        .collect();
    next.sort_unstable();

    for (weight, neighbor) in next {
        if found.len() >= limit {
            return;
        }
        trail.push(neighbor);
        let new_cost = cost + weight as u64;

        if neighbor == goal {
            found.push(RankedPath {
                nodes: trail.clone(),
                cost: new_cost,
            });
        } else {
            visited[neighbor.index()] = true;
            dfs(graph, neighbor, goal, avoid, limit, visited, trail, new_cost, found);
            visited[neighbor.index()] = false;
        }

        trail.pop();
    }
}
