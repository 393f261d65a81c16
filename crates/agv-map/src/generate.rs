//! Seeded warehouse map generation.
//!
//! # Algorithm
//!
//! 1. Size a 4:3 canvas proportional to the requested node count.
//! 2. Rejection-sample node positions inside a padded box, keeping a minimum
//!    spacing between nodes (Poisson-disk-like).  Placement gives up after a
//!    fixed attempt budget, so dense requests may yield fewer nodes; the map
//!    stays usable either way.
//! 3. Link every node to its 2–3 nearest neighbors, with a random cost
//!    multiplier on the Euclidean distance.  The result may be disconnected;
//!    the pathfinder tolerates that.
//!
//! All randomness comes from one [`SimRng`] seeded by the map string, and
//! the draw order is fixed, so a seed reproduces the map byte for byte.

use rstar::{PointDistance, RTree};

use agv_core::{NodeId, Point, SimRng};

use crate::graph::{MapData, MapEdge, MapNode};

/// Minimum spacing between generated nodes, in pixels.
const MIN_NODE_SPACING: f64 = 80.0;

/// Dead border around the canvas where no node may be placed.
const CANVAS_PADDING: f64 = 50.0;

/// Total placement attempts before the sampler gives up.
const MAX_PLACE_ATTEMPTS: u32 = 2000;

/// Supported node-count range; requests outside are clamped.
const NODE_COUNT_RANGE: (usize, usize) = (5, 200);

/// Generate a warehouse map from a seed string.
///
/// Pure and deterministic: the same `(seed, node_count)` always yields a
/// structurally identical [`MapData`].  `node_count` is clamped into
/// `[5, 200]`; crowded canvases may come out with fewer nodes when the
/// attempt budget runs dry.
pub fn generate_map(seed: &str, node_count: usize) -> MapData {
    let n = node_count.clamp(NODE_COUNT_RANGE.0, NODE_COUNT_RANGE.1);
    let mut rng = SimRng::from_str_seed(seed);

    // Canvas area scales with the requested count so spacing stays feasible.
    let area = (800.0f64 * 600.0).max(n as f64 * MIN_NODE_SPACING * MIN_NODE_SPACING * 2.5);
    let width = (area * 4.0 / 3.0).sqrt();
    let height = width * 0.75;

    let nodes = place_nodes(&mut rng, n, width, height);
    let edges = link_nodes(&mut rng, &nodes);

    MapData { nodes, edges }
}

// ── Node placement ────────────────────────────────────────────────────────────

/// Spacing check entry; reuses the graph's R-tree point math.
#[derive(Clone)]
struct Placed([f64; 2]);

impl rstar::RTreeObject for Placed {
    type Envelope = rstar::AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        rstar::AABB::from_point(self.0)
    }
}

impl rstar::PointDistance for Placed {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.0[0] - point[0];
        let dy = self.0[1] - point[1];
        dx * dx + dy * dy
    }
}

fn place_nodes(rng: &mut SimRng, n: usize, width: f64, height: f64) -> Vec<MapNode> {
    let mut nodes: Vec<MapNode> = Vec::with_capacity(n);
    let mut index = RTree::<Placed>::new();
    let mut attempts = 0u32;

    let span_x = width - 2.0 * CANVAS_PADDING;
    let span_y = height - 2.0 * CANVAS_PADDING;

    while nodes.len() < n && attempts < MAX_PLACE_ATTEMPTS {
        attempts += 1;
        // Two draws per attempt, accepted or not, to keep the stream stable.
        let x = (CANVAS_PADDING + rng.next_f64() * span_x).floor();
        let y = (CANVAS_PADDING + rng.next_f64() * span_y).floor();

        let too_close = index
            .nearest_neighbor(&[x, y])
            .is_some_and(|p| p.distance_2(&[x, y]) < MIN_NODE_SPACING * MIN_NODE_SPACING);
        if too_close {
            continue;
        }

        index.insert(Placed([x, y]));
        nodes.push(MapNode {
            x: x as i32,
            y: y as i32,
            label: label_for(nodes.len()),
        });
    }

    nodes
}

/// Node labels in placement order: `A..Z`, then `A1..Z1`, `A2..`, …
fn label_for(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    let round = index / 26;
    if round == 0 {
        letter.to_string()
    } else {
        format!("{letter}{round}")
    }
}

// ── Edge creation ─────────────────────────────────────────────────────────────

fn link_nodes(rng: &mut SimRng, nodes: &[MapNode]) -> Vec<MapEdge> {
    let positions: Vec<Point> = nodes
        .iter()
        .map(|n| Point::new(n.x as f64, n.y as f64))
        .collect();

    let mut edges: Vec<MapEdge> = Vec::new();
    let mut seen: Vec<(u32, u32)> = Vec::new();

    for (i, &pos) in positions.iter().enumerate() {
        // 2 or 3 links per node; one draw regardless of how many land.
        let k = 2 + usize::from(rng.next_f64() > 0.6);

        // All other nodes by ascending distance, id as the deterministic
        // tiebreak for equidistant candidates.
        let mut by_distance: Vec<(f64, usize)> = positions
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(j, &p)| (pos.distance(p), j))
            .collect();
        by_distance.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for &(dist, j) in by_distance.iter().take(k) {
            let pair = (i.min(j) as u32, i.max(j) as u32);
            if seen.contains(&pair) {
                continue;
            }
            seen.push(pair);
            // Cost multiplier in [0.8, 2.0); drawn only for fresh pairs.
            let weight = (dist * (0.8 + rng.next_f64() * 1.2)).round() as u32;
            edges.push(MapEdge {
                source: NodeId(pair.0),
                target: NodeId(pair.1),
                weight: weight.max(1),
            });
        }
    }

    edges
}
