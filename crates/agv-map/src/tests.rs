//! Unit tests for agv-map.
//!
//! All tests use either a hand-crafted graph or a generated map, so they run
//! with no external data.

#[cfg(test)]
mod helpers {
    use agv_core::{NodeId, Point};

    use crate::{Graph, GraphBuilder};

    /// Build a small grid for routing tests.
    ///
    /// Nodes (x, y):
    ///   0:(0,0)  1:(100,0)  2:(200,0)
    ///   3:(0,100)           4:(200,100)
    ///
    /// Undirected links: 0-1, 1-2, 0-3, 2-4, 3-4
    ///
    /// Weights are chosen so 0→4 via 0-1-2-4 costs 30 and via 0-3-4 costs 60:
    /// the cheap route is always the top row.
    pub fn grid() -> (Graph, [NodeId; 5]) {
        let mut b = GraphBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0), "A".into());
        let n1 = b.add_node(Point::new(100.0, 0.0), "B".into());
        let n2 = b.add_node(Point::new(200.0, 0.0), "C".into());
        let n3 = b.add_node(Point::new(0.0, 100.0), "D".into());
        let n4 = b.add_node(Point::new(200.0, 100.0), "E".into());

        b.add_link(n0, n1, 10);
        b.add_link(n1, n2, 10);
        b.add_link(n2, n4, 10);
        b.add_link(n0, n3, 50);
        b.add_link(n3, n4, 10);

        (b.build(), [n0, n1, n2, n3, n4])
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use agv_core::{NodeId, Point};

    use crate::{Graph, GraphBuilder, MapData, MapEdge, MapNode};

    #[test]
    fn empty_build() {
        let g = GraphBuilder::new().build();
        assert_eq!(g.node_count(), 0);
        assert!(g.is_empty());
    }

    #[test]
    fn neighbors_both_directions() {
        let (g, [n0, n1, ..]) = super::helpers::grid();
        assert!(g.are_adjacent(n0, n1));
        assert!(g.are_adjacent(n1, n0));
        assert_eq!(g.edge_weight(n0, n1), Some(10));
        assert_eq!(g.edge_weight(n1, n0), Some(10));
    }

    #[test]
    fn degrees() {
        let (g, [n0, n1, n2, n3, n4]) = super::helpers::grid();
        assert_eq!(g.degree(n0), 2);
        assert_eq!(g.degree(n1), 2);
        assert_eq!(g.degree(n2), 2);
        assert_eq!(g.degree(n3), 2);
        assert_eq!(g.degree(n4), 2);
    }

    #[test]
    fn edge_length_is_euclidean() {
        let (g, [n0, n1, _, n3, _]) = super::helpers::grid();
        assert_eq!(g.edge_length(n0, n1), Some(100.0));
        assert_eq!(g.edge_length(n0, n3), Some(100.0));
        // Length is physical, independent of the traversal weight.
        assert_eq!(g.edge_weight(n0, n3), Some(50));
    }

    #[test]
    fn unknown_ids_degrade_gracefully() {
        let (g, [n0, ..]) = super::helpers::grid();
        let bogus = NodeId(99);
        assert!(g.position(bogus).is_none());
        assert!(!g.are_adjacent(n0, bogus));
        assert!(g.edge_weight(bogus, n0).is_none());
        assert_eq!(g.label(bogus), "");
    }

    #[test]
    fn from_map_mirrors_map_data() {
        let map = MapData {
            nodes: vec![
                MapNode { x: 0, y: 0, label: "A".into() },
                MapNode { x: 100, y: 0, label: "B".into() },
            ],
            edges: vec![MapEdge {
                source: NodeId(0),
                target: NodeId(1),
                weight: 120,
            }],
        };
        let g = Graph::from_map(&map);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.label(NodeId(1)), "B");
        assert_eq!(g.edge_weight(NodeId(0), NodeId(1)), Some(120));
        assert_eq!(g.position(NodeId(1)), Some(Point::new(100.0, 0.0)));
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use agv_core::Point;

    use crate::GraphBuilder;

    #[test]
    fn snap_exact_and_near() {
        let (g, [n0, n1, ..]) = super::helpers::grid();
        assert_eq!(g.snap_to_node(Point::new(0.0, 0.0)), Some(n0));
        assert_eq!(g.snap_to_node(Point::new(40.0, 5.0)), Some(n0));
        assert_eq!(g.snap_to_node(Point::new(60.0, 5.0)), Some(n1));
    }

    #[test]
    fn empty_graph_returns_none() {
        let g = GraphBuilder::new().build();
        assert!(g.snap_to_node(Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn k_nearest_order() {
        let (g, nodes) = super::helpers::grid();
        let near = g.k_nearest(Point::new(0.0, 0.0), 3);
        assert_eq!(near[0], nodes[0]);
        // n1 (100,0) and n3 (0,100) are equidistant — either order is valid.
        assert!(near[1..].contains(&nodes[1]));
        assert!(near[1..].contains(&nodes[3]));
    }
}

// ── Map generation ────────────────────────────────────────────────────────────

#[cfg(test)]
mod generation {
    use crate::{generate_map, Graph};

    #[test]
    fn deterministic_for_seed() {
        let a = generate_map("warehouse-7", 40);
        let b = generate_map("warehouse-7", 40);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_map("alpha", 40);
        let b = generate_map("beta", 40);
        assert_ne!(a, b);
    }

    #[test]
    fn respects_minimum_spacing() {
        let map = generate_map("spacing", 60);
        for (i, a) in map.nodes.iter().enumerate() {
            for b in map.nodes.iter().skip(i + 1) {
                let dx = (a.x - b.x) as f64;
                let dy = (a.y - b.y) as f64;
                let d = (dx * dx + dy * dy).sqrt();
                // Spacing is enforced on the already-snapped coordinates.
                assert!(d >= 80.0, "nodes too close: {d}");
            }
        }
    }

    #[test]
    fn labels_in_placement_order() {
        let map = generate_map("labels", 30);
        assert_eq!(map.nodes[0].label, "A");
        assert_eq!(map.nodes[1].label, "B");
        if map.nodes.len() > 26 {
            assert_eq!(map.nodes[26].label, "A1");
        }
    }

    #[test]
    fn node_count_clamped() {
        let small = generate_map("clamp", 1);
        assert_eq!(small.nodes.len(), 5, "request clamped up to the 5-node floor");
        let big = generate_map("clamp", 10_000);
        assert!(big.nodes.len() <= 200);
    }

    #[test]
    fn weights_positive_and_pairs_unique() {
        let map = generate_map("weights", 50);
        let mut pairs: Vec<(u32, u32)> = Vec::new();
        for e in &map.edges {
            assert!(e.weight >= 1);
            assert_ne!(e.source, e.target);
            let key = (e.source.0.min(e.target.0), e.source.0.max(e.target.0));
            assert!(!pairs.contains(&key), "duplicate edge {key:?}");
            pairs.push(key);
        }
    }

    #[test]
    fn every_node_linked() {
        let map = generate_map("degree", 50);
        let g = Graph::from_map(&map);
        for node in g.node_ids() {
            assert!(g.degree(node) >= 1, "isolated node {node}");
        }
    }
}

// ── Dijkstra routing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use agv_core::NodeId;

    use crate::{find_path, Avoid, MapError};

    #[test]
    fn trivial_same_node() {
        let (g, [n0, ..]) = super::helpers::grid();
        let p = find_path(&g, n0, n0, &Avoid::none()).unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn shortest_path_excludes_start() {
        let (g, [n0, n1, n2, _, n4]) = super::helpers::grid();
        let p = find_path(&g, n0, n4, &Avoid::none()).unwrap();
        assert_eq!(p, vec![n1, n2, n4]);
    }

    #[test]
    fn avoid_node_forces_detour() {
        let (g, [n0, n1, _, n3, n4]) = super::helpers::grid();
        let p = find_path(&g, n0, n4, &Avoid::node(n1)).unwrap();
        assert_eq!(p, vec![n3, n4]);
    }

    #[test]
    fn avoid_edge_blocks_both_directions() {
        let (g, [n0, n1, n2, n3, n4]) = super::helpers::grid();
        let p = find_path(&g, n0, n4, &Avoid::edge(n2, n1)).unwrap();
        assert_eq!(p, vec![n3, n4]);
        // The reverse query skips the same edge.
        let back = find_path(&g, n4, n0, &Avoid::edge(n1, n2)).unwrap();
        assert_eq!(back, vec![n3, n0]);
    }

    #[test]
    fn unreachable_is_no_route() {
        let (g, [n0, n1, n2, n3, n4]) = super::helpers::grid();
        // Sever everything into n4.
        let avoid = Avoid::edge(n2, n4).with_edge(n3, n4);
        let result = find_path(&g, n0, n4, &avoid);
        assert!(matches!(result, Err(MapError::NoRoute { .. })));
        let _ = n1;
    }

    #[test]
    fn unknown_endpoint_errors() {
        let (g, [n0, ..]) = super::helpers::grid();
        assert!(matches!(
            find_path(&g, n0, NodeId(42), &Avoid::none()),
            Err(MapError::NodeNotFound(_))
        ));
    }
}

// ── Ranked path enumeration ───────────────────────────────────────────────────

#[cfg(test)]
mod ranked {
    use crate::{find_ranked_paths, Avoid};

    #[test]
    fn two_routes_sorted_by_cost() {
        let (g, [n0, n1, n2, n3, n4]) = super::helpers::grid();
        let paths = find_ranked_paths(&g, n0, n4, &Avoid::none(), 10);
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].nodes, vec![n1, n2, n4]);
        assert_eq!(paths[0].cost, 30);
        assert_eq!(paths[1].nodes, vec![n3, n4]);
        assert_eq!(paths[1].cost, 60);
    }

    #[test]
    fn paths_are_simple() {
        let (g, [n0, _, _, _, n4]) = super::helpers::grid();
        for path in find_ranked_paths(&g, n0, n4, &Avoid::none(), 10) {
            let mut seen = path.nodes.clone();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), path.nodes.len(), "cycle in {:?}", path.nodes);
            assert!(!path.nodes.contains(&n0), "start node must be excluded");
        }
    }

    #[test]
    fn limit_caps_collection() {
        let (g, [n0, _, _, _, n4]) = super::helpers::grid();
        let paths = find_ranked_paths(&g, n0, n4, &Avoid::none(), 1);
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn avoidance_filters_routes() {
        let (g, [n0, n1, _, n3, n4]) = super::helpers::grid();
        let paths = find_ranked_paths(&g, n0, n4, &Avoid::node(n1), 10);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes, vec![n3, n4]);
    }

    #[test]
    fn unreachable_is_empty() {
        let (g, [n0, _, n2, n3, n4]) = super::helpers::grid();
        let avoid = Avoid::edge(n2, n4).with_edge(n3, n4);
        assert!(find_ranked_paths(&g, n0, n4, &avoid, 10).is_empty());
    }
}
