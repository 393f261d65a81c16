//! `agv-map` — warehouse floor graph, seeded map generation, and routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`graph`]    | `Graph` (CSR + R-tree), `GraphBuilder`, `MapData`         |
//! | [`generate`] | `generate_map` — seeded Poisson-like node placement       |
//! | [`pathfind`] | `find_path` (constrained Dijkstra), `find_ranked_paths`   |
//! | [`error`]    | `MapError`, `MapResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                    |
//! |---------|-----------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.        |

pub mod error;
pub mod generate;
pub mod graph;
pub mod pathfind;

#[cfg(test)]
mod tests;

pub use error::{MapError, MapResult};
pub use generate::generate_map;
pub use graph::{Graph, GraphBuilder, MapData, MapEdge, MapNode};
pub use pathfind::{find_path, find_ranked_paths, Avoid, RankedPath};
