//! Per-vehicle state record.

use std::collections::VecDeque;
use std::fmt;

use agv_core::{AgvId, NodeId, Point, VehicleConfig};

// ── AgvStatus ─────────────────────────────────────────────────────────────────

/// Lifecycle state of one vehicle.
///
/// `Completed` is absorbing until the next target assignment; `Blocked` is a
/// diagnostic refinement of `Waiting` (no detour was available at the last
/// retry) and is treated as waiting everywhere it matters.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgvStatus {
    #[default]
    Idle,
    Planning,
    Moving,
    Waiting,
    Blocked,
    Repathing,
    Detour,
    Completed,
}

impl AgvStatus {
    /// At rest with no route: eligible for auto-pilot dispatch.
    #[inline]
    pub fn at_rest(self) -> bool {
        matches!(self, AgvStatus::Idle | AgvStatus::Completed)
    }

    /// Parked against a blocker (plain or diagnosed).
    #[inline]
    pub fn is_waiting(self) -> bool {
        matches!(self, AgvStatus::Waiting | AgvStatus::Blocked)
    }

    /// Making no forward progress: a vehicle other traffic cannot wait out.
    #[inline]
    pub fn is_stalled(self) -> bool {
        self.at_rest() || self.is_waiting()
    }

    /// Lower-case status name, for logs and trace rows.
    pub fn as_str(self) -> &'static str {
        match self {
            AgvStatus::Idle => "idle",
            AgvStatus::Planning => "planning",
            AgvStatus::Moving => "moving",
            AgvStatus::Waiting => "waiting",
            AgvStatus::Blocked => "blocked",
            AgvStatus::Repathing => "repathing",
            AgvStatus::Detour => "detour",
            AgvStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AgvStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── WaitReason ────────────────────────────────────────────────────────────────

/// Why a vehicle is holding position (or why its last plan failed).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WaitReason {
    /// Another vehicle holds a lease on the next node.
    NodeReserved(NodeId),
    /// A stationary vehicle occupies the destination node.
    DestOccupied,
    /// Yielding node entry to a closer (or lower-id) contender.
    YieldEntry,
    /// A vehicle still occupies the node ahead.
    NodeOccupied(NodeId),
    /// Yielding a mid-edge merge to the vehicle nearer the shared node.
    MergeYield,
    /// Forward proximity sensor tripped.
    FrontSensor,
    /// Advisory: the last planning attempt found no route.
    NoPath,
}

impl fmt::Display for WaitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitReason::NodeReserved(n) => write!(f, "node {} reserved", n.0),
            WaitReason::DestOccupied => f.write_str("dest occupied"),
            WaitReason::YieldEntry => f.write_str("yield entry"),
            WaitReason::NodeOccupied(n) => write!(f, "waiting node {}", n.0),
            WaitReason::MergeYield => f.write_str("merge yield"),
            WaitReason::FrontSensor => f.write_str("front sensor"),
            WaitReason::NoPath => f.write_str("no path"),
        }
    }
}

// ── AgvState ──────────────────────────────────────────────────────────────────

/// The complete record for one vehicle.
///
/// Owned exclusively by the engine; external callers only ever see clones
/// via snapshots.  All mutation during a tick is confined to the owning
/// vehicle's record — arbitration reads the frozen snapshot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgvState {
    // ── Identity ──────────────────────────────────────────────────────────
    pub id: AgvId,
    /// Cosmetic display color, assigned at spawn.
    pub color: String,

    // ── Kinematic state ───────────────────────────────────────────────────
    /// Continuous floor position in pixels.
    pub pos: Point,
    /// Heading of the active edge, in degrees.
    pub orientation_deg: f64,
    /// Current speed in px/tick, never negative.
    pub speed: f64,

    // ── Graph position ────────────────────────────────────────────────────
    /// Node most recently departed from (or rested at).
    pub current_node: NodeId,
    /// The node before `current_node`, if any.
    pub previous_node: Option<NodeId>,
    /// Remaining route, front first.  `path[0]` is the immediate destination.
    pub path: VecDeque<NodeId>,
    /// Terminal destination, or `None` when idle/completed.
    pub target_node: Option<NodeId>,
    /// Fraction of the current edge covered, in `[0, 1]`.
    pub progress: f64,
    /// Pixels covered along the current edge.
    pub progress_distance: f64,

    // ── Planning state ────────────────────────────────────────────────────
    /// Detour rank last chosen from the ranked-path enumeration.
    pub path_rank: usize,
    /// Consecutive recovery retries at the current blockage.
    pub retry_count: u32,
    /// Ticks spent waiting since the last reset.
    pub wait_timer: u32,
    pub wait_reason: Option<WaitReason>,
    /// The vehicle the last WAIT verdict was issued against.
    pub blocker: Option<AgvId>,
    /// Leased prefix of `path`; advisory to arbitration rule R0.
    pub reserved_nodes: Vec<NodeId>,
    /// Monotonic planning sequence number; smaller = planned earlier.
    /// First-come priority for contested nodes.
    pub plan_stamp: u64,

    // ── Configuration ─────────────────────────────────────────────────────
    pub config: VehicleConfig,

    pub status: AgvStatus,
}

impl AgvState {
    /// Construct a vehicle at rest on `node`.
    pub fn new(id: AgvId, node: NodeId, pos: Point, config: VehicleConfig) -> Self {
        Self {
            id,
            color: color_for(id),
            pos,
            orientation_deg: 0.0,
            speed: 0.0,
            current_node: node,
            previous_node: None,
            path: VecDeque::new(),
            target_node: None,
            progress: 0.0,
            progress_distance: 0.0,
            path_rank: 0,
            retry_count: 0,
            wait_timer: 0,
            wait_reason: None,
            blocker: None,
            reserved_nodes: Vec::new(),
            plan_stamp: 0,
            config,
            status: AgvStatus::Idle,
        }
    }

    /// The immediate destination node, if a route is active.
    #[inline]
    pub fn next_node(&self) -> Option<NodeId> {
        self.path.front().copied()
    }

    /// `true` when this is the last edge of the route.
    #[inline]
    pub fn on_final_edge(&self) -> bool {
        self.path.len() == 1
    }

    /// Re-derive the lease from the current path prefix.
    ///
    /// Resting vehicles hold no lease; otherwise the lease covers the first
    /// `hard_borrow_length` path nodes.  Call after every path mutation.
    pub fn refresh_reservations(&mut self) {
        self.reserved_nodes.clear();
        if self.status.at_rest() {
            return;
        }
        self.reserved_nodes.extend(
            self.path
                .iter()
                .take(self.config.hard_borrow_length)
                .copied(),
        );
    }

    /// Drop the route and all recovery bookkeeping, landing in `status`.
    ///
    /// Used for route completion and for target cancellation; the kinematic
    /// anchor (`current_node`, `pos`, `progress`) is left untouched — a
    /// completed vehicle keeps `progress = 1` as its arrival marker.
    pub fn clear_navigation(&mut self, status: AgvStatus) {
        self.path.clear();
        self.target_node = None;
        self.speed = 0.0;
        self.path_rank = 0;
        self.reset_wait();
        self.status = status;
        self.reserved_nodes.clear();
    }

    /// Reset the wait/retry ladder (on forward progress or replan).
    pub fn reset_wait(&mut self) {
        self.wait_timer = 0;
        self.retry_count = 0;
        self.wait_reason = None;
        self.blocker = None;
    }
}

/// Cosmetic spawn color: golden-angle hue rotation keeps neighboring ids
/// visually distinct.
fn color_for(id: AgvId) -> String {
    let hue = (id.0 as u64 * 137) % 360;
    format!("hsl({hue}, 70%, 55%)")
}
