//! Engine-level error type.

use thiserror::Error;

use agv_core::{AgvId, CoreError, NodeId};
use agv_map::MapError;

/// Errors surfaced by the engine's command interface.
///
/// `NoPath` is advisory rather than fatal: the vehicle stays put (idle at a
/// node, or finishing its current edge mid-route) with a `no path` wait
/// reason attached.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("vehicle {0} not found")]
    UnknownAgv(AgvId),

    #[error("node {0} not found")]
    UnknownNode(NodeId),

    #[error("map has no nodes")]
    EmptyMap,

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error(transparent)]
    Config(#[from] CoreError),
}

impl From<MapError> for EngineError {
    fn from(e: MapError) -> Self {
        match e {
            MapError::NoRoute { from, to } => EngineError::NoPath { from, to },
            MapError::NodeNotFound(n) => EngineError::UnknownNode(n),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
