//! Map-subsystem error type.

use thiserror::Error;

use agv_core::NodeId;

/// Errors produced by `agv-map`.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),
}

pub type MapResult<T> = Result<T, MapError>;
