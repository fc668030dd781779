use crate::NodeId;
use thiserror::Error;

/// Structural failures reported by tree mutations and pass entry points.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("node {0:?} does not exist or was destroyed")]
    StaleNode(NodeId),
    #[error("node {0:?} cannot hold children")]
    NotAGroup(NodeId),
    #[error("node {child:?} is already attached to {parent:?}")]
    AlreadyAttached { child: NodeId, parent: NodeId },
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle { parent: NodeId, child: NodeId },
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("child index {index} is out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("no root node has been set")]
    NoRoot,
}
