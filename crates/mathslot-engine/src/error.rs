use crate::tree::NodeId;

/// Failures reported by fallible tree operations.
///
/// Broken preconditions (non-adjacent insertion points, boundaries from
/// different groups) are programming errors and are not represented here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("cursors do not share an ancestor group")]
    DisjointTrees,
    #[error("node {0:?} is no longer part of the document")]
    StaleNode(NodeId),
    #[error("node {0:?} is detached from any group")]
    Detached(NodeId),
    #[error("node {node:?} is not a {expected}")]
    KindMismatch {
        node: NodeId,
        expected: &'static str,
    },
}
