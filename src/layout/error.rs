use serde::Serialize;
use thiserror::Error;

use crate::forest::NodeId;

/// Fatal layout failures. A run that hits one of these produces no output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("cannot pack trees into a strip of zero total width")]
    ZeroPackingWidth,
    #[error("no sibling left of node {node} reaches depth {depth}")]
    MissingClumpCandidate { node: NodeId, depth: usize },
    #[error("node {node} has no descendant at depth {depth}")]
    MissingContour { node: NodeId, depth: usize },
}

/// Recoverable anomalies. The affected link or tree is skipped and the run
/// continues for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LayoutWarning {
    #[error("link between '{a}' and '{b}' has no resolved device on either end")]
    UnresolvedLink { a: String, b: String },
    #[error("tree {tree} has no root node and was left unlaid")]
    MissingRoot { tree: usize },
}
