//! Structural validation: pure, read-only checks of graph invariants.
//!
//! Mutation and building route through these checks before anything
//! commits, so a rejected operation never leaves a partial state behind.

use crate::graph::{Graph, GraphError, GraphResult};
use crate::node::{Flag, Node, NodeId, Weight};

/// Check every structural invariant of `graph`.
///
/// The empty graph is trivially valid. Otherwise every key must sit at or
/// below the id watermark and every node must pass [`validate_node`].
pub fn validate_graph<D>(graph: &Graph<D>) -> GraphResult<()> {
    for (id, node) in graph.nodes() {
        if id.index() >= graph.next_id() {
            return Err(GraphError::IdBeyondWatermark {
                id,
                next_id: graph.next_id(),
            });
        }
        validate_node(node, graph, id, false)?;
    }
    Ok(())
}

/// Check a single node against `graph`.
///
/// `id` is the id the node holds (or, with `inserting`, is about to
/// receive). An inserting candidate may reference its own uncommitted id;
/// every other destination must already be live. Flags and weights must be
/// finite.
pub fn validate_node<D>(
    node: &Node<D>,
    graph: &Graph<D>,
    id: NodeId,
    inserting: bool,
) -> GraphResult<()> {
    if let Some(Flag::Float(value)) = node.flag {
        if !value.is_finite() {
            return Err(GraphError::NonFiniteFlag(value));
        }
    }
    for (&to, &weight) in node.edges() {
        let live = graph.contains(to) || (inserting && to == id);
        if !live {
            return Err(GraphError::DanglingEdge { from: id, to });
        }
        validate_weight(id, to, weight)?;
    }
    Ok(())
}

/// Reject non-finite edge weights.
pub fn validate_weight(from: NodeId, to: NodeId, weight: Weight) -> GraphResult<()> {
    if weight.is_finite() {
        Ok(())
    } else {
        Err(GraphError::NonFiniteWeight { from, to, weight })
    }
}
