//! Graph container: node table, id watermark, and safe mutation.

use crate::node::{Node, NodeId, Weight};
use crate::validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors reported by graph mutation, validation, and building.
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Edge not found: {from} -> {to}")]
    EdgeNotFound { from: NodeId, to: NodeId },

    #[error("Dangling edge: {from} -> {to} targets an absent node")]
    DanglingEdge { from: NodeId, to: NodeId },

    #[error("Id {id} was never issued (watermark {next_id})")]
    IdBeyondWatermark { id: NodeId, next_id: usize },

    #[error("Ragged adjacency matrix: row {row} has {len} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Value count mismatch: {found} values for {expected} nodes")]
    ValueCountMismatch { expected: usize, found: usize },

    #[error("Value supplied for absent node {0}")]
    ValueWithoutNode(NodeId),

    #[error("Non-finite weight {weight} on edge {from} -> {to}")]
    NonFiniteWeight {
        from: NodeId,
        to: NodeId,
        weight: Weight,
    },

    #[error("Non-finite flag value {0}")]
    NonFiniteFlag(f64),

    #[error("Edge {from} -> {to} already present with this weight")]
    DuplicateEdge { from: NodeId, to: NodeId },
}

/// The failure taxonomy a [`GraphError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A reference points outside the graph's structure.
    Structural,
    /// A value fails its semantic type requirement.
    Type,
    /// A referenced node or edge is absent.
    NotFound,
    /// The operation would re-assert already-current state.
    Duplicate,
}

impl GraphError {
    /// Which part of the failure taxonomy this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::NodeNotFound(_) | GraphError::EdgeNotFound { .. } => ErrorKind::NotFound,
            GraphError::DanglingEdge { .. }
            | GraphError::IdBeyondWatermark { .. }
            | GraphError::RaggedMatrix { .. }
            | GraphError::ValueCountMismatch { .. }
            | GraphError::ValueWithoutNode(_) => ErrorKind::Structural,
            GraphError::NonFiniteWeight { .. } | GraphError::NonFiniteFlag(_) => ErrorKind::Type,
            GraphError::DuplicateEdge { .. } => ErrorKind::Duplicate,
        }
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// A directed, optionally weighted graph with validated incremental
/// mutation.
///
/// Every mutation routes through the validator before it commits, so a
/// caller never observes a partially-applied operation. Ids are issued
/// monotonically and never reused; removing a node retires its id for the
/// lifetime of the graph.
///
/// Failure handling is selectable per instance ("merciless" mode, on by
/// default): a strict graph surfaces every rejected mutation as a hard
/// error, a lenient one logs a warning and returns a soft signal instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph<D> {
    /// Live nodes keyed by id. BTreeMap iteration keeps conversion output
    /// deterministic.
    nodes: BTreeMap<NodeId, Node<D>>,
    /// Id watermark: ids `0..next_id` have been issued.
    next_id: usize,
    /// Strict mode toggle.
    merciless: bool,
}

impl<D> Graph<D> {
    /// Create an empty graph in strict (merciless) mode.
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 0,
            merciless: true,
        }
    }

    /// Create an empty graph that soft-fails: rejected mutations log a
    /// warning and return a fallback value instead of an error.
    pub fn lenient() -> Self {
        Self {
            merciless: false,
            ..Self::new()
        }
    }

    /// Assemble a graph directly from parts. Callers must validate the
    /// result before handing it out.
    pub(crate) fn from_parts(nodes: BTreeMap<NodeId, Node<D>>, next_id: usize) -> Self {
        Self {
            nodes,
            next_id,
            merciless: true,
        }
    }

    /// Toggle strict mode at runtime.
    pub fn set_merciless(&mut self, merciless: bool) {
        self.merciless = merciless;
    }

    /// Whether rejected mutations surface as hard errors.
    pub fn merciless(&self) -> bool {
        self.merciless
    }

    // --- Read surface ---

    /// Count of live nodes. Retired ids do not count.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Highest id ever issued, or `None` if no node was ever added.
    pub fn last_id(&self) -> Option<NodeId> {
        self.next_id.checked_sub(1).map(NodeId::new)
    }

    /// The id the next committed node will receive.
    pub(crate) fn next_id(&self) -> usize {
        self.next_id
    }

    /// Whether `id` is a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get a node by id.
    pub fn get_node(&self, id: NodeId) -> Option<&Node<D>> {
        self.nodes.get(&id)
    }

    /// Mutable access to a node's payload and flag. Edges stay behind the
    /// graph's mutation API.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut Node<D>> {
        self.nodes.get_mut(&id)
    }

    /// Iterate live nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node<D>)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Whether the edge `from -> to` is present.
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.edge_weight(from, to).is_some()
    }

    /// Weight of the edge `from -> to`, if present.
    pub fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<Weight> {
        self.nodes.get(&from).and_then(|n| n.edges().get(&to).copied())
    }

    /// Check the graph's structural invariants.
    pub fn validate(&self) -> GraphResult<()> {
        validate::validate_graph(self)
    }

    // --- Mutation ---

    /// Add a node, issuing the next id.
    ///
    /// The candidate is validated before it commits: its edges may target
    /// live nodes or the id it is about to receive, and nothing else. On
    /// rejection the graph is unchanged; a lenient graph reports the
    /// rejection as `Ok(None)`.
    pub fn add_node(&mut self, node: Node<D>) -> GraphResult<Option<NodeId>> {
        let id = NodeId::new(self.next_id);
        if let Err(err) = validate::validate_node(&node, self, id, true) {
            return self.soften(err, None);
        }
        self.nodes.insert(id, node);
        self.next_id += 1;
        Ok(Some(id))
    }

    /// Remove a node, returning it, and purge every remaining edge that
    /// targeted it.
    ///
    /// The id stays retired; `last_id` does not move back.
    pub fn remove_node(&mut self, id: NodeId) -> GraphResult<Option<Node<D>>> {
        let Some(node) = self.nodes.remove(&id) else {
            return self.soften(GraphError::NodeNotFound(id), None);
        };
        let mut purged = 0usize;
        for other in self.nodes.values_mut() {
            if other.edges_mut().remove(&id).is_some() {
                purged += 1;
            }
        }
        debug!(%id, purged, "node removed");
        Ok(Some(node))
    }

    /// Insert or overwrite the edge `from -> to`.
    ///
    /// Both endpoints must be live; self-loops are allowed. Re-asserting
    /// the already-current weight is absorbed as a no-op success with a
    /// logged warning.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: Weight) -> GraphResult<bool> {
        match self.try_add_edge(from, to, weight, false) {
            Ok(applied) => Ok(applied),
            Err(err) => self.soften(err, false),
        }
    }

    /// Insert the edge in both directions with the same weight.
    pub fn add_edge_symmetric(&mut self, a: NodeId, b: NodeId, weight: Weight) -> GraphResult<bool> {
        match self.try_add_edge(a, b, weight, true) {
            Ok(applied) => Ok(applied),
            Err(err) => self.soften(err, false),
        }
    }

    /// Remove the edge `from -> to`. The edge itself must exist.
    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> GraphResult<bool> {
        match self.try_remove_edge(from, to, false) {
            Ok(removed) => Ok(removed),
            Err(err) => self.soften(err, false),
        }
    }

    /// Remove the edge in both directions; succeeds when at least one
    /// direction was present.
    pub fn remove_edge_symmetric(&mut self, a: NodeId, b: NodeId) -> GraphResult<bool> {
        match self.try_remove_edge(a, b, true) {
            Ok(removed) => Ok(removed),
            Err(err) => self.soften(err, false),
        }
    }

    fn try_add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        weight: Weight,
        symmetric: bool,
    ) -> GraphResult<bool> {
        validate::validate_weight(from, to, weight)?;
        if !self.nodes.contains_key(&from) {
            return Err(GraphError::NodeNotFound(from));
        }
        if !self.nodes.contains_key(&to) {
            return Err(GraphError::NodeNotFound(to));
        }

        let forward_current = self.edge_weight(from, to) == Some(weight);
        let duplicate = if symmetric {
            forward_current && self.edge_weight(to, from) == Some(weight)
        } else {
            forward_current
        };
        if duplicate {
            let err = GraphError::DuplicateEdge { from, to };
            warn!(error = %err, "no-op edge insertion");
            return Ok(true);
        }

        if let Some(node) = self.nodes.get_mut(&from) {
            node.edges_mut().insert(to, weight);
        }
        if symmetric {
            if let Some(node) = self.nodes.get_mut(&to) {
                node.edges_mut().insert(from, weight);
            }
        }
        Ok(true)
    }

    fn try_remove_edge(&mut self, from: NodeId, to: NodeId, symmetric: bool) -> GraphResult<bool> {
        if !self.nodes.contains_key(&from) {
            return Err(GraphError::NodeNotFound(from));
        }
        if !self.nodes.contains_key(&to) {
            return Err(GraphError::NodeNotFound(to));
        }

        let mut removed = false;
        if let Some(node) = self.nodes.get_mut(&from) {
            removed |= node.edges_mut().remove(&to).is_some();
        }
        if symmetric {
            if let Some(node) = self.nodes.get_mut(&to) {
                removed |= node.edges_mut().remove(&from).is_some();
            }
        }
        if removed {
            Ok(true)
        } else {
            Err(GraphError::EdgeNotFound { from, to })
        }
    }

    /// Route a rejected mutation per the configured mode: hard error when
    /// merciless, logged warning plus `fallback` otherwise.
    fn soften<T>(&self, err: GraphError, fallback: T) -> GraphResult<T> {
        if self.merciless {
            Err(err)
        } else {
            warn!(error = %err, "graph mutation rejected");
            Ok(fallback)
        }
    }
}

impl<D> Default for Graph<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_graph_is_empty_and_valid() {
        let graph: Graph<()> = Graph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.last_id(), None);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn add_node_issues_sequential_ids() {
        let mut graph: Graph<()> = Graph::new();
        let a = graph.add_node(Node::new()).unwrap().unwrap();
        let b = graph.add_node(Node::new()).unwrap().unwrap();
        assert_eq!(a, NodeId::new(0));
        assert_eq!(b, NodeId::new(1));
        assert_eq!(graph.last_id(), Some(b));
    }

    #[test]
    fn rejected_add_node_leaves_watermark_alone() {
        let mut graph: Graph<()> = Graph::new();
        let err = graph
            .add_node(Node::new().with_edge(4usize, 1.0))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(graph.last_id(), None);
        assert!(graph.is_empty());
    }

    #[test]
    fn duplicate_edge_is_a_noop_success() {
        let mut graph: Graph<()> = Graph::new();
        let a = graph.add_node(Node::new()).unwrap().unwrap();
        assert_eq!(graph.add_edge(a, a, 2.0), Ok(true));
        assert_eq!(graph.add_edge(a, a, 2.0), Ok(true));
        assert_eq!(graph.edge_weight(a, a), Some(2.0));
        // a different weight is an overwrite, not a duplicate
        assert_eq!(graph.add_edge(a, a, 3.0), Ok(true));
        assert_eq!(graph.edge_weight(a, a), Some(3.0));
    }

    #[test]
    fn non_finite_weight_is_rejected_before_commit() {
        let mut graph: Graph<()> = Graph::new();
        let a = graph.add_node(Node::new()).unwrap().unwrap();
        let err = graph.add_edge(a, a, f64::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(!graph.has_edge(a, a));
    }

    #[test]
    fn lenient_graph_warns_instead_of_failing() {
        let mut graph: Graph<()> = Graph::lenient();
        assert!(!graph.merciless());
        assert_eq!(graph.remove_node(NodeId::new(0)).unwrap(), None);
        let a = graph.add_node(Node::new()).unwrap().unwrap();
        assert_eq!(graph.add_edge(a, NodeId::new(9), 1.0), Ok(false));
        assert_eq!(graph.remove_edge(a, a), Ok(false));
    }

    #[test]
    fn merciless_toggle_switches_behavior() {
        let mut graph: Graph<()> = Graph::new();
        assert!(graph.remove_edge(NodeId::new(0), NodeId::new(1)).is_err());
        graph.set_merciless(false);
        assert_eq!(graph.remove_edge(NodeId::new(0), NodeId::new(1)), Ok(false));
    }

    #[test]
    fn graph_round_trips_through_json() {
        let mut graph: Graph<String> = Graph::new();
        let a = graph
            .add_node(Node::new().with_data("root".to_string()).with_flag(1i64))
            .unwrap()
            .unwrap();
        let b = graph.add_node(Node::new()).unwrap().unwrap();
        graph.add_edge(a, b, 5.0).unwrap();
        graph.remove_node(b).unwrap();

        let json = serde_json::to_string(&graph).unwrap();
        let back: Graph<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);
        assert_eq!(back.last_id(), Some(b));
    }

    #[test]
    fn error_kinds_cover_the_taxonomy() {
        assert_eq!(
            GraphError::NodeNotFound(NodeId::new(0)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            GraphError::RaggedMatrix {
                row: 0,
                len: 1,
                expected: 2
            }
            .kind(),
            ErrorKind::Structural
        );
        assert_eq!(GraphError::NonFiniteFlag(f64::NAN).kind(), ErrorKind::Type);
        assert_eq!(
            GraphError::DuplicateEdge {
                from: NodeId::new(0),
                to: NodeId::new(1)
            }
            .kind(),
            ErrorKind::Duplicate
        );
    }
}
