//! Node representation: identifier space, flag variant, and the node record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for a node within one graph instance.
///
/// Ids are issued monotonically starting at zero and are never reused after
/// removal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Create a NodeId from a raw index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The raw index backing this id.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric edge weight.
pub type Weight = f64;

/// Per-node outgoing edge mapping: destination id -> weight.
///
/// A `BTreeMap` keeps per-node edge iteration deterministic, which the
/// converters rely on.
pub type EdgeMap = BTreeMap<NodeId, Weight>;

/// Caller-defined scalar tag on a node. The graph attaches no semantics
/// to it beyond type-checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Flag {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for Flag {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Flag {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Flag {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Flag {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// A node: opaque user payload, optional flag, and its outgoing edge set.
///
/// A node is assembled detached with the `with_*` builders but only
/// acquires an id when committed through [`Graph::add_node`]. Once
/// committed, its edges are mutated only through the owning graph.
///
/// [`Graph::add_node`]: crate::Graph::add_node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<D> {
    /// Opaque user payload. The graph never inspects its structure.
    pub data: Option<D>,
    /// Optional scalar tag for caller-defined marking.
    pub flag: Option<Flag>,
    /// Outgoing edges, kept behind the graph's mutation API.
    edges: EdgeMap,
}

impl<D> Node<D> {
    /// Create an empty node: no payload, no flag, no edges.
    pub fn new() -> Self {
        Self {
            data: None,
            flag: None,
            edges: EdgeMap::new(),
        }
    }

    /// Set the payload.
    pub fn with_data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    /// Set the flag.
    pub fn with_flag(mut self, flag: impl Into<Flag>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    /// Add an outgoing edge. Destinations are checked when the node is
    /// committed to a graph, not here.
    pub fn with_edge(mut self, to: impl Into<NodeId>, weight: Weight) -> Self {
        self.edges.insert(to.into(), weight);
        self
    }

    /// Read access to the outgoing edges.
    pub fn edges(&self) -> &EdgeMap {
        &self.edges
    }

    pub(crate) fn edges_mut(&mut self) -> &mut EdgeMap {
        &mut self.edges
    }

    pub(crate) fn from_parts(data: Option<D>, flag: Option<Flag>, edges: EdgeMap) -> Self {
        Self { data, flag, edges }
    }
}

impl<D> Default for Node<D> {
    fn default() -> Self {
        Self::new()
    }
}
