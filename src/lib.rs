//! Meshwork: incremental directed graph container.
//!
//! A small directed, optionally weighted graph that supports incremental
//! mutation, structural validation of its own invariants, and lossless
//! conversion to and from three exchange representations.
//!
//! # Core Concepts
//!
//! - **Nodes**: an opaque user payload, an optional scalar flag, and an
//!   outgoing edge map keyed by destination id
//! - **Ids**: issued monotonically per graph and never reused after removal
//! - **Exchange shapes**: adjacency matrix, adjacency list, and adjacency
//!   dict, of which the dict form is the only gap-tolerant one
//!
//! # Example
//!
//! ```
//! use meshwork::{convert, Graph, Node};
//!
//! let mut graph: Graph<&str> = Graph::new();
//! let a = graph.add_node(Node::new()).unwrap().unwrap();
//! let b = graph.add_node(Node::new().with_data("leaf")).unwrap().unwrap();
//! graph.add_edge(a, b, 5.0).unwrap();
//!
//! assert_eq!(convert::to_adjacency_list(&graph), vec![vec![(b, 5.0)], vec![]]);
//! ```

pub mod builder;
pub mod convert;
mod graph;
mod node;
pub mod validate;

pub use builder::{AdjacencyDict, AdjacencyList, AdjacencyMatrix};
pub use graph::{ErrorKind, Graph, GraphError, GraphResult};
pub use node::{EdgeMap, Flag, Node, NodeId, Weight};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
