//! Builders: construct a graph from an exchange representation.
//!
//! Each builder assembles the node table in full, then validates exactly
//! once; on failure no partially-built graph escapes. The matrix and list
//! shapes are positional and require dense ids; the dict shape tolerates
//! gaps left by removed nodes.

use crate::graph::{Graph, GraphError, GraphResult};
use crate::node::{EdgeMap, Node, NodeId, Weight};
use crate::validate;
use std::collections::BTreeMap;

/// Dense matrix exchange shape: `matrix[i][j] = Some(w)` is an edge
/// `i -> j` with weight `w`. A set diagonal cell is an explicit self-edge.
pub type AdjacencyMatrix = Vec<Vec<Option<Weight>>>;

/// Positional list exchange shape: entry `i` holds node `i`'s outgoing
/// `(destination, weight)` pairs.
pub type AdjacencyList = Vec<Vec<(NodeId, Weight)>>;

/// Gap-tolerant keyed exchange shape: live node id -> edge mapping.
pub type AdjacencyDict = BTreeMap<NodeId, EdgeMap>;

/// Build a graph from a square adjacency matrix. Row `i` becomes node `i`.
pub fn from_adjacency_matrix<D>(matrix: AdjacencyMatrix) -> GraphResult<Graph<D>> {
    build_from_matrix(matrix, None)
}

/// Build a graph from a square adjacency matrix, attaching `values[i]` as
/// node `i`'s payload. The value count must match the row count.
pub fn from_adjacency_matrix_with_values<D>(
    matrix: AdjacencyMatrix,
    values: Vec<Option<D>>,
) -> GraphResult<Graph<D>> {
    build_from_matrix(matrix, Some(values))
}

/// Build a graph from an adjacency list. Entry `i` becomes node `i`.
pub fn from_adjacency_list<D>(list: AdjacencyList) -> GraphResult<Graph<D>> {
    build_from_list(list, None)
}

/// Build a graph from an adjacency list with positional payloads.
pub fn from_adjacency_list_with_values<D>(
    list: AdjacencyList,
    values: Vec<Option<D>>,
) -> GraphResult<Graph<D>> {
    build_from_list(list, Some(values))
}

/// Build a graph from an adjacency dict. Ids need not be contiguous; the
/// watermark lands just above the highest key. Every referenced
/// destination must itself be a key; absent ids are not auto-created.
pub fn from_adjacency_dict<D>(dict: AdjacencyDict) -> GraphResult<Graph<D>> {
    build_from_dict(dict, None)
}

/// Build a graph from an adjacency dict with keyed payloads. A value keyed
/// by an id the dict does not contain fails the build.
pub fn from_adjacency_dict_with_values<D>(
    dict: AdjacencyDict,
    values: BTreeMap<NodeId, D>,
) -> GraphResult<Graph<D>> {
    build_from_dict(dict, Some(values))
}

fn build_from_matrix<D>(
    matrix: AdjacencyMatrix,
    values: Option<Vec<Option<D>>>,
) -> GraphResult<Graph<D>> {
    let n = matrix.len();
    let mut values = check_value_count(values, n)?;

    let mut nodes = BTreeMap::new();
    for (i, row) in matrix.into_iter().enumerate() {
        if row.len() != n {
            return Err(GraphError::RaggedMatrix {
                row: i,
                len: row.len(),
                expected: n,
            });
        }
        let mut edges = EdgeMap::new();
        for (j, cell) in row.into_iter().enumerate() {
            if let Some(weight) = cell {
                edges.insert(NodeId::new(j), weight);
            }
        }
        let data = values.as_mut().and_then(|v| v[i].take());
        nodes.insert(NodeId::new(i), Node::from_parts(data, None, edges));
    }

    let graph = Graph::from_parts(nodes, n);
    validate::validate_graph(&graph)?;
    Ok(graph)
}

fn build_from_list<D>(
    list: AdjacencyList,
    values: Option<Vec<Option<D>>>,
) -> GraphResult<Graph<D>> {
    let n = list.len();
    let mut values = check_value_count(values, n)?;

    let mut nodes = BTreeMap::new();
    for (i, pairs) in list.into_iter().enumerate() {
        let edges: EdgeMap = pairs.into_iter().collect();
        let data = values.as_mut().and_then(|v| v[i].take());
        nodes.insert(NodeId::new(i), Node::from_parts(data, None, edges));
    }

    let graph = Graph::from_parts(nodes, n);
    validate::validate_graph(&graph)?;
    Ok(graph)
}

fn build_from_dict<D>(
    dict: AdjacencyDict,
    values: Option<BTreeMap<NodeId, D>>,
) -> GraphResult<Graph<D>> {
    let next_id = dict.keys().next_back().map_or(0, |id| id.index() + 1);
    let mut nodes: BTreeMap<NodeId, Node<D>> = dict
        .into_iter()
        .map(|(id, edges)| (id, Node::from_parts(None, None, edges)))
        .collect();

    if let Some(values) = values {
        for (id, data) in values {
            match nodes.get_mut(&id) {
                Some(node) => node.data = Some(data),
                None => return Err(GraphError::ValueWithoutNode(id)),
            }
        }
    }

    let graph = Graph::from_parts(nodes, next_id);
    validate::validate_graph(&graph)?;
    Ok(graph)
}

fn check_value_count<D>(
    values: Option<Vec<Option<D>>>,
    expected: usize,
) -> GraphResult<Option<Vec<Option<D>>>> {
    if let Some(values) = &values {
        if values.len() != expected {
            return Err(GraphError::ValueCountMismatch {
                expected,
                found: values.len(),
            });
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ErrorKind;

    #[test]
    fn ragged_matrix_is_a_structural_error() {
        let err =
            from_adjacency_matrix::<()>(vec![vec![None, Some(1.0)], vec![None]]).unwrap_err();
        assert_eq!(
            err,
            GraphError::RaggedMatrix {
                row: 1,
                len: 1,
                expected: 2
            }
        );
        assert_eq!(err.kind(), ErrorKind::Structural);
    }

    #[test]
    fn matrix_diagonal_is_an_explicit_self_edge() {
        let graph =
            from_adjacency_matrix::<()>(vec![vec![Some(0.0), None], vec![None, None]]).unwrap();
        assert_eq!(
            graph.edge_weight(NodeId::new(0), NodeId::new(0)),
            Some(0.0)
        );
        assert!(graph.get_node(NodeId::new(1)).unwrap().edges().is_empty());
    }

    #[test]
    fn list_destination_out_of_range_fails_validation() {
        let err = from_adjacency_list::<()>(vec![vec![(NodeId::new(2), 1.0)], vec![]])
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingEdge {
                from: NodeId::new(0),
                to: NodeId::new(2)
            }
        );
    }

    #[test]
    fn dict_does_not_auto_create_referenced_ids() {
        let mut dict = AdjacencyDict::new();
        dict.insert(NodeId::new(0), EdgeMap::from([(NodeId::new(2), 1.0)]));
        dict.insert(NodeId::new(1), EdgeMap::new());
        let err = from_adjacency_dict::<()>(dict).unwrap_err();
        assert_eq!(
            err,
            GraphError::DanglingEdge {
                from: NodeId::new(0),
                to: NodeId::new(2)
            }
        );
    }

    #[test]
    fn dict_watermark_sits_above_the_highest_key() {
        let mut dict = AdjacencyDict::new();
        dict.insert(NodeId::new(0), EdgeMap::new());
        dict.insert(NodeId::new(4), EdgeMap::from([(NodeId::new(0), 1.0)]));
        let graph = from_adjacency_dict::<()>(dict).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.last_id(), Some(NodeId::new(4)));
    }

    #[test]
    fn value_arity_is_checked() {
        let err = from_adjacency_list_with_values::<()>(vec![vec![]], vec![]).unwrap_err();
        assert_eq!(
            err,
            GraphError::ValueCountMismatch {
                expected: 1,
                found: 0
            }
        );

        let mut dict = AdjacencyDict::new();
        dict.insert(NodeId::new(0), EdgeMap::new());
        let err =
            from_adjacency_dict_with_values(dict, BTreeMap::from([(NodeId::new(3), 7)]))
                .unwrap_err();
        assert_eq!(err, GraphError::ValueWithoutNode(NodeId::new(3)));
    }

    #[test]
    fn non_finite_matrix_weight_is_a_type_error() {
        let err = from_adjacency_matrix::<()>(vec![vec![Some(f64::NAN)]]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }
}
