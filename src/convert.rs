//! Converters: externalize a graph into an exchange representation.
//!
//! Exact inverses of the builders in [`crate::builder`]. The matrix and
//! list views are sized by the id watermark, so rows for retired ids come
//! out empty; the dict view carries live nodes only and is the one shape
//! that survives removals without invented placeholders.

use crate::builder::{AdjacencyDict, AdjacencyList, AdjacencyMatrix};
use crate::graph::Graph;
use crate::node::NodeId;
use std::collections::BTreeMap;

/// Matrix view, `(last_id + 1)²` cells. `None` marks an absent edge.
pub fn to_adjacency_matrix<D>(graph: &Graph<D>) -> AdjacencyMatrix {
    let n = graph.next_id();
    let mut matrix = vec![vec![None; n]; n];
    for (id, node) in graph.nodes() {
        for (&to, &weight) in node.edges() {
            matrix[id.index()][to.index()] = Some(weight);
        }
    }
    matrix
}

/// Matrix view plus a positional payload vector; retired ids hold `None`.
pub fn to_adjacency_matrix_with_values<D: Clone>(
    graph: &Graph<D>,
) -> (AdjacencyMatrix, Vec<Option<D>>) {
    (to_adjacency_matrix(graph), positional_values(graph))
}

/// List view, one entry per issued id, edges ordered by destination.
pub fn to_adjacency_list<D>(graph: &Graph<D>) -> AdjacencyList {
    let n = graph.next_id();
    let mut list = vec![Vec::new(); n];
    for (id, node) in graph.nodes() {
        list[id.index()] = node.edges().iter().map(|(&to, &weight)| (to, weight)).collect();
    }
    list
}

/// List view plus a positional payload vector.
pub fn to_adjacency_list_with_values<D: Clone>(
    graph: &Graph<D>,
) -> (AdjacencyList, Vec<Option<D>>) {
    (to_adjacency_list(graph), positional_values(graph))
}

/// Dict view: live node ids only, each mapped to its edge mapping.
pub fn to_adjacency_dict<D>(graph: &Graph<D>) -> AdjacencyDict {
    graph
        .nodes()
        .map(|(id, node)| (id, node.edges().clone()))
        .collect()
}

/// Dict view plus payloads, keyed by id; nodes without a payload are
/// omitted from the value map.
pub fn to_adjacency_dict_with_values<D: Clone>(
    graph: &Graph<D>,
) -> (AdjacencyDict, BTreeMap<NodeId, D>) {
    let values = graph
        .nodes()
        .filter_map(|(id, node)| node.data.clone().map(|data| (id, data)))
        .collect();
    (to_adjacency_dict(graph), values)
}

fn positional_values<D: Clone>(graph: &Graph<D>) -> Vec<Option<D>> {
    let mut values = vec![None; graph.next_id()];
    for (id, node) in graph.nodes() {
        values[id.index()] = node.data.clone();
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn sample() -> Graph<String> {
        let mut graph = Graph::new();
        let a = graph
            .add_node(Node::new().with_data("a".to_string()))
            .unwrap()
            .unwrap();
        let b = graph.add_node(Node::new()).unwrap().unwrap();
        let c = graph
            .add_node(Node::new().with_data("c".to_string()))
            .unwrap()
            .unwrap();
        graph.add_edge(a, c, 2.0).unwrap();
        graph.add_edge(a, b, 1.0).unwrap();
        graph.add_edge(c, c, 3.0).unwrap();
        graph
    }

    #[test]
    fn list_orders_edges_by_destination() {
        let list = to_adjacency_list(&sample());
        // inserted c-first, reported in id order
        assert_eq!(
            list[0],
            vec![(NodeId::new(1), 1.0), (NodeId::new(2), 2.0)]
        );
        assert_eq!(list[1], vec![]);
        assert_eq!(list[2], vec![(NodeId::new(2), 3.0)]);
    }

    #[test]
    fn matrix_rows_for_retired_ids_are_empty() {
        let mut graph = sample();
        graph.remove_node(NodeId::new(0)).unwrap();

        let (matrix, values) = to_adjacency_matrix_with_values(&graph);
        assert_eq!(matrix.len(), 3);
        assert!(matrix[0].iter().all(Option::is_none));
        assert_eq!(matrix[2][2], Some(3.0));
        assert_eq!(values, vec![None, None, Some("c".to_string())]);
    }

    #[test]
    fn dict_contains_only_live_nodes() {
        let mut graph = sample();
        graph.remove_node(NodeId::new(1)).unwrap();

        let (dict, values) = to_adjacency_dict_with_values(&graph);
        assert_eq!(dict.len(), 2);
        assert!(!dict.contains_key(&NodeId::new(1)));
        // node 0's edge to the removed node was purged with it
        assert_eq!(dict[&NodeId::new(0)].len(), 1);
        // only payload-bearing nodes appear in the value map
        assert_eq!(values.len(), 2);
        assert_eq!(values[&NodeId::new(0)], "a");
    }

    #[test]
    fn empty_graph_converts_to_empty_shapes() {
        let graph: Graph<()> = Graph::new();
        assert!(to_adjacency_matrix(&graph).is_empty());
        assert!(to_adjacency_list(&graph).is_empty());
        assert!(to_adjacency_dict(&graph).is_empty());
    }
}
