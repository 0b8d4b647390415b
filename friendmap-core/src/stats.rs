//! Graph statistics for reports.

use crate::graph::SocialGraph;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    /// Edges between two direct friends (not touching the root).
    pub mutual_edges: usize,
    /// Non-root nodes with exactly one edge.
    pub leaf_count: usize,
    /// Best-connected non-root node as `(id, degree)`.
    pub most_connected: Option<(String, usize)>,
}

pub fn compute_stats(graph: &SocialGraph) -> GraphStats {
    let root = graph.root();

    let mutual_edges = graph
        .edges()
        .iter()
        .filter(|(a, b)| *a != root && *b != root)
        .count();

    let mut leaf_count = 0;
    let mut most_connected: Option<(String, usize)> = None;

    for node in graph.nodes() {
        if node.id == root {
            continue;
        }
        let degree = graph.degree(&node.id);
        if degree == 1 {
            leaf_count += 1;
        }

        // Highest degree, ties go to the smaller id.
        let better = match &most_connected {
            None => true,
            Some((best_id, best_degree)) => {
                degree > *best_degree || (degree == *best_degree && node.id < *best_id)
            }
        };
        if better {
            most_connected = Some((node.id.clone(), degree));
        }
    }

    GraphStats {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        mutual_edges,
        leaf_count,
        most_connected,
    }
}
