//! Friend graph assembly.
//!
//! The node set is fixed by the root and its direct friends; second-level
//! friend lists only ever add edges between nodes that already exist.

use friendmap_scanner::{ConnectionEntry, CrawlOutcome, CrawlResult, RootProfile};
use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileNode {
    pub id: String,
    pub label: String,
}

/// Undirected friend graph with no self-loops and no parallel edges.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    graph: StableUnGraph<ProfileNode, ()>,
    index: HashMap<String, NodeIndex>,
    root: String,
}

impl SocialGraph {
    pub fn new(root_id: &str, root_label: &str) -> Self {
        let mut graph = Self {
            graph: StableUnGraph::default(),
            index: HashMap::new(),
            root: root_id.to_string(),
        };
        graph.add_node(root_id, root_label);
        graph
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Adds a node, or relabels it when the id is already present. The root
    /// keeps its own label. Returns whether a node was created.
    pub fn add_node(&mut self, id: &str, label: &str) -> bool {
        if let Some(&ix) = self.index.get(id) {
            if id != self.root
                && let Some(node) = self.graph.node_weight_mut(ix)
            {
                node.label = label.to_string();
            }
            return false;
        }
        let ix = self.graph.add_node(ProfileNode {
            id: id.to_string(),
            label: label.to_string(),
        });
        self.index.insert(id.to_string(), ix);
        true
    }

    /// Adds `{a, b}` if both nodes exist, they differ, and the edge is new.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        let (Some(&ia), Some(&ib)) = (self.index.get(a), self.index.get(b)) else {
            return false;
        };
        if self.graph.find_edge(ia, ib).is_some() {
            return false;
        }
        self.graph.add_edge(ia, ib, ());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn label(&self, id: &str) -> Option<&str> {
        let ix = self.index.get(id)?;
        self.graph.node_weight(*ix).map(|node| node.label.as_str())
    }

    pub fn degree(&self, id: &str) -> usize {
        self.index
            .get(id)
            .map(|ix| self.graph.neighbors(*ix).count())
            .unwrap_or(0)
    }

    /// Neighbour ids, sorted.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&ix) = self.index.get(id) else {
            return Vec::new();
        };
        let mut neighbors: Vec<&str> = self
            .graph
            .neighbors(ix)
            .filter_map(|n| self.graph.node_weight(n))
            .map(|node| node.id.as_str())
            .collect();
        neighbors.sort_unstable();
        neighbors
    }

    /// Nodes in insertion order, root first.
    pub fn nodes(&self) -> Vec<&ProfileNode> {
        self.graph
            .node_indices()
            .filter_map(|ix| self.graph.node_weight(ix))
            .collect()
    }

    /// Edges as `(smaller id, larger id)` pairs, sorted.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut edges: Vec<(&str, &str)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .filter_map(|(a, b)| {
                let a = self.graph.node_weight(a)?.id.as_str();
                let b = self.graph.node_weight(b)?.id.as_str();
                Some(if a <= b { (a, b) } else { (b, a) })
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Removes every non-root node whose degree is exactly one.
    ///
    /// Degrees are measured once before anything is removed, so a neighbour
    /// left with degree one afterwards stays. Returns the removed ids in
    /// insertion order.
    pub fn prune_leaves(&mut self) -> Vec<String> {
        let leaves: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|ix| {
                self.graph
                    .node_weight(*ix)
                    .is_some_and(|node| node.id != self.root)
            })
            .filter(|ix| self.graph.neighbors(*ix).count() == 1)
            .collect();

        let mut removed = Vec::with_capacity(leaves.len());
        for ix in leaves {
            if let Some(node) = self.graph.remove_node(ix) {
                self.index.remove(&node.id);
                removed.push(node.id);
            }
        }

        debug!("Pruned {} leaf nodes", removed.len());
        removed
    }
}

/// Builds the friend graph for a finished crawl.
pub fn assemble(outcome: &CrawlOutcome) -> SocialGraph {
    assemble_parts(&outcome.root, &outcome.connections, &outcome.results)
}

/// Root node, one node and root edge per direct friend, then an edge for
/// every second-level entry that is already a node.
pub fn assemble_parts(
    root: &RootProfile,
    connections: &[ConnectionEntry],
    results: &CrawlResult,
) -> SocialGraph {
    let mut graph = SocialGraph::new(root.id(), &root.display_name);

    for entry in connections {
        graph.add_node(&entry.id, &entry.name);
        graph.add_edge(root.id(), &entry.id);
    }

    for (friend_id, friends_of_friend) in results.iter() {
        if friend_id == root.id() || !graph.contains(friend_id) {
            continue;
        }
        for entry in friends_of_friend {
            if graph.contains(&entry.id) {
                graph.add_edge(friend_id, &entry.id);
            }
        }
    }

    debug!(
        "Assembled graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}
