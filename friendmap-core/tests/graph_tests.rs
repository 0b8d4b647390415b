// Tests for friend graph assembly and pruning

use friendmap_core::graph::{SocialGraph, assemble};
use friendmap_core::crawl::build_graph;
use friendmap_scanner::{ConnectionEntry, CrawlOutcome, ProfileRef, RootProfile};
use url::Url;

fn root() -> RootProfile {
    let base = Url::parse("https://steamcommunity.com").unwrap();
    RootProfile {
        profile: ProfileRef::from_id(&base, "root").unwrap(),
        display_name: "Root".to_string(),
    }
}

fn entries(pairs: &[(&str, &str)]) -> Vec<ConnectionEntry> {
    pairs
        .iter()
        .map(|(id, name)| ConnectionEntry::new(*id, *name))
        .collect()
}

fn outcome(
    connections: &[(&str, &str)],
    lists: Vec<(&str, Vec<ConnectionEntry>)>,
) -> CrawlOutcome {
    CrawlOutcome {
        root: root(),
        connections: entries(connections),
        results: lists
            .into_iter()
            .map(|(id, list)| (id.to_string(), list))
            .collect(),
        private: Vec::new(),
        failed: Vec::new(),
    }
}

fn node_ids(graph: &SocialGraph) -> Vec<String> {
    let mut ids: Vec<String> = graph.nodes().iter().map(|n| n.id.clone()).collect();
    ids.sort();
    ids
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_mutual_friend_and_private_friend() {
    // A lists {root, B}; B is private.
    let outcome = outcome(
        &[("A", "Alice"), ("B", "Bob")],
        vec![("A", entries(&[("root", "Root"), ("B", "Bob")]))],
    );

    let graph = assemble(&outcome);

    assert_eq!(node_ids(&graph), vec!["A", "B", "root"]);
    assert_eq!(graph.edges(), vec![("A", "B"), ("A", "root"), ("B", "root")]);
}

#[test]
fn test_second_level_stranger_is_not_added() {
    let outcome = outcome(&[("A", "Alice")], vec![("A", entries(&[("C", "Carol")]))]);

    let graph = assemble(&outcome);

    assert_eq!(node_ids(&graph), vec!["A", "root"]);
    assert!(!graph.contains("C"));
    assert_eq!(graph.edges(), vec![("A", "root")]);
}

#[test]
fn test_every_friend_fetch_failed() {
    let outcome = outcome(&[("A", "Alice"), ("B", "Bob")], vec![]);

    let graph = assemble(&outcome);

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_no_friends_at_all() {
    let graph = assemble(&outcome(&[], vec![]));
    assert_eq!(node_ids(&graph), vec!["root"]);
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.label("root"), Some("Root"));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_duplicate_friend_entries_make_one_node() {
    let outcome = outcome(
        &[("A", "Alice"), ("B", "Bob"), ("A", "Alice again")],
        vec![],
    );

    let graph = assemble(&outcome);

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.label("A"), Some("Alice again"));
    assert_eq!(graph.degree("root"), 2);
}

#[test]
fn test_edges_are_symmetric() {
    let outcome = outcome(
        &[("A", "Alice"), ("B", "Bob")],
        vec![("A", entries(&[("B", "Bob")]))],
    );

    let graph = assemble(&outcome);

    assert!(graph.neighbors("A").contains(&"B"));
    assert!(graph.neighbors("B").contains(&"A"));
    assert!(graph.neighbors("root").contains(&"A"));
    assert!(graph.neighbors("A").contains(&"root"));
}

#[test]
fn test_mutual_listing_in_both_directions_is_one_edge() {
    let outcome = outcome(
        &[("A", "Alice"), ("B", "Bob")],
        vec![
            ("A", entries(&[("B", "Bob"), ("B", "Bob")])),
            ("B", entries(&[("A", "Alice"), ("root", "Root")])),
        ],
    );

    let graph = assemble(&outcome);

    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn test_self_listing_makes_no_loop() {
    let outcome = outcome(&[("A", "Alice")], vec![("A", entries(&[("A", "Alice")]))]);
    let graph = assemble(&outcome);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.degree("A"), 1);
}

#[test]
fn test_assembly_is_idempotent() {
    let outcome = outcome(
        &[("A", "Alice"), ("B", "Bob")],
        vec![("A", entries(&[("B", "Bob")]))],
    );

    let first = assemble(&outcome);
    let second = assemble(&outcome);

    assert_eq!(first.edges(), second.edges());
    assert_eq!(node_ids(&first), node_ids(&second));
}

#[test]
fn test_result_for_unknown_friend_is_ignored() {
    let outcome = outcome(&[("A", "Alice")], vec![("Z", entries(&[("A", "Alice")]))]);
    let graph = assemble(&outcome);
    assert!(!graph.contains("Z"));
    assert_eq!(graph.edge_count(), 1);
}

// ============================================================================
// Pruning
// ============================================================================

#[test]
fn test_prune_removes_degree_one_friends_only() {
    // root - A, root - B, root - C, A - B : C is the only leaf.
    let outcome = outcome(
        &[("A", "a"), ("B", "b"), ("C", "c")],
        vec![("A", entries(&[("B", "b")]))],
    );

    let (graph, pruned) = build_graph(&outcome, true);

    assert_eq!(pruned, vec!["C".to_string()]);
    assert_eq!(node_ids(&graph), vec!["A", "B", "root"]);
}

#[test]
fn test_prune_never_removes_root() {
    let outcome = outcome(&[("A", "a")], vec![]);

    let (graph, pruned) = build_graph(&outcome, true);

    assert_eq!(pruned, vec!["A".to_string()]);
    assert_eq!(node_ids(&graph), vec!["root"]);
}

#[test]
fn test_no_prune_when_declined() {
    let outcome = outcome(&[("A", "a"), ("B", "b")], vec![]);
    let (graph, pruned) = build_graph(&outcome, false);
    assert!(pruned.is_empty());
    assert_eq!(graph.node_count(), 3);
}

#[test]
fn test_prune_uses_degrees_from_before_pruning() {
    let mut graph = SocialGraph::new("root", "Root");
    for id in ["A", "B", "C"] {
        graph.add_node(id, id);
    }
    graph.add_edge("root", "A");
    graph.add_edge("A", "B");
    graph.add_edge("B", "C");
    graph.add_edge("A", "C");
    graph.add_node("D", "D");
    graph.add_edge("C", "D");

    // Only D has degree 1; C drops to degree 2 and stays.
    let removed = graph.prune_leaves();

    assert_eq!(removed, vec!["D".to_string()]);
    assert_eq!(graph.degree("C"), 2);
}
