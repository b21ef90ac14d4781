// Tests for the mutable graph model

use graphwalk_core::{DEFAULT_EDGE_WEIGHT, Graph, GraphType, VisitState};

// ============================================================================
// Node Management Tests
// ============================================================================

#[test]
fn test_add_node_assigns_contiguous_ids() {
    let mut graph = Graph::new();
    assert_eq!(graph.add_node(10.0, 10.0), 0);
    assert_eq!(graph.add_node(20.0, 20.0), 1);
    assert_eq!(graph.add_node(30.0, 30.0), 2);
    assert_eq!(graph.node_count(), 3);
}

#[test]
fn test_add_node_label_mirrors_id() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 1.0);
    for node in graph.nodes() {
        assert_eq!(node.label, node.id.to_string());
        assert_eq!(node.state, VisitState::Unvisited);
    }
}

#[test]
fn test_add_node_keeps_position() {
    let mut graph = Graph::new();
    let id = graph.add_node(42.5, 17.25);
    let node = graph.node(id).unwrap();
    assert_eq!(node.x, 42.5);
    assert_eq!(node.y, 17.25);
}

// ============================================================================
// Edge Management Tests
// ============================================================================

#[test]
fn test_add_edge_uses_default_weight() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);
    let id = graph.add_edge(0, 1).unwrap();
    assert_eq!(graph.edges()[id].weight, DEFAULT_EDGE_WEIGHT);
    assert_eq!(graph.edges()[id].state, VisitState::Unvisited);
}

#[test]
fn test_add_edge_rejects_self_loop() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    assert_eq!(graph.add_edge(0, 0), None);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_add_edge_rejects_unknown_endpoint() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    assert_eq!(graph.add_edge(0, 7), None);
    assert_eq!(graph.add_edge(7, 0), None);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_add_edge_allows_parallel_edges() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);
    assert_eq!(graph.add_edge(0, 1), Some(0));
    assert_eq!(graph.add_edge(0, 1), Some(1));
    assert_eq!(graph.add_edge(1, 0), Some(2));
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn test_add_weighted_edge_keeps_weight() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);
    let id = graph.add_weighted_edge(0, 1, 2.5).unwrap();
    assert_eq!(graph.edges()[id].weight, 2.5);
}

// ============================================================================
// Deletion Tests
// ============================================================================

#[test]
fn test_delete_node_renumbers_ids() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);
    graph.add_node(2.0, 0.0);

    assert!(graph.delete_node(1));

    assert_eq!(graph.node_count(), 2);
    let ids: Vec<_> = graph.nodes().iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![0, 1]);
    let labels: Vec<_> = graph.nodes().iter().map(|n| n.label.clone()).collect();
    assert_eq!(labels, vec!["0", "1"]);
    // The old node 2 is the new node 1; positions follow the node
    assert_eq!(graph.node(1).unwrap().x, 2.0);
}

#[test]
fn test_delete_node_cascades_incident_edges() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);
    graph.add_node(2.0, 0.0);
    graph.add_edge(0, 1);
    graph.add_edge(1, 2);
    graph.add_edge(0, 2);

    assert!(graph.delete_node(1));

    // Only the 0-2 edge survives, with both endpoints remapped
    assert_eq!(graph.edge_count(), 1);
    let edge = &graph.edges()[0];
    assert_eq!((edge.source, edge.target), (0, 1));
}

#[test]
fn test_delete_node_renumbers_edge_ids() {
    let mut graph = Graph::new();
    for i in 0..4 {
        graph.add_node(i as f64, 0.0);
    }
    graph.add_edge(0, 1);
    graph.add_edge(1, 2);
    graph.add_edge(2, 3);
    graph.add_edge(0, 3);

    assert!(graph.delete_node(1));

    assert_eq!(graph.edge_count(), 2);
    let ids: Vec<_> = graph.edges().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![0, 1]);
    // 2-3 became 1-2 and 0-3 became 0-2
    assert_eq!(graph.edges()[0].source, 1);
    assert_eq!(graph.edges()[0].target, 2);
    assert_eq!(graph.edges()[1].source, 0);
    assert_eq!(graph.edges()[1].target, 2);
}

#[test]
fn test_delete_unknown_node_is_rejected() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    assert!(!graph.delete_node(5));
    assert_eq!(graph.node_count(), 1);
}

#[test]
fn test_delete_last_node_leaves_empty_graph() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    assert!(graph.delete_node(0));
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}

// ============================================================================
// Adjacency Tests
// ============================================================================

#[test]
fn test_neighbors_insertion_order() {
    let mut graph = Graph::new();
    for i in 0..4 {
        graph.add_node(i as f64, 0.0);
    }
    graph.add_edge(0, 3);
    graph.add_edge(0, 1);
    graph.add_edge(2, 0);

    let neighbors = graph.neighbors(0, GraphType::Undirected);
    assert_eq!(neighbors, vec![3, 1, 2]);
}

#[test]
fn test_neighbors_parallel_edges_repeat() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);
    graph.add_edge(0, 1);
    graph.add_edge(0, 1);

    assert_eq!(graph.neighbors(0, GraphType::Undirected), vec![1, 1]);
}

#[test]
fn test_neighbors_directed_outgoing_only() {
    let mut graph = Graph::new();
    for i in 0..3 {
        graph.add_node(i as f64, 0.0);
    }
    graph.add_edge(0, 1);
    graph.add_edge(2, 0);

    assert_eq!(graph.neighbors(0, GraphType::Directed), vec![1]);
    assert_eq!(graph.neighbors(1, GraphType::Directed), Vec::<usize>::new());
}

#[test]
fn test_neighbors_undirected_sees_both_endpoints() {
    let mut graph = Graph::new();
    for i in 0..3 {
        graph.add_node(i as f64, 0.0);
    }
    graph.add_edge(0, 1);
    graph.add_edge(2, 0);

    assert_eq!(graph.neighbors(0, GraphType::Undirected), vec![1, 2]);
    // Weighted graphs stay undirected for adjacency
    assert_eq!(graph.neighbors(0, GraphType::Weighted), vec![1, 2]);
}

#[test]
fn test_edge_weight_first_match_wins() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);
    graph.add_weighted_edge(0, 1, 3.0);
    graph.add_weighted_edge(0, 1, 9.0);

    assert_eq!(graph.edge_weight(0, 1, GraphType::Weighted), 3.0);
}

#[test]
fn test_edge_weight_missing_is_infinite() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);

    assert_eq!(graph.edge_weight(0, 1, GraphType::Weighted), f64::INFINITY);
}

#[test]
fn test_edge_weight_respects_direction() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);
    graph.add_weighted_edge(0, 1, 4.0);

    assert_eq!(graph.edge_weight(1, 0, GraphType::Undirected), 4.0);
    assert_eq!(graph.edge_weight(1, 0, GraphType::Directed), f64::INFINITY);
    assert_eq!(graph.edge_weight(0, 1, GraphType::Directed), 4.0);
}

// ============================================================================
// Visitation State Tests
// ============================================================================

#[test]
fn test_reset_visitation_clears_all_states() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);
    graph.add_edge(0, 1);
    graph.set_node_state(0, VisitState::Visited);
    graph.set_node_state(1, VisitState::Visiting);
    graph.set_edge_states_between(0, 1, VisitState::Visiting);

    graph.reset_visitation();

    assert!(graph.nodes().iter().all(|n| n.state == VisitState::Unvisited));
    assert!(graph.edges().iter().all(|e| e.state == VisitState::Unvisited));
}

#[test]
fn test_reset_visitation_is_idempotent() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.reset_visitation();
    graph.reset_visitation();
    assert_eq!(graph.nodes()[0].state, VisitState::Unvisited);
}

#[test]
fn test_set_edge_states_between_marks_both_orientations() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);
    graph.add_node(2.0, 0.0);
    graph.add_edge(0, 1);
    graph.add_edge(1, 0);
    graph.add_edge(1, 2);

    graph.set_edge_states_between(0, 1, VisitState::Visiting);

    assert_eq!(graph.edges()[0].state, VisitState::Visiting);
    assert_eq!(graph.edges()[1].state, VisitState::Visiting);
    assert_eq!(graph.edges()[2].state, VisitState::Unvisited);
}

#[test]
fn test_set_node_state_ignores_unknown_id() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.set_node_state(9, VisitState::Visited);
    assert_eq!(graph.nodes()[0].state, VisitState::Unvisited);
}

// ============================================================================
// Hit Test and Clear Tests
// ============================================================================

#[test]
fn test_node_at_finds_node_within_radius() {
    let mut graph = Graph::new();
    graph.add_node(50.0, 50.0);
    assert_eq!(graph.node_at(51.0, 51.0, 3.0), Some(0));
    assert_eq!(graph.node_at(60.0, 60.0, 3.0), None);
}

#[test]
fn test_node_at_prefers_topmost_node() {
    let mut graph = Graph::new();
    graph.add_node(50.0, 50.0);
    graph.add_node(51.0, 50.0);
    // Both are in range; the later node draws on top
    assert_eq!(graph.node_at(50.5, 50.0, 3.0), Some(1));
}

#[test]
fn test_clear_empties_graph() {
    let mut graph = Graph::new();
    graph.add_node(0.0, 0.0);
    graph.add_node(1.0, 0.0);
    graph.add_edge(0, 1);
    graph.clear();
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}
