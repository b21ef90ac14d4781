use graphwalk::handlers::*;
use graphwalk_core::{Algorithm, GraphType};
use graphwalk_engine::{Engine, create_event_channel};
use std::fs;
use std::time::Duration;

#[test]
fn test_parse_edge_spec_plain() {
    assert_eq!(parse_edge_spec("0-1").unwrap(), (0, 1, 1.0));
}

#[test]
fn test_parse_edge_spec_with_weight() {
    assert_eq!(parse_edge_spec("2-5:3.5").unwrap(), (2, 5, 3.5));
}

#[test]
fn test_parse_edge_spec_trims_whitespace() {
    assert_eq!(parse_edge_spec(" 1 - 2 : 4 ").unwrap(), (1, 2, 4.0));
}

#[test]
fn test_parse_edge_spec_rejects_malformed() {
    assert!(parse_edge_spec("01").is_err());
    assert!(parse_edge_spec("a-b").is_err());
    assert!(parse_edge_spec("1-2:heavy").is_err());
}

#[test]
fn test_parse_edge_spec_rejects_negative_weight() {
    assert!(parse_edge_spec("0-1:-2").is_err());
}

#[test]
fn test_parse_edge_spec_rejects_self_loop() {
    assert!(parse_edge_spec("3-3").is_err());
}

#[test]
fn test_build_trace_session_creates_endpoint_nodes() {
    let session = build_trace_session(
        &[(0, 1, 1.0), (1, 4, 2.0)],
        0,
        GraphType::Undirected,
        Algorithm::Bfs,
        0,
    )
    .unwrap();
    let session = session.lock().unwrap();
    assert_eq!(session.graph.node_count(), 5);
    assert_eq!(session.graph.edge_count(), 2);
    assert_eq!(session.algorithm, Some(Algorithm::Bfs));
    assert_eq!(session.start_node, Some(0));
}

#[test]
fn test_build_trace_session_pads_isolated_nodes() {
    let session =
        build_trace_session(&[], 4, GraphType::Undirected, Algorithm::Dfs, 0).unwrap();
    let session = session.lock().unwrap();
    assert_eq!(session.graph.node_count(), 4);
    assert_eq!(session.graph.edge_count(), 0);
}

#[test]
fn test_build_trace_session_rejects_bad_edges() {
    let result = build_trace_session(
        &[(2, 2, 1.0)],
        0,
        GraphType::Undirected,
        Algorithm::Dfs,
        0,
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_trace_report_round_trips_through_file() {
    let session = build_trace_session(
        &[(0, 1, 1.0)],
        0,
        GraphType::Undirected,
        Algorithm::Bfs,
        0,
    )
    .unwrap();
    let graph = session.lock().unwrap().graph.clone();

    let (tx, mut rx) = create_event_channel();
    let engine = Engine::new(session, tx).with_step_delay(Duration::ZERO);
    let report = engine.run().await.unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }

    let trace = TraceReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        algorithm: Algorithm::Bfs,
        graph_type: GraphType::Undirected,
        start: 0,
        step_delay_ms: 0,
        graph,
        events,
        report,
    };
    let json = serde_json::to_string_pretty(&trace).unwrap();
    assert!(json.contains("RunStarted"));
    assert!(json.contains("generated_at"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.json");
    fs::write(&path, &json).unwrap();

    let back: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back["report"]["visited"], 2);
    assert_eq!(back["algorithm"], "Bfs");
}
