use chrono::Utc;
use clap::ArgMatches;
use colored::Colorize;
use graphwalk_core::{
    Algorithm, DEFAULT_EDGE_WEIGHT, Graph, GraphType, NodeId, Session, SharedSession, VisitState,
};
use graphwalk_engine::{Engine, RunReport, StepEvent, create_event_channel};
use serde::Serialize;
use std::f64::consts::TAU;
use std::fs;
use std::time::Duration;
use tracing::debug;

/// Everything one trace run produced, written as a single JSON document.
/// The graph is the input snapshot, taken before any step ran.
#[derive(Debug, Serialize)]
pub struct TraceReport {
    pub generated_at: String,
    pub algorithm: Algorithm,
    pub graph_type: GraphType,
    pub start: NodeId,
    pub step_delay_ms: u64,
    pub graph: Graph,
    pub events: Vec<StepEvent>,
    pub report: RunReport,
}

/// Parse an edge given as SOURCE-TARGET or SOURCE-TARGET:WEIGHT
pub fn parse_edge_spec(spec: &str) -> Result<(NodeId, NodeId, f64), String> {
    let (pair, weight) = match spec.split_once(':') {
        Some((pair, raw)) => {
            let weight: f64 = raw
                .trim()
                .parse()
                .map_err(|_| format!("Invalid weight '{}' in edge spec '{}'", raw.trim(), spec))?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!(
                    "Weight must be a non-negative number in edge spec '{}'",
                    spec
                ));
            }
            (pair, weight)
        }
        None => (spec, DEFAULT_EDGE_WEIGHT),
    };

    let Some((source, target)) = pair.split_once('-') else {
        return Err(format!(
            "Edge spec '{}' must look like SOURCE-TARGET or SOURCE-TARGET:WEIGHT",
            spec
        ));
    };
    let source: NodeId = source.trim().parse().map_err(|_| {
        format!(
            "Invalid node id '{}' in edge spec '{}'",
            source.trim(),
            spec
        )
    })?;
    let target: NodeId = target.trim().parse().map_err(|_| {
        format!(
            "Invalid node id '{}' in edge spec '{}'",
            target.trim(),
            spec
        )
    })?;
    if source == target {
        return Err(format!("Self loop '{}' is not allowed", spec));
    }
    Ok((source, target, weight))
}

/// Build a session holding the described graph. Nodes are created for
/// every referenced id and laid out on a circle so the trace could be
/// opened in the UI as-is.
pub fn build_trace_session(
    edges: &[(NodeId, NodeId, f64)],
    min_nodes: usize,
    graph_type: GraphType,
    algorithm: Algorithm,
    start: NodeId,
) -> Result<SharedSession, String> {
    let highest = edges
        .iter()
        .flat_map(|&(source, target, _)| [source, target])
        .chain([start])
        .max()
        .unwrap_or(0);
    let node_count = min_nodes.max(highest + 1);

    let mut session = Session::new();
    session.graph_type = graph_type;
    for i in 0..node_count {
        let angle = TAU * i as f64 / node_count as f64;
        let x = 50.0 + 35.0 * angle.sin();
        let y = 50.0 + 35.0 * angle.cos();
        session.graph.add_node(x, y);
    }
    for &(source, target, weight) in edges {
        if session
            .graph
            .add_weighted_edge(source, target, weight)
            .is_none()
        {
            return Err(format!("Edge {}-{} was rejected", source, target));
        }
    }
    session.algorithm = Some(algorithm);
    session.start_node = Some(start);
    Ok(session.shared())
}

pub async fn handle_trace(sub_matches: &ArgMatches, quiet: bool) {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let edge_specs: Vec<String> = sub_matches
        .get_many::<String>("edge")
        .map(|specs| specs.cloned().collect())
        .unwrap_or_default();
    let min_nodes = *sub_matches.get_one::<usize>("nodes").unwrap();
    let algo = sub_matches.get_one::<String>("algo").unwrap();
    let start = *sub_matches.get_one::<usize>("start").unwrap();
    let graph_type_name = sub_matches.get_one::<String>("graph-type").unwrap();
    let delay_ms = *sub_matches.get_one::<u64>("delay-ms").unwrap();
    let format = sub_matches.get_one::<String>("format").unwrap();
    let output = sub_matches.get_one::<std::path::PathBuf>("output");

    let Some(algorithm) = Algorithm::from_str(algo) else {
        unreachable!("clap should ensure we don't get here")
    };
    let Some(graph_type) = GraphType::from_str(graph_type_name) else {
        unreachable!("clap should ensure we don't get here")
    };

    let mut edges = Vec::new();
    for spec in &edge_specs {
        match parse_edge_spec(spec) {
            Ok(edge) => edges.push(edge),
            Err(e) => {
                eprintln!("✗ {}", e);
                std::process::exit(1);
            }
        }
    }

    let session = match build_trace_session(&edges, min_nodes, graph_type, algorithm, start) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    // Snapshot the input graph before the run paints it
    let (node_count, edge_count, graph_snapshot) = {
        let session = session.lock().unwrap();
        (
            session.graph.node_count(),
            session.graph.edge_count(),
            session.graph.clone(),
        )
    };
    debug!("Built graph with {} nodes and {} edges", node_count, edge_count);

    if !quiet {
        println!("\nTracing {} from node {}", algorithm.as_str(), start);
        println!(
            "Graph: {} ({} nodes, {} edges)",
            graph_type.as_str(),
            node_count,
            edge_count
        );
        println!("Step delay: {}ms\n", delay_ms);
    }

    let (events_tx, mut events_rx) = create_event_channel();
    let engine =
        Engine::new(session, events_tx).with_step_delay(Duration::from_millis(delay_ms));
    let runner = tokio::spawn(async move { engine.run().await });

    // The channel closes when the run is over, so this drains everything
    let text = format == "text";
    let mut events = Vec::new();
    while let Some(event) = events_rx.recv().await {
        if text && !quiet {
            print_step(&event);
        }
        events.push(event);
    }

    let report = match runner.await {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            eprintln!("✗ Trace failed: {}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("✗ Trace task failed: {}", e);
            std::process::exit(1);
        }
    };

    if text {
        if let Some(distances) = &report.distances {
            let mut rows: Vec<(NodeId, f64)> = distances.iter().map(|(&id, &d)| (id, d)).collect();
            rows.sort_by_key(|&(id, _)| id);
            println!("\nShortest distances from node {}:", report.start);
            for (id, distance) in rows {
                println!("  node {}: {}", id, distance);
            }
        }
        let outcome = if report.aborted {
            "✗".red().bold()
        } else {
            "✓".green().bold()
        };
        println!(
            "\n{} Visited {} of {} nodes",
            outcome, report.visited, node_count
        );
    }

    // JSON is built either for stdout or for the output file
    if format == "json" || output.is_some() {
        let trace = TraceReport {
            generated_at: Utc::now().to_rfc3339(),
            algorithm,
            graph_type,
            start,
            step_delay_ms: delay_ms,
            graph: graph_snapshot,
            events,
            report,
        };
        let json = match serde_json::to_string_pretty(&trace) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("✗ Failed to serialize trace: {}", e);
                std::process::exit(1);
            }
        };
        if format == "json" {
            println!("{}", json);
        }
        if let Some(path) = output {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("✗ Failed to write {}: {}", path.display(), e);
                std::process::exit(1);
            }
            if !quiet {
                println!("{} Trace written to {}", "✓".green().bold(), path.display());
            }
        }
    }
}

fn print_step(event: &StepEvent) {
    match event {
        StepEvent::RunStarted { algorithm, start } => {
            println!(
                "{} {} started from node {}",
                "▶".bright_blue().bold(),
                algorithm.as_str(),
                start
            );
        }
        StepEvent::Node { id, state } => {
            println!("  node {} {}", id, paint_state(*state));
        }
        StepEvent::Edge {
            source,
            target,
            state,
        } => {
            println!("  edge {}-{} {}", source, target, paint_state(*state));
        }
        StepEvent::RunFinished { visited } => {
            println!("{} finished, visited {} nodes", "✓".green().bold(), visited);
        }
        StepEvent::RunAborted { visited } => {
            println!("{} aborted after {} nodes", "✗".red().bold(), visited);
        }
    }
}

fn paint_state(state: VisitState) -> colored::ColoredString {
    match state {
        VisitState::Unvisited => state.as_str().dimmed(),
        VisitState::Visiting => state.as_str().yellow(),
        VisitState::Visited => state.as_str().green(),
    }
}
