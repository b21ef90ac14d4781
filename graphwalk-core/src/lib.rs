pub mod graph;
pub mod model;
pub mod session;

pub use graph::{DEFAULT_EDGE_WEIGHT, Graph};
pub use model::{Algorithm, Edge, EdgeId, GraphType, Node, NodeId, VisitState};
pub use session::{ClickOutcome, Session, SharedSession};

/// Startup banner for the CLI front end.
pub fn print_banner() {
    println!(
        r#"
    ╔════════════════════════════════════════════╗
    ║                 GRAPHWALK                  ║
    ║      interactive graph traversal lab       ║
    ║            DFS | BFS | Dijkstra            ║
    ╚════════════════════════════════════════════╝
"#
    );
}
