// Model primitives shared by every layer: ids, enums, nodes and edges

use serde::{Deserialize, Serialize};

/// Node identifiers double as indices into the node list.
pub type NodeId = usize;

/// Edge identifiers double as indices into the edge list.
pub type EdgeId = usize;

/// Visitation state of a node or edge during a traversal run.
///
/// Within one run the state of an entity only ever moves forward:
/// `Unvisited` to `Visiting` to `Visited`. A new run resets everything
/// back to `Unvisited` first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitState {
    #[default]
    Unvisited,
    Visiting,
    Visited,
}

impl VisitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisitState::Unvisited => "unvisited",
            VisitState::Visiting => "visiting",
            VisitState::Visited => "visited",
        }
    }
}

/// How the whole graph is interpreted and drawn. This is a global mode,
/// not a per-edge property: toggling it reinterprets existing edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphType {
    #[default]
    Undirected,
    Directed,
    Weighted,
}

impl GraphType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "undirected" => Some(GraphType::Undirected),
            "directed" => Some(GraphType::Directed),
            "weighted" => Some(GraphType::Weighted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GraphType::Undirected => "undirected",
            GraphType::Directed => "directed",
            GraphType::Weighted => "weighted",
        }
    }

    /// Next mode in the cycle, for one-key toggling.
    pub fn next(&self) -> Self {
        match self {
            GraphType::Undirected => GraphType::Directed,
            GraphType::Directed => GraphType::Weighted,
            GraphType::Weighted => GraphType::Undirected,
        }
    }
}

/// The traversal a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    Dfs,
    Bfs,
    Dijkstra,
}

impl Algorithm {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dfs" => Some(Algorithm::Dfs),
            "bfs" => Some(Algorithm::Bfs),
            "dijkstra" => Some(Algorithm::Dijkstra),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Dfs => "dfs",
            Algorithm::Bfs => "bfs",
            Algorithm::Dijkstra => "dijkstra",
        }
    }
}

/// A node placed on the canvas. The label always mirrors the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub state: VisitState,
}

/// A connection between two nodes. `source`/`target` only carry direction
/// when the graph type is directed; the weight only matters when weighted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
    pub state: VisitState,
}
