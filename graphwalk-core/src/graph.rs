// Mutable graph state with contiguous ids and insertion-ordered edges

use crate::model::{Edge, EdgeId, GraphType, Node, NodeId, VisitState};
use serde::{Deserialize, Serialize};

/// Weight given to edges created without an explicit one.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// The graph under visualization.
///
/// Both id spaces stay contiguous from 0: a node's id is its index in the
/// node list and deletion renumbers the survivors. Edges keep their
/// insertion order, which fixes the neighbor iteration order the
/// traversals observe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Place a new node at the given position. Ids are contiguous, so the
    /// new id is the current node count and the label mirrors it.
    pub fn add_node(&mut self, x: f64, y: f64) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            x,
            y,
            label: id.to_string(),
            state: VisitState::Unvisited,
        });
        id
    }

    /// Connect two nodes with the default weight.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        self.add_weighted_edge(source, target, DEFAULT_EDGE_WEIGHT)
    }

    /// Connect two nodes. Self-loops and unknown endpoints are rejected;
    /// parallel edges are not.
    pub fn add_weighted_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        weight: f64,
    ) -> Option<EdgeId> {
        if source == target || !self.contains_node(source) || !self.contains_node(target) {
            return None;
        }
        let id = self.edges.len();
        self.edges.push(Edge {
            id,
            source,
            target,
            weight,
            state: VisitState::Unvisited,
        });
        Some(id)
    }

    /// Remove a node and every incident edge, then renumber so both id
    /// spaces are contiguous again. Surviving edge endpoints are remapped
    /// through the same renumbering. Returns false for an unknown id.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        if !self.contains_node(id) {
            return false;
        }
        self.nodes.remove(id);
        self.edges.retain(|e| e.source != id && e.target != id);

        // Every id past the hole shifts down by one
        for (index, node) in self.nodes.iter_mut().enumerate() {
            node.id = index;
            node.label = index.to_string();
        }
        for (index, edge) in self.edges.iter_mut().enumerate() {
            edge.id = index;
            if edge.source > id {
                edge.source -= 1;
            }
            if edge.target > id {
                edge.target -= 1;
            }
        }
        true
    }

    /// Adjacent node ids in edge insertion order, one entry per edge, so
    /// parallel edges yield repeats. Directed graphs follow outgoing edges
    /// only; otherwise both endpoints see each other.
    pub fn neighbors(&self, id: NodeId, graph_type: GraphType) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter_map(|edge| {
                if edge.source == id {
                    Some(edge.target)
                } else if graph_type != GraphType::Directed && edge.target == id {
                    Some(edge.source)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Weight of the first edge connecting the pair, in insertion order.
    /// Directed graphs require the matching orientation. Infinity when the
    /// pair is not connected.
    pub fn edge_weight(&self, from: NodeId, to: NodeId, graph_type: GraphType) -> f64 {
        self.edges
            .iter()
            .find(|edge| {
                (edge.source == from && edge.target == to)
                    || (graph_type != GraphType::Directed
                        && edge.source == to
                        && edge.target == from)
            })
            .map(|edge| edge.weight)
            .unwrap_or(f64::INFINITY)
    }

    /// Return every node and edge to `Unvisited`. Idempotent.
    pub fn reset_visitation(&mut self) {
        for node in &mut self.nodes {
            node.state = VisitState::Unvisited;
        }
        for edge in &mut self.edges {
            edge.state = VisitState::Unvisited;
        }
    }

    pub fn set_node_state(&mut self, id: NodeId, state: VisitState) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.state = state;
        }
    }

    /// Mark every edge connecting the pair, in either orientation. The
    /// traversals call this once per touched adjacency, so parallel edges
    /// light up together.
    pub fn set_edge_states_between(&mut self, a: NodeId, b: NodeId, state: VisitState) {
        for edge in &mut self.edges {
            if (edge.source == a && edge.target == b)
                || (edge.source == b && edge.target == a)
            {
                edge.state = state;
            }
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        id < self.nodes.len()
    }

    /// Hit test: the topmost node whose center lies within `radius` of the
    /// point. Later nodes draw over earlier ones, so scan from the end.
    pub fn node_at(&self, x: f64, y: f64, radius: f64) -> Option<NodeId> {
        self.nodes
            .iter()
            .rev()
            .find(|node| {
                let dx = node.x - x;
                let dy = node.y - y;
                dx * dx + dy * dy <= radius * radius
            })
            .map(|node| node.id)
    }

    /// Drop every node and edge.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }
}
