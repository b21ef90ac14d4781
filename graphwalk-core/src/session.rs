// Session state: one graph plus the selections and run flag that drive it

use crate::graph::Graph;
use crate::model::{Algorithm, GraphType, NodeId};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Shared handle used by the UI and the traversal engine. The lock is only
/// ever held for instantaneous reads and marks, never across a suspension.
pub type SharedSession = Arc<Mutex<Session>>;

/// What a node click did, so the caller can narrate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    StartChosen(NodeId),
    Selected(NodeId),
    Connected { source: NodeId, target: NodeId },
    Deselected,
}

/// The whole mutable state of one visualizer session.
///
/// Every user intent goes through the methods below, which encode the
/// click state machine and refuse structural changes while a traversal
/// run owns the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub graph: Graph,
    pub graph_type: GraphType,
    pub algorithm: Option<Algorithm>,
    pub start_node: Option<NodeId>,
    pub selected_node: Option<NodeId>,
    pub running: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            graph_type: GraphType::Undirected,
            algorithm: None,
            start_node: None,
            selected_node: None,
            running: false,
        }
    }

    /// Wrap the session for sharing between the UI and the engine.
    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Canvas click: clears any selection, otherwise drops a new node at
    /// the click point and returns its id.
    pub fn click_canvas(&mut self, x: f64, y: f64) -> Option<NodeId> {
        if self.running {
            return None;
        }
        if self.selected_node.is_some() {
            self.selected_node = None;
            return None;
        }
        Some(self.graph.add_node(x, y))
    }

    /// Node click state machine. Once an algorithm is chosen and no start
    /// is set, a click picks the start; otherwise clicks select, connect
    /// the selected node to the clicked one, or deselect on a self-click.
    pub fn click_node(&mut self, id: NodeId) -> ClickOutcome {
        if self.running || !self.graph.contains_node(id) {
            return ClickOutcome::Ignored;
        }
        if self.algorithm.is_some() && self.start_node.is_none() {
            self.start_node = Some(id);
            return ClickOutcome::StartChosen(id);
        }
        match self.selected_node {
            None => {
                self.selected_node = Some(id);
                ClickOutcome::Selected(id)
            }
            Some(selected) if selected != id => {
                self.graph.add_edge(selected, id);
                self.selected_node = None;
                ClickOutcome::Connected {
                    source: selected,
                    target: id,
                }
            }
            Some(_) => {
                self.selected_node = None;
                ClickOutcome::Deselected
            }
        }
    }

    /// Delete a node, then remap the selection references through the
    /// renumbering that follows.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        if self.running || !self.graph.delete_node(id) {
            return false;
        }
        self.selected_node = remap_after_delete(self.selected_node, id);
        self.start_node = remap_after_delete(self.start_node, id);
        true
    }

    /// Choosing an algorithm always restarts start-node selection, even
    /// when re-choosing the current one. The selectors stay live during a
    /// run; the engine snapshots its parameters at dispatch, so a change
    /// here only shapes the next run.
    pub fn set_algorithm(&mut self, algorithm: Option<Algorithm>) {
        self.algorithm = algorithm;
        self.start_node = None;
    }

    pub fn set_graph_type(&mut self, graph_type: GraphType) {
        self.graph_type = graph_type;
    }

    pub fn clear_start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.start_node = None;
        true
    }

    /// Drop the whole graph and every selection.
    pub fn clear(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.graph.clear();
        self.start_node = None;
        self.selected_node = None;
        true
    }

    /// True when a run could be dispatched right now.
    pub fn can_run(&self) -> bool {
        !self.running && self.algorithm.is_some() && self.start_node.is_some()
    }

    /// One line of guidance for the current interaction state.
    pub fn status_message(&self) -> &'static str {
        if self.running {
            return "Traversal running...";
        }
        match (self.algorithm, self.start_node) {
            (Some(_), None) => "Click a node to choose the start",
            (Some(_), Some(_)) => "Ready to run",
            (None, _) => {
                if self.graph.is_empty() {
                    "Click the canvas to add nodes"
                } else {
                    "Click two nodes to connect them, or choose an algorithm"
                }
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn remap_after_delete(reference: Option<NodeId>, deleted: NodeId) -> Option<NodeId> {
    match reference {
        Some(r) if r == deleted => None,
        Some(r) if r > deleted => Some(r - 1),
        other => other,
    }
}
