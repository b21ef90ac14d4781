use graphwalk_core::{Algorithm, NodeId, VisitState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// One published state transition. Every mark the engine makes sends
/// exactly one of these before the next pause, so subscribers see each
/// logical step on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepEvent {
    /// A run was dispatched; all visitation state has just been reset
    RunStarted { algorithm: Algorithm, start: NodeId },
    /// A node changed visitation state
    Node { id: NodeId, state: VisitState },
    /// The edges between a pair of nodes changed visitation state
    Edge {
        source: NodeId,
        target: NodeId,
        state: VisitState,
    },
    /// The run finished on its own
    RunFinished { visited: usize },
    /// The run was cancelled before finishing
    RunAborted { visited: usize },
}

/// Summary of one run, returned when the traversal ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub start: NodeId,
    pub visited: usize,
    pub aborted: bool,
    /// Shortest known cost per reached node. Dijkstra only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distances: Option<HashMap<NodeId, f64>>,
    /// Predecessor on the best known path. Dijkstra only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parents: Option<HashMap<NodeId, NodeId>>,
}

/// Create the channel the engine publishes step events on.
pub fn create_event_channel() -> (
    mpsc::UnboundedSender<StepEvent>,
    mpsc::UnboundedReceiver<StepEvent>,
) {
    mpsc::unbounded_channel()
}
