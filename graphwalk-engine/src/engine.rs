use crate::error::{EngineError, Result};
use crate::event::{RunReport, StepEvent};
use futures::future::{BoxFuture, FutureExt};
use graphwalk_core::{Algorithm, GraphType, NodeId, SharedSession, VisitState};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

/// Pause between published steps. Slow enough to watch, fast enough to
/// keep a demo moving.
pub const STEP_DELAY: Duration = Duration::from_millis(500);

/// Drives one traversal at a time over a shared session, publishing every
/// visitation change as a [`StepEvent`] with a fixed pause in between.
///
/// The engine takes the session lock only for short, synchronous blocks,
/// so the UI can keep reading state while a run is in flight.
pub struct Engine {
    session: SharedSession,
    events: UnboundedSender<StepEvent>,
    step_delay: Duration,
    cancelled: Arc<AtomicBool>,
}

impl Engine {
    pub fn new(session: SharedSession, events: UnboundedSender<StepEvent>) -> Self {
        Self {
            session,
            events,
            step_delay: STEP_DELAY,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Override the pause between steps.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Use a caller-owned cancel flag instead of a fresh one. Dispatch
    /// still clears it, so a flag left set by an earlier abort does not
    /// carry over.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = flag;
        self
    }

    /// Flag shared with whoever needs to stop the run. Once set, the
    /// traversal aborts at the next step boundary without painting
    /// anything further.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Run the session's selected algorithm from its start node.
    ///
    /// Rejects the dispatch if a run is already active, or if the session
    /// has no algorithm or start node. Visitation state left over from a
    /// previous run is cleared before the first step is published.
    pub async fn run(&self) -> Result<RunReport> {
        let (algorithm, start, graph_type) = {
            let mut session = self.session.lock().unwrap();
            if session.running {
                return Err(EngineError::AlreadyRunning);
            }
            let algorithm = session.algorithm.ok_or(EngineError::NoAlgorithm)?;
            let start = session.start_node.ok_or(EngineError::NoStartNode)?;
            if !session.graph.contains_node(start) {
                return Err(EngineError::UnknownStartNode(start));
            }
            session.graph.reset_visitation();
            session.running = true;
            (algorithm, start, session.graph_type)
        };

        self.cancelled.store(false, Ordering::SeqCst);
        info!("Starting {} run from node {}", algorithm.as_str(), start);
        self.emit(StepEvent::RunStarted { algorithm, start });

        let mut distances = None;
        let mut parents = None;
        let visited = match algorithm {
            Algorithm::Dfs => {
                let mut seen = HashSet::new();
                self.dfs(start, graph_type, &mut seen).await;
                seen.len()
            }
            Algorithm::Bfs => self.bfs(start, graph_type).await,
            Algorithm::Dijkstra => {
                let (dist, par, settled) = self.dijkstra(start, graph_type).await;
                distances = Some(dist.into_iter().filter(|(_, d)| d.is_finite()).collect());
                parents = Some(par);
                settled
            }
        };

        self.session.lock().unwrap().running = false;
        let aborted = self.cancelled.load(Ordering::SeqCst);
        if aborted {
            self.emit(StepEvent::RunAborted { visited });
            info!("Run aborted after visiting {} nodes", visited);
        } else {
            self.emit(StepEvent::RunFinished { visited });
            info!("Run finished, visited {} nodes", visited);
        }

        Ok(RunReport {
            algorithm,
            start,
            visited,
            aborted,
            distances,
            parents,
        })
    }

    /// Depth-first walk. Marks the node, pauses, then recurses into each
    /// unvisited neighbor. Tree edges flip back to visited as the
    /// recursion unwinds.
    fn dfs<'a>(
        &'a self,
        node: NodeId,
        graph_type: GraphType,
        seen: &'a mut HashSet<NodeId>,
    ) -> BoxFuture<'a, ()> {
        async move {
            seen.insert(node);
            self.mark_node(node, VisitState::Visiting);
            self.pause().await;
            if self.cancelled.load(Ordering::SeqCst) {
                return;
            }
            for next in self.neighbors_of(node, graph_type) {
                if seen.contains(&next) {
                    continue;
                }
                self.mark_edges(node, next, VisitState::Visiting);
                self.dfs(next, graph_type, seen).await;
                if self.cancelled.load(Ordering::SeqCst) {
                    return;
                }
                self.mark_edges(node, next, VisitState::Visited);
            }
            self.mark_node(node, VisitState::Visited);
        }
        .boxed()
    }

    /// Breadth-first walk. Only the dequeued node is in progress at any
    /// moment; discovery paints the connecting edge once and leaves it
    /// that way.
    async fn bfs(&self, start: NodeId, graph_type: GraphType) -> usize {
        let mut discovered = HashSet::new();
        let mut queue = VecDeque::new();
        discovered.insert(start);
        queue.push_back(start);
        let mut visited = 0;

        while let Some(current) = queue.pop_front() {
            visited += 1;
            self.mark_node(current, VisitState::Visiting);
            self.pause().await;
            if self.cancelled.load(Ordering::SeqCst) {
                break;
            }
            for next in self.neighbors_of(current, graph_type) {
                if discovered.insert(next) {
                    self.mark_edges(current, next, VisitState::Visiting);
                    queue.push_back(next);
                }
            }
            self.mark_node(current, VisitState::Visited);
        }

        visited
    }

    /// Cheapest-first settling. The unsettled node with the lowest known
    /// distance settles next, and each improvement paints the edge that
    /// caused it.
    async fn dijkstra(
        &self,
        start: NodeId,
        graph_type: GraphType,
    ) -> (HashMap<NodeId, f64>, HashMap<NodeId, NodeId>, usize) {
        let node_ids: Vec<NodeId> = {
            let session = self.session.lock().unwrap();
            session.graph.nodes().iter().map(|n| n.id).collect()
        };
        let mut distances: HashMap<NodeId, f64> =
            node_ids.iter().map(|&id| (id, f64::INFINITY)).collect();
        distances.insert(start, 0.0);
        let mut parents = HashMap::new();
        let mut unsettled: HashSet<NodeId> = node_ids.iter().copied().collect();
        let mut settled = 0;

        loop {
            // Strict < keeps the lowest id on distance ties, and leaves
            // current empty once only unreachable nodes remain.
            let mut current = None;
            let mut best = f64::INFINITY;
            for &id in &node_ids {
                if unsettled.contains(&id) && distances[&id] < best {
                    best = distances[&id];
                    current = Some(id);
                }
            }
            let Some(current) = current else { break };

            unsettled.remove(&current);
            settled += 1;
            self.mark_node(current, VisitState::Visiting);
            self.pause().await;
            if self.cancelled.load(Ordering::SeqCst) {
                break;
            }

            for next in self.neighbors_of(current, graph_type) {
                if !unsettled.contains(&next) {
                    continue;
                }
                let alt = distances[&current] + self.weight_between(current, next, graph_type);
                if alt < distances[&next] {
                    distances.insert(next, alt);
                    parents.insert(next, current);
                    self.mark_edges(current, next, VisitState::Visiting);
                }
            }
            self.mark_node(current, VisitState::Visited);
        }

        (distances, parents, settled)
    }

    fn neighbors_of(&self, id: NodeId, graph_type: GraphType) -> Vec<NodeId> {
        let session = self.session.lock().unwrap();
        session.graph.neighbors(id, graph_type)
    }

    fn weight_between(&self, from: NodeId, to: NodeId, graph_type: GraphType) -> f64 {
        let session = self.session.lock().unwrap();
        session.graph.edge_weight(from, to, graph_type)
    }

    fn mark_node(&self, id: NodeId, state: VisitState) {
        {
            let mut session = self.session.lock().unwrap();
            session.graph.set_node_state(id, state);
        }
        debug!("Node {} -> {}", id, state.as_str());
        self.emit(StepEvent::Node { id, state });
    }

    fn mark_edges(&self, source: NodeId, target: NodeId, state: VisitState) {
        {
            let mut session = self.session.lock().unwrap();
            session.graph.set_edge_states_between(source, target, state);
        }
        debug!("Edge {}-{} -> {}", source, target, state.as_str());
        self.emit(StepEvent::Edge {
            source,
            target,
            state,
        });
    }

    async fn pause(&self) {
        tokio::time::sleep(self.step_delay).await;
    }

    fn emit(&self, event: StepEvent) {
        // Nobody listening is fine, the session still holds the state
        let _ = self.events.send(event);
    }
}
