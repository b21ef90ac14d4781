use graphwalk_core::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("a traversal is already running")]
    AlreadyRunning,

    #[error("no algorithm selected")]
    NoAlgorithm,

    #[error("no start node selected")]
    NoStartNode,

    #[error("start node {0} is not in the graph")]
    UnknownStartNode(NodeId),
}

pub type Result<T> = std::result::Result<T, EngineError>;
