pub mod engine;
pub mod error;
pub mod event;

pub use engine::{Engine, STEP_DELAY};
pub use error::EngineError;
pub use event::{RunReport, StepEvent, create_event_channel};
