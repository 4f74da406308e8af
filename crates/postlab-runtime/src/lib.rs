pub mod cascade;
pub mod entities;
pub mod orchestrator;
pub mod save;

pub use orchestrator::Orchestrator;
pub use save::{SaveOutcome, SavePhase, SaveRequest};
