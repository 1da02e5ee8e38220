//! Application use cases

pub mod controller;
pub mod intervene;
pub mod respond;
pub mod run_discussion;

pub use controller::{ControllerError, RoundtableController};
pub use intervene::InterventionRouter;
pub use respond::{GenerationSettings, PersonaResponder};
pub use run_discussion::{DiscussionPipeline, DiscussionTiming};
