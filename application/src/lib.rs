//! Application layer for roundtable
//!
//! Use cases orchestrating the discussion flow, and the ports they need
//! from the outside world (generation backend, broadcast delivery, session
//! storage). Adapters live in the infrastructure layer.

pub mod ports;
pub mod signal;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    Broadcaster, GatewayError, GenerationRequest, LlmGateway, MessageSink, SessionHandle,
    SessionStore, SinkError,
};
pub use signal::InterruptSignal;
pub use use_cases::{
    ControllerError, DiscussionPipeline, DiscussionTiming, GenerationSettings,
    InterventionRouter, PersonaResponder, RoundtableController,
};
