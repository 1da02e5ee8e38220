//! Ports (interfaces) between the application core and the outside world

pub mod llm_gateway;
pub mod message_sink;
pub mod session_store;

pub use llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
pub use message_sink::{Broadcaster, MessageSink, SinkError};
pub use session_store::{SessionHandle, SessionStore};
