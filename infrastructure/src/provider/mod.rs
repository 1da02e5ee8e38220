//! Generation provider adapters

pub mod chat_gateway;

pub use chat_gateway::ChatCompletionsGateway;
