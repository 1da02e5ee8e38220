//! Domain layer for roundtable
//!
//! Core entities and logic of the simulated clinical-research roundtable:
//! the fixed persona registry, discussion sessions with their append-only
//! message ledgers, the stage sequence, prompt templates with canned
//! fallbacks, and session-scoped citation augmentation.
//!
//! This crate has no dependencies on infrastructure or presentation
//! concerns.

pub mod citation;
pub mod core;
pub mod persona;
pub mod prompt;
pub mod session;
pub mod stage;

// Re-export commonly used types
pub use citation::{CitationBook, CitedReference, Reference};
pub use crate::core::error::DomainError;
pub use persona::{AgentRole, Persona, PersonaRegistry, PersonaSummary};
pub use prompt::{PromptTemplate, QuestionProfile, fallback_reply, fallback_summary};
pub use session::{
    Message, MessageKind, MessageMeta, Recipient, Roundtable, RoundtableSnapshot,
    RoundtableStatus, Sender,
};
pub use stage::{Stage, TurnContext, TurnStage};
