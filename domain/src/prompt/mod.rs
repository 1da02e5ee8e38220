//! Prompt construction: turn templates, question analysis, canned replies

pub mod analysis;
pub mod fallback;
pub mod template;

pub use analysis::QuestionProfile;
pub use fallback::{fallback_reply, fallback_summary};
pub use template::{PromptTemplate, excerpt};
