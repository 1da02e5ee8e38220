//! Session store port
//!
//! The core needs synchronous, consistent read-after-write access to
//! sessions within one process. Whether the store is durable is an
//! infrastructure concern.

use async_trait::async_trait;
use roundtable_domain::Roundtable;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to a stored session
pub type SessionHandle = Arc<RwLock<Roundtable>>;

/// Storage for roundtable sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store a new session and return its shared handle
    async fn insert(&self, session: Roundtable) -> SessionHandle;

    /// Look up a session by id
    async fn get(&self, id: &str) -> Option<SessionHandle>;

    /// All stored sessions, oldest first
    async fn list(&self) -> Vec<SessionHandle>;
}
