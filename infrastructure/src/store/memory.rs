//! In-memory session store

use async_trait::async_trait;
use roundtable_application::{SessionHandle, SessionStore};
use roundtable_domain::Roundtable;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    /// Insertion order of session ids
    order: Vec<String>,
    sessions: HashMap<String, SessionHandle>,
}

/// Process-local session storage
///
/// Gives the synchronous read-after-write consistency the discussion core
/// requires; durability is out of scope.
#[derive(Default)]
pub struct InMemorySessionStore {
    inner: RwLock<Inner>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Roundtable) -> SessionHandle {
        let id = session.id().to_string();
        let handle: SessionHandle = Arc::new(RwLock::new(session));
        let mut inner = self.inner.write().await;
        if !inner.sessions.contains_key(&id) {
            inner.order.push(id.clone());
        }
        inner.sessions.insert(id, handle.clone());
        handle
    }

    async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.inner.read().await.sessions.get(id).cloned()
    }

    async fn list(&self) -> Vec<SessionHandle> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.sessions.get(id).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = InMemorySessionStore::new();
        let handle = store.insert(Roundtable::new("t", "q")).await;
        let id = handle.read().await.id().to_string();

        let fetched = store.get(&id).await.unwrap();
        assert_eq!(fetched.read().await.title(), "t");
        assert!(store.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_read_after_write_consistency() {
        let store = InMemorySessionStore::new();
        let handle = store.insert(Roundtable::new("t", "q")).await;
        let id = handle.read().await.id().to_string();

        handle.write().await.begin_round();

        let fetched = store.get(&id).await.unwrap();
        assert_eq!(fetched.read().await.current_round(), 1);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = InMemorySessionStore::new();
        store.insert(Roundtable::new("first", "q")).await;
        store.insert(Roundtable::new("second", "q")).await;

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].read().await.title(), "first");
        assert_eq!(listed[1].read().await.title(), "second");
    }
}
