//! Explicit session contexts.
//!
//! The logged-in identity is never ambient state: login success creates a
//! context keyed by an opaque token, every identity-bearing operation
//! receives it explicitly, and logout destroys it.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<HashMap<String, SessionContext>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for an authenticated user and return its token.
    pub async fn create(&self, email: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let context = SessionContext {
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.inner.write().await.insert(token.clone(), context);
        token
    }

    pub async fn get(&self, token: &str) -> Option<SessionContext> {
        self.inner.read().await.get(token).cloned()
    }

    /// Destroy a session. Idempotent; returns whether a session existed.
    pub async fn remove(&self, token: &str) -> bool {
        self.inner.write().await.remove(token).is_some()
    }
}
