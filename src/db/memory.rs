//! In-memory portfolio store, used by tests and local experimentation.

use std::collections::HashMap;
use tokio::sync::RwLock;

use super::PortfolioStore;
use crate::error::StoreError;
use crate::models::{PortfolioEntry, UserAccount};

#[derive(Default)]
pub struct MemoryPortfolioStore {
    users: RwLock<HashMap<String, UserAccount>>,
    entries: RwLock<Vec<PortfolioEntry>>,
}

impl MemoryPortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PortfolioStore for MemoryPortfolioStore {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserAccount, StoreError> {
        let users = self.users.read().await;
        match users.get(email) {
            Some(user) if user.password == password => Ok(user.clone()),
            _ => Err(StoreError::InvalidCredentials),
        }
    }

    async fn register(&self, email: &str, password: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(StoreError::DuplicateUser);
        }
        users.insert(
            email.to_string(),
            UserAccount {
                email: email.to_string(),
                password: password.to_string(),
            },
        );
        Ok(())
    }

    async fn save_entry(&self, entry: &PortfolioEntry) -> Result<(), StoreError> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn list_entries(&self, owner: &str) -> Result<Vec<PortfolioEntry>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.owner == owner)
            .cloned()
            .collect())
    }
}
