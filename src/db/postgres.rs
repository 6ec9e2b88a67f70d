//! Postgres-backed portfolio store.

use tokio::time::timeout;
use tokio_postgres::{Client, NoTls};
use tracing::error;

use super::PortfolioStore;
use crate::config;
use crate::error::StoreError;
use crate::models::{PortfolioEntry, UserAccount};

pub struct PgPortfolioStore {
    client: Client,
}

impl PgPortfolioStore {
    /// Connect with the bounded connection-establishment timeout, applied
    /// once at session start. Failure here is fatal to the session; there is
    /// no degraded mode and no retry.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let (client, connection) =
            timeout(config::STORE_CONNECT_TIMEOUT, tokio_postgres::connect(database_url, NoTls))
                .await
                .map_err(|_| {
                    StoreError::Unavailable(format!(
                        "connection attempt timed out after {:?}",
                        config::STORE_CONNECT_TIMEOUT
                    ))
                })?
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "portfolio store connection error");
            }
        });

        let store = Self { client };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        self.client
            .execute(
                "CREATE TABLE IF NOT EXISTS users (
                    email TEXT PRIMARY KEY,
                    password TEXT NOT NULL
                )",
                &[],
            )
            .await
            .map_err(|e| StoreError::Query(format!("failed to create users table: {}", e)))?;

        self.client
            .execute(
                "CREATE TABLE IF NOT EXISTS portfolio (
                    owner TEXT NOT NULL,
                    ticker TEXT NOT NULL,
                    price DOUBLE PRECISION NOT NULL,
                    entry DOUBLE PRECISION NOT NULL,
                    target DOUBLE PRECISION NOT NULL,
                    stop_loss DOUBLE PRECISION NOT NULL,
                    recorded_at TIMESTAMPTZ NOT NULL
                )",
                &[],
            )
            .await
            .map_err(|e| {
                StoreError::Query(format!("failed to create portfolio table: {}", e))
            })?;

        Ok(())
    }

    async fn find_user(&self, email: &str) -> Result<Option<UserAccount>, StoreError> {
        let rows = self
            .client
            .query("SELECT email, password FROM users WHERE email = $1", &[&email])
            .await
            .map_err(|e| StoreError::Query(format!("failed to query user: {}", e)))?;

        Ok(rows.first().map(|row| UserAccount {
            email: row.get(0),
            password: row.get(1),
        }))
    }
}

#[async_trait::async_trait]
impl PortfolioStore for PgPortfolioStore {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<UserAccount, StoreError> {
        match self.find_user(email).await? {
            Some(user) if user.password == password => Ok(user),
            _ => Err(StoreError::InvalidCredentials),
        }
    }

    async fn register(&self, email: &str, password: &str) -> Result<(), StoreError> {
        if self.find_user(email).await?.is_some() {
            return Err(StoreError::DuplicateUser);
        }

        self.client
            .execute(
                "INSERT INTO users (email, password) VALUES ($1, $2)",
                &[&email, &password],
            )
            .await
            .map_err(|e| StoreError::Query(format!("failed to insert user: {}", e)))?;

        Ok(())
    }

    async fn save_entry(&self, entry: &PortfolioEntry) -> Result<(), StoreError> {
        self.client
            .execute(
                "INSERT INTO portfolio (owner, ticker, price, entry, target, stop_loss, recorded_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
                &[
                    &entry.owner,
                    &entry.ticker,
                    &entry.price,
                    &entry.entry,
                    &entry.target,
                    &entry.stop_loss,
                    &entry.recorded_at,
                ],
            )
            .await
            .map_err(|e| StoreError::Query(format!("failed to insert entry: {}", e)))?;

        Ok(())
    }

    async fn list_entries(&self, owner: &str) -> Result<Vec<PortfolioEntry>, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT owner, ticker, price, entry, target, stop_loss, recorded_at
                 FROM portfolio
                 WHERE owner = $1
                 ORDER BY recorded_at",
                &[&owner],
            )
            .await
            .map_err(|e| StoreError::Query(format!("failed to query entries: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| PortfolioEntry {
                owner: row.get(0),
                ticker: row.get(1),
                price: row.get(2),
                entry: row.get(3),
                target: row.get(4),
                stop_loss: row.get(5),
                recorded_at: row.get(6),
            })
            .collect())
    }
}
