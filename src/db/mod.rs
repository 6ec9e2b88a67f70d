//! User and portfolio persistence gateway.
//!
//! All credential handling, including the plaintext comparison kept for
//! behavior parity, lives behind [`PortfolioStore`] so the scheme can be
//! swapped without touching the engine or HTTP layer.

pub mod memory;
pub mod postgres;

use crate::error::StoreError;
use crate::models::{PortfolioEntry, UserAccount};

pub use memory::MemoryPortfolioStore;
pub use postgres::PgPortfolioStore;

#[async_trait::async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Look up the account and compare credentials. A missing account and a
    /// password mismatch are indistinguishable to the caller.
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<UserAccount, StoreError>;

    /// Create an account. At most one account per email; a duplicate leaves
    /// the stored account unchanged and fails with `DuplicateUser`.
    async fn register(&self, email: &str, password: &str) -> Result<(), StoreError>;

    /// Append a portfolio entry. Entries are never mutated after creation.
    async fn save_entry(&self, entry: &PortfolioEntry) -> Result<(), StoreError>;

    /// List entries owned by `owner`, oldest first.
    async fn list_entries(&self, owner: &str) -> Result<Vec<PortfolioEntry>, StoreError>;
}
