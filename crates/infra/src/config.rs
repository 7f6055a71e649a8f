//! Store selection from the environment.
//!
//! | variable | meaning |
//! |----------|---------|
//! | `USE_PERSISTENT_STORES` | `true` selects Postgres; anything else (or unset) keeps the in-memory store |
//! | `DATABASE_URL` | Postgres connection string, required when persistent |

use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;
use thiserror::Error;

use crate::store::{
    InMemoryPurchaseTransactionStore, PostgresPurchaseTransactionStore, PurchaseTransactionStore,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")]
    MissingDatabaseUrl,
}

impl StoreConfig {
    pub fn in_memory() -> Self {
        Self {
            backend: StoreBackend::InMemory,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let use_persistent = lookup("USE_PERSISTENT_STORES")
            .and_then(|v| v.trim().parse::<bool>().ok())
            .unwrap_or(false);

        if !use_persistent {
            return Ok(Self::in_memory());
        }

        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?;

        Ok(Self {
            backend: StoreBackend::Postgres { database_url },
        })
    }
}

/// Construct the configured store. Postgres stores are connected and have
/// their table created before being returned.
pub async fn build_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn PurchaseTransactionStore>> {
    match &config.backend {
        StoreBackend::InMemory => {
            tracing::info!(backend = "in_memory", "using purchase transaction store");
            Ok(Arc::new(InMemoryPurchaseTransactionStore::new()))
        }
        StoreBackend::Postgres { database_url } => {
            let pool = PgPool::connect(database_url)
                .await
                .context("failed to connect to Postgres")?;
            let store = PostgresPurchaseTransactionStore::new(pool);
            store
                .ensure_schema()
                .await
                .context("failed to create purchase_transaction table")?;

            tracing::info!(backend = "postgres", "using purchase transaction store");
            Ok(Arc::new(store))
        }
    }
}
