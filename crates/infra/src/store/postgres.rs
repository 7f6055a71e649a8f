//! Postgres-backed purchase transaction store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError | Scenario |
//! |------------|------------|----------|
//! | PoolClosed / PoolTimedOut / Io / Tls | `Unavailable` | Database not reachable |
//! | ColumnDecode / Decode / ColumnNotFound | `Corrupt` | Row does not match the record shape |
//! | Other | `Storage` | Constraint violations, SQL errors, etc. |
//!
//! ## Runtime
//!
//! The async methods are the primary API. The synchronous
//! [`PurchaseTransactionStore`] impl drives them on the current tokio runtime
//! and therefore needs a multi-threaded runtime.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::instrument;
use uuid::Uuid;

use ptm_core::Entity;
use ptm_purchasing::{PurchaseTransaction, PurchaseTransactionId};

use super::{PurchaseTransactionStore, StoreError, ensure_complete};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS purchase_transaction (
        id               UUID PRIMARY KEY,
        description      VARCHAR(50) NOT NULL,
        transaction_date DATE NOT NULL,
        purchase_amount  NUMERIC(19, 2) NOT NULL
    )
"#;

/// Postgres-backed purchase transaction store.
///
/// Amounts live in a `NUMERIC(19, 2)` column, so a reloaded record carries the
/// same two-digit scale it was saved with.
#[derive(Debug, Clone)]
pub struct PostgresPurchaseTransactionStore {
    pool: Arc<PgPool>,
}

impl PostgresPurchaseTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the `purchase_transaction` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    /// Insert or overwrite a record, assigning an id when it has none.
    #[instrument(skip(self, record), err)]
    pub async fn upsert(
        &self,
        mut record: PurchaseTransaction,
    ) -> Result<PurchaseTransaction, StoreError> {
        ensure_complete(&record)?;

        let id = match record.id() {
            Some(id) => id,
            None => {
                let id = PurchaseTransactionId::generate();
                record
                    .assign_id(id)
                    .map_err(|e| StoreError::Storage(e.to_string()))?;
                id
            }
        };

        sqlx::query(
            r#"
            INSERT INTO purchase_transaction (
                id,
                description,
                transaction_date,
                purchase_amount
            )
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id)
            DO UPDATE SET
                description = EXCLUDED.description,
                transaction_date = EXCLUDED.transaction_date,
                purchase_amount = EXCLUDED.purchase_amount
            "#,
        )
        .bind(id.as_uuid())
        .bind(record.description())
        .bind(record.transaction_date())
        .bind(record.purchase_amount())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("upsert", e))?;

        tracing::debug!(%id, "stored purchase transaction");
        Ok(record)
    }

    #[instrument(skip(self), err)]
    pub async fn load(
        &self,
        id: PurchaseTransactionId,
    ) -> Result<Option<PurchaseTransaction>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                id,
                description,
                transaction_date,
                purchase_amount
            FROM purchase_transaction
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load", e))?;

        row.map(|r| row_to_record(&r)).transpose()
    }
}

fn row_to_record(row: &PgRow) -> Result<PurchaseTransaction, StoreError> {
    let corrupt = |e: sqlx::Error| StoreError::Corrupt(e.to_string());

    let id: Uuid = row.try_get("id").map_err(corrupt)?;
    let description: String = row.try_get("description").map_err(corrupt)?;
    let transaction_date: NaiveDate = row.try_get("transaction_date").map_err(corrupt)?;
    let purchase_amount: Decimal = row.try_get("purchase_amount").map_err(corrupt)?;

    PurchaseTransaction::restore(
        PurchaseTransactionId::from_uuid(id),
        description,
        transaction_date,
        purchase_amount,
    )
    .map_err(|e| StoreError::Corrupt(e.to_string()))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolClosed
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreError::Unavailable(format!("{operation}: {err}")),
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_) => StoreError::Corrupt(format!("{operation}: {err}")),
        other => StoreError::Storage(format!("{operation}: {other}")),
    }
}

/// Run `fut` to completion from synchronous code inside a tokio runtime.
fn block_on<F: Future>(fut: F) -> Result<F::Output, StoreError> {
    let handle = Handle::try_current().map_err(|_| {
        StoreError::Unavailable(
            "PostgresPurchaseTransactionStore requires a tokio runtime".to_string(),
        )
    })?;

    if handle.runtime_flavor() != RuntimeFlavor::MultiThread {
        return Err(StoreError::Unavailable(
            "PostgresPurchaseTransactionStore requires a multi-threaded tokio runtime".to_string(),
        ));
    }

    Ok(tokio::task::block_in_place(|| handle.block_on(fut)))
}

impl PurchaseTransactionStore for PostgresPurchaseTransactionStore {
    fn save(&self, record: PurchaseTransaction) -> Result<PurchaseTransaction, StoreError> {
        block_on(self.upsert(record))?
    }

    fn find_by_id(
        &self,
        id: PurchaseTransactionId,
    ) -> Result<Option<PurchaseTransaction>, StoreError> {
        block_on(self.load(id))?
    }
}
