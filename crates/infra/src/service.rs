//! Record service: validate, persist, retrieve.

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::{info, warn};

use ptm_core::Entity;
use ptm_purchasing::{PurchaseTransaction, PurchaseTransactionId, Violations};

use crate::store::{PurchaseTransactionStore, StoreError};

/// Failure to record or fetch a purchase transaction.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record broke one or more field rules; nothing was stored.
    #[error("invalid purchase transaction: {0}")]
    Invalid(Violations),

    #[error("purchase transaction not found: {0}")]
    NotFound(PurchaseTransactionId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RecordError {
    /// The violations, when the failure was a rejected record.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            RecordError::Invalid(v) => Some(v),
            _ => None,
        }
    }
}

/// Application entry point for purchase transactions.
///
/// Only records that pass validation reach the store. Store failures are
/// passed through untouched; no retries happen here.
pub struct PurchaseTransactionService<S> {
    store: S,
}

impl<S> PurchaseTransactionService<S>
where
    S: PurchaseTransactionStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate against the local date and persist.
    pub fn record(&self, tx: PurchaseTransaction) -> Result<PurchaseTransaction, RecordError> {
        self.record_at(tx, Local::now().date_naive())
    }

    /// Validate against `today` and persist.
    pub fn record_at(
        &self,
        tx: PurchaseTransaction,
        today: NaiveDate,
    ) -> Result<PurchaseTransaction, RecordError> {
        let violations = tx.validate_at(today);
        if !violations.is_empty() {
            warn!(
                violations = violations.len(),
                details = %violations,
                "rejected purchase transaction"
            );
            return Err(RecordError::Invalid(violations));
        }

        let saved = self.store.save(tx)?;
        if let Some(id) = saved.id() {
            info!(%id, "recorded purchase transaction");
        }
        Ok(saved)
    }

    pub fn find(
        &self,
        id: PurchaseTransactionId,
    ) -> Result<Option<PurchaseTransaction>, RecordError> {
        Ok(self.store.find_by_id(id)?)
    }

    /// Like [`find`](Self::find), but a missing record is an error.
    pub fn get(&self, id: PurchaseTransactionId) -> Result<PurchaseTransaction, RecordError> {
        self.find(id)?.ok_or(RecordError::NotFound(id))
    }
}
