//! Persistence boundary for purchase transactions.
//!
//! The port only exposes what the domain uses: `save` and `find_by_id`.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use thiserror::Error;

use ptm_purchasing::{PurchaseTransaction, PurchaseTransactionId};

pub use in_memory::InMemoryPurchaseTransactionStore;
pub use postgres::PostgresPurchaseTransactionStore;

/// Storage port for purchase transactions.
pub trait PurchaseTransactionStore: Send + Sync {
    /// Persist `record`, assigning a fresh id when it has none yet.
    ///
    /// Records that already carry an id overwrite the stored copy. The returned
    /// record is what a later `find_by_id` yields.
    fn save(&self, record: PurchaseTransaction) -> Result<PurchaseTransaction, StoreError>;

    fn find_by_id(
        &self,
        id: PurchaseTransactionId,
    ) -> Result<Option<PurchaseTransaction>, StoreError>;
}

impl<S> PurchaseTransactionStore for Arc<S>
where
    S: PurchaseTransactionStore + ?Sized,
{
    fn save(&self, record: PurchaseTransaction) -> Result<PurchaseTransaction, StoreError> {
        (**self).save(record)
    }

    fn find_by_id(
        &self,
        id: PurchaseTransactionId,
    ) -> Result<Option<PurchaseTransaction>, StoreError> {
        (**self).find_by_id(id)
    }
}

/// Persistence failure. Opaque to the domain; callers decide what to do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A column the table requires was unset on the record.
    #[error("record is missing required column '{0}'")]
    Incomplete(&'static str),
    /// The backend is not reachable or not usable from this context.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// A stored row could not be turned back into a record.
    #[error("corrupt row: {0}")]
    Corrupt(String),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Columns every stored row must have, checked before writing.
pub(crate) fn ensure_complete(record: &PurchaseTransaction) -> Result<(), StoreError> {
    if record.description().is_none() {
        return Err(StoreError::Incomplete("description"));
    }
    if record.transaction_date().is_none() {
        return Err(StoreError::Incomplete("transaction_date"));
    }
    if record.amount().is_none() {
        return Err(StoreError::Incomplete("purchase_amount"));
    }
    Ok(())
}
