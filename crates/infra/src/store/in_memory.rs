use std::collections::HashMap;
use std::sync::RwLock;

use ptm_core::Entity;
use ptm_purchasing::{PurchaseTransaction, PurchaseTransactionId};

use super::{PurchaseTransactionStore, StoreError, ensure_complete};

/// In-memory purchase transaction store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryPurchaseTransactionStore {
    records: RwLock<HashMap<PurchaseTransactionId, PurchaseTransaction>>,
}

impl InMemoryPurchaseTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> Result<usize, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl PurchaseTransactionStore for InMemoryPurchaseTransactionStore {
    fn save(&self, mut record: PurchaseTransaction) -> Result<PurchaseTransaction, StoreError> {
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

        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        records.insert(id, record.clone());

        tracing::debug!(%id, "stored purchase transaction");
        Ok(record)
    }

    fn find_by_id(
        &self,
        id: PurchaseTransactionId,
    ) -> Result<Option<PurchaseTransaction>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(records.get(&id).cloned())
    }
}
