//! Infrastructure layer: persistence adapters, service wiring, config.

pub mod config;
pub mod service;
pub mod store;


pub use config::{ConfigError, StoreBackend, StoreConfig, build_store};
pub use service::{PurchaseTransactionService, RecordError};
pub use store::{
    InMemoryPurchaseTransactionStore, PostgresPurchaseTransactionStore, PurchaseTransactionStore,
    StoreError,
};
