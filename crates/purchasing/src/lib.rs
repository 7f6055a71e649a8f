//! Purchasing domain module (purchase transactions).
//!
//! This crate contains the purchase transaction record and its business rules:
//! amount normalization on assignment and field validation. Everything here is
//! deterministic domain logic (no IO, no storage).

pub mod amount;
pub mod transaction;
pub mod validation;

pub use amount::PurchaseAmount;
pub use transaction::{PurchaseTransaction, PurchaseTransactionId};
pub use validation::{Field, Rule, Violation, Violations};
