//! `ptm-core` — domain foundation building blocks.
//!
//! Identity, value semantics and the domain error model shared by the
//! purchase-transaction crates. No infrastructure concerns live here.

extern crate self as ptm_core;

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use value_object::ValueObject;

// Used by `uuid_id!` so declaring crates need no direct serde/uuid dependency.
#[doc(hidden)]
pub use serde;
#[doc(hidden)]
pub use uuid;
