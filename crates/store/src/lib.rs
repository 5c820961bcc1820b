//! `barkeep-store` — SQLite-backed persistence collaborator.
//!
//! Exposes, per entity kind, the transactional create/read/update/delete
//! surface the import engine composes inside one [`Store::with_tx`]
//! boundary. Natural-key uniqueness lives in the schema; `INSERT OR
//! IGNORE` supplies skip-on-conflict bulk semantics; raw SAVEPOINTs give
//! per-item isolation inside a batch transaction.

mod calculations;
mod cards;
mod error;
mod inventory;
mod recipes;
mod reference;
mod schema;
mod store;

pub use error::StoreError;
pub use store::{Store, StoreTx};
