//! `barkeep-core` — Entity model shared by the import/export engine.
//!
//! Pure data crate: identifiers, the tenant-scoped entity structs, entity
//! kinds, and the change-record types handed to the audit sink. No IO.

pub mod audit;
pub mod entity;
pub mod id;
pub mod kind;

pub use audit::{AuditSink, ChangeAction, ChangeRecord, MemorySink};
pub use id::Id;
pub use kind::{EntityKind, ImageOwner};
