//! `barkeep-io` — Wire payload formats for the import/export engine.
//!
//! Decodes the full-backup JSON (every historical schema version) and the
//! staged export envelopes into canonical in-memory representations, and
//! defines the plain-data decisions and reports exchanged with operators.
//! No persistence dependencies.

pub mod backup;
pub mod decision;
pub mod error;
pub mod export;

pub use backup::{BackupPayload, NormalizedBackup};
pub use decision::{ExecuteReport, ItemDecision, MappingProposal, RefMapping, RefMappings, ValidateReport};
pub use error::PayloadError;
pub use export::{ExportEntity, ExportEnvelope, ExportPayload};
