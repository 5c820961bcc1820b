use serde::Serialize;

use crate::id::Id;
use crate::kind::EntityKind;

/// What an import did to an entity, for the record-change sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Create,
    Update,
}

/// One committed change, handed to the external audit sink. The engine only
/// writes these; it never reads them back.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    pub workspace_id: Id,
    pub actor_id: Id,
    pub kind: EntityKind,
    pub entity_id: Id,
    pub action: ChangeAction,
    /// Full prior state, captured before an overwrite. `None` for creates.
    pub previous: Option<serde_json::Value>,
    /// Full state after the change.
    pub state: serde_json::Value,
}

/// External collaborator receiving change records.
pub trait AuditSink {
    fn record(&mut self, change: ChangeRecord);
}

/// In-memory sink. Callers that persist audit data wrap their own storage
/// behind [`AuditSink`]; this one just accumulates.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<ChangeRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditSink for MemorySink {
    fn record(&mut self, change: ChangeRecord) {
        self.records.push(change);
    }
}
