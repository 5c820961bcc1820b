//! Operator decisions and phase reports for the staged reconciler.
//!
//! Everything here is plain data: nothing is held server-side between
//! `prepare-mapping` and `execute`, so the caller round-trips decisions,
//! mappings, and the original envelope verbatim.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use barkeep_core::Id;

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// Per-item decision submitted to `execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "decision")]
pub enum ItemDecision {
    /// Create a new entity with a fresh identifier.
    Import,
    /// Update the named existing entity in place, keeping its identifier.
    Overwrite { existing_id: Id },
    /// Create a new entity under a different name.
    Rename { new_name: String },
    /// Do nothing for this item.
    Skip,
}

/// Per-referenced-name decision submitted to `execute`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mapping")]
pub enum RefMapping {
    #[serde(rename = "use-existing")]
    UseExisting { id: Id },
    #[serde(rename = "skip")]
    Skip,
}

/// Mappings for every cross-referenced name in an execute batch, keyed
/// case-insensitively per referenced kind. A name with no entry behaves
/// like [`RefMapping::Skip`] for droppable kinds; units instead fall back
/// to exact-name auto-resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefMappings {
    pub cocktails: HashMap<String, RefMapping>,
    pub ingredients: HashMap<String, RefMapping>,
    pub units: HashMap<String, RefMapping>,
}

impl RefMappings {
    pub fn cocktail(&self, name: &str) -> Option<&RefMapping> {
        lookup(&self.cocktails, name)
    }

    pub fn ingredient(&self, name: &str) -> Option<&RefMapping> {
        lookup(&self.ingredients, name)
    }

    pub fn unit(&self, name: &str) -> Option<&RefMapping> {
        lookup(&self.units, name)
    }
}

fn lookup<'a>(map: &'a HashMap<String, RefMapping>, name: &str) -> Option<&'a RefMapping> {
    if let Some(mapping) = map.get(name) {
        return Some(mapping);
    }
    let lower = name.to_lowercase();
    map.iter().find(|(k, _)| k.to_lowercase() == lower).map(|(_, v)| v)
}

// ---------------------------------------------------------------------------
// Phase reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ValidateItem {
    pub name: String,
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateReport {
    pub items: Vec<ValidateItem>,
    pub valid: bool,
}

/// An existing destination entity an incoming item collides with, or a
/// candidate resolution for a referenced name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub id: Id,
    pub name: String,
}

/// Resolution proposal for one name referenced from inside the payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefSuggestion {
    pub export_name: String,
    /// Exact case-insensitive name match, if any.
    pub auto_match: Option<Candidate>,
    /// Looser net: case-insensitive substring containment.
    pub options: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemProposal {
    pub name: String,
    /// Existing destination entities whose name equals the incoming name
    /// case-insensitively; the operator decides against these.
    pub conflicts: Vec<Candidate>,
    pub cocktails: Vec<RefSuggestion>,
    pub ingredients: Vec<RefSuggestion>,
    pub units: Vec<RefSuggestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MappingProposal {
    pub items: Vec<ItemProposal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Created,
    Updated,
    Skipped,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteResult {
    pub name: String,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteReport {
    pub items: Vec<ExecuteResult>,
}

impl ExecuteReport {
    /// Terminal state: committed, or committed with per-item errors.
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| i.status == ItemStatus::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_wire_format() {
        let d: ItemDecision =
            serde_json::from_str(r#"{"decision": "overwrite", "existingId": "g1"}"#).unwrap();
        assert_eq!(d, ItemDecision::Overwrite { existing_id: Id::from("g1") });
        let r: ItemDecision =
            serde_json::from_str(r#"{"decision": "rename", "newName": "Coupe"}"#).unwrap();
        assert_eq!(r, ItemDecision::Rename { new_name: "Coupe".into() });
        let s: ItemDecision = serde_json::from_str(r#"{"decision": "skip"}"#).unwrap();
        assert_eq!(s, ItemDecision::Skip);
    }

    #[test]
    fn decision_fields_serialize_camel_case() {
        let raw =
            serde_json::to_string(&ItemDecision::Overwrite { existing_id: Id::from("g1") })
                .unwrap();
        assert_eq!(raw, r#"{"decision":"overwrite","existingId":"g1"}"#);
    }

    #[test]
    fn mapping_wire_format() {
        let m: RefMapping =
            serde_json::from_str(r#"{"mapping": "use-existing", "id": "r9"}"#).unwrap();
        assert_eq!(m, RefMapping::UseExisting { id: Id::from("r9") });
    }

    #[test]
    fn mapping_lookup_is_case_insensitive() {
        let mut mappings = RefMappings::default();
        mappings
            .cocktails
            .insert("Negroni".into(), RefMapping::Skip);
        assert!(mappings.cocktail("negroni").is_some());
        assert!(mappings.cocktail("NEGRONI").is_some());
        assert!(mappings.cocktail("Sazerac").is_none());
    }

    #[test]
    fn mapping_lookup_folds_unicode_case() {
        let mut mappings = RefMappings::default();
        mappings.units.insert("WÜRFEL".into(), RefMapping::Skip);
        assert!(mappings.unit("würfel").is_some());
    }
}
