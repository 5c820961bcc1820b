//! Identifier remapping for bulk copies.
//!
//! One [`IdRemapper`] is created per import run, populated as each source
//! record is visited, and discarded when the run completes. Tables are kept
//! per entity kind because identifiers are only unique within a
//! (kind, workspace) pair.

use std::collections::HashMap;

use barkeep_core::{EntityKind, Id};

use crate::error::ImportError;

#[derive(Debug, Default)]
pub struct IdRemapper {
    tables: HashMap<EntityKind, HashMap<Id, Id>>,
}

impl IdRemapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh destination identifier for `old` and remember it.
    pub fn fresh(&mut self, kind: EntityKind, old: &Id) -> Id {
        let id = Id::fresh();
        self.tables
            .entry(kind)
            .or_default()
            .insert(old.clone(), id.clone());
        id
    }

    /// Record that `old` maps to an entity already present in the
    /// destination, so downstream references rewrite to the existing id.
    pub fn reuse(&mut self, kind: EntityKind, old: &Id, existing: Id) {
        self.tables.entry(kind).or_default().insert(old.clone(), existing);
    }

    /// Look up a previously recorded mapping without creating one.
    pub fn resolve(&self, kind: EntityKind, old: &Id) -> Option<&Id> {
        self.tables.get(&kind)?.get(old)
    }

    /// Resolve a required relation; a dangling reference is fatal.
    pub fn require(&self, kind: EntityKind, old: &Id) -> Result<Id, ImportError> {
        self.resolve(kind, old)
            .cloned()
            .ok_or_else(|| ImportError::MissingReference { kind, old_id: old.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_remembers_and_resolves() {
        let mut remap = IdRemapper::new();
        let old = Id::from("src_1");
        let new = remap.fresh(EntityKind::Glass, &old);
        assert_eq!(remap.resolve(EntityKind::Glass, &old), Some(&new));
        assert_ne!(new, old);
    }

    #[test]
    fn tables_are_per_kind() {
        let mut remap = IdRemapper::new();
        let old = Id::from("shared_id");
        let glass_id = remap.fresh(EntityKind::Glass, &old);
        assert!(remap.resolve(EntityKind::Garnish, &old).is_none());
        assert_eq!(remap.resolve(EntityKind::Glass, &old), Some(&glass_id));
    }

    #[test]
    fn reuse_rewrites_to_existing() {
        let mut remap = IdRemapper::new();
        let old = Id::from("src_unit");
        let existing = Id::from("dest_unit");
        remap.reuse(EntityKind::Unit, &old, existing.clone());
        assert_eq!(remap.require(EntityKind::Unit, &old).unwrap(), existing);
    }

    #[test]
    fn require_on_dangling_reference_fails() {
        let remap = IdRemapper::new();
        let err = remap.require(EntityKind::Ice, &Id::from("nope")).unwrap_err();
        assert!(matches!(
            err,
            ImportError::MissingReference { kind: EntityKind::Ice, .. }
        ));
    }
}
