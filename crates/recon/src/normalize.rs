//! Legacy label normalization.
//!
//! Historical payloads carried free-text unit and ice labels instead of
//! references. The fixed tables below map the known labels to canonical
//! tokens; the [`Normalizer`] materializes missing `Unit`/`Ice` rows in the
//! destination on first use and memoizes them for the rest of the run.

use std::collections::HashMap;

use barkeep_core::entity::{Ice, Unit};
use barkeep_core::Id;
use barkeep_store::StoreTx;

use crate::error::ImportError;

/// Canonical token for unit labels nobody recognizes anymore.
pub const UNKNOWN_UNIT: &str = "Unknown";

/// Known historical unit labels → canonical token. Unrecognized labels map
/// to [`UNKNOWN_UNIT`].
pub fn normalize_unit_label(label: &str) -> String {
    match label.trim().to_lowercase().as_str() {
        "cl" => "CL",
        "ml" => "ML",
        "stück" | "stk." | "stk" | "piece" => "PIECE",
        "dash" | "spritzer" => "DASH",
        "tropfen" | "drop" => "DROP",
        "sprühen" | "spray" => "SPRAY",
        "barlöffel" | "bar spoon" | "bl" => "BAR_SPOON",
        "gramm" | "g" => "GRAMM",
        "scheibe" | "slice" => "SLICE",
        _ => UNKNOWN_UNIT,
    }
    .to_string()
}

/// Known historical ice labels → canonical token. Unrecognized labels pass
/// through unchanged and become their own token.
pub fn normalize_ice_label(label: &str) -> String {
    match label.trim().to_lowercase().as_str() {
        "würfel" | "eiswürfel" | "cubes" => "ICE_CUBES".to_string(),
        "crushed" | "gestoßen" => "ICE_CRUSHED".to_string(),
        "ohne" | "ohne eis" | "without" => "WITHOUT_ICE".to_string(),
        _ => label.trim().to_string(),
    }
}

/// Materializes and memoizes canonical `Unit`/`Ice` rows for one import
/// run. Repeated labels reuse the first materialized row instead of
/// duplicating it.
#[derive(Debug, Default)]
pub struct Normalizer {
    units: HashMap<String, Id>,
    ice: HashMap<String, Id>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destination unit id for a free-text legacy label. The flag reports
    /// whether a row was materialized, so callers can count creations.
    pub fn unit_for_label(
        &mut self,
        tx: &StoreTx<'_>,
        workspace_id: &Id,
        label: &str,
    ) -> Result<(Id, bool), ImportError> {
        let token = normalize_unit_label(label);
        self.unit_for_token(tx, workspace_id, &token)
    }

    /// Destination unit id for a canonical token, creating the row on
    /// first sight.
    pub fn unit_for_token(
        &mut self,
        tx: &StoreTx<'_>,
        workspace_id: &Id,
        token: &str,
    ) -> Result<(Id, bool), ImportError> {
        if let Some(id) = self.units.get(token) {
            return Ok((id.clone(), false));
        }
        let (id, created) = match tx.unit_by_name(workspace_id, token)? {
            Some(existing) => (existing.id, false),
            None => {
                let unit = Unit {
                    id: Id::fresh(),
                    workspace_id: workspace_id.clone(),
                    name: token.to_string(),
                };
                tx.insert_unit(&unit)?;
                (unit.id, true)
            }
        };
        self.units.insert(token.to_string(), id.clone());
        Ok((id, created))
    }

    pub fn ice_for_label(
        &mut self,
        tx: &StoreTx<'_>,
        workspace_id: &Id,
        label: &str,
    ) -> Result<(Id, bool), ImportError> {
        let token = normalize_ice_label(label);
        self.ice_for_token(tx, workspace_id, &token)
    }

    pub fn ice_for_token(
        &mut self,
        tx: &StoreTx<'_>,
        workspace_id: &Id,
        token: &str,
    ) -> Result<(Id, bool), ImportError> {
        if let Some(id) = self.ice.get(token) {
            return Ok((id.clone(), false));
        }
        let (id, created) = match tx.ice_by_name(workspace_id, token)? {
            Some(existing) => (existing.id, false),
            None => {
                let ice = Ice {
                    id: Id::fresh(),
                    workspace_id: workspace_id.clone(),
                    name: token.to_string(),
                };
                tx.insert_ice(&ice)?;
                (ice.id, true)
            }
        };
        self.ice.insert(token.to_string(), id.clone());
        Ok((id, created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkeep_core::EntityKind;
    use barkeep_store::Store;

    #[test]
    fn known_labels_map_to_tokens() {
        assert_eq!(normalize_unit_label("cl"), "CL");
        assert_eq!(normalize_unit_label(" CL "), "CL");
        assert_eq!(normalize_unit_label("Stück"), "PIECE");
        assert_eq!(normalize_ice_label("Würfel"), "ICE_CUBES");
        assert_eq!(normalize_ice_label("crushed"), "ICE_CRUSHED");
    }

    #[test]
    fn unknown_unit_label_maps_to_unknown() {
        assert_eq!(normalize_unit_label("fathoms"), UNKNOWN_UNIT);
    }

    #[test]
    fn unknown_ice_label_passes_through() {
        assert_eq!(normalize_ice_label("dry ice"), "dry ice");
    }

    #[test]
    fn materialized_rows_are_memoized() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .with_tx::<_, ImportError>(|tx| {
                let ws = Id::from("ws");
                let mut normalizer = Normalizer::new();
                let (a, first) = normalizer.unit_for_label(tx, &ws, "cl")?;
                let (b, second) = normalizer.unit_for_label(tx, &ws, " CL ")?;
                assert_eq!(a, b);
                assert!(first);
                assert!(!second);
                assert_eq!(tx.count(EntityKind::Unit, &ws)?, 1);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn existing_destination_row_is_reused() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .with_tx::<_, ImportError>(|tx| {
                let ws = Id::from("ws");
                let existing =
                    Unit { id: Id::from("u_cl"), workspace_id: ws.clone(), name: "CL".into() };
                tx.insert_unit(&existing)?;
                let mut normalizer = Normalizer::new();
                let (resolved, created) = normalizer.unit_for_label(tx, &ws, "cl")?;
                assert_eq!(resolved, existing.id);
                assert!(!created);
                assert_eq!(tx.count(EntityKind::Unit, &ws)?, 1);
                Ok(())
            })
            .unwrap();
    }
}
