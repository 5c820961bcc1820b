use std::path::Path;

use rusqlite::Connection;

use barkeep_core::{EntityKind, Id};

use crate::error::StoreError;
use crate::schema::SCHEMA;

/// SQLite-backed store. One connection; all engine work happens inside
/// [`Store::with_tx`].
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Run `f` inside one transaction: commit on `Ok`, roll back on `Err`.
    /// This is the atomicity boundary for a full-graph import and for one
    /// staged `execute` batch.
    pub fn with_tx<T, E>(
        &mut self,
        f: impl FnOnce(&mut StoreTx<'_>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| E::from(StoreError::from(e)))?;
        let mut stx = StoreTx { conn: &tx };
        let out = f(&mut stx)?;
        tx.commit().map_err(|e| E::from(StoreError::from(e)))?;
        Ok(out)
    }
}

/// Handle to an open transaction. All typed CRUD lives in `impl` blocks
/// spread over the area modules (reference, inventory, recipes, cards,
/// calculations).
pub struct StoreTx<'a> {
    pub(crate) conn: &'a Connection,
}

impl StoreTx<'_> {
    // -- savepoints ---------------------------------------------------------
    // Raw SAVEPOINT statements rather than rusqlite's scoped API, so a
    // savepoint can bracket arbitrary engine code that borrows this handle.

    pub fn savepoint(&self, name: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(&format!("SAVEPOINT {name}"))?;
        Ok(())
    }

    pub fn savepoint_release(&self, name: &str) -> Result<(), StoreError> {
        self.conn.execute_batch(&format!("RELEASE {name}"))?;
        Ok(())
    }

    pub fn savepoint_rollback(&self, name: &str) -> Result<(), StoreError> {
        self.conn
            .execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name}"))?;
        Ok(())
    }

    // -- counts -------------------------------------------------------------

    /// Row count for one entity kind in one workspace.
    pub fn count(&self, kind: EntityKind, workspace_id: &Id) -> Result<i64, StoreError> {
        let table = match kind {
            EntityKind::Glass => "glasses",
            EntityKind::Garnish => "garnishes",
            EntityKind::Ingredient => "ingredients",
            EntityKind::IngredientVolume => "ingredient_volumes",
            EntityKind::Unit => "units",
            EntityKind::UnitConversion => "unit_conversions",
            EntityKind::Ice => "ice",
            EntityKind::StepAction => "step_actions",
            EntityKind::Recipe => "recipes",
            EntityKind::RecipeStep => "recipe_steps",
            EntityKind::RecipeIngredient => "recipe_ingredients",
            EntityKind::RecipeGarnish => "recipe_garnishes",
            EntityKind::Card => "cards",
            EntityKind::CardGroup => "card_groups",
            EntityKind::CardGroupItem => "card_group_items",
            EntityKind::Calculation => "calculations",
            EntityKind::CalculationItem => "calculation_items",
            EntityKind::ShoppingUnit => "shopping_units",
            EntityKind::Image => "images",
            EntityKind::Setting => "settings",
            EntityKind::Translation => "translations",
        };
        let n = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {table} WHERE workspace_id = ?1"),
            [workspace_id.as_str()],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bar.db");
        let store = Store::open(&path).unwrap();
        drop(store);
        // Reopen against the existing schema
        Store::open(&path).unwrap();
    }

    #[test]
    fn tx_rolls_back_on_err() {
        let mut store = Store::open_in_memory().unwrap();
        let ws = Id::from("ws");
        let result: Result<(), StoreError> = store.with_tx(|tx| {
            tx.conn.execute(
                "INSERT INTO units (id, workspace_id, name) VALUES ('u1', 'ws', 'CL')",
                [],
            )?;
            Err(StoreError::NotFound { table: "units", id: "boom".into() })
        });
        assert!(result.is_err());
        store
            .with_tx::<_, StoreError>(|tx| {
                assert_eq!(tx.count(EntityKind::Unit, &ws).unwrap(), 0);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn savepoint_rollback_is_scoped() {
        let mut store = Store::open_in_memory().unwrap();
        let ws = Id::from("ws");
        store
            .with_tx::<_, StoreError>(|tx| {
                tx.conn.execute(
                    "INSERT INTO units (id, workspace_id, name) VALUES ('u1', 'ws', 'CL')",
                    [],
                )?;
                tx.savepoint("item_0")?;
                tx.conn.execute(
                    "INSERT INTO units (id, workspace_id, name) VALUES ('u2', 'ws', 'ML')",
                    [],
                )?;
                tx.savepoint_rollback("item_0")?;
                Ok(())
            })
            .unwrap();
        store
            .with_tx::<_, StoreError>(|tx| {
                assert_eq!(tx.count(EntityKind::Unit, &ws).unwrap(), 1);
                Ok(())
            })
            .unwrap();
    }
}
