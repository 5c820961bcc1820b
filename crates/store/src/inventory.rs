//! CRUD for glasses, garnishes, ingredients, and ingredient volumes.

use rusqlite::{params, Row};

use barkeep_core::entity::{Garnish, Glass, Ingredient, IngredientVolume};
use barkeep_core::Id;

use crate::error::StoreError;
use crate::store::StoreTx;

fn tags_to_json(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".into())
}

fn tags_from_json(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn glass_from_row(row: &Row) -> rusqlite::Result<Glass> {
    Ok(Glass {
        id: Id::from(row.get::<_, String>(0)?),
        workspace_id: Id::from(row.get::<_, String>(1)?),
        name: row.get(2)?,
        deposit: row.get(3)?,
        volume: row.get(4)?,
        notes: row.get(5)?,
    })
}

fn garnish_from_row(row: &Row) -> rusqlite::Result<Garnish> {
    Ok(Garnish {
        id: Id::from(row.get::<_, String>(0)?),
        workspace_id: Id::from(row.get::<_, String>(1)?),
        name: row.get(2)?,
        description: row.get(3)?,
        price: row.get(4)?,
        notes: row.get(5)?,
    })
}

fn ingredient_from_row(row: &Row) -> rusqlite::Result<Ingredient> {
    Ok(Ingredient {
        id: Id::from(row.get::<_, String>(0)?),
        workspace_id: Id::from(row.get::<_, String>(1)?),
        name: row.get(2)?,
        short_name: row.get(3)?,
        price: row.get(4)?,
        link: row.get(5)?,
        tags: tags_from_json(&row.get::<_, String>(6)?),
    })
}

impl StoreTx<'_> {
    // -- glasses ------------------------------------------------------------

    pub fn insert_glass(&self, glass: &Glass) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO glasses (id, workspace_id, name, deposit, volume, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                glass.id.as_str(),
                glass.workspace_id.as_str(),
                glass.name,
                glass.deposit,
                glass.volume,
                glass.notes
            ],
        )?;
        Ok(())
    }

    /// Update scalar fields in place; the identifier never changes.
    pub fn update_glass(&self, glass: &Glass) -> Result<(), StoreError> {
        let n = self.conn.execute(
            "UPDATE glasses SET name = ?3, deposit = ?4, volume = ?5, notes = ?6
             WHERE id = ?1 AND workspace_id = ?2",
            params![
                glass.id.as_str(),
                glass.workspace_id.as_str(),
                glass.name,
                glass.deposit,
                glass.volume,
                glass.notes
            ],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { table: "glasses", id: glass.id.to_string() });
        }
        Ok(())
    }

    pub fn glass_by_id(&self, workspace_id: &Id, id: &Id) -> Result<Option<Glass>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, deposit, volume, notes FROM glasses
             WHERE workspace_id = ?1 AND id = ?2",
        )?;
        let mut rows = stmt.query_map(params![workspace_id.as_str(), id.as_str()], glass_from_row)?;
        Ok(rows.next().transpose()?)
    }

    pub fn glasses_in(&self, workspace_id: &Id) -> Result<Vec<Glass>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, deposit, volume, notes FROM glasses
             WHERE workspace_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], glass_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- garnishes ----------------------------------------------------------

    pub fn insert_garnish(&self, garnish: &Garnish) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO garnishes (id, workspace_id, name, description, price, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                garnish.id.as_str(),
                garnish.workspace_id.as_str(),
                garnish.name,
                garnish.description,
                garnish.price,
                garnish.notes
            ],
        )?;
        Ok(())
    }

    pub fn update_garnish(&self, garnish: &Garnish) -> Result<(), StoreError> {
        let n = self.conn.execute(
            "UPDATE garnishes SET name = ?3, description = ?4, price = ?5, notes = ?6
             WHERE id = ?1 AND workspace_id = ?2",
            params![
                garnish.id.as_str(),
                garnish.workspace_id.as_str(),
                garnish.name,
                garnish.description,
                garnish.price,
                garnish.notes
            ],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { table: "garnishes", id: garnish.id.to_string() });
        }
        Ok(())
    }

    pub fn garnish_by_id(&self, workspace_id: &Id, id: &Id) -> Result<Option<Garnish>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, description, price, notes FROM garnishes
             WHERE workspace_id = ?1 AND id = ?2",
        )?;
        let mut rows =
            stmt.query_map(params![workspace_id.as_str(), id.as_str()], garnish_from_row)?;
        Ok(rows.next().transpose()?)
    }

    pub fn garnishes_in(&self, workspace_id: &Id) -> Result<Vec<Garnish>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, description, price, notes FROM garnishes
             WHERE workspace_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], garnish_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- ingredients --------------------------------------------------------

    pub fn insert_ingredient(&self, ingredient: &Ingredient) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO ingredients (id, workspace_id, name, short_name, price, link, tags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                ingredient.id.as_str(),
                ingredient.workspace_id.as_str(),
                ingredient.name,
                ingredient.short_name,
                ingredient.price,
                ingredient.link,
                tags_to_json(&ingredient.tags)
            ],
        )?;
        Ok(())
    }

    pub fn update_ingredient(&self, ingredient: &Ingredient) -> Result<(), StoreError> {
        let n = self.conn.execute(
            "UPDATE ingredients SET name = ?3, short_name = ?4, price = ?5, link = ?6, tags = ?7
             WHERE id = ?1 AND workspace_id = ?2",
            params![
                ingredient.id.as_str(),
                ingredient.workspace_id.as_str(),
                ingredient.name,
                ingredient.short_name,
                ingredient.price,
                ingredient.link,
                tags_to_json(&ingredient.tags)
            ],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { table: "ingredients", id: ingredient.id.to_string() });
        }
        Ok(())
    }

    pub fn ingredient_by_id(
        &self,
        workspace_id: &Id,
        id: &Id,
    ) -> Result<Option<Ingredient>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, short_name, price, link, tags FROM ingredients
             WHERE workspace_id = ?1 AND id = ?2",
        )?;
        let mut rows =
            stmt.query_map(params![workspace_id.as_str(), id.as_str()], ingredient_from_row)?;
        Ok(rows.next().transpose()?)
    }

    pub fn ingredients_in(&self, workspace_id: &Id) -> Result<Vec<Ingredient>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, short_name, price, link, tags FROM ingredients
             WHERE workspace_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], ingredient_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- ingredient volumes -------------------------------------------------

    pub fn insert_volume_ignore(&self, volume: &IngredientVolume) -> Result<bool, StoreError> {
        let n = self.conn.execute(
            "INSERT OR IGNORE INTO ingredient_volumes
             (id, workspace_id, ingredient_id, unit_id, volume)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                volume.id.as_str(),
                volume.workspace_id.as_str(),
                volume.ingredient_id.as_str(),
                volume.unit_id.as_str(),
                volume.volume
            ],
        )?;
        Ok(n > 0)
    }

    pub fn volumes_for(&self, workspace_id: &Id, ingredient_id: &Id) -> Result<Vec<IngredientVolume>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, ingredient_id, unit_id, volume FROM ingredient_volumes
             WHERE workspace_id = ?1 AND ingredient_id = ?2",
        )?;
        let rows = stmt.query_map(
            params![workspace_id.as_str(), ingredient_id.as_str()],
            volume_from_row,
        )?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn volumes_in(&self, workspace_id: &Id) -> Result<Vec<IngredientVolume>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, ingredient_id, unit_id, volume FROM ingredient_volumes
             WHERE workspace_id = ?1",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], volume_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn delete_volumes_for(&self, workspace_id: &Id, ingredient_id: &Id) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM ingredient_volumes WHERE workspace_id = ?1 AND ingredient_id = ?2",
            params![workspace_id.as_str(), ingredient_id.as_str()],
        )?;
        Ok(())
    }
}

fn volume_from_row(row: &Row) -> rusqlite::Result<IngredientVolume> {
    Ok(IngredientVolume {
        id: Id::from(row.get::<_, String>(0)?),
        workspace_id: Id::from(row.get::<_, String>(1)?),
        ingredient_id: Id::from(row.get::<_, String>(2)?),
        unit_id: Id::from(row.get::<_, String>(3)?),
        volume: row.get(4)?,
    })
}
