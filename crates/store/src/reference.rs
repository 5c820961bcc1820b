//! CRUD for natural-keyed reference data: units, unit conversions, ice,
//! step actions, workspace settings, translations, and entity images.

use rusqlite::{params, Row};

use barkeep_core::entity::{EntityImage, Ice, Setting, StepAction, Translation, Unit, UnitConversion};
use barkeep_core::{Id, ImageOwner};

use crate::error::StoreError;
use crate::store::StoreTx;

fn unit_from_row(row: &Row) -> rusqlite::Result<Unit> {
    Ok(Unit {
        id: Id::from(row.get::<_, String>(0)?),
        workspace_id: Id::from(row.get::<_, String>(1)?),
        name: row.get(2)?,
    })
}

fn ice_from_row(row: &Row) -> rusqlite::Result<Ice> {
    Ok(Ice {
        id: Id::from(row.get::<_, String>(0)?),
        workspace_id: Id::from(row.get::<_, String>(1)?),
        name: row.get(2)?,
    })
}

impl StoreTx<'_> {
    // -- units --------------------------------------------------------------

    pub fn insert_unit(&self, unit: &Unit) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO units (id, workspace_id, name) VALUES (?1, ?2, ?3)",
            params![unit.id.as_str(), unit.workspace_id.as_str(), unit.name],
        )?;
        Ok(())
    }

    pub fn unit_by_name(&self, workspace_id: &Id, name: &str) -> Result<Option<Unit>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name FROM units WHERE workspace_id = ?1 AND name = ?2",
        )?;
        let mut rows = stmt.query_map(params![workspace_id.as_str(), name], unit_from_row)?;
        Ok(rows.next().transpose()?)
    }

    pub fn units_in(&self, workspace_id: &Id) -> Result<Vec<Unit>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name FROM units WHERE workspace_id = ?1 ORDER BY name",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], unit_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- unit conversions ---------------------------------------------------

    /// Insert, skipping silently when an equivalent (from, to) pair exists.
    /// Returns whether a row was written.
    pub fn insert_conversion_ignore(&self, c: &UnitConversion) -> Result<bool, StoreError> {
        let n = self.conn.execute(
            "INSERT OR IGNORE INTO unit_conversions
             (id, workspace_id, from_unit_id, to_unit_id, factor)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                c.id.as_str(),
                c.workspace_id.as_str(),
                c.from_unit_id.as_str(),
                c.to_unit_id.as_str(),
                c.factor
            ],
        )?;
        Ok(n > 0)
    }

    pub fn conversions_in(&self, workspace_id: &Id) -> Result<Vec<UnitConversion>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, from_unit_id, to_unit_id, factor
             FROM unit_conversions WHERE workspace_id = ?1",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], |row| {
            Ok(UnitConversion {
                id: Id::from(row.get::<_, String>(0)?),
                workspace_id: Id::from(row.get::<_, String>(1)?),
                from_unit_id: Id::from(row.get::<_, String>(2)?),
                to_unit_id: Id::from(row.get::<_, String>(3)?),
                factor: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- ice ----------------------------------------------------------------

    pub fn insert_ice(&self, ice: &Ice) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO ice (id, workspace_id, name) VALUES (?1, ?2, ?3)",
            params![ice.id.as_str(), ice.workspace_id.as_str(), ice.name],
        )?;
        Ok(())
    }

    pub fn ice_by_name(&self, workspace_id: &Id, name: &str) -> Result<Option<Ice>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name FROM ice WHERE workspace_id = ?1 AND name = ?2",
        )?;
        let mut rows = stmt.query_map(params![workspace_id.as_str(), name], ice_from_row)?;
        Ok(rows.next().transpose()?)
    }

    pub fn ice_in(&self, workspace_id: &Id) -> Result<Vec<Ice>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name FROM ice WHERE workspace_id = ?1 ORDER BY name",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], ice_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- step actions -------------------------------------------------------

    pub fn insert_step_action(&self, action: &StepAction) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO step_actions (id, workspace_id, name, action_group)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                action.id.as_str(),
                action.workspace_id.as_str(),
                action.name,
                action.action_group
            ],
        )?;
        Ok(())
    }

    pub fn step_action_by(
        &self,
        workspace_id: &Id,
        name: &str,
        action_group: &str,
    ) -> Result<Option<StepAction>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, action_group FROM step_actions
             WHERE workspace_id = ?1 AND name = ?2 AND action_group = ?3",
        )?;
        let mut rows = stmt.query_map(
            params![workspace_id.as_str(), name, action_group],
            |row| {
                Ok(StepAction {
                    id: Id::from(row.get::<_, String>(0)?),
                    workspace_id: Id::from(row.get::<_, String>(1)?),
                    name: row.get(2)?,
                    action_group: row.get(3)?,
                })
            },
        )?;
        Ok(rows.next().transpose()?)
    }

    /// Step action by name alone, used for the legacy `tool` translation
    /// where no action group travels with the payload.
    pub fn step_action_by_name(
        &self,
        workspace_id: &Id,
        name: &str,
    ) -> Result<Option<StepAction>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, action_group FROM step_actions
             WHERE workspace_id = ?1 AND name = ?2 ORDER BY action_group LIMIT 1",
        )?;
        let mut rows = stmt.query_map(params![workspace_id.as_str(), name], |row| {
            Ok(StepAction {
                id: Id::from(row.get::<_, String>(0)?),
                workspace_id: Id::from(row.get::<_, String>(1)?),
                name: row.get(2)?,
                action_group: row.get(3)?,
            })
        })?;
        Ok(rows.next().transpose()?)
    }

    pub fn step_actions_in(&self, workspace_id: &Id) -> Result<Vec<StepAction>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, action_group FROM step_actions
             WHERE workspace_id = ?1 ORDER BY action_group, name",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], |row| {
            Ok(StepAction {
                id: Id::from(row.get::<_, String>(0)?),
                workspace_id: Id::from(row.get::<_, String>(1)?),
                name: row.get(2)?,
                action_group: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- settings / translations --------------------------------------------

    /// Insert, skipping silently when the setting key already exists.
    pub fn insert_setting_ignore(&self, setting: &Setting) -> Result<bool, StoreError> {
        let n = self.conn.execute(
            "INSERT OR IGNORE INTO settings (workspace_id, key, value) VALUES (?1, ?2, ?3)",
            params![setting.workspace_id.as_str(), setting.key, setting.value],
        )?;
        Ok(n > 0)
    }

    pub fn settings_in(&self, workspace_id: &Id) -> Result<Vec<Setting>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT workspace_id, key, value FROM settings WHERE workspace_id = ?1 ORDER BY key",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], |row| {
            Ok(Setting {
                workspace_id: Id::from(row.get::<_, String>(0)?),
                key: row.get(1)?,
                value: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn insert_translation_ignore(&self, t: &Translation) -> Result<bool, StoreError> {
        let n = self.conn.execute(
            "INSERT OR IGNORE INTO translations (workspace_id, language, token, label)
             VALUES (?1, ?2, ?3, ?4)",
            params![t.workspace_id.as_str(), t.language, t.token, t.label],
        )?;
        Ok(n > 0)
    }

    pub fn translations_in(&self, workspace_id: &Id) -> Result<Vec<Translation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT workspace_id, language, token, label FROM translations
             WHERE workspace_id = ?1 ORDER BY language, token",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], |row| {
            Ok(Translation {
                workspace_id: Id::from(row.get::<_, String>(0)?),
                language: row.get(1)?,
                token: row.get(2)?,
                label: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- images -------------------------------------------------------------

    /// One image per owner, latest wins.
    pub fn upsert_image(&self, image: &EntityImage) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO images (workspace_id, owner_kind, owner_id, data)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                image.workspace_id.as_str(),
                image.owner.as_str(),
                image.owner_id.as_str(),
                image.data
            ],
        )?;
        Ok(())
    }

    pub fn image_for(
        &self,
        workspace_id: &Id,
        owner: ImageOwner,
        owner_id: &Id,
    ) -> Result<Option<EntityImage>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT workspace_id, owner_kind, owner_id, data FROM images
             WHERE workspace_id = ?1 AND owner_kind = ?2 AND owner_id = ?3",
        )?;
        let mut rows = stmt.query_map(
            params![workspace_id.as_str(), owner.as_str(), owner_id.as_str()],
            image_from_row,
        )?;
        Ok(rows.next().transpose()?)
    }

    pub fn images_in(&self, workspace_id: &Id) -> Result<Vec<EntityImage>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT workspace_id, owner_kind, owner_id, data FROM images WHERE workspace_id = ?1",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], image_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }
}

fn image_from_row(row: &Row) -> rusqlite::Result<EntityImage> {
    let owner_kind: String = row.get(1)?;
    let owner = ImageOwner::from_str(&owner_kind).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown image owner kind '{owner_kind}'").into(),
        )
    })?;
    Ok(EntityImage {
        workspace_id: Id::from(row.get::<_, String>(0)?),
        owner,
        owner_id: Id::from(row.get::<_, String>(2)?),
        data: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn unit_name_is_unique_per_workspace() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .with_tx::<_, StoreError>(|tx| {
                let ws = Id::from("ws");
                tx.insert_unit(&Unit { id: Id::from("u1"), workspace_id: ws.clone(), name: "CL".into() })?;
                let dup = tx.insert_unit(&Unit { id: Id::from("u2"), workspace_id: ws.clone(), name: "CL".into() });
                assert!(dup.is_err());
                assert!(dup.unwrap_err().is_constraint_violation());
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn image_upsert_latest_wins() {
        let mut store = Store::open_in_memory().unwrap();
        store
            .with_tx::<_, StoreError>(|tx| {
                let ws = Id::from("ws");
                let owner = Id::from("g1");
                for data in ["old", "new"] {
                    tx.upsert_image(&EntityImage {
                        workspace_id: ws.clone(),
                        owner: ImageOwner::Glass,
                        owner_id: owner.clone(),
                        data: data.into(),
                    })?;
                }
                let img = tx.image_for(&ws, ImageOwner::Glass, &owner)?.unwrap();
                assert_eq!(img.data, "new");
                Ok(())
            })
            .unwrap();
    }
}
