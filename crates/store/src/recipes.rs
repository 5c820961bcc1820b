//! CRUD for recipes, steps, recipe ingredients, and recipe garnishes.

use rusqlite::{params, Row};

use barkeep_core::entity::{Recipe, RecipeGarnish, RecipeIngredient, RecipeStep};
use barkeep_core::Id;

use crate::error::StoreError;
use crate::store::StoreTx;

fn opt_id(value: Option<String>) -> Option<Id> {
    value.map(Id::from)
}

fn recipe_from_row(row: &Row) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: Id::from(row.get::<_, String>(0)?),
        workspace_id: Id::from(row.get::<_, String>(1)?),
        name: row.get(2)?,
        description: row.get(3)?,
        notes: row.get(4)?,
        history: row.get(5)?,
        tags: serde_json::from_str(&row.get::<_, String>(6)?).unwrap_or_default(),
        price: row.get(7)?,
        archived: row.get::<_, i64>(8)? != 0,
        glass_id: opt_id(row.get(9)?),
        ice_id: Id::from(row.get::<_, String>(10)?),
    })
}

impl StoreTx<'_> {
    pub fn insert_recipe(&self, recipe: &Recipe) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO recipes
             (id, workspace_id, name, description, notes, history, tags, price, archived, glass_id, ice_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                recipe.id.as_str(),
                recipe.workspace_id.as_str(),
                recipe.name,
                recipe.description,
                recipe.notes,
                recipe.history,
                serde_json::to_string(&recipe.tags).unwrap_or_else(|_| "[]".into()),
                recipe.price,
                recipe.archived as i64,
                recipe.glass_id.as_ref().map(|id| id.as_str()),
                recipe.ice_id.as_str()
            ],
        )?;
        Ok(())
    }

    pub fn recipe_by_id(&self, workspace_id: &Id, id: &Id) -> Result<Option<Recipe>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, description, notes, history, tags, price, archived, glass_id, ice_id
             FROM recipes WHERE workspace_id = ?1 AND id = ?2",
        )?;
        let mut rows =
            stmt.query_map(params![workspace_id.as_str(), id.as_str()], recipe_from_row)?;
        Ok(rows.next().transpose()?)
    }

    pub fn recipes_in(&self, workspace_id: &Id) -> Result<Vec<Recipe>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, description, notes, history, tags, price, archived, glass_id, ice_id
             FROM recipes WHERE workspace_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], recipe_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- steps --------------------------------------------------------------

    pub fn insert_recipe_step(&self, step: &RecipeStep) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO recipe_steps (id, workspace_id, recipe_id, action_id, step_number, optional)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                step.id.as_str(),
                step.workspace_id.as_str(),
                step.recipe_id.as_str(),
                step.action_id.as_str(),
                step.step_number,
                step.optional as i64
            ],
        )?;
        Ok(())
    }

    pub fn recipe_steps_in(&self, workspace_id: &Id) -> Result<Vec<RecipeStep>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, recipe_id, action_id, step_number, optional
             FROM recipe_steps WHERE workspace_id = ?1 ORDER BY recipe_id, step_number",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], |row| {
            Ok(RecipeStep {
                id: Id::from(row.get::<_, String>(0)?),
                workspace_id: Id::from(row.get::<_, String>(1)?),
                recipe_id: Id::from(row.get::<_, String>(2)?),
                action_id: Id::from(row.get::<_, String>(3)?),
                step_number: row.get(4)?,
                optional: row.get::<_, i64>(5)? != 0,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- recipe ingredients -------------------------------------------------

    pub fn insert_recipe_ingredient(&self, ri: &RecipeIngredient) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO recipe_ingredients
             (id, workspace_id, step_id, ingredient_id, unit_id, amount, ingredient_number, optional)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                ri.id.as_str(),
                ri.workspace_id.as_str(),
                ri.step_id.as_str(),
                ri.ingredient_id.as_ref().map(|id| id.as_str()),
                ri.unit_id.as_ref().map(|id| id.as_str()),
                ri.amount,
                ri.ingredient_number,
                ri.optional as i64
            ],
        )?;
        Ok(())
    }

    pub fn recipe_ingredients_in(
        &self,
        workspace_id: &Id,
    ) -> Result<Vec<RecipeIngredient>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, step_id, ingredient_id, unit_id, amount, ingredient_number, optional
             FROM recipe_ingredients WHERE workspace_id = ?1 ORDER BY step_id, ingredient_number",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], |row| {
            Ok(RecipeIngredient {
                id: Id::from(row.get::<_, String>(0)?),
                workspace_id: Id::from(row.get::<_, String>(1)?),
                step_id: Id::from(row.get::<_, String>(2)?),
                ingredient_id: opt_id(row.get(3)?),
                unit_id: opt_id(row.get(4)?),
                amount: row.get(5)?,
                ingredient_number: row.get(6)?,
                optional: row.get::<_, i64>(7)? != 0,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- recipe garnishes ---------------------------------------------------

    pub fn insert_recipe_garnish_ignore(&self, rg: &RecipeGarnish) -> Result<bool, StoreError> {
        let n = self.conn.execute(
            "INSERT OR IGNORE INTO recipe_garnishes
             (id, workspace_id, recipe_id, garnish_id, garnish_number, optional, alternative, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                rg.id.as_str(),
                rg.workspace_id.as_str(),
                rg.recipe_id.as_str(),
                rg.garnish_id.as_str(),
                rg.garnish_number,
                rg.optional as i64,
                rg.alternative as i64,
                rg.description
            ],
        )?;
        Ok(n > 0)
    }

    pub fn recipe_garnishes_in(&self, workspace_id: &Id) -> Result<Vec<RecipeGarnish>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, recipe_id, garnish_id, garnish_number, optional, alternative, description
             FROM recipe_garnishes WHERE workspace_id = ?1 ORDER BY recipe_id, garnish_number",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], |row| {
            Ok(RecipeGarnish {
                id: Id::from(row.get::<_, String>(0)?),
                workspace_id: Id::from(row.get::<_, String>(1)?),
                recipe_id: Id::from(row.get::<_, String>(2)?),
                garnish_id: Id::from(row.get::<_, String>(3)?),
                garnish_number: row.get(4)?,
                optional: row.get::<_, i64>(5)? != 0,
                alternative: row.get::<_, i64>(6)? != 0,
                description: row.get(7)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }
}
