//! CRUD for cost calculations, their items, and shopping-list lines.

use rusqlite::{params, Row};

use barkeep_core::entity::{Calculation, CalculationItem, ShoppingUnit};
use barkeep_core::Id;

use crate::error::StoreError;
use crate::store::StoreTx;

fn calculation_from_row(row: &Row) -> rusqlite::Result<Calculation> {
    Ok(Calculation {
        id: Id::from(row.get::<_, String>(0)?),
        workspace_id: Id::from(row.get::<_, String>(1)?),
        name: row.get(2)?,
        show_sales_stuff: row.get::<_, i64>(3)? != 0,
        ignore_revenue: row.get::<_, i64>(4)? != 0,
        updated_by_user_id: Id::from(row.get::<_, String>(5)?),
    })
}

impl StoreTx<'_> {
    pub fn insert_calculation(&self, calc: &Calculation) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO calculations
             (id, workspace_id, name, show_sales_stuff, ignore_revenue, updated_by_user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                calc.id.as_str(),
                calc.workspace_id.as_str(),
                calc.name,
                calc.show_sales_stuff as i64,
                calc.ignore_revenue as i64,
                calc.updated_by_user_id.as_str()
            ],
        )?;
        Ok(())
    }

    pub fn update_calculation(&self, calc: &Calculation) -> Result<(), StoreError> {
        let n = self.conn.execute(
            "UPDATE calculations
             SET name = ?3, show_sales_stuff = ?4, ignore_revenue = ?5, updated_by_user_id = ?6
             WHERE id = ?1 AND workspace_id = ?2",
            params![
                calc.id.as_str(),
                calc.workspace_id.as_str(),
                calc.name,
                calc.show_sales_stuff as i64,
                calc.ignore_revenue as i64,
                calc.updated_by_user_id.as_str()
            ],
        )?;
        if n == 0 {
            return Err(StoreError::NotFound { table: "calculations", id: calc.id.to_string() });
        }
        Ok(())
    }

    pub fn calculation_by_id(
        &self,
        workspace_id: &Id,
        id: &Id,
    ) -> Result<Option<Calculation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, show_sales_stuff, ignore_revenue, updated_by_user_id
             FROM calculations WHERE workspace_id = ?1 AND id = ?2",
        )?;
        let mut rows = stmt.query_map(
            params![workspace_id.as_str(), id.as_str()],
            calculation_from_row,
        )?;
        Ok(rows.next().transpose()?)
    }

    pub fn calculations_in(&self, workspace_id: &Id) -> Result<Vec<Calculation>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, show_sales_stuff, ignore_revenue, updated_by_user_id
             FROM calculations WHERE workspace_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], calculation_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// Delete a calculation's dependent child rows (items and shopping
    /// lines), used before an overwrite recreates them.
    pub fn delete_calculation_children(
        &self,
        workspace_id: &Id,
        calculation_id: &Id,
    ) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM calculation_items WHERE workspace_id = ?1 AND calculation_id = ?2",
            params![workspace_id.as_str(), calculation_id.as_str()],
        )?;
        self.conn.execute(
            "DELETE FROM shopping_units WHERE workspace_id = ?1 AND calculation_id = ?2",
            params![workspace_id.as_str(), calculation_id.as_str()],
        )?;
        Ok(())
    }

    // -- items --------------------------------------------------------------

    pub fn insert_calculation_item_ignore(
        &self,
        item: &CalculationItem,
    ) -> Result<bool, StoreError> {
        let n = self.conn.execute(
            "INSERT OR IGNORE INTO calculation_items
             (id, workspace_id, calculation_id, recipe_id, planned_amount, custom_price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.id.as_str(),
                item.workspace_id.as_str(),
                item.calculation_id.as_str(),
                item.recipe_id.as_str(),
                item.planned_amount,
                item.custom_price
            ],
        )?;
        Ok(n > 0)
    }

    pub fn calculation_items_for(
        &self,
        workspace_id: &Id,
        calculation_id: &Id,
    ) -> Result<Vec<CalculationItem>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, calculation_id, recipe_id, planned_amount, custom_price
             FROM calculation_items WHERE workspace_id = ?1 AND calculation_id = ?2",
        )?;
        let rows = stmt.query_map(
            params![workspace_id.as_str(), calculation_id.as_str()],
            item_from_row,
        )?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn calculation_items_in(
        &self,
        workspace_id: &Id,
    ) -> Result<Vec<CalculationItem>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, calculation_id, recipe_id, planned_amount, custom_price
             FROM calculation_items WHERE workspace_id = ?1",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], item_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    // -- shopping units -----------------------------------------------------

    pub fn insert_shopping_unit_ignore(&self, su: &ShoppingUnit) -> Result<bool, StoreError> {
        let n = self.conn.execute(
            "INSERT OR IGNORE INTO shopping_units
             (id, workspace_id, calculation_id, ingredient_id, unit_id, checked)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                su.id.as_str(),
                su.workspace_id.as_str(),
                su.calculation_id.as_str(),
                su.ingredient_id.as_str(),
                su.unit_id.as_str(),
                su.checked as i64
            ],
        )?;
        Ok(n > 0)
    }

    pub fn shopping_units_for(
        &self,
        workspace_id: &Id,
        calculation_id: &Id,
    ) -> Result<Vec<ShoppingUnit>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, calculation_id, ingredient_id, unit_id, checked
             FROM shopping_units WHERE workspace_id = ?1 AND calculation_id = ?2",
        )?;
        let rows = stmt.query_map(
            params![workspace_id.as_str(), calculation_id.as_str()],
            shopping_from_row,
        )?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn shopping_units_in(&self, workspace_id: &Id) -> Result<Vec<ShoppingUnit>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, calculation_id, ingredient_id, unit_id, checked
             FROM shopping_units WHERE workspace_id = ?1",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], shopping_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }
}

fn item_from_row(row: &Row) -> rusqlite::Result<CalculationItem> {
    Ok(CalculationItem {
        id: Id::from(row.get::<_, String>(0)?),
        workspace_id: Id::from(row.get::<_, String>(1)?),
        calculation_id: Id::from(row.get::<_, String>(2)?),
        recipe_id: Id::from(row.get::<_, String>(3)?),
        planned_amount: row.get(4)?,
        custom_price: row.get(5)?,
    })
}

fn shopping_from_row(row: &Row) -> rusqlite::Result<ShoppingUnit> {
    Ok(ShoppingUnit {
        id: Id::from(row.get::<_, String>(0)?),
        workspace_id: Id::from(row.get::<_, String>(1)?),
        calculation_id: Id::from(row.get::<_, String>(2)?),
        ingredient_id: Id::from(row.get::<_, String>(3)?),
        unit_id: Id::from(row.get::<_, String>(4)?),
        checked: row.get::<_, i64>(5)? != 0,
    })
}
