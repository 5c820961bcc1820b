//! CRUD for cocktail cards, card groups, and card group items.

use chrono::NaiveDate;
use rusqlite::{params, Row};

use barkeep_core::entity::{Card, CardGroup, CardGroupItem};
use barkeep_core::Id;

use crate::error::StoreError;
use crate::store::StoreTx;

fn card_from_row(row: &Row) -> rusqlite::Result<Card> {
    let date: Option<String> = row.get(3)?;
    Ok(Card {
        id: Id::from(row.get::<_, String>(0)?),
        workspace_id: Id::from(row.get::<_, String>(1)?),
        name: row.get(2)?,
        date: date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        archived: row.get::<_, i64>(4)? != 0,
    })
}

impl StoreTx<'_> {
    pub fn insert_card(&self, card: &Card) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO cards (id, workspace_id, name, date, archived)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                card.id.as_str(),
                card.workspace_id.as_str(),
                card.name,
                card.date.map(|d| d.format("%Y-%m-%d").to_string()),
                card.archived as i64
            ],
        )?;
        Ok(())
    }

    pub fn cards_in(&self, workspace_id: &Id) -> Result<Vec<Card>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, name, date, archived FROM cards
             WHERE workspace_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], card_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn insert_card_group(&self, group: &CardGroup) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO card_groups (id, workspace_id, card_id, name, group_number, group_price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                group.id.as_str(),
                group.workspace_id.as_str(),
                group.card_id.as_str(),
                group.name,
                group.group_number,
                group.group_price
            ],
        )?;
        Ok(())
    }

    pub fn card_groups_in(&self, workspace_id: &Id) -> Result<Vec<CardGroup>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, card_id, name, group_number, group_price FROM card_groups
             WHERE workspace_id = ?1 ORDER BY card_id, group_number",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], |row| {
            Ok(CardGroup {
                id: Id::from(row.get::<_, String>(0)?),
                workspace_id: Id::from(row.get::<_, String>(1)?),
                card_id: Id::from(row.get::<_, String>(2)?),
                name: row.get(3)?,
                group_number: row.get(4)?,
                group_price: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn insert_card_group_item_ignore(&self, item: &CardGroupItem) -> Result<bool, StoreError> {
        let n = self.conn.execute(
            "INSERT OR IGNORE INTO card_group_items
             (id, workspace_id, group_id, recipe_id, item_number, special_price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.id.as_str(),
                item.workspace_id.as_str(),
                item.group_id.as_str(),
                item.recipe_id.as_str(),
                item.item_number,
                item.special_price
            ],
        )?;
        Ok(n > 0)
    }

    pub fn card_group_items_in(&self, workspace_id: &Id) -> Result<Vec<CardGroupItem>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, workspace_id, group_id, recipe_id, item_number, special_price
             FROM card_group_items WHERE workspace_id = ?1 ORDER BY group_id, item_number",
        )?;
        let rows = stmt.query_map([workspace_id.as_str()], |row| {
            Ok(CardGroupItem {
                id: Id::from(row.get::<_, String>(0)?),
                workspace_id: Id::from(row.get::<_, String>(1)?),
                group_id: Id::from(row.get::<_, String>(2)?),
                recipe_id: Id::from(row.get::<_, String>(3)?),
                item_number: row.get(4)?,
                special_price: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }
}
