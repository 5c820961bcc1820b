use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::id::Id;
use crate::kind::ImageOwner;

// ---------------------------------------------------------------------------
// Reference data (natural-keyed by canonical name token)
// ---------------------------------------------------------------------------

/// Measurement unit. `name` is a canonical token (e.g. `CL`) that doubles as
/// the join key when deduplicating across workspaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: Id,
    pub workspace_id: Id,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConversion {
    pub id: Id,
    pub workspace_id: Id,
    pub from_unit_id: Id,
    pub to_unit_id: Id,
    pub factor: f64,
}

/// Ice style. `name` is a canonical token (e.g. `ICE_CUBES`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ice {
    pub id: Id,
    pub workspace_id: Id,
    pub name: String,
}

/// Preparation step action, keyed by (name, action_group) within a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepAction {
    pub id: Id,
    pub workspace_id: Id,
    pub name: String,
    pub action_group: String,
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glass {
    pub id: Id,
    pub workspace_id: Id,
    pub name: String,
    pub deposit: f64,
    pub volume: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Garnish {
    pub id: Id,
    pub workspace_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Id,
    pub workspace_id: Id,
    pub name: String,
    pub short_name: Option<String>,
    pub price: Option<f64>,
    pub link: Option<String>,
    pub tags: Vec<String>,
}

/// Purchasable volume of an ingredient in a given unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientVolume {
    pub id: Id,
    pub workspace_id: Id,
    pub ingredient_id: Id,
    pub unit_id: Id,
    pub volume: f64,
}

// ---------------------------------------------------------------------------
// Recipes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Id,
    pub workspace_id: Id,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub history: Option<String>,
    pub tags: Vec<String>,
    pub price: Option<f64>,
    pub archived: bool,
    /// Optional relation: dropped on import when unmappable.
    pub glass_id: Option<Id>,
    /// Required relation: an unmappable ice reference aborts an import.
    pub ice_id: Id,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeStep {
    pub id: Id,
    pub workspace_id: Id,
    pub recipe_id: Id,
    pub action_id: Id,
    pub step_number: i64,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: Id,
    pub workspace_id: Id,
    pub step_id: Id,
    pub ingredient_id: Option<Id>,
    pub unit_id: Option<Id>,
    pub amount: Option<f64>,
    pub ingredient_number: i64,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeGarnish {
    pub id: Id,
    pub workspace_id: Id,
    pub recipe_id: Id,
    pub garnish_id: Id,
    pub garnish_number: i64,
    pub optional: bool,
    pub alternative: bool,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Id,
    pub workspace_id: Id,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub archived: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardGroup {
    pub id: Id,
    pub workspace_id: Id,
    pub card_id: Id,
    pub name: String,
    pub group_number: i64,
    pub group_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardGroupItem {
    pub id: Id,
    pub workspace_id: Id,
    pub group_id: Id,
    pub recipe_id: Id,
    pub item_number: i64,
    pub special_price: Option<f64>,
}

// ---------------------------------------------------------------------------
// Calculations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub id: Id,
    pub workspace_id: Id,
    pub name: String,
    pub show_sales_stuff: bool,
    pub ignore_revenue: bool,
    /// Always the importing user on a copy, never carried from the source.
    pub updated_by_user_id: Id,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationItem {
    pub id: Id,
    pub workspace_id: Id,
    pub calculation_id: Id,
    pub recipe_id: Id,
    pub planned_amount: i64,
    pub custom_price: Option<f64>,
}

/// One line of a calculation's shopping list. The unit relation is
/// structurally always present; it is never a droppable dependent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingUnit {
    pub id: Id,
    pub workspace_id: Id,
    pub calculation_id: Id,
    pub ingredient_id: Id,
    pub unit_id: Id,
    pub checked: bool,
}

// ---------------------------------------------------------------------------
// Workspace-level data
// ---------------------------------------------------------------------------

/// Single image per owning entity (1:1, latest wins). Payload is base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityImage {
    pub workspace_id: Id,
    pub owner: ImageOwner,
    pub owner_id: Id,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub workspace_id: Id,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub workspace_id: Id,
    pub language: String,
    pub token: String,
    pub label: String,
}
