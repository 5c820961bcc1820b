//! Full-backup payload: one array per entity kind, source-tenant ids
//! throughout, camelCase field names for compatibility with the historical
//! export format.
//!
//! Legacy encodings (free-text `unit` labels, `glassWithIce` on the recipe
//! row, the `tool` step enum, inline `image` fields) are decoded here, once,
//! into explicit reference enums. The remapping algorithms only ever see the
//! canonical [`NormalizedBackup`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use barkeep_core::{Id, ImageOwner};

use crate::error::PayloadError;

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupPayload {
    pub settings: Vec<WireSetting>,
    pub translations: Vec<WireTranslation>,
    pub units: Vec<WireUnit>,
    pub unit_conversions: Vec<WireUnitConversion>,
    pub step_actions: Vec<WireStepAction>,
    pub garnishes: Vec<WireGarnish>,
    pub ingredients: Vec<WireIngredient>,
    pub ingredient_volumes: Vec<WireIngredientVolume>,
    pub glasses: Vec<WireGlass>,
    pub ice: Vec<WireIce>,
    pub cocktail_recipes: Vec<WireRecipe>,
    pub cocktail_recipe_steps: Vec<WireRecipeStep>,
    pub cocktail_recipe_ingredients: Vec<WireRecipeIngredient>,
    pub cocktail_recipe_garnishes: Vec<WireRecipeGarnish>,
    pub cocktail_cards: Vec<WireCard>,
    pub cocktail_card_groups: Vec<WireCardGroup>,
    pub cocktail_card_group_items: Vec<WireCardGroupItem>,
    pub cocktail_calculations: Vec<WireCalculation>,
    pub cocktail_calculation_items: Vec<WireCalculationItem>,
    pub ingredient_shopping_units: Vec<WireShoppingUnit>,
    pub glass_images: Vec<WireOwnedImage>,
    pub garnish_images: Vec<WireOwnedImage>,
    pub ingredient_images: Vec<WireOwnedImage>,
    pub cocktail_recipe_images: Vec<WireOwnedImage>,
}

impl BackupPayload {
    pub fn from_json(raw: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireSetting {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireTranslation {
    pub language: String,
    pub token: String,
    pub label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireUnit {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireUnitConversion {
    pub id: String,
    pub from_unit_id: String,
    pub to_unit_id: String,
    pub factor: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireStepAction {
    pub id: String,
    pub name: String,
    pub action_group: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireGlass {
    pub id: String,
    pub name: String,
    pub deposit: f64,
    pub volume: Option<f64>,
    pub notes: Option<String>,
    /// Legacy payloads inline the image on the owning row.
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireGarnish {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireIngredient {
    pub id: String,
    pub name: String,
    pub short_name: Option<String>,
    pub price: Option<f64>,
    pub link: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireIngredientVolume {
    pub id: String,
    pub ingredient_id: String,
    pub volume: f64,
    /// Current encoding.
    pub unit_id: Option<String>,
    /// Legacy encoding: free-text unit label.
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireIce {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireRecipe {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub history: Option<String>,
    pub tags: Vec<String>,
    pub price: Option<f64>,
    pub archived: bool,
    pub glass_id: Option<String>,
    /// Current encoding.
    pub ice_id: Option<String>,
    /// Legacy encoding: free-text ice description on the recipe row.
    pub glass_with_ice: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireRecipeStep {
    pub id: String,
    pub cocktail_recipe_id: String,
    /// Current encoding.
    pub action_id: Option<String>,
    /// Legacy encoding: step-action enum value.
    pub tool: Option<String>,
    pub step_number: i64,
    pub optional: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireRecipeIngredient {
    pub id: String,
    pub cocktail_recipe_step_id: String,
    pub ingredient_id: Option<String>,
    pub unit_id: Option<String>,
    /// Legacy encoding: free-text unit label inline on the row.
    pub unit: Option<String>,
    pub amount: Option<f64>,
    pub ingredient_number: i64,
    pub optional: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireRecipeGarnish {
    pub cocktail_recipe_id: String,
    pub garnish_id: String,
    pub garnish_number: i64,
    pub optional: bool,
    pub alternative: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireCard {
    pub id: String,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub archived: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireCardGroup {
    pub id: String,
    pub cocktail_card_id: String,
    pub name: String,
    pub group_number: i64,
    pub group_price: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireCardGroupItem {
    pub cocktail_card_group_id: String,
    pub cocktail_id: String,
    pub item_number: i64,
    pub special_price: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireCalculation {
    pub id: String,
    pub name: String,
    pub show_sales_stuff: bool,
    pub ignore_revenue: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireCalculationItem {
    pub calculation_id: String,
    pub cocktail_id: String,
    pub planned_amount: i64,
    pub custom_price: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireShoppingUnit {
    pub calculation_id: String,
    pub ingredient_id: String,
    pub unit_id: Option<String>,
    pub unit: Option<String>,
    pub checked: bool,
}

/// Current image encoding: separate array per owning kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WireOwnedImage {
    pub owner_id: String,
    pub image: String,
}

// ---------------------------------------------------------------------------
// Canonical representation
// ---------------------------------------------------------------------------

/// Reference to a unit: by source-tenant id (current payloads) or by a
/// free-text legacy label that still needs normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitRef {
    ById(Id),
    Label(String),
}

/// Reference to an ice style, same split as [`UnitRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IceRef {
    ById(Id),
    Label(String),
}

/// Reference to a step action: by id, or via the legacy `tool` enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRef {
    ById(Id),
    LegacyTool(String),
}

#[derive(Debug, Clone)]
pub struct NormalizedBackup {
    pub settings: Vec<(String, String)>,
    pub translations: Vec<(String, String, String)>,
    pub units: Vec<WireUnit>,
    pub unit_conversions: Vec<WireUnitConversion>,
    pub step_actions: Vec<WireStepAction>,
    pub garnishes: Vec<WireGarnish>,
    pub ingredients: Vec<WireIngredient>,
    pub ingredient_volumes: Vec<NormalizedVolume>,
    pub glasses: Vec<WireGlass>,
    pub ice: Vec<WireIce>,
    pub recipes: Vec<NormalizedRecipe>,
    pub recipe_steps: Vec<NormalizedStep>,
    pub recipe_ingredients: Vec<NormalizedRecipeIngredient>,
    pub recipe_garnishes: Vec<WireRecipeGarnish>,
    pub cards: Vec<WireCard>,
    pub card_groups: Vec<WireCardGroup>,
    pub card_group_items: Vec<WireCardGroupItem>,
    pub calculations: Vec<WireCalculation>,
    pub calculation_items: Vec<WireCalculationItem>,
    pub shopping_units: Vec<NormalizedShoppingUnit>,
    /// All images, inline-legacy and separate-array encodings merged.
    /// Array entries come last so they win under latest-wins upserts.
    pub images: Vec<NormalizedImage>,
}

#[derive(Debug, Clone)]
pub struct NormalizedVolume {
    pub ingredient_id: Id,
    pub unit: UnitRef,
    pub volume: f64,
}

#[derive(Debug, Clone)]
pub struct NormalizedRecipe {
    pub id: Id,
    pub name: String,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub history: Option<String>,
    pub tags: Vec<String>,
    pub price: Option<f64>,
    pub archived: bool,
    pub glass_id: Option<Id>,
    /// `None` means the payload carried no ice at all; the importer treats
    /// that the same as an unmappable reference (fatal).
    pub ice: Option<IceRef>,
}

#[derive(Debug, Clone)]
pub struct NormalizedStep {
    pub id: Id,
    pub recipe_id: Id,
    pub action: ActionRef,
    pub step_number: i64,
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub struct NormalizedRecipeIngredient {
    pub step_id: Id,
    pub ingredient_id: Option<Id>,
    pub unit: Option<UnitRef>,
    pub amount: Option<f64>,
    pub ingredient_number: i64,
    pub optional: bool,
}

#[derive(Debug, Clone)]
pub struct NormalizedShoppingUnit {
    pub calculation_id: Id,
    pub ingredient_id: Id,
    pub unit: UnitRef,
    pub checked: bool,
}

#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub owner: ImageOwner,
    pub owner_id: Id,
    pub data: String,
}

fn unit_ref(unit_id: Option<String>, label: Option<String>) -> Option<UnitRef> {
    match (unit_id, label) {
        (Some(id), _) => Some(UnitRef::ById(Id::from(id))),
        (None, Some(label)) => Some(UnitRef::Label(label)),
        (None, None) => None,
    }
}

impl BackupPayload {
    /// Decode every legacy encoding into the canonical representation. All
    /// branching on field presence happens here; the importer never checks
    /// payload shape again.
    pub fn normalize(self) -> Result<NormalizedBackup, PayloadError> {
        let mut images = Vec::new();
        for g in &self.glasses {
            if let Some(data) = &g.image {
                images.push(NormalizedImage {
                    owner: ImageOwner::Glass,
                    owner_id: Id::from(g.id.as_str()),
                    data: data.clone(),
                });
            }
        }
        for g in &self.garnishes {
            if let Some(data) = &g.image {
                images.push(NormalizedImage {
                    owner: ImageOwner::Garnish,
                    owner_id: Id::from(g.id.as_str()),
                    data: data.clone(),
                });
            }
        }
        for i in &self.ingredients {
            if let Some(data) = &i.image {
                images.push(NormalizedImage {
                    owner: ImageOwner::Ingredient,
                    owner_id: Id::from(i.id.as_str()),
                    data: data.clone(),
                });
            }
        }
        for r in &self.cocktail_recipes {
            if let Some(data) = &r.image {
                images.push(NormalizedImage {
                    owner: ImageOwner::Recipe,
                    owner_id: Id::from(r.id.as_str()),
                    data: data.clone(),
                });
            }
        }
        let owned = [
            (ImageOwner::Glass, &self.glass_images),
            (ImageOwner::Garnish, &self.garnish_images),
            (ImageOwner::Ingredient, &self.ingredient_images),
            (ImageOwner::Recipe, &self.cocktail_recipe_images),
        ];
        for (owner, list) in owned {
            for img in list.iter() {
                images.push(NormalizedImage {
                    owner,
                    owner_id: Id::from(img.owner_id.as_str()),
                    data: img.image.clone(),
                });
            }
        }

        let mut volumes = Vec::with_capacity(self.ingredient_volumes.len());
        for v in self.ingredient_volumes {
            let unit = unit_ref(v.unit_id, v.unit).ok_or(PayloadError::MissingField {
                entity: "ingredientVolume",
                field: "unitId",
                id: v.id.clone(),
            })?;
            volumes.push(NormalizedVolume {
                ingredient_id: Id::from(v.ingredient_id),
                unit,
                volume: v.volume,
            });
        }

        let recipes = self
            .cocktail_recipes
            .into_iter()
            .map(|r| {
                let ice = match (r.ice_id, r.glass_with_ice) {
                    (Some(id), _) => Some(IceRef::ById(Id::from(id))),
                    (None, Some(label)) => Some(IceRef::Label(label)),
                    (None, None) => None,
                };
                NormalizedRecipe {
                    id: Id::from(r.id),
                    name: r.name,
                    description: r.description,
                    notes: r.notes,
                    history: r.history,
                    tags: r.tags,
                    price: r.price,
                    archived: r.archived,
                    glass_id: r.glass_id.map(Id::from),
                    ice,
                }
            })
            .collect();

        let mut steps = Vec::with_capacity(self.cocktail_recipe_steps.len());
        for s in self.cocktail_recipe_steps {
            let action = match (s.action_id, s.tool) {
                (Some(id), _) => ActionRef::ById(Id::from(id)),
                (None, Some(tool)) => ActionRef::LegacyTool(tool),
                (None, None) => {
                    return Err(PayloadError::MissingField {
                        entity: "cocktailRecipeStep",
                        field: "actionId",
                        id: s.id,
                    })
                }
            };
            steps.push(NormalizedStep {
                id: Id::from(s.id),
                recipe_id: Id::from(s.cocktail_recipe_id),
                action,
                step_number: s.step_number,
                optional: s.optional,
            });
        }

        let recipe_ingredients = self
            .cocktail_recipe_ingredients
            .into_iter()
            .map(|ri| NormalizedRecipeIngredient {
                step_id: Id::from(ri.cocktail_recipe_step_id),
                ingredient_id: ri.ingredient_id.map(Id::from),
                unit: unit_ref(ri.unit_id, ri.unit),
                amount: ri.amount,
                ingredient_number: ri.ingredient_number,
                optional: ri.optional,
            })
            .collect();

        let mut shopping_units = Vec::with_capacity(self.ingredient_shopping_units.len());
        for su in self.ingredient_shopping_units {
            let unit = unit_ref(su.unit_id, su.unit).ok_or(PayloadError::MissingField {
                entity: "ingredientShoppingUnit",
                field: "unitId",
                id: su.ingredient_id.clone(),
            })?;
            shopping_units.push(NormalizedShoppingUnit {
                calculation_id: Id::from(su.calculation_id),
                ingredient_id: Id::from(su.ingredient_id),
                unit,
                checked: su.checked,
            });
        }

        Ok(NormalizedBackup {
            settings: self.settings.into_iter().map(|s| (s.name, s.value)).collect(),
            translations: self
                .translations
                .into_iter()
                .map(|t| (t.language, t.token, t.label))
                .collect(),
            units: self.units,
            unit_conversions: self.unit_conversions,
            step_actions: self.step_actions,
            garnishes: self.garnishes,
            ingredients: self.ingredients,
            ingredient_volumes: volumes,
            glasses: self.glasses,
            ice: self.ice,
            recipes,
            recipe_steps: steps,
            recipe_ingredients,
            recipe_garnishes: self.cocktail_recipe_garnishes,
            cards: self.cocktail_cards,
            card_groups: self.cocktail_card_groups,
            card_group_items: self.cocktail_card_group_items,
            calculations: self.cocktail_calculations,
            calculation_items: self.cocktail_calculation_items,
            shopping_units,
            images,
        })
    }
}
