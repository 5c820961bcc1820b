use serde::{Deserialize, Serialize};

/// Every entity kind that participates in identifier remapping or audit
/// records. Identifiers are only unique within one (kind, workspace) pair,
/// so the remapper keeps one table per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Glass,
    Garnish,
    Ingredient,
    IngredientVolume,
    Unit,
    UnitConversion,
    Ice,
    StepAction,
    Recipe,
    RecipeStep,
    RecipeIngredient,
    RecipeGarnish,
    Card,
    CardGroup,
    CardGroupItem,
    Calculation,
    CalculationItem,
    ShoppingUnit,
    Image,
    Setting,
    Translation,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Glass => "glass",
            Self::Garnish => "garnish",
            Self::Ingredient => "ingredient",
            Self::IngredientVolume => "ingredient_volume",
            Self::Unit => "unit",
            Self::UnitConversion => "unit_conversion",
            Self::Ice => "ice",
            Self::StepAction => "step_action",
            Self::Recipe => "recipe",
            Self::RecipeStep => "recipe_step",
            Self::RecipeIngredient => "recipe_ingredient",
            Self::RecipeGarnish => "recipe_garnish",
            Self::Card => "card",
            Self::CardGroup => "card_group",
            Self::CardGroupItem => "card_group_item",
            Self::Calculation => "calculation",
            Self::CalculationItem => "calculation_item",
            Self::ShoppingUnit => "shopping_unit",
            Self::Image => "image",
            Self::Setting => "setting",
            Self::Translation => "translation",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kinds that can own a single image (1:1, latest wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageOwner {
    Glass,
    Garnish,
    Ingredient,
    Recipe,
}

impl ImageOwner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Glass => "glass",
            Self::Garnish => "garnish",
            Self::Ingredient => "ingredient",
            Self::Recipe => "recipe",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "glass" => Some(Self::Glass),
            "garnish" => Some(Self::Garnish),
            "ingredient" => Some(Self::Ingredient),
            "recipe" => Some(Self::Recipe),
            _ => None,
        }
    }
}

impl std::fmt::Display for ImageOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
