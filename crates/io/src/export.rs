//! Staged export payload: a single envelope or an array of envelopes, each
//! carrying exactly one entity of one kind plus its directly related
//! collections. The envelope is decoded once into [`ExportEntity`]; the
//! reconciler never branches on optional-field presence.

use serde::{Deserialize, Serialize};

use crate::error::PayloadError;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Wire payload: one envelope or an array of envelopes of the same kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportPayload {
    Single(Box<ExportEnvelope>),
    Many(Vec<ExportEnvelope>),
}

impl ExportPayload {
    pub fn from_json(raw: &str) -> Result<Self, PayloadError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn into_envelopes(self) -> Vec<ExportEnvelope> {
        match self {
            Self::Single(envelope) => vec![*envelope],
            Self::Many(envelopes) => envelopes,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportEnvelope {
    pub export_version: u32,
    pub export_date: Option<String>,
    pub glass: Option<GlassExport>,
    pub garnish: Option<GarnishExport>,
    pub ingredient: Option<IngredientExport>,
    pub ingredient_volumes: Vec<VolumeExport>,
    pub calculation: Option<CalculationExport>,
    pub calculation_items: Vec<CalculationItemExport>,
    pub shopping_units: Vec<ShoppingUnitExport>,
}

impl ExportEnvelope {
    /// Decode into the one entity this envelope carries.
    pub fn into_entity(self) -> Result<ExportEntity, PayloadError> {
        if let Some(glass) = self.glass {
            return Ok(ExportEntity::Glass(glass));
        }
        if let Some(garnish) = self.garnish {
            return Ok(ExportEntity::Garnish(garnish));
        }
        if let Some(ingredient) = self.ingredient {
            return Ok(ExportEntity::Ingredient {
                ingredient,
                volumes: self.ingredient_volumes,
            });
        }
        if let Some(calculation) = self.calculation {
            return Ok(ExportEntity::Calculation {
                calculation,
                items: self.calculation_items,
                shopping_units: self.shopping_units,
            });
        }
        Err(PayloadError::UnknownExportKind)
    }

    /// The display name of whatever entity the envelope carries; empty when
    /// the envelope is malformed (surfaced by the validate phase).
    pub fn entity_name(&self) -> &str {
        if let Some(g) = &self.glass {
            return &g.name;
        }
        if let Some(g) = &self.garnish {
            return &g.name;
        }
        if let Some(i) = &self.ingredient {
            return &i.name;
        }
        if let Some(c) = &self.calculation {
            return &c.name;
        }
        ""
    }
}

/// One export item, decoded. Tagged by kind so downstream phases match on
/// it rather than sniffing optional fields.
#[derive(Debug, Clone)]
pub enum ExportEntity {
    Glass(GlassExport),
    Garnish(GarnishExport),
    Ingredient {
        ingredient: IngredientExport,
        volumes: Vec<VolumeExport>,
    },
    Calculation {
        calculation: CalculationExport,
        items: Vec<CalculationItemExport>,
        shopping_units: Vec<ShoppingUnitExport>,
    },
}

// ---------------------------------------------------------------------------
// Per-kind bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlassExport {
    pub name: String,
    pub deposit: f64,
    pub volume: Option<f64>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GarnishExport {
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub notes: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IngredientExport {
    pub name: String,
    pub short_name: Option<String>,
    pub price: Option<f64>,
    pub link: Option<String>,
    pub tags: Vec<String>,
    pub image: Option<String>,
}

/// Ingredient volume line; the unit travels by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeExport {
    pub volume: f64,
    pub unit_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculationExport {
    pub name: String,
    pub show_sales_stuff: bool,
    pub ignore_revenue: bool,
}

/// Calculation line; the cocktail travels by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalculationItemExport {
    pub cocktail_name: String,
    pub planned_amount: i64,
    pub custom_price: Option<f64>,
}

/// Shopping line; ingredient and unit travel by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShoppingUnitExport {
    pub ingredient_name: String,
    pub unit_name: String,
    pub checked: bool,
}
