//! Full-graph backup importer.
//!
//! Recreates an entire workspace graph inside the destination workspace
//! with freshly generated identifiers, in strict dependency order: an
//! entity kind is only processed once everything it can reference exists.
//! The caller supplies the transaction; any error here aborts it, so the
//! import is all-or-nothing.

use std::collections::BTreeMap;

use serde::Serialize;

use barkeep_core::entity::{
    Calculation, CalculationItem, Card, CardGroup, CardGroupItem, EntityImage, Garnish, Glass,
    Ice, Ingredient, IngredientVolume, Recipe, RecipeGarnish, RecipeIngredient, RecipeStep,
    Setting, ShoppingUnit, StepAction, Translation, Unit, UnitConversion,
};
use barkeep_core::{EntityKind, Id, ImageOwner};
use barkeep_io::backup::{ActionRef, IceRef, NormalizedBackup, UnitRef};
use barkeep_store::StoreTx;

use crate::error::ImportError;
use crate::normalize::Normalizer;
use crate::remap::IdRemapper;

/// Action group used when a legacy `tool` forces an action row into
/// existence and the payload carries no group for it.
const DEFAULT_ACTION_GROUP: &str = "default";

/// Translate a legacy `tool` enum value to a step-action name. Two values
/// were renamed when tools became first-class actions; everything else
/// matches verbatim.
fn legacy_tool_action_name(tool: &str) -> &str {
    match tool {
        "SINGLE_STRAIN" => "STRAIN",
        "WITHOUT" => "POUR",
        other => other,
    }
}

/// Per-kind outcome counts for one backup import run.
#[derive(Debug, Default, Serialize)]
pub struct BackupImportReport {
    pub created: BTreeMap<&'static str, usize>,
    pub reused: BTreeMap<&'static str, usize>,
    pub dropped: BTreeMap<&'static str, usize>,
}

impl BackupImportReport {
    fn add_created(&mut self, kind: EntityKind) {
        *self.created.entry(kind.as_str()).or_insert(0) += 1;
    }

    fn add_reused(&mut self, kind: EntityKind) {
        *self.reused.entry(kind.as_str()).or_insert(0) += 1;
    }

    fn add_dropped(&mut self, kind: EntityKind) {
        *self.dropped.entry(kind.as_str()).or_insert(0) += 1;
    }
}

/// Unit id for a free-text legacy label, counting a materialized row.
fn unit_for_label(
    tx: &StoreTx<'_>,
    workspace_id: &Id,
    normalizer: &mut Normalizer,
    report: &mut BackupImportReport,
    label: &str,
) -> Result<Id, ImportError> {
    let (id, created) = normalizer.unit_for_label(tx, workspace_id, label)?;
    if created {
        report.add_created(EntityKind::Unit);
    }
    Ok(id)
}

/// Ice id for a free-text legacy label, counting a materialized row.
fn ice_for_label(
    tx: &StoreTx<'_>,
    workspace_id: &Id,
    normalizer: &mut Normalizer,
    report: &mut BackupImportReport,
    label: &str,
) -> Result<Id, ImportError> {
    let (id, created) = normalizer.ice_for_label(tx, workspace_id, label)?;
    if created {
        report.add_created(EntityKind::Ice);
    }
    Ok(id)
}

/// Import a normalized backup into `workspace_id`. Runs inside the
/// caller's transaction; the only fatal conditions are store failures and
/// unresolvable required references (a recipe without mappable ice being
/// the canonical one).
pub fn import_backup(
    tx: &StoreTx<'_>,
    workspace_id: &Id,
    actor_id: &Id,
    backup: &NormalizedBackup,
) -> Result<BackupImportReport, ImportError> {
    let mut remap = IdRemapper::new();
    let mut normalizer = Normalizer::new();
    let mut report = BackupImportReport::default();
    let ws = workspace_id;

    // 1. Workspace settings and translations, deduplicated by natural key.
    for (name, value) in &backup.settings {
        let inserted = tx.insert_setting_ignore(&Setting {
            workspace_id: ws.clone(),
            key: name.clone(),
            value: value.clone(),
        })?;
        if inserted {
            report.add_created(EntityKind::Setting);
        } else {
            report.add_reused(EntityKind::Setting);
        }
    }
    for (language, token, label) in &backup.translations {
        let inserted = tx.insert_translation_ignore(&Translation {
            workspace_id: ws.clone(),
            language: language.clone(),
            token: token.clone(),
            label: label.clone(),
        })?;
        if inserted {
            report.add_created(EntityKind::Translation);
        } else {
            report.add_reused(EntityKind::Translation);
        }
    }

    // 2. Units, reused by canonical name.
    for unit in &backup.units {
        let old = Id::from(unit.id.as_str());
        match tx.unit_by_name(ws, &unit.name)? {
            Some(existing) => {
                remap.reuse(EntityKind::Unit, &old, existing.id);
                report.add_reused(EntityKind::Unit);
            }
            None => {
                let id = remap.fresh(EntityKind::Unit, &old);
                tx.insert_unit(&Unit { id, workspace_id: ws.clone(), name: unit.name.clone() })?;
                report.add_created(EntityKind::Unit);
            }
        }
    }

    // 3. Unit conversions: skipped when either endpoint fails to map or an
    // equivalent pair already exists.
    for conversion in &backup.unit_conversions {
        let from = remap.resolve(EntityKind::Unit, &Id::from(conversion.from_unit_id.as_str()));
        let to = remap.resolve(EntityKind::Unit, &Id::from(conversion.to_unit_id.as_str()));
        let (Some(from), Some(to)) = (from, to) else {
            report.add_dropped(EntityKind::UnitConversion);
            continue;
        };
        let inserted = tx.insert_conversion_ignore(&UnitConversion {
            id: Id::fresh(),
            workspace_id: ws.clone(),
            from_unit_id: from.clone(),
            to_unit_id: to.clone(),
            factor: conversion.factor,
        })?;
        if inserted {
            report.add_created(EntityKind::UnitConversion);
        } else {
            report.add_reused(EntityKind::UnitConversion);
        }
    }

    // 4. Step actions, reused by (name, action group).
    for action in &backup.step_actions {
        let old = Id::from(action.id.as_str());
        match tx.step_action_by(ws, &action.name, &action.action_group)? {
            Some(existing) => {
                remap.reuse(EntityKind::StepAction, &old, existing.id);
                report.add_reused(EntityKind::StepAction);
            }
            None => {
                let id = remap.fresh(EntityKind::StepAction, &old);
                tx.insert_step_action(&StepAction {
                    id,
                    workspace_id: ws.clone(),
                    name: action.name.clone(),
                    action_group: action.action_group.clone(),
                })?;
                report.add_created(EntityKind::StepAction);
            }
        }
    }

    // 5. Garnishes, ingredients, glasses: always fresh identifiers.
    for garnish in &backup.garnishes {
        let id = remap.fresh(EntityKind::Garnish, &Id::from(garnish.id.as_str()));
        tx.insert_garnish(&Garnish {
            id,
            workspace_id: ws.clone(),
            name: garnish.name.clone(),
            description: garnish.description.clone(),
            price: garnish.price,
            notes: garnish.notes.clone(),
        })?;
        report.add_created(EntityKind::Garnish);
    }
    for ingredient in &backup.ingredients {
        let id = remap.fresh(EntityKind::Ingredient, &Id::from(ingredient.id.as_str()));
        tx.insert_ingredient(&Ingredient {
            id,
            workspace_id: ws.clone(),
            name: ingredient.name.clone(),
            short_name: ingredient.short_name.clone(),
            price: ingredient.price,
            link: ingredient.link.clone(),
            tags: ingredient.tags.clone(),
        })?;
        report.add_created(EntityKind::Ingredient);
    }
    for glass in &backup.glasses {
        let id = remap.fresh(EntityKind::Glass, &Id::from(glass.id.as_str()));
        tx.insert_glass(&Glass {
            id,
            workspace_id: ws.clone(),
            name: glass.name.clone(),
            deposit: glass.deposit,
            volume: glass.volume,
            notes: glass.notes.clone(),
        })?;
        report.add_created(EntityKind::Glass);
    }

    // Ingredient volumes, through the unit mapping (or the legacy label
    // path), once their ingredient exists.
    for volume in &backup.ingredient_volumes {
        let ingredient_id = remap.require(EntityKind::Ingredient, &volume.ingredient_id)?;
        let unit_id = match &volume.unit {
            UnitRef::ById(old) => remap.require(EntityKind::Unit, old)?,
            UnitRef::Label(label) => {
                unit_for_label(tx, ws, &mut normalizer, &mut report, label)?
            }
        };
        let inserted = tx.insert_volume_ignore(&IngredientVolume {
            id: Id::fresh(),
            workspace_id: ws.clone(),
            ingredient_id,
            unit_id,
            volume: volume.volume,
        })?;
        if inserted {
            report.add_created(EntityKind::IngredientVolume);
        } else {
            report.add_reused(EntityKind::IngredientVolume);
        }
    }

    // 6. Ice, reused by canonical name.
    for ice in &backup.ice {
        let old = Id::from(ice.id.as_str());
        match tx.ice_by_name(ws, &ice.name)? {
            Some(existing) => {
                remap.reuse(EntityKind::Ice, &old, existing.id);
                report.add_reused(EntityKind::Ice);
            }
            None => {
                let id = remap.fresh(EntityKind::Ice, &old);
                tx.insert_ice(&Ice { id, workspace_id: ws.clone(), name: ice.name.clone() })?;
                report.add_created(EntityKind::Ice);
            }
        }
    }

    // 7. Recipes. Glass is optional (dropped when unmappable); ice is
    // required and aborts the whole transaction when unresolvable.
    for recipe in &backup.recipes {
        let glass_id = recipe
            .glass_id
            .as_ref()
            .and_then(|old| remap.resolve(EntityKind::Glass, old).cloned());
        if recipe.glass_id.is_some() && glass_id.is_none() {
            report.add_dropped(EntityKind::Glass);
        }
        let ice_id = match &recipe.ice {
            None => return Err(ImportError::MissingIce { recipe: recipe.name.clone() }),
            Some(IceRef::ById(old)) => remap
                .require(EntityKind::Ice, old)
                .map_err(|_| ImportError::MissingIce { recipe: recipe.name.clone() })?,
            Some(IceRef::Label(label)) => {
                ice_for_label(tx, ws, &mut normalizer, &mut report, label)?
            }
        };
        let id = remap.fresh(EntityKind::Recipe, &recipe.id);
        tx.insert_recipe(&Recipe {
            id,
            workspace_id: ws.clone(),
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            notes: recipe.notes.clone(),
            history: recipe.history.clone(),
            tags: recipe.tags.clone(),
            price: recipe.price,
            archived: recipe.archived,
            glass_id,
            ice_id,
        })?;
        report.add_created(EntityKind::Recipe);
    }

    // 8. Recipe steps; legacy tools translate to action rows, materialized
    // when the destination has none of that name.
    for step in &backup.recipe_steps {
        let recipe_id = remap.require(EntityKind::Recipe, &step.recipe_id)?;
        let action_id = match &step.action {
            ActionRef::ById(old) => remap.require(EntityKind::StepAction, old)?,
            ActionRef::LegacyTool(tool) => {
                let name = legacy_tool_action_name(tool);
                match tx.step_action_by_name(ws, name)? {
                    Some(existing) => existing.id,
                    None => {
                        let action = StepAction {
                            id: Id::fresh(),
                            workspace_id: ws.clone(),
                            name: name.to_string(),
                            action_group: DEFAULT_ACTION_GROUP.to_string(),
                        };
                        tx.insert_step_action(&action)?;
                        report.add_created(EntityKind::StepAction);
                        action.id
                    }
                }
            }
        };
        let id = remap.fresh(EntityKind::RecipeStep, &step.id);
        tx.insert_recipe_step(&RecipeStep {
            id,
            workspace_id: ws.clone(),
            recipe_id,
            action_id,
            step_number: step.step_number,
            optional: step.optional,
        })?;
        report.add_created(EntityKind::RecipeStep);
    }

    // 9. Recipe garnishes and recipe ingredients.
    for rg in &backup.recipe_garnishes {
        let recipe = remap.resolve(EntityKind::Recipe, &Id::from(rg.cocktail_recipe_id.as_str()));
        let garnish = remap.resolve(EntityKind::Garnish, &Id::from(rg.garnish_id.as_str()));
        let (Some(recipe_id), Some(garnish_id)) = (recipe, garnish) else {
            report.add_dropped(EntityKind::RecipeGarnish);
            continue;
        };
        let inserted = tx.insert_recipe_garnish_ignore(&RecipeGarnish {
            id: Id::fresh(),
            workspace_id: ws.clone(),
            recipe_id: recipe_id.clone(),
            garnish_id: garnish_id.clone(),
            garnish_number: rg.garnish_number,
            optional: rg.optional,
            alternative: rg.alternative,
            description: rg.description.clone(),
        })?;
        if inserted {
            report.add_created(EntityKind::RecipeGarnish);
        } else {
            report.add_reused(EntityKind::RecipeGarnish);
        }
    }
    for ri in &backup.recipe_ingredients {
        let step_id = remap.require(EntityKind::RecipeStep, &ri.step_id)?;
        let ingredient_id = ri
            .ingredient_id
            .as_ref()
            .and_then(|old| remap.resolve(EntityKind::Ingredient, old).cloned());
        let unit_id = match &ri.unit {
            Some(UnitRef::ById(old)) => remap.resolve(EntityKind::Unit, old).cloned(),
            Some(UnitRef::Label(label)) => {
                Some(unit_for_label(tx, ws, &mut normalizer, &mut report, label)?)
            }
            None => None,
        };
        tx.insert_recipe_ingredient(&RecipeIngredient {
            id: Id::fresh(),
            workspace_id: ws.clone(),
            step_id,
            ingredient_id,
            unit_id,
            amount: ri.amount,
            ingredient_number: ri.ingredient_number,
            optional: ri.optional,
        })?;
        report.add_created(EntityKind::RecipeIngredient);
    }

    // 10. Cards, groups, items, in dependency order.
    for card in &backup.cards {
        let id = remap.fresh(EntityKind::Card, &Id::from(card.id.as_str()));
        tx.insert_card(&Card {
            id,
            workspace_id: ws.clone(),
            name: card.name.clone(),
            date: card.date,
            archived: card.archived,
        })?;
        report.add_created(EntityKind::Card);
    }
    for group in &backup.card_groups {
        let card_id = remap.require(EntityKind::Card, &Id::from(group.cocktail_card_id.as_str()))?;
        let id = remap.fresh(EntityKind::CardGroup, &Id::from(group.id.as_str()));
        tx.insert_card_group(&CardGroup {
            id,
            workspace_id: ws.clone(),
            card_id,
            name: group.name.clone(),
            group_number: group.group_number,
            group_price: group.group_price,
        })?;
        report.add_created(EntityKind::CardGroup);
    }
    for item in &backup.card_group_items {
        let group_id = remap.require(
            EntityKind::CardGroup,
            &Id::from(item.cocktail_card_group_id.as_str()),
        )?;
        let Some(recipe_id) =
            remap.resolve(EntityKind::Recipe, &Id::from(item.cocktail_id.as_str())).cloned()
        else {
            report.add_dropped(EntityKind::CardGroupItem);
            continue;
        };
        let inserted = tx.insert_card_group_item_ignore(&CardGroupItem {
            id: Id::fresh(),
            workspace_id: ws.clone(),
            group_id,
            recipe_id,
            item_number: item.item_number,
            special_price: item.special_price,
        })?;
        if inserted {
            report.add_created(EntityKind::CardGroupItem);
        } else {
            report.add_reused(EntityKind::CardGroupItem);
        }
    }

    // 11. Calculations. The updating user is always the importer.
    for calculation in &backup.calculations {
        let id = remap.fresh(EntityKind::Calculation, &Id::from(calculation.id.as_str()));
        tx.insert_calculation(&Calculation {
            id,
            workspace_id: ws.clone(),
            name: calculation.name.clone(),
            show_sales_stuff: calculation.show_sales_stuff,
            ignore_revenue: calculation.ignore_revenue,
            updated_by_user_id: actor_id.clone(),
        })?;
        report.add_created(EntityKind::Calculation);
    }
    for item in &backup.calculation_items {
        let calculation_id = remap.require(
            EntityKind::Calculation,
            &Id::from(item.calculation_id.as_str()),
        )?;
        let Some(recipe_id) =
            remap.resolve(EntityKind::Recipe, &Id::from(item.cocktail_id.as_str())).cloned()
        else {
            report.add_dropped(EntityKind::CalculationItem);
            continue;
        };
        let inserted = tx.insert_calculation_item_ignore(&CalculationItem {
            id: Id::fresh(),
            workspace_id: ws.clone(),
            calculation_id,
            recipe_id,
            planned_amount: item.planned_amount,
            custom_price: item.custom_price,
        })?;
        if inserted {
            report.add_created(EntityKind::CalculationItem);
        } else {
            report.add_reused(EntityKind::CalculationItem);
        }
    }
    for su in &backup.shopping_units {
        let calculation_id = remap.require(EntityKind::Calculation, &su.calculation_id)?;
        let Some(ingredient_id) =
            remap.resolve(EntityKind::Ingredient, &su.ingredient_id).cloned()
        else {
            report.add_dropped(EntityKind::ShoppingUnit);
            continue;
        };
        let unit_id = match &su.unit {
            UnitRef::ById(old) => match remap.resolve(EntityKind::Unit, old) {
                Some(id) => id.clone(),
                None => {
                    report.add_dropped(EntityKind::ShoppingUnit);
                    continue;
                }
            },
            UnitRef::Label(label) => {
                unit_for_label(tx, ws, &mut normalizer, &mut report, label)?
            }
        };
        let inserted = tx.insert_shopping_unit_ignore(&ShoppingUnit {
            id: Id::fresh(),
            workspace_id: ws.clone(),
            calculation_id,
            ingredient_id,
            unit_id,
            checked: su.checked,
        })?;
        if inserted {
            report.add_created(EntityKind::ShoppingUnit);
        } else {
            report.add_reused(EntityKind::ShoppingUnit);
        }
    }

    // 12. Images, once every owner exists. Latest wins per owner.
    for image in &backup.images {
        let kind = match image.owner {
            ImageOwner::Glass => EntityKind::Glass,
            ImageOwner::Garnish => EntityKind::Garnish,
            ImageOwner::Ingredient => EntityKind::Ingredient,
            ImageOwner::Recipe => EntityKind::Recipe,
        };
        let Some(owner_id) = remap.resolve(kind, &image.owner_id).cloned() else {
            report.add_dropped(EntityKind::Image);
            continue;
        };
        tx.upsert_image(&EntityImage {
            workspace_id: ws.clone(),
            owner: image.owner,
            owner_id,
            data: image.data.clone(),
        })?;
        report.add_created(EntityKind::Image);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renamed_tools_translate() {
        assert_eq!(legacy_tool_action_name("SINGLE_STRAIN"), "STRAIN");
        assert_eq!(legacy_tool_action_name("WITHOUT"), "POUR");
        assert_eq!(legacy_tool_action_name("SHAKE"), "SHAKE");
    }
}
