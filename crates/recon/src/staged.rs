//! Staged reconciler: validate, prepare-mapping, execute.
//!
//! The three phases share no server-side state. `validate` is pure,
//! `prepare_mapping` only reads the destination, and `execute` applies the
//! operator's decisions inside one transaction with a savepoint per item,
//! so one failing item rolls back alone and is reported without aborting
//! the rest of the batch.

use barkeep_core::audit::{AuditSink, ChangeAction, ChangeRecord};
use barkeep_core::entity::{
    Calculation, CalculationItem, EntityImage, Garnish, Glass, Ingredient, IngredientVolume,
    ShoppingUnit, Unit,
};
use barkeep_core::{EntityKind, Id, ImageOwner};
use barkeep_io::decision::{
    Candidate, ExecuteReport, ExecuteResult, ItemDecision, ItemProposal, ItemStatus,
    MappingProposal, RefMapping, RefMappings, RefSuggestion, ValidateItem, ValidateReport,
};
use barkeep_io::export::{
    CalculationItemExport, ExportEntity, ExportEnvelope, ShoppingUnitExport, VolumeExport,
};
use barkeep_io::PayloadError;
use barkeep_store::StoreTx;

use crate::error::ImportError;

// ---------------------------------------------------------------------------
// Validate
// ---------------------------------------------------------------------------

/// Shape check for an execute batch. An item is valid when its envelope
/// carries a recognizable entity with a non-empty name.
pub fn validate(envelopes: &[ExportEnvelope]) -> ValidateReport {
    let items: Vec<ValidateItem> = envelopes
        .iter()
        .map(|envelope| {
            let name = envelope.entity_name();
            ValidateItem { name: name.to_string(), valid: !name.trim().is_empty() }
        })
        .collect();
    let valid = items.iter().all(|i| i.valid);
    ValidateReport { items, valid }
}

// ---------------------------------------------------------------------------
// Prepare mapping
// ---------------------------------------------------------------------------

fn candidates<T>(list: &[T], id_of: impl Fn(&T) -> &Id, name_of: impl Fn(&T) -> &str) -> Vec<Candidate> {
    list.iter()
        .map(|e| Candidate { id: id_of(e).clone(), name: name_of(e).to_string() })
        .collect()
}

fn name_conflicts(pool: &[Candidate], name: &str) -> Vec<Candidate> {
    let lower = name.to_lowercase();
    pool.iter().filter(|c| c.name.to_lowercase() == lower).cloned().collect()
}

/// Resolution proposal for one referenced name: exact case-insensitive
/// match as the auto candidate, substring containment (either direction)
/// as the wider option list.
fn suggestion(export_name: &str, pool: &[Candidate]) -> RefSuggestion {
    let lower = export_name.to_lowercase();
    let auto_match = pool.iter().find(|c| c.name.to_lowercase() == lower).cloned();
    let options = pool
        .iter()
        .filter(|c| {
            let candidate = c.name.to_lowercase();
            candidate.contains(&lower) || lower.contains(&candidate)
        })
        .cloned()
        .collect();
    RefSuggestion { export_name: export_name.to_string(), auto_match, options }
}

/// First-seen order, deduplicated case-insensitively.
fn dedup_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for name in names {
        if seen.insert(name.to_lowercase()) {
            out.push(name.to_string());
        }
    }
    out
}

/// Propose conflicts and reference resolutions for every item in the
/// batch. Reads the destination workspace, writes nothing.
pub fn prepare_mapping(
    tx: &StoreTx<'_>,
    workspace_id: &Id,
    envelopes: &[ExportEnvelope],
) -> Result<MappingProposal, ImportError> {
    let glasses = candidates(&tx.glasses_in(workspace_id)?, |g| &g.id, |g| &g.name);
    let garnishes = candidates(&tx.garnishes_in(workspace_id)?, |g| &g.id, |g| &g.name);
    let ingredients = candidates(&tx.ingredients_in(workspace_id)?, |i| &i.id, |i| &i.name);
    let calculations = candidates(&tx.calculations_in(workspace_id)?, |c| &c.id, |c| &c.name);
    let recipes = candidates(&tx.recipes_in(workspace_id)?, |r| &r.id, |r| &r.name);
    let units = candidates(&tx.units_in(workspace_id)?, |u| &u.id, |u| &u.name);

    let mut items = Vec::with_capacity(envelopes.len());
    for envelope in envelopes {
        // Unrecognized envelopes get an empty proposal rather than failing
        // the whole call; validate is the phase that flags them.
        let Ok(entity) = envelope.clone().into_entity() else {
            items.push(ItemProposal {
                name: envelope.entity_name().to_string(),
                conflicts: Vec::new(),
                cocktails: Vec::new(),
                ingredients: Vec::new(),
                units: Vec::new(),
            });
            continue;
        };
        let proposal = match &entity {
            ExportEntity::Glass(glass) => ItemProposal {
                name: glass.name.clone(),
                conflicts: name_conflicts(&glasses, &glass.name),
                cocktails: Vec::new(),
                ingredients: Vec::new(),
                units: Vec::new(),
            },
            ExportEntity::Garnish(garnish) => ItemProposal {
                name: garnish.name.clone(),
                conflicts: name_conflicts(&garnishes, &garnish.name),
                cocktails: Vec::new(),
                ingredients: Vec::new(),
                units: Vec::new(),
            },
            ExportEntity::Ingredient { ingredient, volumes } => ItemProposal {
                name: ingredient.name.clone(),
                conflicts: name_conflicts(&ingredients, &ingredient.name),
                cocktails: Vec::new(),
                ingredients: Vec::new(),
                units: dedup_names(volumes.iter().map(|v| v.unit_name.as_str()))
                    .iter()
                    .map(|n| suggestion(n, &units))
                    .collect(),
            },
            ExportEntity::Calculation { calculation, items: calc_items, shopping_units } => {
                ItemProposal {
                    name: calculation.name.clone(),
                    conflicts: name_conflicts(&calculations, &calculation.name),
                    cocktails: dedup_names(calc_items.iter().map(|i| i.cocktail_name.as_str()))
                        .iter()
                        .map(|n| suggestion(n, &recipes))
                        .collect(),
                    ingredients: dedup_names(
                        shopping_units.iter().map(|s| s.ingredient_name.as_str()),
                    )
                    .iter()
                    .map(|n| suggestion(n, &ingredients))
                    .collect(),
                    units: dedup_names(shopping_units.iter().map(|s| s.unit_name.as_str()))
                        .iter()
                        .map(|n| suggestion(n, &units))
                        .collect(),
                }
            }
        };
        items.push(proposal);
    }
    Ok(MappingProposal { items })
}

// ---------------------------------------------------------------------------
// Execute
// ---------------------------------------------------------------------------

/// One envelope paired with the operator's decision for it.
#[derive(Debug, Clone)]
pub struct ExecuteItem {
    pub envelope: ExportEnvelope,
    pub decision: ItemDecision,
}

/// Apply a batch of decided items. Each item runs under its own savepoint;
/// a failing item rolls back alone, is reported as [`ItemStatus::Error`],
/// and the batch continues. The caller's transaction commits whatever
/// succeeded.
pub fn execute(
    tx: &StoreTx<'_>,
    workspace_id: &Id,
    actor_id: &Id,
    items: Vec<ExecuteItem>,
    mappings: &RefMappings,
    sink: &mut dyn AuditSink,
) -> Result<ExecuteReport, ImportError> {
    let mut results = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let name = item.envelope.entity_name().to_string();
        if item.decision == ItemDecision::Skip {
            results.push(ExecuteResult {
                name,
                status: ItemStatus::Skipped,
                id: None,
                message: None,
            });
            continue;
        }
        let savepoint = format!("item_{index}");
        tx.savepoint(&savepoint)?;
        match execute_item(tx, workspace_id, actor_id, item, mappings, sink) {
            Ok(result) => {
                tx.savepoint_release(&savepoint)?;
                results.push(result);
            }
            Err(err) => {
                tx.savepoint_rollback(&savepoint)?;
                results.push(ExecuteResult {
                    name,
                    status: ItemStatus::Error,
                    id: None,
                    message: Some(err.to_string()),
                });
            }
        }
    }
    Ok(ExecuteReport { items: results })
}

/// Resolve a unit name at execute time. An explicit mapping wins; without
/// one the name auto-resolves against the destination, materializing the
/// unit when it does not exist yet. Returns `None` only on an explicit
/// skip, which drops the dependent row.
fn resolve_unit(
    tx: &StoreTx<'_>,
    workspace_id: &Id,
    mappings: &RefMappings,
    name: &str,
) -> Result<Option<Id>, ImportError> {
    match mappings.unit(name) {
        Some(RefMapping::UseExisting { id }) => Ok(Some(id.clone())),
        Some(RefMapping::Skip) => Ok(None),
        None => match tx.unit_by_name(workspace_id, name)? {
            Some(unit) => Ok(Some(unit.id)),
            None => {
                let unit = Unit {
                    id: Id::fresh(),
                    workspace_id: workspace_id.clone(),
                    name: name.to_string(),
                };
                tx.insert_unit(&unit)?;
                Ok(Some(unit.id))
            }
        },
    }
}

/// Cocktails and ingredients referenced by name are only linked through an
/// explicit use-existing mapping; anything else drops the dependent row.
fn mapped_id(mapping: Option<&RefMapping>) -> Option<Id> {
    match mapping {
        Some(RefMapping::UseExisting { id }) => Some(id.clone()),
        Some(RefMapping::Skip) | None => None,
    }
}

fn to_state<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ImportError> {
    Ok(serde_json::to_value(value).map_err(PayloadError::from)?)
}

struct ItemContext<'a> {
    workspace_id: &'a Id,
    actor_id: &'a Id,
}

fn execute_item(
    tx: &StoreTx<'_>,
    workspace_id: &Id,
    actor_id: &Id,
    item: ExecuteItem,
    mappings: &RefMappings,
    sink: &mut dyn AuditSink,
) -> Result<ExecuteResult, ImportError> {
    let ctx = ItemContext { workspace_id, actor_id };
    let decision = item.decision;
    match item.envelope.into_entity()? {
        ExportEntity::Glass(glass) => execute_glass(tx, &ctx, glass, decision, sink),
        ExportEntity::Garnish(garnish) => execute_garnish(tx, &ctx, garnish, decision, sink),
        ExportEntity::Ingredient { ingredient, volumes } => {
            execute_ingredient(tx, &ctx, ingredient, volumes, decision, mappings, sink)
        }
        ExportEntity::Calculation { calculation, items, shopping_units } => execute_calculation(
            tx,
            &ctx,
            calculation,
            items,
            shopping_units,
            decision,
            mappings,
            sink,
        ),
    }
}

/// Name under the decision: renames substitute the operator's name,
/// everything else keeps the incoming one.
fn decided_name(incoming: String, decision: &ItemDecision) -> String {
    match decision {
        ItemDecision::Rename { new_name } => new_name.clone(),
        _ => incoming,
    }
}

fn record_change(
    sink: &mut dyn AuditSink,
    ctx: &ItemContext<'_>,
    kind: EntityKind,
    entity_id: &Id,
    action: ChangeAction,
    previous: Option<serde_json::Value>,
    state: serde_json::Value,
) {
    sink.record(ChangeRecord {
        workspace_id: ctx.workspace_id.clone(),
        actor_id: ctx.actor_id.clone(),
        kind,
        entity_id: entity_id.clone(),
        action,
        previous,
        state,
    });
}

fn upsert_owner_image(
    tx: &StoreTx<'_>,
    workspace_id: &Id,
    owner: ImageOwner,
    owner_id: &Id,
    image: Option<String>,
) -> Result<(), ImportError> {
    if let Some(data) = image {
        tx.upsert_image(&EntityImage {
            workspace_id: workspace_id.clone(),
            owner,
            owner_id: owner_id.clone(),
            data,
        })?;
    }
    Ok(())
}

fn execute_glass(
    tx: &StoreTx<'_>,
    ctx: &ItemContext<'_>,
    export: barkeep_io::export::GlassExport,
    decision: ItemDecision,
    sink: &mut dyn AuditSink,
) -> Result<ExecuteResult, ImportError> {
    let ws = ctx.workspace_id;
    if let ItemDecision::Overwrite { existing_id } = &decision {
        let existing = tx.glass_by_id(ws, existing_id)?.ok_or(ImportError::MissingReference {
            kind: EntityKind::Glass,
            old_id: existing_id.to_string(),
        })?;
        let previous = to_state(&existing)?;
        let updated = Glass {
            id: existing.id.clone(),
            workspace_id: ws.clone(),
            name: export.name.clone(),
            deposit: export.deposit,
            volume: export.volume,
            notes: export.notes,
        };
        tx.update_glass(&updated)?;
        upsert_owner_image(tx, ws, ImageOwner::Glass, &updated.id, export.image)?;
        let state = to_state(&updated)?;
        record_change(sink, ctx, EntityKind::Glass, &updated.id, ChangeAction::Update, Some(previous), state);
        return Ok(ExecuteResult {
            name: updated.name,
            status: ItemStatus::Updated,
            id: Some(updated.id),
            message: None,
        });
    }

    let glass = Glass {
        id: Id::fresh(),
        workspace_id: ws.clone(),
        name: decided_name(export.name, &decision),
        deposit: export.deposit,
        volume: export.volume,
        notes: export.notes,
    };
    tx.insert_glass(&glass)?;
    upsert_owner_image(tx, ws, ImageOwner::Glass, &glass.id, export.image)?;
    let state = to_state(&glass)?;
    record_change(sink, ctx, EntityKind::Glass, &glass.id, ChangeAction::Create, None, state);
    Ok(ExecuteResult {
        name: glass.name,
        status: ItemStatus::Created,
        id: Some(glass.id),
        message: None,
    })
}

fn execute_garnish(
    tx: &StoreTx<'_>,
    ctx: &ItemContext<'_>,
    export: barkeep_io::export::GarnishExport,
    decision: ItemDecision,
    sink: &mut dyn AuditSink,
) -> Result<ExecuteResult, ImportError> {
    let ws = ctx.workspace_id;
    if let ItemDecision::Overwrite { existing_id } = &decision {
        let existing = tx.garnish_by_id(ws, existing_id)?.ok_or(ImportError::MissingReference {
            kind: EntityKind::Garnish,
            old_id: existing_id.to_string(),
        })?;
        let previous = to_state(&existing)?;
        let updated = Garnish {
            id: existing.id.clone(),
            workspace_id: ws.clone(),
            name: export.name.clone(),
            description: export.description,
            price: export.price,
            notes: export.notes,
        };
        tx.update_garnish(&updated)?;
        upsert_owner_image(tx, ws, ImageOwner::Garnish, &updated.id, export.image)?;
        let state = to_state(&updated)?;
        record_change(sink, ctx, EntityKind::Garnish, &updated.id, ChangeAction::Update, Some(previous), state);
        return Ok(ExecuteResult {
            name: updated.name,
            status: ItemStatus::Updated,
            id: Some(updated.id),
            message: None,
        });
    }

    let garnish = Garnish {
        id: Id::fresh(),
        workspace_id: ws.clone(),
        name: decided_name(export.name, &decision),
        description: export.description,
        price: export.price,
        notes: export.notes,
    };
    tx.insert_garnish(&garnish)?;
    upsert_owner_image(tx, ws, ImageOwner::Garnish, &garnish.id, export.image)?;
    let state = to_state(&garnish)?;
    record_change(sink, ctx, EntityKind::Garnish, &garnish.id, ChangeAction::Create, None, state);
    Ok(ExecuteResult {
        name: garnish.name,
        status: ItemStatus::Created,
        id: Some(garnish.id),
        message: None,
    })
}

fn insert_volumes(
    tx: &StoreTx<'_>,
    workspace_id: &Id,
    ingredient_id: &Id,
    volumes: &[VolumeExport],
    mappings: &RefMappings,
) -> Result<(), ImportError> {
    for volume in volumes {
        let Some(unit_id) = resolve_unit(tx, workspace_id, mappings, &volume.unit_name)? else {
            continue;
        };
        tx.insert_volume_ignore(&IngredientVolume {
            id: Id::fresh(),
            workspace_id: workspace_id.clone(),
            ingredient_id: ingredient_id.clone(),
            unit_id,
            volume: volume.volume,
        })?;
    }
    Ok(())
}

fn execute_ingredient(
    tx: &StoreTx<'_>,
    ctx: &ItemContext<'_>,
    export: barkeep_io::export::IngredientExport,
    volumes: Vec<VolumeExport>,
    decision: ItemDecision,
    mappings: &RefMappings,
    sink: &mut dyn AuditSink,
) -> Result<ExecuteResult, ImportError> {
    let ws = ctx.workspace_id;
    if let ItemDecision::Overwrite { existing_id } = &decision {
        let existing =
            tx.ingredient_by_id(ws, existing_id)?.ok_or(ImportError::MissingReference {
                kind: EntityKind::Ingredient,
                old_id: existing_id.to_string(),
            })?;
        let previous = to_state(&existing)?;
        let updated = Ingredient {
            id: existing.id.clone(),
            workspace_id: ws.clone(),
            name: export.name.clone(),
            short_name: export.short_name,
            price: export.price,
            link: export.link,
            tags: export.tags,
        };
        tx.update_ingredient(&updated)?;
        // Volume lines carry no identity of their own; replace wholesale.
        tx.delete_volumes_for(ws, &updated.id)?;
        insert_volumes(tx, ws, &updated.id, &volumes, mappings)?;
        upsert_owner_image(tx, ws, ImageOwner::Ingredient, &updated.id, export.image)?;
        let state = to_state(&updated)?;
        record_change(sink, ctx, EntityKind::Ingredient, &updated.id, ChangeAction::Update, Some(previous), state);
        return Ok(ExecuteResult {
            name: updated.name,
            status: ItemStatus::Updated,
            id: Some(updated.id),
            message: None,
        });
    }

    let ingredient = Ingredient {
        id: Id::fresh(),
        workspace_id: ws.clone(),
        name: decided_name(export.name, &decision),
        short_name: export.short_name,
        price: export.price,
        link: export.link,
        tags: export.tags,
    };
    tx.insert_ingredient(&ingredient)?;
    insert_volumes(tx, ws, &ingredient.id, &volumes, mappings)?;
    upsert_owner_image(tx, ws, ImageOwner::Ingredient, &ingredient.id, export.image)?;
    let state = to_state(&ingredient)?;
    record_change(sink, ctx, EntityKind::Ingredient, &ingredient.id, ChangeAction::Create, None, state);
    Ok(ExecuteResult {
        name: ingredient.name,
        status: ItemStatus::Created,
        id: Some(ingredient.id),
        message: None,
    })
}

fn insert_calculation_children(
    tx: &StoreTx<'_>,
    workspace_id: &Id,
    calculation_id: &Id,
    items: &[CalculationItemExport],
    shopping_units: &[ShoppingUnitExport],
    mappings: &RefMappings,
) -> Result<(), ImportError> {
    for item in items {
        let Some(recipe_id) = mapped_id(mappings.cocktail(&item.cocktail_name)) else {
            continue;
        };
        tx.insert_calculation_item_ignore(&CalculationItem {
            id: Id::fresh(),
            workspace_id: workspace_id.clone(),
            calculation_id: calculation_id.clone(),
            recipe_id,
            planned_amount: item.planned_amount,
            custom_price: item.custom_price,
        })?;
    }
    for su in shopping_units {
        let Some(ingredient_id) = mapped_id(mappings.ingredient(&su.ingredient_name)) else {
            continue;
        };
        let Some(unit_id) = resolve_unit(tx, workspace_id, mappings, &su.unit_name)? else {
            continue;
        };
        tx.insert_shopping_unit_ignore(&ShoppingUnit {
            id: Id::fresh(),
            workspace_id: workspace_id.clone(),
            calculation_id: calculation_id.clone(),
            ingredient_id,
            unit_id,
            checked: su.checked,
        })?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn execute_calculation(
    tx: &StoreTx<'_>,
    ctx: &ItemContext<'_>,
    export: barkeep_io::export::CalculationExport,
    items: Vec<CalculationItemExport>,
    shopping_units: Vec<ShoppingUnitExport>,
    decision: ItemDecision,
    mappings: &RefMappings,
    sink: &mut dyn AuditSink,
) -> Result<ExecuteResult, ImportError> {
    let ws = ctx.workspace_id;
    if let ItemDecision::Overwrite { existing_id } = &decision {
        let existing =
            tx.calculation_by_id(ws, existing_id)?.ok_or(ImportError::MissingReference {
                kind: EntityKind::Calculation,
                old_id: existing_id.to_string(),
            })?;
        let previous = to_state(&existing)?;
        let updated = Calculation {
            id: existing.id.clone(),
            workspace_id: ws.clone(),
            name: export.name.clone(),
            show_sales_stuff: export.show_sales_stuff,
            ignore_revenue: export.ignore_revenue,
            updated_by_user_id: ctx.actor_id.clone(),
        };
        tx.update_calculation(&updated)?;
        tx.delete_calculation_children(ws, &updated.id)?;
        insert_calculation_children(tx, ws, &updated.id, &items, &shopping_units, mappings)?;
        let state = to_state(&updated)?;
        record_change(sink, ctx, EntityKind::Calculation, &updated.id, ChangeAction::Update, Some(previous), state);
        return Ok(ExecuteResult {
            name: updated.name,
            status: ItemStatus::Updated,
            id: Some(updated.id),
            message: None,
        });
    }

    let calculation = Calculation {
        id: Id::fresh(),
        workspace_id: ws.clone(),
        name: decided_name(export.name, &decision),
        show_sales_stuff: export.show_sales_stuff,
        ignore_revenue: export.ignore_revenue,
        updated_by_user_id: ctx.actor_id.clone(),
    };
    tx.insert_calculation(&calculation)?;
    insert_calculation_children(tx, ws, &calculation.id, &items, &shopping_units, mappings)?;
    let state = to_state(&calculation)?;
    record_change(sink, ctx, EntityKind::Calculation, &calculation.id, ChangeAction::Create, None, state);
    Ok(ExecuteResult {
        name: calculation.name,
        status: ItemStatus::Created,
        id: Some(calculation.id),
        message: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use barkeep_io::export::{GlassExport, IngredientExport};

    fn glass_envelope(name: &str) -> ExportEnvelope {
        ExportEnvelope {
            export_version: 1,
            glass: Some(GlassExport { name: name.into(), deposit: 2.0, ..Default::default() }),
            ..Default::default()
        }
    }

    #[test]
    fn validate_flags_empty_names() {
        let good = glass_envelope("Tumbler");
        let bad = glass_envelope("  ");
        let report = validate(&[good, bad]);
        assert!(!report.valid);
        assert!(report.items[0].valid);
        assert!(!report.items[1].valid);
    }

    #[test]
    fn validate_flags_unrecognized_envelope() {
        let empty = ExportEnvelope::default();
        let report = validate(&[empty]);
        assert!(!report.valid);
        assert_eq!(report.items[0].name, "");
    }

    #[test]
    fn suggestion_auto_matches_exact_name_only() {
        let pool = vec![
            Candidate { id: Id::from("u1"), name: "CL".into() },
            Candidate { id: Id::from("u2"), name: "ML".into() },
        ];
        let s = suggestion("cl", &pool);
        assert_eq!(s.auto_match.as_ref().map(|c| c.id.as_str()), Some("u1"));
        let none = suggestion("oz", &pool);
        assert!(none.auto_match.is_none());
        assert!(none.options.is_empty());
    }

    #[test]
    fn suggestion_options_use_substring_containment() {
        let pool = vec![
            Candidate { id: Id::from("i1"), name: "Gin".into() },
            Candidate { id: Id::from("i2"), name: "London Dry Gin".into() },
            Candidate { id: Id::from("i3"), name: "Aperol".into() },
        ];
        let s = suggestion("gin", &pool);
        let ids: Vec<&str> = s.options.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i2"]);
    }

    #[test]
    fn dedup_keeps_first_seen_casing() {
        let names = dedup_names(["CL", "cl", "ML"].into_iter());
        assert_eq!(names, vec!["CL".to_string(), "ML".to_string()]);
    }

    #[test]
    fn prepare_mapping_tolerates_unrecognized_envelopes() {
        let mut store = barkeep_store::Store::open_in_memory().unwrap();
        store
            .with_tx::<_, ImportError>(|tx| {
                let envelopes = [ExportEnvelope::default(), glass_envelope("Tumbler")];
                let proposal = prepare_mapping(tx, &Id::from("ws"), &envelopes)?;
                assert_eq!(proposal.items.len(), 2);
                assert_eq!(proposal.items[0].name, "");
                assert!(proposal.items[0].conflicts.is_empty());
                assert_eq!(proposal.items[1].name, "Tumbler");
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn ingredient_envelope_references_its_volume_units() {
        let envelope = ExportEnvelope {
            export_version: 1,
            ingredient: Some(IngredientExport { name: "Gin".into(), ..Default::default() }),
            ingredient_volumes: vec![
                VolumeExport { volume: 700.0, unit_name: "CL".into() },
                VolumeExport { volume: 0.7, unit_name: "cl".into() },
            ],
            ..Default::default()
        };
        let mut store = barkeep_store::Store::open_in_memory().unwrap();
        store
            .with_tx::<_, ImportError>(|tx| {
                let proposal = prepare_mapping(tx, &Id::from("ws"), &[envelope.clone()])?;
                assert_eq!(proposal.items[0].units.len(), 1);
                assert_eq!(proposal.items[0].units[0].export_name, "CL");
                Ok(())
            })
            .unwrap();
    }
}
