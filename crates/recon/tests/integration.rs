use std::collections::HashSet;

use barkeep_core::audit::{ChangeAction, MemorySink};
use barkeep_core::entity::{Ice, Recipe};
use barkeep_core::{EntityKind, Id};
use barkeep_io::backup::BackupPayload;
use barkeep_io::decision::{ItemDecision, ItemStatus, RefMapping, RefMappings};
use barkeep_io::export::{
    CalculationExport, CalculationItemExport, ExportEnvelope, GlassExport, IngredientExport,
    ShoppingUnitExport, VolumeExport,
};
use barkeep_recon::{execute, import_backup, prepare_mapping, validate, ExecuteItem, ImportError};
use barkeep_store::Store;

fn ws() -> Id {
    Id::from("ws")
}

fn actor() -> Id {
    Id::from("operator")
}

/// A workspace graph exercising both current and legacy encodings: an
/// inline ingredient image, a free-text ice label, a legacy step tool, a
/// free-text recipe-ingredient unit, and dangling references that must be
/// dropped rather than imported.
const BACKUP_FIXTURE: &str = r#"{
    "settings": [{"name": "currency", "value": "EUR"}],
    "translations": [{"language": "de", "token": "menu", "label": "Karte"}],
    "units": [{"id": "u1", "name": "CL"}],
    "unitConversions": [
        {"id": "uc1", "fromUnitId": "u1", "toUnitId": "u_missing", "factor": 10.0}
    ],
    "stepActions": [{"id": "a1", "name": "STIR", "actionGroup": "default"}],
    "garnishes": [{"id": "ga1", "name": "Orange zest"}],
    "ingredients": [{"id": "i1", "name": "Gin", "image": "b64-gin"}],
    "ingredientVolumes": [
        {"id": "v1", "ingredientId": "i1", "volume": 700.0, "unitId": "u1"}
    ],
    "glasses": [{"id": "g1", "name": "Tumbler", "deposit": 2.0}],
    "ice": [{"id": "ice1", "name": "ICE_CUBES"}],
    "cocktailRecipes": [
        {"id": "r1", "name": "Negroni", "glassId": "g1", "iceId": "ice1"},
        {"id": "r2", "name": "Old Fashioned", "glassId": "g_missing", "glassWithIce": "Würfel"}
    ],
    "cocktailRecipeSteps": [
        {"id": "s1", "cocktailRecipeId": "r1", "actionId": "a1", "stepNumber": 0},
        {"id": "s2", "cocktailRecipeId": "r2", "tool": "SINGLE_STRAIN", "stepNumber": 0}
    ],
    "cocktailRecipeIngredients": [
        {"id": "ri1", "cocktailRecipeStepId": "s1", "ingredientId": "i1", "unitId": "u1",
         "amount": 4.0, "ingredientNumber": 0},
        {"id": "ri2", "cocktailRecipeStepId": "s2", "ingredientId": "i_missing", "unit": "cl",
         "amount": 5.0, "ingredientNumber": 0}
    ],
    "cocktailRecipeGarnishes": [
        {"cocktailRecipeId": "r1", "garnishId": "ga1", "garnishNumber": 0},
        {"cocktailRecipeId": "r1", "garnishId": "ga_missing", "garnishNumber": 1}
    ],
    "cocktailCards": [{"id": "c1", "name": "Summer"}],
    "cocktailCardGroups": [
        {"id": "cg1", "cocktailCardId": "c1", "name": "Classics", "groupNumber": 0}
    ],
    "cocktailCardGroupItems": [
        {"cocktailCardGroupId": "cg1", "cocktailId": "r1", "itemNumber": 0}
    ],
    "cocktailCalculations": [{"id": "ca1", "name": "NYE"}],
    "cocktailCalculationItems": [
        {"calculationId": "ca1", "cocktailId": "r1", "plannedAmount": 40}
    ],
    "ingredientShoppingUnits": [
        {"calculationId": "ca1", "ingredientId": "i1", "unit": "Flasche", "checked": false}
    ],
    "glassImages": [{"ownerId": "g1", "image": "b64-glass"}]
}"#;

#[test]
fn backup_import_rebuilds_the_graph_with_fresh_ids() {
    let backup = BackupPayload::from_json(BACKUP_FIXTURE).unwrap().normalize().unwrap();
    let mut store = Store::open_in_memory().unwrap();
    store
        .with_tx::<_, ImportError>(|tx| {
            let report = import_backup(tx, &ws(), &actor(), &backup)?;

            assert_eq!(report.created.get("unit"), Some(&2)); // CL + Unknown
            assert_eq!(report.created.get("recipe"), Some(&2));
            assert_eq!(report.dropped.get("unit_conversion"), Some(&1));
            assert_eq!(report.dropped.get("recipe_garnish"), Some(&1));
            // Legacy SINGLE_STRAIN tool materialized a STRAIN action.
            assert_eq!(report.created.get("step_action"), Some(&2));

            let recipes = tx.recipes_in(&ws())?;
            assert_eq!(recipes.len(), 2);
            for recipe in &recipes {
                assert_ne!(recipe.id.as_str(), "r1");
                assert_ne!(recipe.id.as_str(), "r2");
            }
            let old_fashioned = recipes.iter().find(|r| r.name == "Old Fashioned").unwrap();
            // Unmappable glass reference dropped, legacy ice label resolved.
            assert!(old_fashioned.glass_id.is_none());
            let ice = tx.ice_in(&ws())?;
            assert_eq!(ice.len(), 1);
            assert_eq!(ice[0].name, "ICE_CUBES");
            assert_eq!(old_fashioned.ice_id, ice[0].id);

            let actions = tx.step_actions_in(&ws())?;
            let names: HashSet<&str> = actions.iter().map(|a| a.name.as_str()).collect();
            assert!(names.contains("STIR"));
            assert!(names.contains("STRAIN"));

            // Free-text "cl" reused the imported CL unit; "Flasche" fell
            // back to the Unknown token.
            let units = tx.units_in(&ws())?;
            let unit_names: HashSet<&str> = units.iter().map(|u| u.name.as_str()).collect();
            assert_eq!(unit_names, HashSet::from(["CL", "Unknown"]));
            let shopping = tx.shopping_units_in(&ws())?;
            assert_eq!(shopping.len(), 1);
            let unknown = units.iter().find(|u| u.name == "Unknown").unwrap();
            assert_eq!(shopping[0].unit_id, unknown.id);

            // Array image encoding wins over the inline one per owner.
            let glasses = tx.glasses_in(&ws())?;
            let image = tx
                .image_for(&ws(), barkeep_core::ImageOwner::Glass, &glasses[0].id)?
                .unwrap();
            assert_eq!(image.data, "b64-glass");
            Ok(())
        })
        .unwrap();
}

#[test]
fn backup_import_leaves_no_dangling_references() {
    let backup = BackupPayload::from_json(BACKUP_FIXTURE).unwrap().normalize().unwrap();
    let mut store = Store::open_in_memory().unwrap();
    store
        .with_tx::<_, ImportError>(|tx| {
            import_backup(tx, &ws(), &actor(), &backup)?;

            let unit_ids: HashSet<String> =
                tx.units_in(&ws())?.into_iter().map(|u| u.id.to_string()).collect();
            let glass_ids: HashSet<String> =
                tx.glasses_in(&ws())?.into_iter().map(|g| g.id.to_string()).collect();
            let garnish_ids: HashSet<String> =
                tx.garnishes_in(&ws())?.into_iter().map(|g| g.id.to_string()).collect();
            let ingredient_ids: HashSet<String> =
                tx.ingredients_in(&ws())?.into_iter().map(|i| i.id.to_string()).collect();
            let ice_ids: HashSet<String> =
                tx.ice_in(&ws())?.into_iter().map(|i| i.id.to_string()).collect();
            let action_ids: HashSet<String> =
                tx.step_actions_in(&ws())?.into_iter().map(|a| a.id.to_string()).collect();
            let recipe_ids: HashSet<String> =
                tx.recipes_in(&ws())?.into_iter().map(|r| r.id.to_string()).collect();
            let step_ids: HashSet<String> =
                tx.recipe_steps_in(&ws())?.into_iter().map(|s| s.id.to_string()).collect();
            let card_ids: HashSet<String> =
                tx.cards_in(&ws())?.into_iter().map(|c| c.id.to_string()).collect();
            let group_ids: HashSet<String> =
                tx.card_groups_in(&ws())?.into_iter().map(|g| g.id.to_string()).collect();
            let calculation_ids: HashSet<String> =
                tx.calculations_in(&ws())?.into_iter().map(|c| c.id.to_string()).collect();

            for c in tx.conversions_in(&ws())? {
                assert!(unit_ids.contains(c.from_unit_id.as_str()));
                assert!(unit_ids.contains(c.to_unit_id.as_str()));
            }
            for v in tx.volumes_in(&ws())? {
                assert!(ingredient_ids.contains(v.ingredient_id.as_str()));
                assert!(unit_ids.contains(v.unit_id.as_str()));
            }
            for r in tx.recipes_in(&ws())? {
                if let Some(glass_id) = &r.glass_id {
                    assert!(glass_ids.contains(glass_id.as_str()));
                }
                assert!(ice_ids.contains(r.ice_id.as_str()));
            }
            for s in tx.recipe_steps_in(&ws())? {
                assert!(recipe_ids.contains(s.recipe_id.as_str()));
                assert!(action_ids.contains(s.action_id.as_str()));
            }
            for ri in tx.recipe_ingredients_in(&ws())? {
                assert!(step_ids.contains(ri.step_id.as_str()));
                if let Some(ingredient_id) = &ri.ingredient_id {
                    assert!(ingredient_ids.contains(ingredient_id.as_str()));
                }
                if let Some(unit_id) = &ri.unit_id {
                    assert!(unit_ids.contains(unit_id.as_str()));
                }
            }
            for rg in tx.recipe_garnishes_in(&ws())? {
                assert!(recipe_ids.contains(rg.recipe_id.as_str()));
                assert!(garnish_ids.contains(rg.garnish_id.as_str()));
            }
            for g in tx.card_groups_in(&ws())? {
                assert!(card_ids.contains(g.card_id.as_str()));
            }
            for item in tx.card_group_items_in(&ws())? {
                assert!(group_ids.contains(item.group_id.as_str()));
                assert!(recipe_ids.contains(item.recipe_id.as_str()));
            }
            for item in tx.calculation_items_in(&ws())? {
                assert!(calculation_ids.contains(item.calculation_id.as_str()));
                assert!(recipe_ids.contains(item.recipe_id.as_str()));
            }
            for su in tx.shopping_units_in(&ws())? {
                assert!(calculation_ids.contains(su.calculation_id.as_str()));
                assert!(ingredient_ids.contains(su.ingredient_id.as_str()));
                assert!(unit_ids.contains(su.unit_id.as_str()));
            }
            Ok(())
        })
        .unwrap();
}

#[test]
fn reimport_reuses_natural_keyed_rows_and_doubles_the_rest() {
    let backup = BackupPayload::from_json(BACKUP_FIXTURE).unwrap().normalize().unwrap();
    let mut store = Store::open_in_memory().unwrap();
    store
        .with_tx::<_, ImportError>(|tx| {
            import_backup(tx, &ws(), &actor(), &backup)?;
            let second = import_backup(tx, &ws(), &actor(), &backup)?;

            // Natural-keyed reference data deduplicates on re-import.
            assert_eq!(tx.count(EntityKind::Setting, &ws())?, 1);
            assert_eq!(tx.count(EntityKind::Unit, &ws())?, 2);
            assert_eq!(tx.count(EntityKind::Ice, &ws())?, 1);
            assert_eq!(tx.count(EntityKind::StepAction, &ws())?, 2);
            assert_eq!(second.reused.get("unit"), Some(&1));
            assert_eq!(second.reused.get("ice"), Some(&1));

            // Everything without a natural key is duplicated, as a second
            // full-graph import of the same tenant data should be.
            assert_eq!(tx.count(EntityKind::Recipe, &ws())?, 4);
            assert_eq!(tx.count(EntityKind::Glass, &ws())?, 2);
            assert_eq!(tx.count(EntityKind::Calculation, &ws())?, 2);
            Ok(())
        })
        .unwrap();
}

#[test]
fn recipe_without_resolvable_ice_aborts_the_import() {
    let raw = r#"{"cocktailRecipes": [{"id": "r1", "name": "Martini"}]}"#;
    let backup = BackupPayload::from_json(raw).unwrap().normalize().unwrap();
    let mut store = Store::open_in_memory().unwrap();
    let err = store
        .with_tx::<_, ImportError>(|tx| import_backup(tx, &ws(), &actor(), &backup))
        .unwrap_err();
    assert!(matches!(err, ImportError::MissingIce { recipe } if recipe == "Martini"));
    // The transaction rolled back; nothing was written.
    store
        .with_tx::<_, ImportError>(|tx| {
            assert_eq!(tx.count(EntityKind::Recipe, &ws())?, 0);
            Ok(())
        })
        .unwrap();
}

// ---------------------------------------------------------------------------
// Staged reconciler
// ---------------------------------------------------------------------------

fn glass_envelope(name: &str) -> ExportEnvelope {
    ExportEnvelope {
        export_version: 1,
        glass: Some(GlassExport {
            name: name.into(),
            deposit: 2.0,
            volume: Some(300.0),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[test]
fn staged_import_creates_a_new_glass() {
    let mut store = Store::open_in_memory().unwrap();
    let mut sink = MemorySink::new();
    store
        .with_tx::<_, ImportError>(|tx| {
            let report = execute(
                tx,
                &ws(),
                &actor(),
                vec![ExecuteItem {
                    envelope: glass_envelope("Tumbler"),
                    decision: ItemDecision::Import,
                }],
                &RefMappings::default(),
                &mut sink,
            )?;
            assert_eq!(report.items[0].status, ItemStatus::Created);
            assert!(!report.has_errors());
            assert_eq!(tx.count(EntityKind::Glass, &ws())?, 1);
            Ok(())
        })
        .unwrap();
    assert_eq!(sink.records.len(), 1);
    assert_eq!(sink.records[0].action, ChangeAction::Create);
    assert!(sink.records[0].previous.is_none());
}

#[test]
fn staged_overwrite_keeps_identity_across_case_differences() {
    let mut store = Store::open_in_memory().unwrap();
    let mut sink = MemorySink::new();
    store
        .with_tx::<_, ImportError>(|tx| {
            // Seed the destination, then bring in "tumbler" from another
            // tenant's export.
            let seeded = execute(
                tx,
                &ws(),
                &actor(),
                vec![ExecuteItem {
                    envelope: glass_envelope("Tumbler"),
                    decision: ItemDecision::Import,
                }],
                &RefMappings::default(),
                &mut sink,
            )?;
            let existing_id = seeded.items[0].id.clone().unwrap();

            let incoming = glass_envelope("tumbler");
            let proposal = prepare_mapping(tx, &ws(), &[incoming.clone()])?;
            assert_eq!(proposal.items[0].conflicts.len(), 1);
            assert_eq!(proposal.items[0].conflicts[0].id, existing_id);

            let report = execute(
                tx,
                &ws(),
                &actor(),
                vec![ExecuteItem {
                    envelope: incoming,
                    decision: ItemDecision::Overwrite { existing_id: existing_id.clone() },
                }],
                &RefMappings::default(),
                &mut sink,
            )?;
            assert_eq!(report.items[0].status, ItemStatus::Updated);
            assert_eq!(report.items[0].id.as_ref(), Some(&existing_id));
            assert_eq!(tx.count(EntityKind::Glass, &ws())?, 1);
            let glass = tx.glass_by_id(&ws(), &existing_id)?.unwrap();
            assert_eq!(glass.name, "tumbler");
            Ok(())
        })
        .unwrap();
    let update = sink.records.last().unwrap();
    assert_eq!(update.action, ChangeAction::Update);
    assert!(update.previous.is_some());
}

#[test]
fn staged_rename_creates_under_the_new_name() {
    let mut store = Store::open_in_memory().unwrap();
    let mut sink = MemorySink::new();
    store
        .with_tx::<_, ImportError>(|tx| {
            let report = execute(
                tx,
                &ws(),
                &actor(),
                vec![ExecuteItem {
                    envelope: glass_envelope("Tumbler"),
                    decision: ItemDecision::Rename { new_name: "Tumbler (imported)".into() },
                }],
                &RefMappings::default(),
                &mut sink,
            )?;
            assert_eq!(report.items[0].status, ItemStatus::Created);
            assert_eq!(report.items[0].name, "Tumbler (imported)");
            Ok(())
        })
        .unwrap();
}

#[test]
fn staged_skip_writes_nothing() {
    let mut store = Store::open_in_memory().unwrap();
    let mut sink = MemorySink::new();
    store
        .with_tx::<_, ImportError>(|tx| {
            let report = execute(
                tx,
                &ws(),
                &actor(),
                vec![ExecuteItem {
                    envelope: glass_envelope("Tumbler"),
                    decision: ItemDecision::Skip,
                }],
                &RefMappings::default(),
                &mut sink,
            )?;
            assert_eq!(report.items[0].status, ItemStatus::Skipped);
            assert_eq!(tx.count(EntityKind::Glass, &ws())?, 0);
            Ok(())
        })
        .unwrap();
    assert!(sink.records.is_empty());
}

#[test]
fn staged_ingredient_brings_volumes_through_unit_resolution() {
    let envelope = ExportEnvelope {
        export_version: 1,
        ingredient: Some(IngredientExport { name: "Gin".into(), ..Default::default() }),
        ingredient_volumes: vec![VolumeExport { volume: 700.0, unit_name: "CL".into() }],
        ..Default::default()
    };
    let mut store = Store::open_in_memory().unwrap();
    let mut sink = MemorySink::new();
    store
        .with_tx::<_, ImportError>(|tx| {
            let report = execute(
                tx,
                &ws(),
                &actor(),
                vec![ExecuteItem { envelope, decision: ItemDecision::Import }],
                &RefMappings::default(),
                &mut sink,
            )?;
            let id = report.items[0].id.clone().unwrap();
            let volumes = tx.volumes_for(&ws(), &id)?;
            assert_eq!(volumes.len(), 1);
            // No mapping entry for "CL": the unit auto-materialized.
            let unit = tx.unit_by_name(&ws(), "CL")?.unwrap();
            assert_eq!(volumes[0].unit_id, unit.id);
            Ok(())
        })
        .unwrap();
}

#[test]
fn skip_mapped_cocktail_drops_calculation_lines() {
    let envelope = ExportEnvelope {
        export_version: 1,
        calculation: Some(CalculationExport { name: "NYE party".into(), ..Default::default() }),
        calculation_items: vec![CalculationItemExport {
            cocktail_name: "Negroni".into(),
            planned_amount: 40,
            custom_price: None,
        }],
        shopping_units: vec![ShoppingUnitExport {
            ingredient_name: "Gin".into(),
            unit_name: "CL".into(),
            checked: false,
        }],
        ..Default::default()
    };
    let mut mappings = RefMappings::default();
    mappings.cocktails.insert("Negroni".into(), RefMapping::Skip);
    // "Gin" has no mapping entry at all; same outcome for droppable kinds.

    let mut store = Store::open_in_memory().unwrap();
    let mut sink = MemorySink::new();
    store
        .with_tx::<_, ImportError>(|tx| {
            let report = execute(
                tx,
                &ws(),
                &actor(),
                vec![ExecuteItem { envelope, decision: ItemDecision::Import }],
                &mappings,
                &mut sink,
            )?;
            assert_eq!(report.items[0].status, ItemStatus::Created);
            let id = report.items[0].id.clone().unwrap();
            assert!(tx.calculation_items_for(&ws(), &id)?.is_empty());
            assert!(tx.shopping_units_for(&ws(), &id)?.is_empty());
            Ok(())
        })
        .unwrap();
}

fn calculation_envelope(name: &str, cocktail_name: &str) -> ExportEnvelope {
    ExportEnvelope {
        export_version: 1,
        calculation: Some(CalculationExport { name: name.into(), ..Default::default() }),
        calculation_items: vec![CalculationItemExport {
            cocktail_name: cocktail_name.into(),
            planned_amount: 40,
            custom_price: None,
        }],
        ..Default::default()
    }
}

fn seed_recipe(tx: &barkeep_store::StoreTx<'_>, id: &str, name: &str, ice_id: &Id) {
    tx.insert_recipe(&Recipe {
        id: Id::from(id),
        workspace_id: ws(),
        name: name.into(),
        description: None,
        notes: None,
        history: None,
        tags: Vec::new(),
        price: None,
        archived: false,
        glass_id: None,
        ice_id: ice_id.clone(),
    })
    .unwrap();
}

#[test]
fn overwrite_replaces_calculation_children() {
    let mut store = Store::open_in_memory().unwrap();
    let mut sink = MemorySink::new();
    store
        .with_tx::<_, ImportError>(|tx| {
            let ice = Ice { id: Id::from("ice1"), workspace_id: ws(), name: "ICE_CUBES".into() };
            tx.insert_ice(&ice)?;
            seed_recipe(tx, "r1", "Negroni", &ice.id);
            seed_recipe(tx, "r2", "Sazerac", &ice.id);
            let mut mappings = RefMappings::default();
            mappings
                .cocktails
                .insert("Negroni".into(), RefMapping::UseExisting { id: Id::from("r1") });
            mappings
                .cocktails
                .insert("Sazerac".into(), RefMapping::UseExisting { id: Id::from("r2") });

            let seeded = execute(
                tx,
                &ws(),
                &actor(),
                vec![ExecuteItem {
                    envelope: calculation_envelope("NYE", "Negroni"),
                    decision: ItemDecision::Import,
                }],
                &mappings,
                &mut sink,
            )?;
            let calc_id = seeded.items[0].id.clone().unwrap();
            let before = tx.calculation_items_for(&ws(), &calc_id)?;
            assert_eq!(before.len(), 1);
            assert_eq!(before[0].recipe_id, Id::from("r1"));

            let report = execute(
                tx,
                &ws(),
                &actor(),
                vec![ExecuteItem {
                    envelope: calculation_envelope("NYE party", "Sazerac"),
                    decision: ItemDecision::Overwrite { existing_id: calc_id.clone() },
                }],
                &mappings,
                &mut sink,
            )?;
            assert_eq!(report.items[0].status, ItemStatus::Updated);
            // Children are replaced, not accumulated.
            let after = tx.calculation_items_for(&ws(), &calc_id)?;
            assert_eq!(after.len(), 1);
            assert_eq!(after[0].recipe_id, Id::from("r2"));
            Ok(())
        })
        .unwrap();
}

#[test]
fn overwrite_replaces_ingredient_volumes() {
    fn gin(volume: f64, unit_name: &str) -> ExportEnvelope {
        ExportEnvelope {
            export_version: 1,
            ingredient: Some(IngredientExport { name: "Gin".into(), ..Default::default() }),
            ingredient_volumes: vec![VolumeExport { volume, unit_name: unit_name.into() }],
            ..Default::default()
        }
    }
    let mut store = Store::open_in_memory().unwrap();
    let mut sink = MemorySink::new();
    store
        .with_tx::<_, ImportError>(|tx| {
            let seeded = execute(
                tx,
                &ws(),
                &actor(),
                vec![ExecuteItem { envelope: gin(700.0, "ML"), decision: ItemDecision::Import }],
                &RefMappings::default(),
                &mut sink,
            )?;
            let id = seeded.items[0].id.clone().unwrap();
            assert_eq!(tx.volumes_for(&ws(), &id)?.len(), 1);

            execute(
                tx,
                &ws(),
                &actor(),
                vec![ExecuteItem {
                    envelope: gin(70.0, "CL"),
                    decision: ItemDecision::Overwrite { existing_id: id.clone() },
                }],
                &RefMappings::default(),
                &mut sink,
            )?;
            let volumes = tx.volumes_for(&ws(), &id)?;
            assert_eq!(volumes.len(), 1);
            assert_eq!(volumes[0].volume, 70.0);
            let cl = tx.unit_by_name(&ws(), "CL")?.unwrap();
            assert_eq!(volumes[0].unit_id, cl.id);
            Ok(())
        })
        .unwrap();
}

#[test]
fn one_failing_item_rolls_back_alone() {
    let mut store = Store::open_in_memory().unwrap();
    let mut sink = MemorySink::new();
    store
        .with_tx::<_, ImportError>(|tx| {
            let report = execute(
                tx,
                &ws(),
                &actor(),
                vec![
                    ExecuteItem {
                        envelope: glass_envelope("Ghost"),
                        decision: ItemDecision::Overwrite { existing_id: Id::from("missing") },
                    },
                    ExecuteItem {
                        envelope: glass_envelope("Coupe"),
                        decision: ItemDecision::Import,
                    },
                ],
                &RefMappings::default(),
                &mut sink,
            )?;
            assert_eq!(report.items[0].status, ItemStatus::Error);
            assert!(report.items[0].message.is_some());
            assert_eq!(report.items[1].status, ItemStatus::Created);
            assert!(report.has_errors());
            assert_eq!(tx.count(EntityKind::Glass, &ws())?, 1);
            Ok(())
        })
        .unwrap();
    // Only the committed item reached the audit sink.
    assert_eq!(sink.records.len(), 1);
}

#[test]
fn validate_then_prepare_round_trip() {
    let envelopes = vec![glass_envelope("Tumbler"), glass_envelope("Coupe")];
    let report = validate(&envelopes);
    assert!(report.valid);

    let mut store = Store::open_in_memory().unwrap();
    store
        .with_tx::<_, ImportError>(|tx| {
            let proposal = prepare_mapping(tx, &ws(), &envelopes)?;
            assert_eq!(proposal.items.len(), 2);
            assert!(proposal.items.iter().all(|i| i.conflicts.is_empty()));
            Ok(())
        })
        .unwrap();
}
