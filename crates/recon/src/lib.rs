//! barkeep-recon: the reconciliation engine.
//!
//! Two entry surfaces sit on top of the shared matching and remapping
//! machinery: [`backup::import_backup`] recreates a full workspace graph
//! from a backup payload, and the staged trio
//! [`staged::validate`] / [`staged::prepare_mapping`] / [`staged::execute`]
//! merges single-entity exports under operator control.

pub mod backup;
pub mod error;
pub mod normalize;
pub mod remap;
pub mod similarity;
pub mod staged;

pub use backup::{import_backup, BackupImportReport};
pub use error::ImportError;
pub use normalize::{normalize_ice_label, normalize_unit_label, Normalizer};
pub use remap::IdRemapper;
pub use similarity::{
    best_match, ingredient_similarity, name_similarity, probable_duplicate,
    probable_glass_duplicate, probable_ingredient_duplicate, probable_recipe_duplicate,
    DUPLICATE_THRESHOLD, LINK_THRESHOLD,
};
pub use staged::{execute, prepare_mapping, validate, ExecuteItem};
