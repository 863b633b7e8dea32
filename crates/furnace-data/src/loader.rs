//! Loading pipeline: finds data files, resolves names, builds the catalog.
//!
//! A data directory holds up to four lists, each in RON, JSON or TOML
//! (format detected from the extension):
//!
//! | base name | required | contents                     |
//! |-----------|----------|------------------------------|
//! | `items`   | yes      | [`ItemData`]                 |
//! | `recipes` | yes      | [`RecipeData`]               |
//! | `fuels`   | no       | [`FuelData`]                 |
//! | `tiers`   | no       | [`TierData`], added to the three presets |
//!
//! TOML files wrap each list under a key equal to the base name.

use crate::schema::{FuelData, ItemData, RecipeData, TierData};
use furnace_core::catalog::{Catalog, CatalogBuilder, CatalogError};
use furnace_core::id::ItemTypeId;
use furnace_core::properties::{FurnaceProperties, PropertiesSet};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ===========================================================================
// Errors
// ===========================================================================

/// Why a data directory could not be turned into a catalog and tiers.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("no {list} file (.ron, .toml or .json) in {dir}")]
    MissingRequired { list: String, dir: PathBuf },

    #[error("{file}: extension is not ron, toml or json")]
    UnsupportedFormat { file: PathBuf },

    /// The same list is present in two formats; neither wins.
    #[error("{list} is defined twice: {first} and {second}")]
    AmbiguousList {
        list: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error("{file} refers to item '{name}', which items does not define")]
    UnknownItem { file: PathBuf, name: String },

    #[error("'{name}' appears twice in {file}")]
    DuplicateName { file: PathBuf, name: String },

    #[error("invalid tier in {file}: {detail}")]
    InvalidTier { file: PathBuf, detail: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Locating and reading lists
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Ron,
    Toml,
    Json,
}

const EXTENSIONS: [(&str, Format); 3] = [
    ("ron", Format::Ron),
    ("toml", Format::Toml),
    ("json", Format::Json),
];

fn format_of(path: &Path) -> Result<Format, DataLoadError> {
    let ext = path.extension().and_then(|e| e.to_str());
    EXTENSIONS
        .iter()
        .find(|(known, _)| Some(*known) == ext)
        .map(|(_, format)| *format)
        .ok_or_else(|| DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        })
}

/// The file holding `list` in `dir`, if any. A list may live in one format
/// only.
fn locate(dir: &Path, list: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut present = EXTENSIONS
        .iter()
        .map(|(ext, _)| dir.join(format!("{list}.{ext}")))
        .filter(|path| path.exists());
    let first = present.next();
    if let (Some(first), Some(second)) = (&first, present.next()) {
        return Err(DataLoadError::AmbiguousList {
            list: list.to_string(),
            first: first.clone(),
            second,
        });
    }
    Ok(first)
}

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Entries of one list file. RON and JSON files are a bare array; TOML has
/// no top-level arrays, so the entries sit under a key named after the list
/// (`[[items]]`, `[[fuels]]`, ...).
fn read_list<T: DeserializeOwned>(path: &Path, list: &str) -> Result<Vec<T>, DataLoadError> {
    let text = std::fs::read_to_string(path)?;
    match format_of(path)? {
        Format::Ron => ron::from_str(&text).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&text).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let mut doc: toml::Table = toml::from_str(&text).map_err(|e| parse_error(path, e))?;
            let entries = doc
                .remove(list)
                .ok_or_else(|| parse_error(path, format!("no [[{list}]] entries")))?;
            entries
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

fn read_required<T: DeserializeOwned>(
    dir: &Path,
    list: &str,
) -> Result<(PathBuf, Vec<T>), DataLoadError> {
    let path = locate(dir, list)?.ok_or_else(|| DataLoadError::MissingRequired {
        list: list.to_string(),
        dir: dir.to_path_buf(),
    })?;
    let entries = read_list(&path, list)?;
    Ok((path, entries))
}

fn read_optional<T: DeserializeOwned>(
    dir: &Path,
    list: &str,
) -> Result<Option<(PathBuf, Vec<T>)>, DataLoadError> {
    locate(dir, list)?
        .map(|path| read_list(&path, list).map(|entries| (path, entries)))
        .transpose()
}

// ===========================================================================
// Names
// ===========================================================================

fn item_named(
    items: &HashMap<String, ItemTypeId>,
    name: &str,
    file: &Path,
) -> Result<ItemTypeId, DataLoadError> {
    items
        .get(name)
        .copied()
        .ok_or_else(|| DataLoadError::UnknownItem {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
}

/// Record `name` as taken within one file.
fn claim(seen: &mut HashSet<String>, name: &str, file: &Path) -> Result<(), DataLoadError> {
    if seen.insert(name.to_string()) {
        Ok(())
    } else {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    }
}

// ===========================================================================
// Pipeline
// ===========================================================================

/// Everything a host needs to build and restore furnaces.
#[derive(Debug)]
pub struct CatalogData {
    pub catalog: Catalog,
    pub tiers: PropertiesSet,
}

/// Read items, fuels and recipes into a builder without freezing it, so the
/// caller can still rebalance entries before `build()`.
pub fn load_catalog_builder(dir: &Path) -> Result<CatalogBuilder, DataLoadError> {
    let mut builder = CatalogBuilder::new();
    let mut items: HashMap<String, ItemTypeId> = HashMap::new();

    let (items_path, item_list) = read_required::<ItemData>(dir, "items")?;
    for item in &item_list {
        if items.contains_key(&item.name) {
            return Err(DataLoadError::DuplicateName {
                file: items_path,
                name: item.name.clone(),
            });
        }
        let id = builder.register_item(&item.name, item.max_stack);
        items.insert(item.name.clone(), id);
    }

    if let Some((fuels_path, fuel_list)) = read_optional::<FuelData>(dir, "fuels")? {
        let mut seen = HashSet::new();
        for fuel in &fuel_list {
            claim(&mut seen, &fuel.item, &fuels_path)?;
            let id = item_named(&items, &fuel.item, &fuels_path)?;
            let remainder = fuel
                .remainder
                .as_deref()
                .map(|name| item_named(&items, name, &fuels_path))
                .transpose()?;
            builder.register_fuel(id, fuel.burn_time, remainder);
        }
    }

    let (recipes_path, recipe_list) = read_required::<RecipeData>(dir, "recipes")?;
    let mut seen = HashSet::new();
    for recipe in &recipe_list {
        claim(&mut seen, &recipe.name, &recipes_path)?;
        let ingredient = item_named(&items, &recipe.ingredient, &recipes_path)?;
        let result = item_named(&items, &recipe.result, &recipes_path)?;
        builder.register_recipe(
            &recipe.name,
            ingredient,
            result,
            recipe.cook_time,
            recipe.experience,
        );
    }

    debug!(
        dir = %dir.display(),
        items = item_list.len(),
        recipes = recipe_list.len(),
        "catalog data read"
    );
    Ok(builder)
}

/// The three preset tiers plus any defined in `tiers.*`. A file entry with a
/// preset's name replaces that preset.
pub fn load_tiers(dir: &Path) -> Result<PropertiesSet, DataLoadError> {
    let mut tiers = PropertiesSet::standard();
    let Some((path, list)) = read_optional::<TierData>(dir, "tiers")? else {
        return Ok(tiers);
    };

    let mut seen = HashSet::new();
    for tier in &list {
        claim(&mut seen, &tier.name, &path)?;
        let properties =
            FurnaceProperties::from_f64(&tier.name, tier.fuel_multiplier, tier.cook_multiplier)
                .map_err(|e| DataLoadError::InvalidTier {
                    file: path.clone(),
                    detail: e.to_string(),
                })?;
        tiers.insert(properties);
    }
    debug!(file = %path.display(), tiers = ?tiers.names().collect::<Vec<_>>(), "tiers read");
    Ok(tiers)
}

/// Load and freeze the catalog and tiers from a data directory.
pub fn load_catalog_data(dir: &Path) -> Result<CatalogData, DataLoadError> {
    let catalog = load_catalog_builder(dir)?.build()?;
    let tiers = load_tiers(dir)?;
    info!(
        dir = %dir.display(),
        items = catalog.item_count(),
        fuels = catalog.fuel_count(),
        recipes = catalog.recipe_count(),
        tiers = tiers.len(),
        "furnace data loaded"
    );
    Ok(CatalogData { catalog, tiers })
}

// ===========================================================================
// Tests
// ===========================================================================
