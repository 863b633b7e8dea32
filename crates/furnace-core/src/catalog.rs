//! Recipe and fuel lookup.
//!
//! The engine only ever asks three questions of a catalog: is this kind a
//! fuel, does this kind have a cooking recipe, and how many of this kind fit
//! in one stack. [`RecipeCatalog`] is that contract; [`Catalog`] is the
//! concrete, frozen-at-startup implementation built with [`CatalogBuilder`].

use crate::fixed::Ticks;
use crate::id::ItemTypeId;
use std::collections::HashMap;

/// Stack limit for kinds the catalog has never heard of.
pub const DEFAULT_MAX_STACK: u32 = 64;

/// A fuel entry: how long one unit burns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuelRecord {
    pub fuel: ItemTypeId,
    /// Nominal burn time before the device's fuel multiplier.
    pub burn_time: Ticks,
    /// Kind left behind when the last unit burns (a drained container).
    pub remainder: Option<ItemTypeId>,
}

/// A cooking recipe: one ingredient unit becomes one result unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub name: String,
    pub ingredient: ItemTypeId,
    pub result: ItemTypeId,
    /// Nominal cook time before the device's cook multiplier.
    pub cook_time: Ticks,
    pub experience: f32,
}

/// Read-only lookup the furnace consults every tick.
pub trait RecipeCatalog: Send + Sync {
    fn fuel_for(&self, kind: ItemTypeId) -> Option<&FuelRecord>;

    fn recipe_for(&self, kind: ItemTypeId) -> Option<&Recipe>;

    fn max_stack_size(&self, _kind: ItemTypeId) -> u32 {
        DEFAULT_MAX_STACK
    }
}

/// An item kind definition.
#[derive(Debug, Clone)]
pub struct ItemDef {
    pub name: String,
    pub max_stack: u32,
}

/// Builder for an immutable [`Catalog`].
/// Three-phase lifecycle: registration -> mutation -> finalization.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemTypeId>,
    fuels: Vec<FuelRecord>,
    recipes: Vec<Recipe>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: Register an item kind. Returns its ID.
    pub fn register_item(&mut self, name: &str, max_stack: u32) -> ItemTypeId {
        let id = ItemTypeId(self.items.len() as u32);
        self.items.push(ItemDef {
            name: name.to_string(),
            max_stack,
        });
        self.item_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Phase 1: Register a fuel.
    pub fn register_fuel(
        &mut self,
        fuel: ItemTypeId,
        burn_time: Ticks,
        remainder: Option<ItemTypeId>,
    ) {
        self.fuels.push(FuelRecord {
            fuel,
            burn_time,
            remainder,
        });
    }

    /// Phase 1: Register a cooking recipe.
    pub fn register_recipe(
        &mut self,
        name: &str,
        ingredient: ItemTypeId,
        result: ItemTypeId,
        cook_time: Ticks,
        experience: f32,
    ) {
        self.recipes.push(Recipe {
            name: name.to_string(),
            ingredient,
            result,
            cook_time,
            experience,
        });
    }

    /// Phase 2: Mutate an existing recipe by name.
    pub fn mutate_recipe<F>(&mut self, name: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut Recipe),
    {
        let recipe = self
            .recipes
            .iter_mut()
            .find(|r| r.name == name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        f(recipe);
        Ok(())
    }

    /// Phase 2: Mutate an existing fuel by kind.
    pub fn mutate_fuel<F>(&mut self, fuel: ItemTypeId, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut FuelRecord),
    {
        let record = self
            .fuels
            .iter_mut()
            .find(|r| r.fuel == fuel)
            .ok_or_else(|| CatalogError::NotFound(format!("{fuel:?}")))?;
        f(record);
        Ok(())
    }

    /// Lookup item kind by name.
    pub fn item_id(&self, name: &str) -> Option<ItemTypeId> {
        self.item_name_to_id.get(name).copied()
    }

    fn check_item(&self, id: ItemTypeId) -> Result<(), CatalogError> {
        if (id.0 as usize) < self.items.len() {
            Ok(())
        } else {
            Err(CatalogError::InvalidItemRef(id))
        }
    }

    /// Phase 3: Validate and freeze.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        for item in &self.items {
            if item.max_stack == 0 {
                return Err(CatalogError::ZeroMaxStack(item.name.clone()));
            }
        }

        let mut fuels = HashMap::with_capacity(self.fuels.len());
        for record in &self.fuels {
            self.check_item(record.fuel)?;
            if let Some(rest) = record.remainder {
                self.check_item(rest)?;
            }
            if fuels.insert(record.fuel, *record).is_some() {
                return Err(CatalogError::DuplicateFuel(record.fuel));
            }
        }

        let mut recipes = HashMap::with_capacity(self.recipes.len());
        for recipe in &self.recipes {
            self.check_item(recipe.ingredient)?;
            self.check_item(recipe.result)?;
            if recipes.insert(recipe.ingredient, recipe.clone()).is_some() {
                return Err(CatalogError::DuplicateIngredient(recipe.ingredient));
            }
        }

        Ok(Catalog {
            items: self.items,
            item_name_to_id: self.item_name_to_id,
            fuels,
            recipes,
        })
    }
}

/// Immutable catalog. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct Catalog {
    items: Vec<ItemDef>,
    item_name_to_id: HashMap<String, ItemTypeId>,
    fuels: HashMap<ItemTypeId, FuelRecord>,
    recipes: HashMap<ItemTypeId, Recipe>,
}

impl Catalog {
    pub fn get_item(&self, id: ItemTypeId) -> Option<&ItemDef> {
        self.items.get(id.0 as usize)
    }

    pub fn item_id(&self, name: &str) -> Option<ItemTypeId> {
        self.item_name_to_id.get(name).copied()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn fuel_count(&self) -> usize {
        self.fuels.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }
}

impl RecipeCatalog for Catalog {
    fn fuel_for(&self, kind: ItemTypeId) -> Option<&FuelRecord> {
        self.fuels.get(&kind)
    }

    fn recipe_for(&self, kind: ItemTypeId) -> Option<&Recipe> {
        self.recipes.get(&kind)
    }

    fn max_stack_size(&self, kind: ItemTypeId) -> u32 {
        self.get_item(kind)
            .map(|def| def.max_stack)
            .unwrap_or(DEFAULT_MAX_STACK)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid item reference: {0:?}")]
    InvalidItemRef(ItemTypeId),
    #[error("more than one recipe uses ingredient {0:?}")]
    DuplicateIngredient(ItemTypeId),
    #[error("fuel {0:?} registered twice")]
    DuplicateFuel(ItemTypeId),
    #[error("item {0} has a max stack size of zero")]
    ZeroMaxStack(String),
}
