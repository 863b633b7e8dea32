//! Serde data file structs for furnace content.
//!
//! These structs define the on-disk format for items, fuels, recipes and
//! device tiers. They are deserialized from RON, JSON, or TOML data files and
//! then resolved into engine types by the loader. Cross-references are by
//! item name.

use furnace_core::catalog::DEFAULT_MAX_STACK;
use serde::Deserialize;

// ===========================================================================
// Items
// ===========================================================================

/// An item kind definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
    #[serde(default = "default_max_stack")]
    pub max_stack: u32,
}

fn default_max_stack() -> u32 {
    DEFAULT_MAX_STACK
}

// ===========================================================================
// Fuels
// ===========================================================================

/// A fuel definition: which item burns and for how long.
#[derive(Debug, Clone, Deserialize)]
pub struct FuelData {
    pub item: String,
    pub burn_time: u32,
    /// Item left in the fuel slot when the last unit burns.
    #[serde(default)]
    pub remainder: Option<String>,
}

// ===========================================================================
// Recipes
// ===========================================================================

/// A cooking recipe definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub name: String,
    pub ingredient: String,
    pub result: String,
    pub cook_time: u32,
    #[serde(default)]
    pub experience: f32,
}

// ===========================================================================
// Tiers
// ===========================================================================

/// A device tier definition. Multipliers divide nominal times.
#[derive(Debug, Clone, Deserialize)]
pub struct TierData {
    pub name: String,
    pub fuel_multiplier: f64,
    pub cook_multiplier: f64,
}

// ===========================================================================
// Tests
// ===========================================================================
