//! Shared fixtures for unit tests, integration tests, benches and fuzzing.

use crate::catalog::{Catalog, CatalogBuilder, FuelRecord};
use crate::fixed::Ticks;
use crate::furnace::Furnace;
use crate::hooks::{CookFinishOutcome, FurnaceHooks, IgniteOutcome};
use crate::id::{FurnaceId, ItemTypeId, OperatorId};
use crate::item::ItemStack;
use crate::properties::FurnaceProperties;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Item kinds, in registration order
// ---------------------------------------------------------------------------

pub fn coal() -> ItemTypeId {
    ItemTypeId(0)
}
pub fn lava_bucket() -> ItemTypeId {
    ItemTypeId(1)
}
pub fn bucket() -> ItemTypeId {
    ItemTypeId(2)
}
pub fn stick() -> ItemTypeId {
    ItemTypeId(3)
}
pub fn iron_ore() -> ItemTypeId {
    ItemTypeId(4)
}
pub fn iron_ingot() -> ItemTypeId {
    ItemTypeId(5)
}
pub fn gold_ore() -> ItemTypeId {
    ItemTypeId(6)
}
pub fn gold_ingot() -> ItemTypeId {
    ItemTypeId(7)
}
pub fn sand() -> ItemTypeId {
    ItemTypeId(8)
}
pub fn glass() -> ItemTypeId {
    ItemTypeId(9)
}
pub fn wet_sponge() -> ItemTypeId {
    ItemTypeId(10)
}
/// Stacks to 4, so output-full cases are cheap to reach.
pub fn sponge() -> ItemTypeId {
    ItemTypeId(11)
}
/// Neither fuel nor ingredient.
pub fn cobblestone() -> ItemTypeId {
    ItemTypeId(12)
}

pub fn operator_a() -> OperatorId {
    OperatorId::from_u128(0xa11ce)
}

pub fn operator_b() -> OperatorId {
    OperatorId::from_u128(0xb0b)
}

/// Catalog used across the test suites.
///
/// | fuel        | burn  | leaves |
/// |-------------|-------|--------|
/// | coal        | 1600  |        |
/// | lava_bucket | 20000 | bucket |
/// | stick       | 100   |        |
///
/// | ingredient | result     | cook | xp   |
/// |------------|------------|------|------|
/// | iron_ore   | iron_ingot | 200  | 0.7  |
/// | gold_ore   | gold_ingot | 100  | 1.0  |
/// | sand       | glass      | 200  | 0.1  |
/// | wet_sponge | sponge     | 10   | 0.15 |
pub fn test_catalog_builder() -> CatalogBuilder {
    let mut b = CatalogBuilder::new();
    let coal = b.register_item("coal", 64);
    let lava = b.register_item("lava_bucket", 1);
    let bucket = b.register_item("bucket", 16);
    let stick = b.register_item("stick", 64);
    let iron_ore = b.register_item("iron_ore", 64);
    let iron_ingot = b.register_item("iron_ingot", 64);
    let gold_ore = b.register_item("gold_ore", 64);
    let gold_ingot = b.register_item("gold_ingot", 64);
    let sand = b.register_item("sand", 64);
    let glass = b.register_item("glass", 64);
    let wet_sponge = b.register_item("wet_sponge", 64);
    let sponge = b.register_item("sponge", 4);
    b.register_item("cobblestone", 64);

    b.register_fuel(coal, 1600, None);
    b.register_fuel(lava, 20000, Some(bucket));
    b.register_fuel(stick, 100, None);

    b.register_recipe("smelt_iron", iron_ore, iron_ingot, 200, 0.7);
    b.register_recipe("smelt_gold", gold_ore, gold_ingot, 100, 1.0);
    b.register_recipe("smelt_glass", sand, glass, 200, 0.1);
    b.register_recipe("dry_sponge", wet_sponge, sponge, 10, 0.15);
    b
}

pub fn test_catalog() -> Arc<Catalog> {
    match test_catalog_builder().build() {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => panic!("test catalog must build: {e}"),
    }
}

/// A standard-tier furnace over [`test_catalog`]. Furnaces with the same
/// name compare equal.
pub fn make_furnace(name: &str) -> Furnace {
    make_furnace_with(name, FurnaceProperties::furnace())
}

pub fn make_furnace_with(name: &str, properties: FurnaceProperties) -> Furnace {
    Furnace::new(FurnaceId::from_u128(1), name, Arc::new(properties), test_catalog())
}

pub fn run_ticks(furnace: &mut Furnace, hooks: &mut dyn FurnaceHooks, n: u32) {
    for _ in 0..n {
        furnace.tick(hooks);
    }
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookCall {
    Ignite { burn_time: Ticks },
    Burning { remaining: Ticks },
    Cooking { input: ItemStack },
    CookFinish { result: ItemStack },
}

/// Records every hook call and optionally vetoes or rewrites outcomes.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    pub calls: Vec<HookCall>,
    pub veto_ignite: bool,
    pub veto_finish: bool,
    pub burn_time_override: Option<Ticks>,
    pub result_override: Option<ItemStack>,
}

impl FurnaceHooks for RecordingHooks {
    fn on_fuel_ignite(
        &mut self,
        _furnace: &Furnace,
        _fuel: &ItemStack,
        _record: &FuelRecord,
        burn_time: Ticks,
    ) -> IgniteOutcome {
        self.calls.push(HookCall::Ignite { burn_time });
        if self.veto_ignite {
            IgniteOutcome::cancel()
        } else {
            IgniteOutcome::proceed(self.burn_time_override.unwrap_or(burn_time))
        }
    }

    fn on_fuel_burning(&mut self, _furnace: &Furnace, remaining: Ticks) {
        self.calls.push(HookCall::Burning { remaining });
    }

    fn on_cooking(&mut self, _furnace: &Furnace, input: &ItemStack) {
        self.calls.push(HookCall::Cooking {
            input: input.clone(),
        });
    }

    fn on_cook_finish(
        &mut self,
        _furnace: &Furnace,
        _input: &ItemStack,
        result: ItemStack,
    ) -> CookFinishOutcome {
        self.calls.push(HookCall::CookFinish {
            result: result.clone(),
        });
        let result = self.result_override.clone().unwrap_or(result);
        if self.veto_finish {
            CookFinishOutcome::cancel(result)
        } else {
            CookFinishOutcome::proceed(result)
        }
    }
}
