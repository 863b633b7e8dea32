//! Interception points called during a tick.
//!
//! Two hooks are advisory (`on_fuel_burning`, `on_cooking`): they observe and
//! cannot change anything. Two can veto or rewrite the proposed outcome
//! (`on_fuel_ignite`, `on_cook_finish`). The furnace stays the only writer of
//! its own state and applies an outcome only when it is not cancelled.

use crate::catalog::FuelRecord;
use crate::fixed::Ticks;
use crate::furnace::Furnace;
use crate::item::ItemStack;

/// Answer to a proposed fuel ignition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IgniteOutcome {
    pub cancelled: bool,
    /// Nominal burn time to use, before the tier's fuel multiplier.
    pub burn_time: Ticks,
}

impl IgniteOutcome {
    pub fn proceed(burn_time: Ticks) -> Self {
        Self {
            cancelled: false,
            burn_time,
        }
    }

    pub fn cancel() -> Self {
        Self {
            cancelled: true,
            burn_time: 0,
        }
    }
}

/// Answer to a proposed cook completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookFinishOutcome {
    pub cancelled: bool,
    /// Stack that becomes the new output slot.
    pub result: ItemStack,
}

impl CookFinishOutcome {
    pub fn proceed(result: ItemStack) -> Self {
        Self {
            cancelled: false,
            result,
        }
    }

    pub fn cancel(result: ItemStack) -> Self {
        Self {
            cancelled: true,
            result,
        }
    }
}

/// External policy consulted by [`Furnace::tick`].
///
/// Every method has a pass-through default, so implementors override only
/// what they care about.
pub trait FurnaceHooks {
    /// A fuel unit is about to be consumed. `burn_time` is the catalog's
    /// nominal value.
    fn on_fuel_ignite(
        &mut self,
        _furnace: &Furnace,
        _fuel: &ItemStack,
        _record: &FuelRecord,
        burn_time: Ticks,
    ) -> IgniteOutcome {
        IgniteOutcome::proceed(burn_time)
    }

    /// Fuel ticked down; `remaining` is the new value.
    fn on_fuel_burning(&mut self, _furnace: &Furnace, _remaining: Ticks) {}

    /// Cook progress advanced on `input`.
    fn on_cooking(&mut self, _furnace: &Furnace, _input: &ItemStack) {}

    /// An item finished cooking. `result` is the proposed new output slot.
    fn on_cook_finish(
        &mut self,
        _furnace: &Furnace,
        _input: &ItemStack,
        result: ItemStack,
    ) -> CookFinishOutcome {
        CookFinishOutcome::proceed(result)
    }
}

/// Approves everything unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl FurnaceHooks for NoHooks {}
