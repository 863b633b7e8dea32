//! The furnace device and its per-tick state machine.
//!
//! A furnace runs two countdowns side by side: fuel burning down and the
//! current item cooking up. Each call to [`Furnace::tick`] lands in exactly
//! one regime, checked in this order:
//!
//! 1. **Burning** -- fuel left: burn one tick, then advance cooking if the
//!    input can cook into the output, or drop all progress if not.
//! 2. **Igniting** -- no fuel left, but a fuel unit is loaded and the input
//!    can cook: consume the unit and start a new burn. Cooking itself first
//!    advances on the following tick.
//! 3. **Decaying** -- no fuel and nothing to ignite, with progress banked:
//!    progress falls by [`COOK_DECAY_STEP`] (clamped at zero) while the input
//!    is still cookable, or resets outright when it is not.
//! 4. **Idle** -- nothing changes.
//!
//! After the regime runs the furnace adopts whatever an attached view holds
//! and republishes its timers (see [`crate::view`]).

use crate::catalog::RecipeCatalog;
use crate::fixed::Ticks;
use crate::hooks::FurnaceHooks;
use crate::id::{FurnaceId, OperatorId};
use crate::item::{ItemSlot, ItemStack, SlotError};
use crate::properties::FurnaceProperties;
use crate::view::{SlotSnapshot, SlotView, TimerObserver, TimerSnapshot};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Cook progress lost per tick while the fire is out.
pub const COOK_DECAY_STEP: Ticks = 5;

/// Which branch of the state machine a tick took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    Burning,
    Igniting,
    Decaying,
    Idle,
}

/// What an operator receives when collecting the output slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub stack: ItemStack,
    pub experience: f32,
}

/// One simulated furnace.
///
/// Single-owner: one driver ticks it and mutates its slots. Devices share
/// nothing mutable, so separate furnaces may be ticked on separate threads.
pub struct Furnace {
    pub(crate) id: FurnaceId,
    pub(crate) name: String,
    pub(crate) opener: Option<OperatorId>,
    pub(crate) properties: Arc<FurnaceProperties>,
    pub(crate) catalog: Arc<dyn RecipeCatalog>,
    pub(crate) fuel: ItemSlot,
    pub(crate) input: ItemSlot,
    pub(crate) output: ItemSlot,
    pub(crate) cook_time: Ticks,
    pub(crate) cook_time_total: Ticks,
    pub(crate) fuel_time: Ticks,
    pub(crate) fuel_time_total: Ticks,
    pub(crate) experience: f32,
    view: Option<Box<dyn SlotView>>,
    observers: Vec<Box<dyn TimerObserver>>,
}

impl Furnace {
    /// A fresh furnace: empty slots, zero timers.
    pub fn new(
        id: FurnaceId,
        name: &str,
        properties: Arc<FurnaceProperties>,
        catalog: Arc<dyn RecipeCatalog>,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            opener: None,
            properties,
            catalog,
            fuel: ItemSlot::empty(),
            input: ItemSlot::empty(),
            output: ItemSlot::empty(),
            cook_time: 0,
            cook_time_total: 0,
            fuel_time: 0,
            fuel_time_total: 0,
            experience: 0.0,
            view: None,
            observers: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the furnace by one tick.
    pub fn tick(&mut self, hooks: &mut dyn FurnaceHooks) -> Regime {
        let regime = if self.fuel_time > 0 {
            self.burn_fuel(hooks);
            if self.can_cook() {
                self.advance_cook(hooks);
                if self.cook_time >= self.cook_time_total {
                    self.cook_time = 0;
                    self.finish_cook(hooks);
                }
            } else {
                self.cook_time = 0;
            }
            Regime::Burning
        } else if self.can_burn() && self.can_cook() {
            self.ignite_fuel(hooks);
            Regime::Igniting
        } else if self.cook_time > 0 {
            if self.can_cook() {
                self.cook_time = self.cook_time.saturating_sub(COOK_DECAY_STEP);
            } else {
                self.cook_time = 0;
            }
            Regime::Decaying
        } else {
            Regime::Idle
        };

        // Progress never rests above the total of the recipe now loaded.
        self.cook_time = self.cook_time.min(self.cook_time_total);

        trace!(
            furnace = %self.id,
            ?regime,
            fuel_time = self.fuel_time,
            cook_time = self.cook_time,
            cook_time_total = self.cook_time_total,
            "tick"
        );

        self.sync_view();
        regime
    }

    /// A loaded fuel unit the catalog knows how to burn.
    fn can_burn(&self) -> bool {
        self.fuel
            .kind()
            .is_some_and(|kind| self.catalog.fuel_for(kind).is_some())
    }

    /// Whether the input can cook into the output slot. Refreshes
    /// `cook_time_total` from the catalog whenever a recipe matches, so a
    /// changed input or rebalanced recipe takes effect this tick.
    fn can_cook(&mut self) -> bool {
        let Some(input) = self.input.stack() else {
            return false;
        };
        let Some(recipe) = self.catalog.recipe_for(input.item_type) else {
            return false;
        };
        let result = recipe.result;
        self.cook_time_total = self.properties.effective_cook_time(recipe.cook_time);

        match self.output.stack() {
            None => true,
            Some(held) if held.item_type == result => {
                held.quantity < self.catalog.max_stack_size(result)
            }
            Some(_) => false,
        }
    }

    fn burn_fuel(&mut self, hooks: &mut dyn FurnaceHooks) {
        self.fuel_time -= 1;
        let remaining = self.fuel_time;
        hooks.on_fuel_burning(self, remaining);
    }

    fn advance_cook(&mut self, hooks: &mut dyn FurnaceHooks) {
        self.cook_time = self.cook_time.saturating_add(1);
        if let Some(input) = self.input.stack() {
            hooks.on_cooking(self, input);
        }
    }

    fn ignite_fuel(&mut self, hooks: &mut dyn FurnaceHooks) {
        let Some(fuel) = self.fuel.stack() else {
            return;
        };
        let Some(record) = self.catalog.fuel_for(fuel.item_type).copied() else {
            return;
        };

        let outcome = hooks.on_fuel_ignite(self, fuel, &record, record.burn_time);
        if outcome.cancelled {
            debug!(furnace = %self.id, fuel = ?record.fuel, "ignite vetoed");
            return;
        }

        self.fuel.decrement_leaving(record.remainder);
        let burn = self.properties.effective_burn_time(outcome.burn_time);
        self.fuel_time = burn;
        self.fuel_time_total = burn;
        debug!(furnace = %self.id, fuel = ?record.fuel, burn, "fuel ignited");
        self.push_view();
    }

    fn finish_cook(&mut self, hooks: &mut dyn FurnaceHooks) {
        let Some(input) = self.input.stack().cloned() else {
            return;
        };
        let Some(recipe) = self.catalog.recipe_for(input.item_type) else {
            return;
        };
        let (result, experience) = (recipe.result, recipe.experience);

        let proposed = match self.output.stack() {
            None => ItemStack::single(result),
            Some(held) => ItemStack::new(held.item_type, held.quantity + 1),
        };
        // Accrued before the hook runs and kept even if it vetoes.
        self.experience += experience;

        let outcome = hooks.on_cook_finish(self, &input, proposed);
        if outcome.cancelled {
            debug!(furnace = %self.id, input = ?input.item_type, "cook finish vetoed");
            return;
        }

        let max = self.catalog.max_stack_size(outcome.result.item_type);
        if let Err(error) = self.output.set(Some(outcome.result), max) {
            warn!(furnace = %self.id, %error, "cook finish result refused");
            return;
        }
        self.input.decrement();
        debug!(
            furnace = %self.id,
            input = ?input.item_type,
            output = ?self.output.stack(),
            "cook finished"
        );
        self.push_view();
    }

    // -----------------------------------------------------------------------
    // View sync
    // -----------------------------------------------------------------------

    fn sync_view(&mut self) {
        if let Some(view) = &self.view {
            let seen = view.snapshot();
            self.adopt(seen);
        }

        let timers = self.timers();
        for observer in &mut self.observers {
            if let Err(error) = observer.observe(&timers) {
                warn!(furnace = %self.id, %error, "timer observer failed");
            }
        }
    }

    /// Take the view's contents as canonical. Stacks a slot refuses keep the
    /// canonical contents, which are then pushed back to the view.
    fn adopt(&mut self, seen: SlotSnapshot) {
        let catalog = &self.catalog;
        let mut refused = false;
        for (slot, stack) in [
            (&mut self.fuel, seen.fuel),
            (&mut self.input, seen.input),
            (&mut self.output, seen.output),
        ] {
            let stack = stack.filter(|s| s.quantity > 0);
            let max = stack
                .as_ref()
                .map(|s| catalog.max_stack_size(s.item_type))
                .unwrap_or(u32::MAX);
            if let Err(error) = slot.set(stack, max) {
                warn!(furnace = %self.id, %error, "view held an invalid stack");
                refused = true;
            }
        }
        if refused {
            self.push_view();
        }
    }

    fn push_view(&mut self) {
        let slots = self.slots();
        if let Some(view) = self.view.as_mut() {
            view.show(&slots);
        }
    }

    /// Attach an operator view. The view is first filled with the canonical
    /// contents.
    pub fn open_view(&mut self, opener: OperatorId, view: Box<dyn SlotView>) {
        self.opener = Some(opener);
        self.view = Some(view);
        self.push_view();
        debug!(furnace = %self.id, %opener, "view opened");
    }

    /// Detach the operator view, handing it back.
    pub fn close_view(&mut self) -> Option<Box<dyn SlotView>> {
        self.opener = None;
        self.view.take()
    }

    pub fn add_observer(&mut self, observer: Box<dyn TimerObserver>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // -----------------------------------------------------------------------
    // Slot mutation
    // -----------------------------------------------------------------------

    fn max_stack_for(&self, stack: Option<&ItemStack>) -> u32 {
        stack
            .map(|s| self.catalog.max_stack_size(s.item_type))
            .unwrap_or(u32::MAX)
    }

    /// Replace the fuel slot. Timers catch up on the next tick.
    pub fn set_fuel(&mut self, fuel: Option<ItemStack>) -> Result<(), SlotError> {
        let max = self.max_stack_for(fuel.as_ref());
        self.fuel.set(fuel, max)?;
        self.push_view();
        Ok(())
    }

    /// Replace the input slot. Timers catch up on the next tick.
    pub fn set_input(&mut self, input: Option<ItemStack>) -> Result<(), SlotError> {
        let max = self.max_stack_for(input.as_ref());
        self.input.set(input, max)?;
        self.push_view();
        Ok(())
    }

    /// Merge a stack into the fuel slot, returning what did not fit.
    #[must_use = "the remainder holds items that did not fit"]
    pub fn insert_fuel(&mut self, stack: ItemStack) -> Option<ItemStack> {
        let max = self.catalog.max_stack_size(stack.item_type);
        let rest = self.fuel.merge(stack, max);
        self.push_view();
        rest
    }

    /// Merge a stack into the input slot, returning what did not fit.
    #[must_use = "the remainder holds items that did not fit"]
    pub fn insert_input(&mut self, stack: ItemStack) -> Option<ItemStack> {
        let max = self.catalog.max_stack_size(stack.item_type);
        let rest = self.input.merge(stack, max);
        self.push_view();
        rest
    }

    /// Collect the output slot along with the banked experience.
    pub fn take_output(&mut self) -> Option<Extraction> {
        let stack = self.output.take()?;
        let experience = self.extract_experience();
        self.push_view();
        Some(Extraction { stack, experience })
    }

    /// Return the banked experience and reset it to zero.
    pub fn extract_experience(&mut self) -> f32 {
        std::mem::take(&mut self.experience)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn id(&self) -> FurnaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn opener(&self) -> Option<OperatorId> {
        self.opener
    }

    pub fn properties(&self) -> &Arc<FurnaceProperties> {
        &self.properties
    }

    pub fn fuel(&self) -> Option<&ItemStack> {
        self.fuel.stack()
    }

    pub fn input(&self) -> Option<&ItemStack> {
        self.input.stack()
    }

    pub fn output(&self) -> Option<&ItemStack> {
        self.output.stack()
    }

    pub fn cook_time(&self) -> Ticks {
        self.cook_time
    }

    pub fn cook_time_total(&self) -> Ticks {
        self.cook_time_total
    }

    pub fn fuel_time(&self) -> Ticks {
        self.fuel_time
    }

    pub fn fuel_time_total(&self) -> Ticks {
        self.fuel_time_total
    }

    /// Banked experience, without extracting it.
    pub fn experience(&self) -> f32 {
        self.experience
    }

    pub fn is_burning(&self) -> bool {
        self.fuel_time > 0
    }

    pub fn timers(&self) -> TimerSnapshot {
        TimerSnapshot {
            cook_time: self.cook_time,
            cook_time_total: self.cook_time_total,
            fuel_time: self.fuel_time,
            fuel_time_total: self.fuel_time_total,
        }
    }

    pub fn slots(&self) -> SlotSnapshot {
        SlotSnapshot {
            fuel: self.fuel.stack().cloned(),
            input: self.input.stack().cloned(),
            output: self.output.stack().cloned(),
        }
    }
}

impl PartialEq for Furnace {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for Furnace {}

impl fmt::Debug for Furnace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Furnace")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("opener", &self.opener)
            .field("properties", &self.properties.name())
            .field("fuel", &self.fuel)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("cook_time", &self.cook_time)
            .field("cook_time_total", &self.cook_time_total)
            .field("fuel_time", &self.fuel_time)
            .field("fuel_time_total", &self.fuel_time_total)
            .field("experience", &self.experience)
            .field("view", &self.view.is_some())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Furnace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
