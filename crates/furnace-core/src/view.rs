//! Presentation-side collaborators.
//!
//! A furnace owns its canonical slots. An attached [`SlotView`] is a copy an
//! operator can edit; at the end of every tick the furnace adopts whatever
//! the view holds, then republishes its timers to every [`TimerObserver`].
//! Whenever the furnace itself changes a slot it pushes the new contents to
//! the view straight away, so the end-of-tick adoption never resurrects stale
//! contents.

use crate::fixed::Ticks;
use crate::item::ItemStack;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

/// Contents of the three slots at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSnapshot {
    pub fuel: Option<ItemStack>,
    pub input: Option<ItemStack>,
    pub output: Option<ItemStack>,
}

/// Both timer pairs at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub cook_time: Ticks,
    pub cook_time_total: Ticks,
    pub fuel_time: Ticks,
    pub fuel_time_total: Ticks,
}

impl TimerSnapshot {
    /// Fraction of the current cook completed, in `[0, 1]`.
    pub fn cook_progress(&self) -> f32 {
        ratio(self.cook_time, self.cook_time_total)
    }

    /// Fraction of the current fuel load left, in `[0, 1]`.
    pub fn fuel_remaining(&self) -> f32 {
        ratio(self.fuel_time, self.fuel_time_total)
    }
}

fn ratio(part: Ticks, whole: Ticks) -> f32 {
    if whole == 0 {
        0.0
    } else {
        (part as f32 / whole as f32).clamp(0.0, 1.0)
    }
}

/// An operator-editable copy of the slots.
pub trait SlotView: Send {
    /// Replace the view's contents with the canonical ones.
    fn show(&mut self, slots: &SlotSnapshot);

    /// Contents as the operator left them.
    fn snapshot(&self) -> SlotSnapshot;
}

/// Why a republish target could not take an update.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObserverError {
    #[error("observer detached")]
    Detached,
    #[error("observer failed: {0}")]
    Failed(String),
}

/// Receives timer values after every tick. Failures are logged and dropped;
/// they never interrupt the simulation.
pub trait TimerObserver: Send {
    fn observe(&mut self, timers: &TimerSnapshot) -> Result<(), ObserverError>;
}

impl<F> TimerObserver for F
where
    F: FnMut(&TimerSnapshot) -> Result<(), ObserverError> + Send,
{
    fn observe(&mut self, timers: &TimerSnapshot) -> Result<(), ObserverError> {
        self(timers)
    }
}

/// A [`SlotView`] backed by shared memory.
///
/// Clones share contents: hand one clone to the furnace and keep another to
/// play the operator.
#[derive(Debug, Clone, Default)]
pub struct MemoryView {
    slots: Arc<Mutex<SlotSnapshot>>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operator edit: replace the view's contents.
    pub fn edit<F>(&self, f: F)
    where
        F: FnOnce(&mut SlotSnapshot),
    {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut slots);
    }

    pub fn contents(&self) -> SlotSnapshot {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SlotView for MemoryView {
    fn show(&mut self, slots: &SlotSnapshot) {
        self.edit(|held| *held = slots.clone());
    }

    fn snapshot(&self) -> SlotSnapshot {
        self.contents()
    }
}
