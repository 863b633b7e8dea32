//! The capability every tickable device exposes to its driver.
//!
//! A driver that owns a mix of devices only needs to tick them, identify
//! them and attach operator views. [`Machine`] is that surface; the furnace
//! is one implementor.

use crate::furnace::{Furnace, Regime};
use crate::hooks::FurnaceHooks;
use crate::id::{FurnaceId, OperatorId};
use crate::view::SlotView;

pub trait Machine {
    /// Policy object consulted during a tick.
    type Hooks: ?Sized;

    fn id(&self) -> FurnaceId;

    fn name(&self) -> &str;

    /// Advance one tick.
    fn tick(&mut self, hooks: &mut Self::Hooks);

    /// Attach an operator-editable view of the device's contents.
    fn open_view(&mut self, opener: OperatorId, view: Box<dyn SlotView>);
}

impl Machine for Furnace {
    type Hooks = dyn FurnaceHooks;

    fn id(&self) -> FurnaceId {
        Furnace::id(self)
    }

    fn name(&self) -> &str {
        Furnace::name(self)
    }

    fn tick(&mut self, hooks: &mut Self::Hooks) {
        let _: Regime = Furnace::tick(self, hooks);
    }

    fn open_view(&mut self, opener: OperatorId, view: Box<dyn SlotView>) {
        Furnace::open_view(self, opener, view);
    }
}
