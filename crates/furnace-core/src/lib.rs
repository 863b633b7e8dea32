//! Furnace Core -- a tick-driven smelting device simulation.
//!
//! A furnace has three slots (fuel, input, output) and two countdowns: fuel
//! burning down and the current item cooking up. A host drives each device
//! with one [`furnace::Furnace::tick`] per simulation tick.
//!
//! # Tick regimes
//!
//! Every tick lands in exactly one regime:
//!
//! 1. **Burning** -- fuel left: burn a tick and advance cooking when the
//!    input can cook into the output.
//! 2. **Igniting** -- out of fuel with a fuel unit loaded and cookable input:
//!    consume the unit and start a new burn.
//! 3. **Decaying** -- out of fuel with banked progress: progress falls off.
//! 4. **Idle** -- nothing changes.
//!
//! # Key Types
//!
//! - [`furnace::Furnace`] -- The device and its state machine.
//! - [`catalog::RecipeCatalog`] -- Fuel and recipe lookup; [`catalog::Catalog`]
//!   is the immutable implementation built at startup.
//! - [`properties::FurnaceProperties`] -- Device tier rate multipliers.
//! - [`hooks::FurnaceHooks`] -- Veto and rewrite points for ignition and
//!   cook completion.
//! - [`view::SlotView`] / [`view::TimerObserver`] -- Presentation sync.
//! - [`serialize::FurnaceRecord`] -- Flat persisted form with binary encoding.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point type for deterministic rates.

pub mod catalog;
pub mod fixed;
pub mod furnace;
pub mod hooks;
pub mod id;
pub mod item;
pub mod machine;
pub mod properties;
pub mod serialize;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod view;
