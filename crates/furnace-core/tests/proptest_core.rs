//! Property-based tests for the furnace engine.
//!
//! Uses proptest to drive furnaces through random operator and tick
//! sequences, then checks the timer and slot invariants hold throughout.

use furnace_core::catalog::RecipeCatalog;
use furnace_core::furnace::{Furnace, Regime};
use furnace_core::hooks::NoHooks;
use furnace_core::id::ItemTypeId;
use furnace_core::item::ItemStack;
use furnace_core::properties::{FurnaceProperties, PropertiesSet};
use furnace_core::test_utils::*;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// Kinds from the test catalog: fuels, ingredients, results and inert items.
fn arb_kind() -> impl Strategy<Value = ItemTypeId> {
    (0..13u32).prop_map(ItemTypeId)
}

fn arb_stack() -> impl Strategy<Value = Option<ItemStack>> {
    proptest::option::of((arb_kind(), 1..=64u32).prop_map(|(k, q)| ItemStack::new(k, q)))
}

fn arb_tier() -> impl Strategy<Value = FurnaceProperties> {
    prop_oneof![
        Just(FurnaceProperties::furnace()),
        Just(FurnaceProperties::smoker()),
        Just(FurnaceProperties::blast_furnace()),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    SetFuel(Option<ItemStack>),
    SetInput(Option<ItemStack>),
    InsertFuel(ItemStack),
    TakeOutput,
    Tick(u16),
}

fn arb_ops(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            arb_stack().prop_map(Op::SetFuel),
            arb_stack().prop_map(Op::SetInput),
            (arb_kind(), 1..=64u32).prop_map(|(k, q)| Op::InsertFuel(ItemStack::new(k, q))),
            Just(Op::TakeOutput),
            (1..400u16).prop_map(Op::Tick),
        ],
        1..=max_ops,
    )
}

fn assert_invariants(f: &Furnace) {
    let catalog = test_catalog();
    assert!(
        f.cook_time() <= f.cook_time_total(),
        "cook {} > total {}",
        f.cook_time(),
        f.cook_time_total()
    );
    assert!(
        f.fuel_time() <= f.fuel_time_total(),
        "fuel {} > total {}",
        f.fuel_time(),
        f.fuel_time_total()
    );
    for stack in [f.fuel(), f.input(), f.output()].into_iter().flatten() {
        assert!(stack.quantity > 0);
        assert!(stack.quantity <= catalog.max_stack_size(stack.item_type));
    }
    assert!(f.experience().is_finite() && f.experience() >= 0.0);
}

fn apply(f: &mut Furnace, op: &Op) {
    match op {
        // Oversized stacks are refused; that is part of what is exercised.
        Op::SetFuel(s) => {
            let _ = f.set_fuel(s.clone());
        }
        Op::SetInput(s) => {
            let _ = f.set_input(s.clone());
        }
        Op::InsertFuel(s) => {
            let _ = f.insert_fuel(s.clone());
        }
        Op::TakeOutput => {
            let _ = f.take_output();
        }
        Op::Tick(n) => {
            for _ in 0..*n {
                f.tick(&mut NoHooks);
                assert_invariants(f);
            }
        }
    }
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Timers stay within their totals and slots within their limits under
    /// any sequence of operator actions and ticks.
    #[test]
    fn invariants_hold_under_random_operations(tier in arb_tier(), ops in arb_ops(30)) {
        let mut f = make_furnace_with("prop", tier);
        for op in &ops {
            apply(&mut f, op);
            assert_invariants(&f);
        }
    }

    /// Without operator intervention every unit that leaves the input shows
    /// up in the output, and experience matches the cooks.
    #[test]
    fn cooking_conserves_items(
        tier in arb_tier(),
        fuel in 1..=64u32,
        input in 1..=64u32,
        ticks in 0..5000u32,
    ) {
        let mut f = make_furnace_with("prop", tier);
        f.set_fuel(Some(ItemStack::new(coal(), fuel))).unwrap();
        f.set_input(Some(ItemStack::new(iron_ore(), input))).unwrap();

        run_ticks(&mut f, &mut NoHooks, ticks);

        let remaining = f.input().map_or(0, |s| s.quantity);
        let made = f.output().map_or(0, |s| s.quantity);
        prop_assert_eq!(remaining + made, input);
        prop_assert!((f.experience() - 0.7 * made as f32).abs() < 1e-3);
        assert_invariants(&f);
    }

    /// Once nothing can burn or cook, further ticks change nothing.
    #[test]
    fn idle_is_a_fixed_point(
        fuel in arb_stack(),
        input in arb_stack(),
        ticks in 1..200u32,
    ) {
        let mut f = make_furnace("prop");
        let _ = f.set_fuel(fuel);
        let _ = f.set_input(input);

        // Drain everything that can happen.
        for _ in 0..100_000 {
            if f.tick(&mut NoHooks) == Regime::Idle {
                break;
            }
        }
        prop_assume!(f.tick(&mut NoHooks) == Regime::Idle);

        let before = (f.slots(), f.timers(), f.experience());
        for _ in 0..ticks {
            prop_assert_eq!(f.tick(&mut NoHooks), Regime::Idle);
        }
        prop_assert_eq!((f.slots(), f.timers(), f.experience()), before);
    }

    /// A restored furnace keeps slots and fuel; totals are recomputed and
    /// progress is kept up to the recomputed cook total.
    #[test]
    fn restore_preserves_progress(tier in arb_tier(), ops in arb_ops(20)) {
        let mut f = make_furnace_with("prop", tier);
        for op in &ops {
            apply(&mut f, op);
        }

        let bytes = f.to_record().encode().unwrap();
        let record = furnace_core::serialize::FurnaceRecord::decode(&bytes).unwrap();
        let back = Furnace::restore(record, test_catalog(), &PropertiesSet::standard()).unwrap();

        prop_assert_eq!(back.slots(), f.slots());
        prop_assert_eq!(back.cook_time(), f.cook_time().min(back.cook_time_total()));
        prop_assert!(back.cook_time() <= back.cook_time_total());
        prop_assert_eq!(back.fuel_time(), f.fuel_time());
        prop_assert!(back.fuel_time_total() >= back.fuel_time());
        prop_assert_eq!(back.experience(), f.experience());
    }
}
