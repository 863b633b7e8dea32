#![no_main]
use arbitrary::Arbitrary;
use furnace_core::furnace::Furnace;
use furnace_core::hooks::NoHooks;
use furnace_core::id::ItemTypeId;
use furnace_core::item::ItemStack;
use furnace_core::properties::PropertiesSet;
use furnace_core::serialize::FurnaceRecord;
use furnace_core::test_utils::*;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzStack {
    kind: u8,
    quantity: u8,
}

/// A record with loosely constrained fields, followed by ticks.
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    id: String,
    tier: u8,
    cook_time: i32,
    fuel_time: i32,
    experience: f32,
    fuel: Option<FuzzStack>,
    input: Option<FuzzStack>,
    output: Option<FuzzStack>,
    ticks: u16,
}

fn stack(s: &Option<FuzzStack>) -> Option<ItemStack> {
    s.as_ref()
        .map(|s| ItemStack::new(ItemTypeId(u32::from(s.kind % 16)), u32::from(s.quantity)))
}

fuzz_target!(|input: FuzzInput| {
    let tier = ["furnace", "smoker", "blast_furnace", "kiln"][usize::from(input.tier % 4)];
    let record = FurnaceRecord {
        id: input.id,
        name: "fuzz".to_string(),
        opener: None,
        properties: tier.to_string(),
        cook_time: input.cook_time,
        fuel_time: input.fuel_time,
        experience: input.experience,
        fuel: stack(&input.fuel),
        input: stack(&input.input),
        output: stack(&input.output),
    };

    // Restore may refuse the record; an accepted one must tick cleanly.
    let Ok(mut furnace) = Furnace::restore(record, test_catalog(), &PropertiesSet::standard())
    else {
        return;
    };
    assert!(furnace.cook_time() <= furnace.cook_time_total());
    assert!(furnace.fuel_time() <= furnace.fuel_time_total());
    for _ in 0..input.ticks.min(2000) {
        furnace.tick(&mut NoHooks);
        assert!(furnace.cook_time() <= furnace.cook_time_total());
        assert!(furnace.fuel_time() <= furnace.fuel_time_total());
    }
});
