#![no_main]
use furnace_core::serialize::FurnaceRecord;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must decode to Err, never panic.
    let _ = FurnaceRecord::decode(data);
});
