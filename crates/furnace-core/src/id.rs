use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifies an item kind in the catalog. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemTypeId(pub u32);

/// Stable identity of a furnace device. Immutable for the device's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FurnaceId(pub Uuid);

impl FurnaceId {
    pub const fn from_u128(v: u128) -> Self {
        Self(Uuid::from_u128(v))
    }
}

/// Identity of the operator currently holding a device's view open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperatorId(pub Uuid);

impl OperatorId {
    pub const fn from_u128(v: u128) -> Self {
        Self(Uuid::from_u128(v))
    }
}

// ---------------------------------------------------------------------------
// Text form: hyphenated on output. Parsing accepts anything `Uuid` does.
// ---------------------------------------------------------------------------

impl fmt::Display for FurnaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for FurnaceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(FurnaceId)
    }
}

impl fmt::Display for OperatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for OperatorId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(OperatorId)
    }
}

// ---------------------------------------------------------------------------
// IdAllocator
// ---------------------------------------------------------------------------

/// Mints fresh furnace identities from a seed.
///
/// SplitMix64 underneath, so a host that persists the seed recreates the
/// same sequence of ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    state: u64,
}

impl IdAllocator {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Next furnace id in the sequence, shaped as a version 4 UUID.
    pub fn next_furnace(&mut self) -> FurnaceId {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.next_u64().to_be_bytes());
        bytes[8..].copy_from_slice(&self.next_u64().to_be_bytes());
        FurnaceId(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_id_equality() {
        assert_eq!(ItemTypeId(0), ItemTypeId(0));
        assert_ne!(ItemTypeId(0), ItemTypeId(1));
    }

    #[test]
    fn ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ItemTypeId(0), "coal");
        map.insert(ItemTypeId(1), "iron_ore");
        assert_eq!(map[&ItemTypeId(1)], "iron_ore");
    }

    #[test]
    fn furnace_id_displays_hyphenated() {
        let id = FurnaceId::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        assert_eq!(id.to_string(), "01234567-89ab-cdef-0123-456789abcdef");
    }

    #[test]
    fn furnace_id_parses_its_own_display() {
        let id = FurnaceId::from_u128(0xdead_beef_0000_0000_0000_0000_0000_0042);
        let parsed: FurnaceId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn furnace_id_parses_simple_and_uppercase_forms() {
        let bare: FurnaceId = "0000000000000000000000000000002a".parse().unwrap();
        assert_eq!(bare, FurnaceId::from_u128(42));

        let upper: FurnaceId = "0000000A-0000-0000-0000-00000000000B".parse().unwrap();
        assert_eq!(upper, FurnaceId::from_u128((0xa << 96) | 0xb));
    }

    #[test]
    fn furnace_id_rejects_garbage() {
        for text in [
            "not-a-uuid",
            "abc",
            "zzzzzzzz-0000-0000-0000-000000000000",
            "0000000-00000-0000-0000-000000000000",
        ] {
            assert!(text.parse::<FurnaceId>().is_err(), "{text}");
        }
    }

    #[test]
    fn operator_id_round_trips() {
        let op = OperatorId::from_u128(7);
        assert_eq!(op.to_string().parse::<OperatorId>().unwrap(), op);
    }

    #[test]
    fn allocator_is_deterministic() {
        let mut a = IdAllocator::new(42);
        let mut b = IdAllocator::new(42);
        for _ in 0..50 {
            assert_eq!(a.next_furnace(), b.next_furnace());
        }
    }

    #[test]
    fn allocator_yields_distinct_ids() {
        let mut alloc = IdAllocator::new(1);
        let first = alloc.next_furnace();
        let second = alloc.next_furnace();
        assert_ne!(first, second);
    }

    #[test]
    fn allocated_ids_are_version_4() {
        let mut alloc = IdAllocator::new(9);
        for _ in 0..8 {
            let id = alloc.next_furnace();
            assert_eq!(id.0.get_version_num(), 4);
            assert_eq!(id.0.get_variant(), uuid::Variant::RFC4122);
        }
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = IdAllocator::new(1);
        let mut b = IdAllocator::new(2);
        assert_ne!(a.next_furnace(), b.next_furnace());
    }
}
