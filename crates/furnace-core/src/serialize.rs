//! Persistence for furnace devices.
//!
//! A device persists as a flat [`FurnaceRecord`]: identity, tier name,
//! progress timers, banked experience and the three slots. Totals are not
//! stored. They are recomputed from the catalog on restore so balance
//! changes made between save and load take effect immediately.
//!
//! Records encode to a compact binary form via `bitcode`, behind a
//! magic/version header.

use crate::catalog::RecipeCatalog;
use crate::fixed::Ticks;
use crate::furnace::Furnace;
use crate::id::{FurnaceId, OperatorId};
use crate::item::{ItemSlot, ItemStack, SlotError};
use crate::properties::PropertiesSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying an encoded furnace record.
pub const RECORD_MAGIC: u32 = 0xF0A2_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DeserializeError {
    #[error("data too short for record header")]
    TooShort,
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", RECORD_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("record from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
}

/// Why a record could not become a live furnace.
#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error("unparseable furnace id: {0}")]
    InvalidId(#[source] uuid::Error),
    #[error("unparseable opener id: {0}")]
    InvalidOpener(#[source] uuid::Error),
    #[error("unknown device tier {0:?}")]
    UnknownTier(String),
    #[error("{which} is negative: {value}")]
    NegativeTimer { which: &'static str, value: i32 },
    #[error("{slot} slot: {source}")]
    InvalidStack {
        slot: &'static str,
        #[source]
        source: SlotError,
    },
    #[error("experience must be finite and non-negative, got {0}")]
    InvalidExperience(f32),
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// The persisted field set of one furnace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnaceRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub opener: Option<String>,
    /// Tier name, resolved against a [`PropertiesSet`] on restore.
    pub properties: String,
    pub cook_time: i32,
    pub fuel_time: i32,
    pub experience: f32,
    pub fuel: Option<ItemStack>,
    pub input: Option<ItemStack>,
    pub output: Option<ItemStack>,
}

/// Header prepended to every encoded record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordHeader {
    pub magic: u32,
    pub version: u32,
}

impl RecordHeader {
    pub fn new() -> Self {
        Self {
            magic: RECORD_MAGIC,
            version: FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), DeserializeError> {
        if self.magic != RECORD_MAGIC {
            return Err(DeserializeError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(DeserializeError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(DeserializeError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

impl Default for RecordHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize)]
struct EncodedRecord {
    header: RecordHeader,
    record: FurnaceRecord,
}

/// Fields the header occupies before the payload. Anything shorter cannot
/// be a record.
const MIN_ENCODED_LEN: usize = 8;

impl FurnaceRecord {
    pub fn encode(&self) -> Result<Vec<u8>, SerializeError> {
        let encoded = EncodedRecord {
            header: RecordHeader::new(),
            record: self.clone(),
        };
        bitcode::serialize(&encoded).map_err(|e| SerializeError::Encode(e.to_string()))
    }

    pub fn decode(data: &[u8]) -> Result<Self, DeserializeError> {
        if data.len() < MIN_ENCODED_LEN {
            return Err(DeserializeError::TooShort);
        }
        let encoded: EncodedRecord =
            bitcode::deserialize(data).map_err(|e| DeserializeError::Decode(e.to_string()))?;
        encoded.header.validate()?;
        Ok(encoded.record)
    }
}

// ---------------------------------------------------------------------------
// Export / restore
// ---------------------------------------------------------------------------

fn timer_to_i32(value: Ticks) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn timer_from_i32(which: &'static str, value: i32) -> Result<Ticks, RestoreError> {
    Ticks::try_from(value).map_err(|_| RestoreError::NegativeTimer { which, value })
}

fn restore_slot(
    slot: &'static str,
    stack: Option<ItemStack>,
    catalog: &dyn RecipeCatalog,
) -> Result<ItemSlot, RestoreError> {
    let mut restored = ItemSlot::empty();
    let max = stack
        .as_ref()
        .map(|s| catalog.max_stack_size(s.item_type))
        .unwrap_or(u32::MAX);
    restored
        .set(stack, max)
        .map_err(|source| RestoreError::InvalidStack { slot, source })?;
    Ok(restored)
}

impl Furnace {
    /// Export the persisted field set.
    pub fn to_record(&self) -> FurnaceRecord {
        FurnaceRecord {
            id: self.id.to_string(),
            name: self.name.clone(),
            opener: self.opener.map(|o| o.to_string()),
            properties: self.properties.name().to_string(),
            cook_time: timer_to_i32(self.cook_time),
            fuel_time: timer_to_i32(self.fuel_time),
            experience: self.experience,
            fuel: self.fuel.stack().cloned(),
            input: self.input.stack().cloned(),
            output: self.output.stack().cloned(),
        }
    }

    /// Rebuild a furnace from a record.
    ///
    /// `cook_time_total` comes from the input's current recipe and
    /// `fuel_time_total` from the loaded fuel's current burn time, both
    /// scaled by the tier. A fuel total below the remaining fuel is raised
    /// to match. Cook progress beyond the recomputed total is cut back to it.
    pub fn restore(
        record: FurnaceRecord,
        catalog: Arc<dyn RecipeCatalog>,
        tiers: &PropertiesSet,
    ) -> Result<Self, RestoreError> {
        let id: FurnaceId = record.id.parse().map_err(RestoreError::InvalidId)?;
        let opener = record
            .opener
            .as_deref()
            .map(str::parse::<OperatorId>)
            .transpose()
            .map_err(RestoreError::InvalidOpener)?;
        let properties = tiers
            .get(&record.properties)
            .ok_or_else(|| RestoreError::UnknownTier(record.properties.clone()))?;

        let cook_time = timer_from_i32("cook_time", record.cook_time)?;
        let fuel_time = timer_from_i32("fuel_time", record.fuel_time)?;
        if !record.experience.is_finite() || record.experience < 0.0 {
            return Err(RestoreError::InvalidExperience(record.experience));
        }

        let fuel = restore_slot("fuel", record.fuel, catalog.as_ref())?;
        let input = restore_slot("input", record.input, catalog.as_ref())?;
        let output = restore_slot("output", record.output, catalog.as_ref())?;

        let cook_time_total = input
            .kind()
            .and_then(|kind| catalog.recipe_for(kind))
            .map(|recipe| properties.effective_cook_time(recipe.cook_time))
            .unwrap_or(0);
        let fuel_time_total = fuel
            .kind()
            .and_then(|kind| catalog.fuel_for(kind))
            .map(|fuel| properties.effective_burn_time(fuel.burn_time))
            .unwrap_or(0)
            .max(fuel_time);

        let mut furnace = Furnace::new(id, &record.name, properties, catalog);
        furnace.opener = opener;
        furnace.fuel = fuel;
        furnace.input = input;
        furnace.output = output;
        furnace.cook_time = cook_time.min(cook_time_total);
        furnace.cook_time_total = cook_time_total;
        furnace.fuel_time = fuel_time;
        furnace.fuel_time_total = fuel_time_total;
        furnace.experience = record.experience;

        debug!(
            furnace = %furnace.id,
            tier = furnace.properties.name(),
            cook_time_total,
            fuel_time_total,
            "furnace restored"
        );
        Ok(furnace)
    }
}
