//! Device tiers.
//!
//! Every furnace runs the same engine; a tier only changes how fast fuel
//! burns and how fast items cook. Tiers are immutable and shared between
//! devices through `Arc`.

use crate::fixed::{Fixed64, Ticks, f64_to_fixed64, fixed64_to_f64, scale_ticks};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Rate multipliers for one device tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FurnaceProperties {
    name: String,
    /// Divides nominal burn times. 2.0 = fuel lasts half as long.
    fuel_multiplier: Fixed64,
    /// Divides nominal cook times. 2.0 = items cook twice as fast.
    cook_multiplier: Fixed64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertiesError {
    #[error("tier {name}: {which} multiplier must be positive, got {value}")]
    NonPositiveMultiplier {
        name: String,
        which: &'static str,
        value: f64,
    },
    #[error("tier {name}: {which} multiplier {value} is not representable")]
    Unrepresentable {
        name: String,
        which: &'static str,
        value: f64,
    },
}

impl FurnaceProperties {
    pub fn new(
        name: &str,
        fuel_multiplier: Fixed64,
        cook_multiplier: Fixed64,
    ) -> Result<Self, PropertiesError> {
        for (which, value) in [("fuel", fuel_multiplier), ("cook", cook_multiplier)] {
            if value <= Fixed64::ZERO {
                return Err(PropertiesError::NonPositiveMultiplier {
                    name: name.to_string(),
                    which,
                    value: fixed64_to_f64(value),
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            fuel_multiplier,
            cook_multiplier,
        })
    }

    /// Convenience for data files and tests.
    pub fn from_f64(name: &str, fuel: f64, cook: f64) -> Result<Self, PropertiesError> {
        let convert = |which: &'static str, value: f64| {
            f64_to_fixed64(value).ok_or_else(|| PropertiesError::Unrepresentable {
                name: name.to_string(),
                which,
                value,
            })
        };
        Self::new(name, convert("fuel", fuel)?, convert("cook", cook)?)
    }

    /// The standard furnace: nominal rates.
    pub fn furnace() -> Self {
        Self::preset("furnace", 1)
    }

    /// Twice the nominal rates.
    pub fn smoker() -> Self {
        Self::preset("smoker", 2)
    }

    pub fn blast_furnace() -> Self {
        Self::preset("blast_furnace", 2)
    }

    fn preset(name: &str, rate: i32) -> Self {
        Self {
            name: name.to_string(),
            fuel_multiplier: Fixed64::from_num(rate),
            cook_multiplier: Fixed64::from_num(rate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fuel_multiplier(&self) -> Fixed64 {
        self.fuel_multiplier
    }

    pub fn cook_multiplier(&self) -> Fixed64 {
        self.cook_multiplier
    }

    /// Ticks one fuel unit lasts on this tier.
    pub fn effective_burn_time(&self, nominal: Ticks) -> Ticks {
        scale_ticks(nominal, self.fuel_multiplier)
    }

    /// Ticks one item takes to cook on this tier.
    pub fn effective_cook_time(&self, nominal: Ticks) -> Ticks {
        scale_ticks(nominal, self.cook_multiplier)
    }
}

impl Default for FurnaceProperties {
    fn default() -> Self {
        Self::furnace()
    }
}

/// Tiers by name. Persisted devices refer to their tier by name and are
/// re-bound to the shared instance on restore.
#[derive(Debug, Clone, Default)]
pub struct PropertiesSet {
    tiers: BTreeMap<String, Arc<FurnaceProperties>>,
}

impl PropertiesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three built-in tiers.
    pub fn standard() -> Self {
        let mut set = Self::new();
        set.insert(FurnaceProperties::furnace());
        set.insert(FurnaceProperties::smoker());
        set.insert(FurnaceProperties::blast_furnace());
        set
    }

    /// Add or replace a tier. Returns the shared handle.
    pub fn insert(&mut self, properties: FurnaceProperties) -> Arc<FurnaceProperties> {
        let shared = Arc::new(properties);
        self.tiers
            .insert(shared.name().to_string(), Arc::clone(&shared));
        shared
    }

    pub fn get(&self, name: &str) -> Option<Arc<FurnaceProperties>> {
        self.tiers.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn furnace_preset_is_nominal() {
        let p = FurnaceProperties::furnace();
        assert_eq!(p.effective_burn_time(1600), 1600);
        assert_eq!(p.effective_cook_time(200), 200);
    }

    #[test]
    fn blast_furnace_doubles_both_rates() {
        let p = FurnaceProperties::blast_furnace();
        assert_eq!(p.effective_burn_time(1600), 800);
        assert_eq!(p.effective_cook_time(200), 100);
    }

    #[test]
    fn odd_nominal_truncates() {
        let p = FurnaceProperties::from_f64("custom", 1.0, 2.0).unwrap();
        assert_eq!(p.effective_cook_time(201), 100);
    }

    #[test]
    fn non_positive_multipliers_rejected() {
        let err = FurnaceProperties::from_f64("broken", 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            PropertiesError::NonPositiveMultiplier { which: "fuel", .. }
        ));
        let err = FurnaceProperties::from_f64("broken", 1.0, -3.0).unwrap_err();
        assert!(format!("{err}").contains("cook multiplier"), "got: {err}");
    }

    #[test]
    fn unrepresentable_multipliers_rejected() {
        let err = FurnaceProperties::from_f64("broken", f64::NAN, 1.0).unwrap_err();
        assert!(matches!(
            err,
            PropertiesError::Unrepresentable { which: "fuel", .. }
        ));
    }

    #[test]
    fn standard_set_has_presets() {
        let set = PropertiesSet::standard();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("furnace").unwrap().as_ref(), &FurnaceProperties::furnace());
        assert!(set.get("smoker").is_some());
        assert!(set.get("kiln").is_none());
    }

    #[test]
    fn set_hands_out_shared_instances() {
        let mut set = PropertiesSet::new();
        let inserted = set.insert(FurnaceProperties::from_f64("kiln", 1.5, 3.0).unwrap());
        let fetched = set.get("kiln").unwrap();
        assert!(Arc::ptr_eq(&inserted, &fetched));
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut set = PropertiesSet::standard();
        set.insert(FurnaceProperties::from_f64("furnace", 4.0, 4.0).unwrap());
        assert_eq!(set.len(), 3);
        assert_eq!(set.get("furnace").unwrap().effective_cook_time(200), 50);
    }
}
