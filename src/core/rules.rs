//! House betting rules
//!
//! Stake granularity and box size caps applied by the builder.

use super::wager::WagerType;
use tracing::warn;

/// Minimum stake unit in yen
pub const DEFAULT_MIN_UNIT: u64 = 100;

/// Maximum stake per combination in yen
pub const DEFAULT_MAX_STAKE: u64 = 10_000;

/// House rules configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseRules {
    /// Stakes must be a positive multiple of this unit
    pub min_unit: u64,
    /// Upper bound on the per-combination stake
    pub max_stake: u64,
    /// Box cap for win/place
    pub max_box_single: usize,
    /// Box cap for 2-pick wagers
    pub max_box_pair: usize,
    /// Box cap for 3-pick wagers
    pub max_box_triple: usize,
}

impl Default for HouseRules {
    fn default() -> Self {
        Self {
            min_unit: DEFAULT_MIN_UNIT,
            max_stake: DEFAULT_MAX_STAKE,
            max_box_single: 18,
            max_box_pair: 8,
            max_box_triple: 7,
        }
    }
}

impl HouseRules {
    /// Defaults overridden by `KEIBA_MIN_UNIT` and `KEIBA_MAX_STAKE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `KEIBA_*` keys.
    ///
    /// Zero or non-numeric values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rules = Self::default();
        if let Some(unit) = read_positive(&lookup, "KEIBA_MIN_UNIT") {
            rules.min_unit = unit;
        }
        if let Some(max) = read_positive(&lookup, "KEIBA_MAX_STAKE") {
            rules.max_stake = max;
        }
        rules
    }

    /// Largest box selection allowed for the wager family
    pub fn max_box_entries(&self, wager: WagerType) -> usize {
        match wager.required_picks() {
            1 => self.max_box_single,
            2 => self.max_box_pair,
            _ => self.max_box_triple,
        }
    }

    /// Positive, a whole number of units, and within the house maximum
    pub fn is_valid_stake(&self, unit_stake: u64) -> bool {
        unit_stake > 0
            && self.min_unit > 0
            && unit_stake % self.min_unit == 0
            && unit_stake <= self.max_stake
    }
}

fn read_positive<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!("Ignoring {}={:?}: expected a positive integer", key, raw);
            None
        }
    }
}
