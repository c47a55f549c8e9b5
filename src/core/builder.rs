//! Bet construction
//!
//! Turns a wager type and raw selection into a priced [`Bet`]. Checks run in a
//! fixed order and the first failure is returned:
//!
//! 1. stake unit and bounds
//! 2. every entry is running
//! 3. no entry repeats within the input
//! 4. selection count for the purchase method
//!
//! Construction is all-or-nothing.

use std::collections::HashSet;
use tracing::debug;

use super::combination::{
    axis_with_partners, choose, cross_product, dedup, permute, Combination, Entry,
};
use super::rules::HouseRules;
use super::wager::WagerType;
use crate::error::ValidationError;
use crate::models::{Bet, RosterEntry, Selection};

/// Validates selections and expands them into combinations
#[derive(Debug, Clone, Default)]
pub struct CombinationBuilder {
    rules: HouseRules,
}

impl CombinationBuilder {
    pub fn new(rules: HouseRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &HouseRules {
        &self.rules
    }

    /// Build a bet from a raw selection
    ///
    /// # Examples
    /// ```
    /// use keiba::core::builder::CombinationBuilder;
    /// use keiba::core::wager::WagerType;
    /// use keiba::models::{RosterEntry, Selection};
    ///
    /// let roster: Vec<_> = (1..=8).map(|n| RosterEntry::new(n, (n + 1) / 2)).collect();
    /// let bet = CombinationBuilder::default()
    ///     .build(WagerType::Exacta, &Selection::Box(vec![1, 2, 3]), &roster, 100)
    ///     .unwrap();
    ///
    /// assert_eq!(bet.combination_count(), 6);
    /// assert_eq!(bet.total_cost, 600);
    /// ```
    pub fn build(
        &self,
        wager: WagerType,
        selection: &Selection,
        roster: &[RosterEntry],
        unit_stake: u64,
    ) -> Result<Bet, ValidationError> {
        self.check_stake(unit_stake)?;
        check_running(wager, selection, roster)?;
        check_duplicates(selection)?;
        self.check_count(wager, selection)?;

        let generated = generate(wager, selection);
        let candidates = generated.len();
        let combinations = dedup(generated, wager.is_order_sensitive());
        if combinations.is_empty() {
            return Err(ValidationError::EmptyCombinationSet);
        }

        debug!(
            "Built {} {} bet: {} candidates, {} combinations at {} yen",
            wager,
            selection.method(),
            candidates,
            combinations.len(),
            unit_stake
        );

        Ok(Bet::new(wager, selection.method(), combinations, unit_stake))
    }

    fn check_stake(&self, unit_stake: u64) -> Result<(), ValidationError> {
        if self.rules.is_valid_stake(unit_stake) {
            Ok(())
        } else {
            Err(ValidationError::InvalidStakeUnit {
                stake: unit_stake,
                unit: self.rules.min_unit,
                max: self.rules.max_stake,
            })
        }
    }

    fn check_count(&self, wager: WagerType, selection: &Selection) -> Result<(), ValidationError> {
        let picks = wager.required_picks();

        match selection {
            Selection::Single(entries) => {
                if entries.len() != picks {
                    return Err(ValidationError::WrongSelectionCount {
                        expected: picks,
                        actual: entries.len(),
                        group: None,
                    });
                }
            }
            Selection::Box(entries) => {
                if entries.len() < picks {
                    return Err(ValidationError::WrongSelectionCount {
                        expected: picks,
                        actual: entries.len(),
                        group: None,
                    });
                }
                let max = self.rules.max_box_entries(wager);
                if entries.len() > max {
                    return Err(ValidationError::TooManySelections {
                        max,
                        actual: entries.len(),
                    });
                }
            }
            Selection::Formation(groups) => {
                let expected = wager.formation_groups();
                if groups.len() != expected {
                    return Err(ValidationError::WrongSelectionCount {
                        expected,
                        actual: groups.len(),
                        group: None,
                    });
                }
                if let Some(idx) = groups.iter().position(Vec::is_empty) {
                    return Err(ValidationError::WrongSelectionCount {
                        expected: 1,
                        actual: 0,
                        group: Some(idx + 1),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Every referenced entry must be a running horse (or a bracket with one)
fn check_running(
    wager: WagerType,
    selection: &Selection,
    roster: &[RosterEntry],
) -> Result<(), ValidationError> {
    let running: HashSet<Entry> = roster
        .iter()
        .filter(|r| !r.withdrawn)
        .map(|r| if wager.uses_brackets() { r.bracket } else { r.number })
        .collect();

    match selection.entries().into_iter().find(|e| !running.contains(e)) {
        Some(entry) => Err(ValidationError::UnknownOrWithdrawnEntry(entry)),
        None => Ok(()),
    }
}

/// Flat selections must be distinct; formation groups must be distinct internally
fn check_duplicates(selection: &Selection) -> Result<(), ValidationError> {
    match selection {
        Selection::Single(entries) | Selection::Box(entries) => first_repeat(entries),
        Selection::Formation(groups) => groups.iter().try_for_each(|g| first_repeat(g)),
    }
}

fn first_repeat(entries: &[Entry]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(entries.len());
    match entries.iter().find(|e| !seen.insert(**e)) {
        Some(entry) => Err(ValidationError::DuplicateEntry(*entry)),
        None => Ok(()),
    }
}

fn generate(wager: WagerType, selection: &Selection) -> Vec<Combination> {
    let picks = wager.required_picks();
    let ordered = wager.is_order_sensitive();

    match selection {
        Selection::Single(entries) => vec![Combination::new(entries.clone())],
        Selection::Box(entries) if ordered => permute(entries, picks),
        Selection::Box(entries) => choose(entries, picks),
        Selection::Formation(groups) if ordered || picks == 1 => cross_product(groups),
        Selection::Formation(groups) => axis_with_partners(&groups[0], &groups[1], picks),
    }
}
