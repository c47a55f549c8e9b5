//! Settlement against official payout tables
//!
//! Each combination on a bet is an independent wager of `unit_stake` yen.
//! A combination that appears on the payout table returns
//! `floor(rate_per_100 * unit_stake / 100)` yen; anything else returns nothing.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::combination::Combination;
use crate::models::{Bet, PayoutTable};

/// Result of settling one bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "payout", rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// The table declares no result for the bet's wager type yet
    NotSettleable,
    /// Total payout in yen (0 for a losing bet)
    Settled(u64),
}

impl SettlementOutcome {
    pub fn payout(self) -> Option<u64> {
        match self {
            SettlementOutcome::NotSettleable => None,
            SettlementOutcome::Settled(p) => Some(p),
        }
    }
}

/// One winning combination on a settled bet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub combination: Combination,
    pub rate_per_100: Decimal,
    pub amount: u64,
}

/// Itemized settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub payout: u64,
    pub hits: Vec<Hit>,
}

impl Settlement {
    pub fn outcome(&self) -> SettlementOutcome {
        SettlementOutcome::Settled(self.payout)
    }
}

/// Yen returned for one winning combination, rounded down
///
/// Negative rates pay nothing. A product beyond `u64` saturates at `u64::MAX`.
///
/// # Examples
/// ```
/// use keiba::core::settlement::payout_for;
/// use rust_decimal::Decimal;
///
/// assert_eq!(payout_for(Decimal::from(340), 100), 340);
/// assert_eq!(payout_for(Decimal::new(1555, 1), 300), 466); // 155.5 * 3
/// ```
pub fn payout_for(rate_per_100: Decimal, unit_stake: u64) -> u64 {
    if rate_per_100 <= Decimal::ZERO {
        return 0;
    }
    let amount = rate_per_100
        .checked_mul(Decimal::from(unit_stake))
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED));
    match amount.and_then(|a| a.floor().to_u64()) {
        Some(yen) => yen,
        None => {
            warn!(
                "Payout rate {} x {} yen overflows; capping at {}",
                rate_per_100,
                unit_stake,
                u64::MAX
            );
            u64::MAX
        }
    }
}

/// Settle a bet and list the winning combinations.
///
/// Returns `None` when the table has no entries for the bet's wager type.
pub fn settle_detailed(bet: &Bet, table: &PayoutTable) -> Option<Settlement> {
    let declared = table.entries_for(bet.wager_type);
    if declared.is_empty() {
        debug!(
            "No {} payouts declared; bet cannot be settled yet",
            bet.wager_type
        );
        return None;
    }

    let order_sensitive = bet.wager_type.is_order_sensitive();
    let picks = bet.wager_type.required_picks();
    let mut hits = Vec::new();

    for combination in &bet.combinations {
        debug_assert_eq!(
            combination.len(),
            picks,
            "combination {} does not fit {}",
            combination,
            bet.wager_type
        );

        let matched = declared
            .iter()
            .find(|entry| entry.combination.matches(combination, order_sensitive));

        if let Some(entry) = matched {
            hits.push(Hit {
                combination: combination.clone(),
                rate_per_100: entry.rate_per_100,
                amount: payout_for(entry.rate_per_100, bet.unit_stake),
            });
        }
    }

    let payout = hits.iter().fold(0u64, |acc, h| acc.saturating_add(h.amount));
    info!(
        "Settled {} {} bet: {} of {} combinations hit, payout {}",
        bet.wager_type,
        bet.method,
        hits.len(),
        bet.combination_count(),
        payout
    );

    Some(Settlement { payout, hits })
}

/// Settle a bet against a payout table
///
/// # Examples
/// ```
/// use keiba::core::builder::CombinationBuilder;
/// use keiba::core::settlement::{settle, SettlementOutcome};
/// use keiba::core::wager::WagerType;
/// use keiba::models::{PayoutTable, RosterEntry, Selection};
/// use keiba::Combination;
/// use rust_decimal::Decimal;
///
/// let roster: Vec<_> = (1..=8).map(|n| RosterEntry::new(n, (n + 1) / 2)).collect();
/// let bet = CombinationBuilder::default()
///     .build(WagerType::Win, &Selection::Single(vec![5]), &roster, 100)
///     .unwrap();
///
/// let mut table = PayoutTable::new();
/// table.insert(WagerType::Win, Combination::new(vec![5]), Decimal::from(340));
///
/// assert_eq!(settle(&bet, &table), SettlementOutcome::Settled(340));
/// ```
pub fn settle(bet: &Bet, table: &PayoutTable) -> SettlementOutcome {
    match settle_detailed(bet, table) {
        Some(settlement) => settlement.outcome(),
        None => SettlementOutcome::NotSettleable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::CombinationBuilder;
    use crate::core::wager::WagerType;
    use crate::models::{RosterEntry, Selection};

    fn roster() -> Vec<RosterEntry> {
        (1..=12).map(|n| RosterEntry::new(n, (n + 1) / 2)).collect()
    }

    fn build(wager: WagerType, selection: Selection, stake: u64) -> Bet {
        CombinationBuilder::default()
            .build(wager, &selection, &roster(), stake)
            .unwrap()
    }

    fn combo(entries: &[u8]) -> Combination {
        Combination::new(entries.to_vec())
    }

    #[test]
    fn test_win_single_pays_rate() {
        let bet = build(WagerType::Win, Selection::Single(vec![5]), 100);
        let mut table = PayoutTable::new();
        table.insert(WagerType::Win, combo(&[5]), Decimal::from(340));

        assert_eq!(settle(&bet, &table), SettlementOutcome::Settled(340));
    }

    #[test]
    fn test_payout_scales_with_unit_stake() {
        let bet = build(WagerType::Win, Selection::Single(vec![5]), 500);
        let mut table = PayoutTable::new();
        table.insert(WagerType::Win, combo(&[5]), Decimal::from(340));

        assert_eq!(settle(&bet, &table), SettlementOutcome::Settled(1_700));
    }

    #[test]
    fn test_losing_bet_pays_zero() {
        let bet = build(WagerType::Win, Selection::Single(vec![3]), 100);
        let mut table = PayoutTable::new();
        table.insert(WagerType::Win, combo(&[5]), Decimal::from(340));

        assert_eq!(settle(&bet, &table), SettlementOutcome::Settled(0));
    }

    #[test]
    fn test_missing_wager_type_is_not_settleable() {
        let bet = build(WagerType::Trio, Selection::Single(vec![1, 2, 3]), 100);
        let mut table = PayoutTable::new();
        table.insert(WagerType::Win, combo(&[5]), Decimal::from(340));

        assert_eq!(settle(&bet, &table), SettlementOutcome::NotSettleable);
        assert_eq!(settle(&bet, &table).payout(), None);
        assert!(settle_detailed(&bet, &table).is_none());
    }

    #[test]
    fn test_exacta_requires_exact_order() {
        let bet = build(WagerType::Exacta, Selection::Single(vec![2, 1]), 100);
        let mut table = PayoutTable::new();
        table.insert(WagerType::Exacta, combo(&[1, 2]), Decimal::from(1_230));

        assert_eq!(settle(&bet, &table), SettlementOutcome::Settled(0));
    }

    #[test]
    fn test_quinella_ignores_order() {
        let bet = build(WagerType::Quinella, Selection::Single(vec![2, 1]), 100);
        let mut table = PayoutTable::new();
        table.insert(WagerType::Quinella, combo(&[1, 2]), Decimal::from(650));

        assert_eq!(settle(&bet, &table), SettlementOutcome::Settled(650));
    }

    #[test]
    fn test_trio_matches_any_order() {
        let bet = build(WagerType::Trio, Selection::Box(vec![3, 7, 1, 9]), 100);
        let mut table = PayoutTable::new();
        table.insert(WagerType::Trio, combo(&[7, 1, 3]), Decimal::from(4_560));

        let settlement = settle_detailed(&bet, &table).unwrap();
        assert_eq!(settlement.payout, 4_560);
        assert_eq!(settlement.hits.len(), 1);
        assert_eq!(settlement.hits[0].combination, combo(&[1, 3, 7]));
    }

    #[test]
    fn test_quinella_place_multiple_hits_accumulate() {
        let bet = build(WagerType::QuinellaPlace, Selection::Box(vec![1, 2, 3]), 200);
        let mut table = PayoutTable::new();
        table.insert(WagerType::QuinellaPlace, combo(&[1, 2]), Decimal::from(250));
        table.insert(WagerType::QuinellaPlace, combo(&[1, 3]), Decimal::from(410));
        table.insert(WagerType::QuinellaPlace, combo(&[2, 3]), Decimal::from(720));

        // (250 + 410 + 720) * 2
        assert_eq!(settle(&bet, &table), SettlementOutcome::Settled(2_760));
    }

    #[test]
    fn test_place_box_hits_each_placed_horse() {
        let bet = build(WagerType::Place, Selection::Box(vec![4, 5, 6]), 100);
        let mut table = PayoutTable::new();
        table.insert(WagerType::Place, combo(&[5]), Decimal::from(130));
        table.insert(WagerType::Place, combo(&[8]), Decimal::from(210));
        table.insert(WagerType::Place, combo(&[4]), Decimal::from(450));

        assert_eq!(settle(&bet, &table), SettlementOutcome::Settled(580));
    }

    #[test]
    fn test_decimal_rate_rounds_down_per_combination() {
        let bet = build(WagerType::Exacta, Selection::Box(vec![1, 2]), 100);
        let mut table = PayoutTable::new();
        table.insert(WagerType::Exacta, combo(&[2, 1]), Decimal::new(12_345, 2));

        // 123.45 per 100 yen -> 123 yen
        assert_eq!(settle(&bet, &table), SettlementOutcome::Settled(123));
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let bet = build(WagerType::Win, Selection::Single(vec![5]), 100);
        let mut table = PayoutTable::new();
        table.insert(WagerType::Win, combo(&[5]), Decimal::from(340));
        table.insert(WagerType::Win, combo(&[5]), Decimal::from(999));

        assert_eq!(settle(&bet, &table), SettlementOutcome::Settled(340));
    }

    #[test]
    fn test_settle_is_deterministic() {
        let bet = build(
            WagerType::Trifecta,
            Selection::Formation(vec![vec![1, 2], vec![3], vec![4, 5]]),
            100,
        );
        let mut table = PayoutTable::new();
        table.insert(WagerType::Trifecta, combo(&[2, 3, 5]), Decimal::from(18_920));

        let first = settle(&bet, &table);
        let second = settle(&bet, &table);
        assert_eq!(first, second);
        assert_eq!(first, SettlementOutcome::Settled(18_920));
    }

    #[test]
    fn test_payout_for_rounding() {
        assert_eq!(payout_for(Decimal::from(100), 100), 100);
        assert_eq!(payout_for(Decimal::new(1555, 1), 100), 155);
        assert_eq!(payout_for(Decimal::new(1555, 1), 300), 466);
        assert_eq!(payout_for(Decimal::from(-10), 100), 0);
    }

    #[test]
    fn test_huge_rate_saturates_instead_of_panicking() {
        assert_eq!(payout_for(Decimal::MAX, 10_000), u64::MAX);
        // fits in Decimal but not in u64
        assert_eq!(payout_for(Decimal::from(u64::MAX), 10_000), u64::MAX);

        let bet = build(WagerType::Win, Selection::Single(vec![5]), 10_000);
        let table: PayoutTable = serde_json::from_str(
            r#"{"win":[{"combination":[5],"rate_per_100":"79228162514264337593543950335"}]}"#,
        )
        .unwrap();
        assert_eq!(settle(&bet, &table), SettlementOutcome::Settled(u64::MAX));
    }

    #[test]
    fn test_total_payout_saturates() {
        let bet = build(WagerType::Place, Selection::Box(vec![1, 2]), 100);
        let mut table = PayoutTable::new();
        table.insert(WagerType::Place, combo(&[1]), Decimal::MAX);
        table.insert(WagerType::Place, combo(&[2]), Decimal::MAX);

        let settlement = settle_detailed(&bet, &table).unwrap();
        assert_eq!(settlement.hits.len(), 2);
        assert_eq!(settlement.payout, u64::MAX);
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&SettlementOutcome::Settled(340)).unwrap();
        assert_eq!(json, r#"{"outcome":"settled","payout":340}"#);
        let json = serde_json::to_string(&SettlementOutcome::NotSettleable).unwrap();
        assert_eq!(json, r#"{"outcome":"not_settleable"}"#);
    }
}
