//! Betting summary
//!
//! Hit rate, recovery rate (回収率) and profit over a set of bets. Pending
//! bets are counted but left out of every ratio.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::wager::WagerType;
use crate::models::{Bet, BetStatus};

/// Totals for one wager type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WagerBreakdown {
    pub wager_type: WagerType,
    pub bets: usize,
    pub wins: usize,
    pub stake: u64,
    pub payout: u64,
    pub recovery_rate: f64,
}

/// Aggregate results over settled bets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingSummary {
    pub total_bets: usize,
    pub settled_bets: usize,
    pub pending_bets: usize,
    pub winning_bets: usize,
    pub total_stake: u64,
    pub total_payout: u64,
    pub net_profit: i64,
    pub hit_rate: f64,
    pub recovery_rate: f64,
    pub by_wager: Vec<WagerBreakdown>,
}

impl Default for BettingSummary {
    fn default() -> Self {
        Self {
            total_bets: 0,
            settled_bets: 0,
            pending_bets: 0,
            winning_bets: 0,
            total_stake: 0,
            total_payout: 0,
            net_profit: 0,
            hit_rate: 0.0,
            recovery_rate: 0.0,
            by_wager: Vec::new(),
        }
    }
}

impl BettingSummary {
    pub fn from_bets(bets: &[Bet]) -> Self {
        let mut summary = Self {
            total_bets: bets.len(),
            ..Self::default()
        };

        let mut grouped: BTreeMap<WagerType, WagerBreakdown> = BTreeMap::new();

        for bet in bets {
            let payout = match (bet.status, bet.payout) {
                (BetStatus::Pending, _) | (_, None) => {
                    summary.pending_bets += 1;
                    continue;
                }
                (_, Some(p)) => p,
            };
            let won = bet.status == BetStatus::Won;

            summary.settled_bets += 1;
            summary.total_stake = summary.total_stake.saturating_add(bet.total_cost);
            summary.total_payout = summary.total_payout.saturating_add(payout);
            if won {
                summary.winning_bets += 1;
            }

            let row = grouped
                .entry(bet.wager_type)
                .or_insert_with(|| WagerBreakdown {
                    wager_type: bet.wager_type,
                    bets: 0,
                    wins: 0,
                    stake: 0,
                    payout: 0,
                    recovery_rate: 0.0,
                });
            row.bets += 1;
            row.stake = row.stake.saturating_add(bet.total_cost);
            row.payout = row.payout.saturating_add(payout);
            if won {
                row.wins += 1;
            }
        }

        let net = i128::from(summary.total_payout) - i128::from(summary.total_stake);
        summary.net_profit = net.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64;
        summary.hit_rate = ratio(summary.winning_bets as u64, summary.settled_bets as u64);
        summary.recovery_rate = ratio(summary.total_payout, summary.total_stake);
        summary.by_wager = grouped
            .into_values()
            .map(|mut row| {
                row.recovery_rate = ratio(row.payout, row.stake);
                row
            })
            .collect();

        summary
    }

    /// Net profit over stake
    pub fn roi(&self) -> f64 {
        if self.total_stake == 0 {
            0.0
        } else {
            self.net_profit as f64 / self.total_stake as f64
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
