use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::combination::{Combination, Entry};
use crate::core::settlement::SettlementOutcome;
use crate::core::wager::WagerType;
use crate::error::SettlementError;

/// How the bettor's picks expand into combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseMethod {
    Single,
    Box,
    Formation,
}

impl fmt::Display for PurchaseMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PurchaseMethod::Single => "single",
            PurchaseMethod::Box => "box",
            PurchaseMethod::Formation => "formation",
        };
        f.write_str(name)
    }
}

/// Raw selection, shaped by purchase method
///
/// `Single` lists entries in finishing order for ordered wagers.
/// `Formation` holds one group per position for ordered wagers and
/// `[axis, partners]` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "entries", rename_all = "snake_case")]
pub enum Selection {
    Single(Vec<Entry>),
    Box(Vec<Entry>),
    Formation(Vec<Vec<Entry>>),
}

impl Selection {
    pub fn method(&self) -> PurchaseMethod {
        match self {
            Selection::Single(_) => PurchaseMethod::Single,
            Selection::Box(_) => PurchaseMethod::Box,
            Selection::Formation(_) => PurchaseMethod::Formation,
        }
    }

    /// Every entry referenced, in input order
    pub fn entries(&self) -> Vec<Entry> {
        match self {
            Selection::Single(entries) | Selection::Box(entries) => entries.clone(),
            Selection::Formation(groups) => groups.iter().flatten().copied().collect(),
        }
    }
}

/// One runner on the race card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub number: Entry,
    pub bracket: Entry,
    #[serde(default)]
    pub withdrawn: bool,
}

impl RosterEntry {
    pub fn new(number: Entry, bracket: Entry) -> Self {
        Self {
            number,
            bracket,
            withdrawn: false,
        }
    }

    pub fn withdrawn(number: Entry, bracket: Entry) -> Self {
        Self {
            number,
            bracket,
            withdrawn: true,
        }
    }
}

/// Settlement status of a bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
}

impl BetStatus {
    pub fn is_settled(self) -> bool {
        self != BetStatus::Pending
    }
}

/// A validated, priced bet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    pub wager_type: WagerType,
    pub method: PurchaseMethod,
    pub combinations: Vec<Combination>,
    /// Stake per combination in yen
    pub unit_stake: u64,
    pub total_cost: u64,
    pub status: BetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout: Option<u64>,
}

impl Bet {
    pub(crate) fn new(
        wager_type: WagerType,
        method: PurchaseMethod,
        combinations: Vec<Combination>,
        unit_stake: u64,
    ) -> Self {
        let total_cost = unit_stake * combinations.len() as u64;
        Self {
            wager_type,
            method,
            combinations,
            unit_stake,
            total_cost,
            status: BetStatus::Pending,
            payout: None,
        }
    }

    /// Number of elementary combinations (点数)
    pub fn combination_count(&self) -> usize {
        self.combinations.len()
    }

    /// Record a settlement result.
    ///
    /// `NotSettleable` keeps the bet pending. A settled bet is never settled again.
    pub fn apply(&mut self, outcome: SettlementOutcome) -> Result<(), SettlementError> {
        if self.status.is_settled() {
            return Err(SettlementError::AlreadySettled);
        }

        if let SettlementOutcome::Settled(payout) = outcome {
            self.status = if payout > 0 {
                BetStatus::Won
            } else {
                BetStatus::Lost
            };
            self.payout = Some(payout);
        }

        Ok(())
    }

    /// Payout minus cost, once settled
    pub fn profit(&self) -> Option<i64> {
        self.payout.map(|p| p as i64 - self.total_cost as i64)
    }
}

/// One winning combination on the official payout table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutEntry {
    pub combination: Combination,
    /// Yen returned per 100 yen staked
    pub rate_per_100: Decimal,
}

/// Official payouts for one race, keyed by wager type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayoutTable {
    entries: BTreeMap<WagerType, Vec<PayoutEntry>>,
}

impl PayoutTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, wager: WagerType, combination: Combination, rate_per_100: Decimal) {
        self.entries.entry(wager).or_default().push(PayoutEntry {
            combination,
            rate_per_100,
        });
    }

    /// Winning entries for a wager type, empty if none were declared
    pub fn entries_for(&self, wager: WagerType) -> &[PayoutEntry] {
        self.entries.get(&wager).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn wager_types(&self) -> impl Iterator<Item = WagerType> + '_ {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(w, _)| *w)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }
}

/// Bet placement request
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaceBetRequest {
    pub wager_type: WagerType,
    pub selection: Selection,
    pub unit_stake: u64,
    pub roster: Vec<RosterEntry>,
}

/// Bet placement response
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaceBetResponse {
    pub bet_id: u64,
    pub bet: Bet,
}

/// Settlement request
#[derive(Debug, Serialize, Deserialize)]
pub struct SettleRequest {
    pub bet_id: u64,
    pub payout_table: PayoutTable,
}

/// Settlement response; `payout` is null while the race is not settleable
#[derive(Debug, Serialize, Deserialize)]
pub struct SettleResponse {
    pub bet_id: u64,
    pub status: BetStatus,
    pub payout: Option<u64>,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
