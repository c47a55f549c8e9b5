//! In-memory bet book
//!
//! Holds placed bets by id for the HTTP service. Durable storage is left to
//! the deployment.

use std::collections::HashMap;

use crate::core::settlement::{settle, SettlementOutcome};
use crate::error::SettlementError;
use crate::models::{Bet, PayoutTable};

/// Placed bets keyed by id
#[derive(Debug, Default)]
pub struct BetBook {
    next_id: u64,
    bets: HashMap<u64, Bet>,
}

impl BetBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a bet and return its id
    pub fn place(&mut self, bet: Bet) -> u64 {
        self.next_id += 1;
        self.bets.insert(self.next_id, bet);
        self.next_id
    }

    pub fn get(&self, bet_id: u64) -> Option<&Bet> {
        self.bets.get(&bet_id)
    }

    /// Settle a stored bet against the race's payout table
    pub fn settle(
        &mut self,
        bet_id: u64,
        table: &PayoutTable,
    ) -> Result<(SettlementOutcome, &Bet), SettlementError> {
        let bet = self
            .bets
            .get_mut(&bet_id)
            .ok_or(SettlementError::UnknownBet(bet_id))?;

        if bet.status.is_settled() {
            return Err(SettlementError::AlreadySettled);
        }

        let outcome = settle(bet, table);
        bet.apply(outcome)?;
        Ok((outcome, &*bet))
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    pub fn bets(&self) -> impl Iterator<Item = (u64, &Bet)> {
        self.bets.iter().map(|(id, bet)| (*id, bet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::CombinationBuilder;
    use crate::core::combination::Combination;
    use crate::core::wager::WagerType;
    use crate::models::{BetStatus, RosterEntry, Selection};
    use rust_decimal::Decimal;

    fn exacta_bet() -> Bet {
        let roster: Vec<_> = (1..=8).map(|n| RosterEntry::new(n, (n + 1) / 2)).collect();
        CombinationBuilder::default()
            .build(WagerType::Exacta, &Selection::Box(vec![1, 2]), &roster, 100)
            .unwrap()
    }

    fn exacta_table() -> PayoutTable {
        let mut table = PayoutTable::new();
        table.insert(
            WagerType::Exacta,
            Combination::new(vec![2, 1]),
            Decimal::from(890),
        );
        table
    }

    #[test]
    fn test_place_assigns_sequential_ids() {
        let mut book = BetBook::new();
        assert!(book.is_empty());
        assert_eq!(book.place(exacta_bet()), 1);
        assert_eq!(book.place(exacta_bet()), 2);
        assert_eq!(book.len(), 2);
        assert!(book.get(2).is_some());
        assert!(book.get(3).is_none());
    }

    #[test]
    fn test_settle_stored_bet() {
        let mut book = BetBook::new();
        let id = book.place(exacta_bet());

        let (outcome, bet) = book.settle(id, &exacta_table()).unwrap();
        assert_eq!(outcome, SettlementOutcome::Settled(890));
        assert_eq!(bet.status, BetStatus::Won);
    }

    #[test]
    fn test_settle_twice_is_rejected() {
        let mut book = BetBook::new();
        let id = book.place(exacta_bet());
        book.settle(id, &exacta_table()).unwrap();

        let err = book.settle(id, &exacta_table()).unwrap_err();
        assert_eq!(err, SettlementError::AlreadySettled);
        assert_eq!(book.get(id).unwrap().payout, Some(890));
    }

    #[test]
    fn test_not_settleable_stays_pending() {
        let mut book = BetBook::new();
        let id = book.place(exacta_bet());

        let (outcome, bet) = book.settle(id, &PayoutTable::new()).unwrap();
        assert_eq!(outcome, SettlementOutcome::NotSettleable);
        assert_eq!(bet.status, BetStatus::Pending);

        // results published later
        let (outcome, _) = book.settle(id, &exacta_table()).unwrap();
        assert_eq!(outcome, SettlementOutcome::Settled(890));
    }

    #[test]
    fn test_unknown_bet() {
        let mut book = BetBook::new();
        let err = book.settle(42, &exacta_table()).unwrap_err();
        assert_eq!(err, SettlementError::UnknownBet(42));
    }
}
