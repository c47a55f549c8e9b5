//! Keiba - parimutuel horse-race betting engine
//!
//! This library provides:
//! - Bet construction for all eight JRA wager types (単勝 through 3連単)
//! - Single, box and formation purchase methods
//! - Settlement against official payout tables in exact integer yen
//! - Roster/payout loading and payout text parsing
//!
//! # Example
//!
//! ```
//! use keiba::{settle, CombinationBuilder, PayoutTable, RosterEntry, Selection, WagerType};
//! use keiba::{Combination, SettlementOutcome};
//! use rust_decimal::Decimal;
//!
//! let roster: Vec<_> = (1..=10).map(|n| RosterEntry::new(n, (n + 1) / 2)).collect();
//!
//! // Quinella box on 1, 2, 3: three combinations at 100 yen each
//! let bet = CombinationBuilder::default()
//!     .build(WagerType::Quinella, &Selection::Box(vec![1, 2, 3]), &roster, 100)
//!     .unwrap();
//! assert_eq!(bet.total_cost, 300);
//!
//! let mut payouts = PayoutTable::new();
//! payouts.insert(WagerType::Quinella, Combination::new(vec![3, 1]), Decimal::from(1_230));
//! assert_eq!(settle(&bet, &payouts), SettlementOutcome::Settled(1_230));
//! ```

pub mod core;
pub mod data;
pub mod error;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    settle, settle_detailed, BettingSummary, Combination, CombinationBuilder, Entry, HouseRules,
    Settlement, SettlementOutcome, WagerType,
};
pub use error::{DataError, SettlementError, ValidationError};
pub use models::{
    Bet, BetStatus, PayoutEntry, PayoutTable, PurchaseMethod, RosterEntry, Selection,
};
