//! Bet construction and settlement engine

pub mod builder;
pub mod combination;
pub mod report;
pub mod rules;
pub mod settlement;
pub mod wager;

// Re-export commonly used types
pub use builder::CombinationBuilder;
pub use combination::{Combination, Entry};
pub use report::{BettingSummary, WagerBreakdown};
pub use rules::HouseRules;
pub use settlement::{settle, settle_detailed, Hit, Settlement, SettlementOutcome};
pub use wager::WagerType;
