//! Race card and payout data loading

pub mod loader;
pub mod payout_parser;

// Re-export commonly used types
pub use loader::{load_bet, load_bets, load_payout_table, load_roster};
pub use payout_parser::PayoutParser;
