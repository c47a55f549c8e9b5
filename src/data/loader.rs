//! JSON loading for rosters, payout tables and bets

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use crate::error::DataError;
use crate::models::{Bet, PayoutTable, RosterEntry};

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let content = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a race card: a JSON array of roster entries
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Vec<RosterEntry>, DataError> {
    read_json(path.as_ref())
}

/// Load a payout table
pub fn load_payout_table<P: AsRef<Path>>(path: P) -> Result<PayoutTable, DataError> {
    read_json(path.as_ref())
}

/// Load a single bet
pub fn load_bet<P: AsRef<Path>>(path: P) -> Result<Bet, DataError> {
    read_json(path.as_ref())
}

/// Load a JSON array of bets
pub fn load_bets<P: AsRef<Path>>(path: P) -> Result<Vec<Bet>, DataError> {
    read_json(path.as_ref())
}
