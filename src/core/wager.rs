//! Wager type metadata
//!
//! Every ticket sold at the window is one of eight wager types. Each type fixes
//! how many entries one elementary combination needs and whether the finishing
//! order of those entries matters.
//!
//! | Wager           | Label | Picks | Ordered |
//! |-----------------|-------|-------|---------|
//! | Win             | 単勝  | 1     | -       |
//! | Place           | 複勝  | 1     | -       |
//! | BracketQuinella | 枠連  | 2     | no      |
//! | Quinella        | 馬連  | 2     | no      |
//! | QuinellaPlace   | ワイド | 2     | no      |
//! | Exacta          | 馬単  | 2     | yes     |
//! | Trio            | 3連複 | 3     | no      |
//! | Trifecta        | 3連単 | 3     | yes     |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wager (ticket) type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WagerType {
    Win,
    Place,
    BracketQuinella,
    Quinella,
    QuinellaPlace,
    Exacta,
    Trio,
    Trifecta,
}

impl WagerType {
    pub const ALL: [WagerType; 8] = [
        WagerType::Win,
        WagerType::Place,
        WagerType::BracketQuinella,
        WagerType::Quinella,
        WagerType::QuinellaPlace,
        WagerType::Exacta,
        WagerType::Trio,
        WagerType::Trifecta,
    ];

    /// Number of distinct entries in one elementary combination
    pub fn required_picks(self) -> usize {
        match self {
            WagerType::Win | WagerType::Place => 1,
            WagerType::BracketQuinella
            | WagerType::Quinella
            | WagerType::QuinellaPlace
            | WagerType::Exacta => 2,
            WagerType::Trio | WagerType::Trifecta => 3,
        }
    }

    /// Whether finishing order distinguishes two combinations.
    ///
    /// Single-pick wagers report `false`.
    pub fn is_order_sensitive(self) -> bool {
        matches!(self, WagerType::Exacta | WagerType::Trifecta)
    }

    /// Entries are bracket (frame) numbers rather than horse numbers
    pub fn uses_brackets(self) -> bool {
        self == WagerType::BracketQuinella
    }

    /// Number of groups a formation selection must supply
    pub fn formation_groups(self) -> usize {
        let picks = self.required_picks();
        if picks == 1 || self.is_order_sensitive() {
            picks
        } else {
            2
        }
    }

    /// Japanese ticket label as printed on official payout tables
    pub fn label(self) -> &'static str {
        match self {
            WagerType::Win => "単勝",
            WagerType::Place => "複勝",
            WagerType::BracketQuinella => "枠連",
            WagerType::Quinella => "馬連",
            WagerType::QuinellaPlace => "ワイド",
            WagerType::Exacta => "馬単",
            WagerType::Trio => "3連複",
            WagerType::Trifecta => "3連単",
        }
    }

    /// snake_case name, matching the serde representation
    pub fn as_str(self) -> &'static str {
        match self {
            WagerType::Win => "win",
            WagerType::Place => "place",
            WagerType::BracketQuinella => "bracket_quinella",
            WagerType::Quinella => "quinella",
            WagerType::QuinellaPlace => "quinella_place",
            WagerType::Exacta => "exacta",
            WagerType::Trio => "trio",
            WagerType::Trifecta => "trifecta",
        }
    }
}

impl fmt::Display for WagerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a wager name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown wager type: {0}")]
pub struct UnknownWagerType(pub String);

impl FromStr for WagerType {
    type Err = UnknownWagerType;

    /// Accepts the snake_case name, the romanized term, or the Japanese label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wager = match s.trim().to_ascii_lowercase().as_str() {
            "win" | "tansho" | "単勝" => WagerType::Win,
            "place" | "fukusho" | "複勝" => WagerType::Place,
            "bracket_quinella" | "wakuren" | "枠連" => WagerType::BracketQuinella,
            "quinella" | "umaren" | "馬連" => WagerType::Quinella,
            "quinella_place" | "wide" | "ワイド" | "ﾜｲﾄﾞ" => WagerType::QuinellaPlace,
            "exacta" | "umatan" | "馬単" => WagerType::Exacta,
            "trio" | "sanrenpuku" | "3連複" | "３連複" => WagerType::Trio,
            "trifecta" | "sanrentan" | "3連単" | "３連単" => WagerType::Trifecta,
            _ => return Err(UnknownWagerType(s.to_string())),
        };
        Ok(wager)
    }
}
