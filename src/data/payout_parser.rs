//! Official payout text parser
//!
//! Reads the plain-text payout block published after a race:
//!
//! ```text
//! 単勝   5   340円    複勝  5  130円  3  210円  8  450円
//! 枠連   2-3   1,020円
//! 馬単   5-3   2,730円
//! ３連単 5-3-8 18,920円
//! ```
//!
//! Each label is followed by one or more `<combination> <amount>` pairs.
//! Fullwidth digits and dashes are normalized first. Lines without a known
//! label are skipped, but anything else between a label and the next one
//! (an unsupported ticket such as 枠単, a stray number) rejects the line.
//!
//! # Example
//!
//! ```
//! use keiba::data::PayoutParser;
//! use keiba::WagerType;
//!
//! let table = PayoutParser::new().parse_str("馬連 3-5 1,230円").unwrap();
//! assert_eq!(table.entries_for(WagerType::Quinella).len(), 1);
//! ```

use regex::Regex;
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::core::combination::{Combination, Entry};
use crate::core::wager::WagerType;
use crate::error::DataError;
use crate::models::PayoutTable;

/// Convert fullwidth digits, dashes and spaces to ASCII
fn normalize_fullwidth(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            '－' | '−' | '‐' => '-',
            '，' => ',',
            '　' => ' ',
            _ => c,
        })
        .collect()
}

/// Payout text parser
pub struct PayoutParser {
    label_pattern: Regex,
    pair_pattern: Regex,
}

impl Default for PayoutParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PayoutParser {
    pub fn new() -> Self {
        Self {
            label_pattern: Regex::new(r"単勝|複勝|枠連|馬連|ワイド|ﾜｲﾄﾞ|馬単|3連複|3連単")
                .expect("label pattern is valid"),
            pair_pattern: Regex::new(r"(\d+(?:-\d+)*)\s+(\d[\d,]*)")
                .expect("pair pattern is valid"),
        }
    }

    /// Parse a payout file
    pub fn parse_file(&self, path: &Path) -> Result<PayoutTable, DataError> {
        let content = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse_str(&content)
    }

    /// Parse payout text into a table
    pub fn parse_str(&self, text: &str) -> Result<PayoutTable, DataError> {
        let mut table = PayoutTable::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = normalize_fullwidth(raw);
            self.parse_line(&line, idx + 1, &mut table)?;
        }

        Ok(table)
    }

    fn parse_line(
        &self,
        line: &str,
        line_no: usize,
        table: &mut PayoutTable,
    ) -> Result<(), DataError> {
        let labels: Vec<_> = self.label_pattern.find_iter(line).collect();

        for (i, label) in labels.iter().enumerate() {
            let wager: WagerType = label.as_str().parse().map_err(|e| malformed(line_no, e))?;
            let end = labels.get(i + 1).map_or(line.len(), |next| next.start());
            let segment = &line[label.end()..end];

            let leftover = self.pair_pattern.replace_all(segment, "");
            if let Some(stray) = leftover
                .split(|c: char| c.is_whitespace() || c == '円')
                .find(|token| !token.is_empty())
            {
                return Err(malformed(
                    line_no,
                    format!("unexpected {:?} after {}", stray, wager.label()),
                ));
            }

            for caps in self.pair_pattern.captures_iter(segment) {
                let entries = parse_combination(&caps[1]).ok_or_else(|| {
                    malformed(line_no, format!("bad combination {:?}", &caps[1]))
                })?;
                if entries.len() != wager.required_picks() {
                    return Err(malformed(
                        line_no,
                        format!(
                            "{} needs {} picks, got {:?}",
                            wager.label(),
                            wager.required_picks(),
                            &caps[1]
                        ),
                    ));
                }

                let amount: u64 = caps[2].replace(',', "").parse().map_err(|_| {
                    malformed(line_no, format!("bad amount {:?}", &caps[2]))
                })?;

                table.insert(wager, Combination::new(entries), Decimal::from(amount));
            }
        }

        Ok(())
    }
}

fn parse_combination(raw: &str) -> Option<Vec<Entry>> {
    raw.split('-').map(|part| part.parse().ok()).collect()
}

fn malformed(line: usize, reason: impl ToString) -> DataError {
    DataError::MalformedPayout {
        line,
        reason: reason.to_string(),
    }
}
