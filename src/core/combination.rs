//! Elementary combinations and the generators behind each purchase method
//!
//! - Box, unordered: `choose(n, r)` subsets
//! - Box, ordered: `permute(n, r)` arrangements
//! - Formation, ordered: cross product of per-position groups
//! - Formation, unordered: one axis entry plus `r - 1` partners

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Horse number, or bracket number for bracket quinella
pub type Entry = u8;

/// One elementary, indivisible wager
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Combination(Vec<Entry>);

impl Combination {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any entry appears more than once
    pub fn has_repeats(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.0.len());
        !self.0.iter().all(|e| seen.insert(*e))
    }

    /// Canonical form under the given equality rule.
    ///
    /// Unordered combinations are sorted so set-equal ones compare equal.
    pub fn normalized(&self, order_sensitive: bool) -> Combination {
        if order_sensitive {
            self.clone()
        } else {
            let mut sorted = self.0.clone();
            sorted.sort_unstable();
            Combination(sorted)
        }
    }

    /// Equality: exact tuple when order matters, multiset otherwise
    pub fn matches(&self, other: &Combination, order_sensitive: bool) -> bool {
        if order_sensitive {
            self.0 == other.0
        } else {
            self.len() == other.len()
                && self.normalized(false).0 == other.normalized(false).0
        }
    }
}

impl From<Vec<Entry>> for Combination {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        f.write_str(&parts.join("-"))
    }
}

/// All size-`r` subsets of `entries`, in lexicographic index order
///
/// # Examples
/// ```
/// use keiba::core::combination::choose;
/// assert_eq!(choose(&[1, 2, 3], 2).len(), 3);
/// ```
pub fn choose(entries: &[Entry], r: usize) -> Vec<Combination> {
    let mut out = Vec::new();
    if r == 0 || r > entries.len() {
        return out;
    }

    let mut current = Vec::with_capacity(r);
    choose_from(entries, r, 0, &mut current, &mut out);
    out
}

fn choose_from(
    entries: &[Entry],
    r: usize,
    start: usize,
    current: &mut Vec<Entry>,
    out: &mut Vec<Combination>,
) {
    if current.len() == r {
        out.push(Combination(current.clone()));
        return;
    }

    let remaining = r - current.len();
    for i in start..=entries.len() - remaining {
        current.push(entries[i]);
        choose_from(entries, r, i + 1, current, out);
        current.pop();
    }
}

/// All size-`r` arrangements of `entries` without repetition
///
/// # Examples
/// ```
/// use keiba::core::combination::permute;
/// assert_eq!(permute(&[1, 2, 3], 2).len(), 6);
/// ```
pub fn permute(entries: &[Entry], r: usize) -> Vec<Combination> {
    let mut out = Vec::new();
    if r == 0 || r > entries.len() {
        return out;
    }

    let mut used = vec![false; entries.len()];
    let mut current = Vec::with_capacity(r);
    permute_from(entries, r, &mut used, &mut current, &mut out);
    out
}

fn permute_from(
    entries: &[Entry],
    r: usize,
    used: &mut [bool],
    current: &mut Vec<Entry>,
    out: &mut Vec<Combination>,
) {
    if current.len() == r {
        out.push(Combination(current.clone()));
        return;
    }

    for i in 0..entries.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(entries[i]);
        permute_from(entries, r, used, current, out);
        current.pop();
        used[i] = false;
    }
}

/// Cross product of per-position groups, dropping tuples that reuse an entry
pub fn cross_product(groups: &[Vec<Entry>]) -> Vec<Combination> {
    let mut out = Vec::new();
    if groups.is_empty() {
        return out;
    }

    let mut current = Vec::with_capacity(groups.len());
    cross_from(groups, &mut current, &mut out);
    out
}

fn cross_from(groups: &[Vec<Entry>], current: &mut Vec<Entry>, out: &mut Vec<Combination>) {
    let depth = current.len();
    if depth == groups.len() {
        out.push(Combination(current.clone()));
        return;
    }

    for &entry in &groups[depth] {
        if current.contains(&entry) {
            continue;
        }
        current.push(entry);
        cross_from(groups, current, out);
        current.pop();
    }
}

/// One axis entry plus `picks - 1` distinct partners, each result sorted.
///
/// Partners equal to the axis entry are skipped. Duplicates across different
/// axis entries are left for the caller to collapse.
pub fn axis_with_partners(axis: &[Entry], partners: &[Entry], picks: usize) -> Vec<Combination> {
    let mut out = Vec::new();
    if picks < 2 {
        return out;
    }

    for &pivot in axis {
        let others: Vec<Entry> = partners.iter().copied().filter(|&p| p != pivot).collect();
        for rest in choose(&others, picks - 1) {
            let mut entries = Vec::with_capacity(picks);
            entries.push(pivot);
            entries.extend_from_slice(rest.entries());
            entries.sort_unstable();
            out.push(Combination(entries));
        }
    }

    out
}

/// Drop later duplicates under the equality rule, normalizing unordered ones
pub fn dedup(combinations: Vec<Combination>, order_sensitive: bool) -> Vec<Combination> {
    let mut seen = HashSet::with_capacity(combinations.len());
    combinations
        .into_iter()
        .map(|c| c.normalized(order_sensitive))
        .filter(|c| seen.insert(c.clone()))
        .collect()
}

/// n choose r
pub fn binomial(n: usize, r: usize) -> usize {
    if r > n {
        return 0;
    }
    let r = r.min(n - r);
    (0..r).fold(1, |acc, i| acc * (n - i) / (i + 1))
}

/// n! / (n - r)!
pub fn arrangements(n: usize, r: usize) -> usize {
    if r > n {
        return 0;
    }
    (n - r + 1..=n).product()
}
