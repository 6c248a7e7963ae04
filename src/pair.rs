//! The structural-context key used by the frequent-pair scanners
//! (`crate::scanner`) and consumed by the driver and closure oracle.
//!
//! A [`PairKey`] is the `(item, is_prefix, is_postfix)` triple that
//! identifies a candidate one-item extension in its structural context.
//! Equality and hashing are defined over exactly those three fields (never
//! the accumulated support set), so [`PairTable`] can use it directly as a
//! hash map key while the support set is mutated underneath during a scan.

use fnv::{FnvHashMap, FnvHashSet};

use crate::model::{Item, SequenceId};

/// `(item, is_prefix, is_postfix)`: the equality/hash-relevant part of a
/// pair summary. `is_prefix` is cut-at-right of the enclosing itemset;
/// `is_postfix` mirrors the pseudo-sequence flag of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairKey {
    pub item: Item,
    pub is_prefix: bool,
    pub is_postfix: bool,
}

impl PairKey {
    pub fn new(item: Item, is_prefix: bool, is_postfix: bool) -> Self {
        PairKey { item, is_prefix, is_postfix }
    }

    /// The same item and `is_postfix`, but with `is_prefix` toggled. Used
    /// by the backward-check scanner's "saw_i" variant.
    pub fn with_prefix_flipped(self) -> Self {
        PairKey { is_prefix: !self.is_prefix, ..self }
    }

    /// The same item and `is_prefix`, but with `is_postfix` toggled. Used
    /// by the backward-check scanner's "saw_im1" variant.
    pub fn with_postfix_flipped(self) -> Self {
        PairKey { is_postfix: !self.is_postfix, ..self }
    }
}

/// A fully materialized pair: the structural key plus the support set
/// accumulated while scanning.
#[derive(Debug, Clone)]
pub struct PairSummary {
    pub key: PairKey,
    pub support_set: FnvHashSet<SequenceId>,
}

impl PairSummary {
    pub fn absolute_support(&self) -> usize {
        self.support_set.len()
    }
}

/// Accumulates support sets for pair keys seen during a single scan. One
/// base sequence id is recorded at most once per key, per the invariant
/// that a base sequence contributes at most once per pair.
#[derive(Debug, Default)]
pub struct PairTable {
    entries: FnvHashMap<PairKey, FnvHashSet<SequenceId>>,
}

impl PairTable {
    pub fn new() -> Self {
        PairTable { entries: FnvHashMap::default() }
    }

    pub fn record(&mut self, key: PairKey, seq_id: SequenceId) {
        self.entries.entry(key).or_insert_with(FnvHashSet::default).insert(seq_id);
    }

    /// Consumes the table, returning every accumulated pair whose support
    /// meets `minsup`.
    pub fn into_frequent(self, minsup: usize) -> Vec<PairSummary> {
        self.entries
            .into_iter()
            .filter(|(_, support_set)| support_set.len() >= minsup)
            .map(|(key, support_set)| PairSummary { key, support_set })
            .collect()
    }

    /// Consumes the table, returning every accumulated pair regardless of
    /// support. Used by the closure oracle, which only cares whether a
    /// pair's support equals the prefix's own support, not whether
    /// it clears `minsup`.
    pub fn into_all(self) -> Vec<PairSummary> {
        self.entries
            .into_iter()
            .map(|(key, support_set)| PairSummary { key, support_set })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_are_independent() {
        let key = PairKey::new(5, false, true);
        assert_eq!(key.with_prefix_flipped(), PairKey::new(5, true, true));
        assert_eq!(key.with_postfix_flipped(), PairKey::new(5, false, false));
    }

    #[test]
    fn record_deduplicates_same_sequence_for_same_key() {
        let mut table = PairTable::new();
        let key = PairKey::new(1, false, false);
        table.record(key, 0);
        table.record(key, 0);
        table.record(key, 1);
        let frequent = table.into_frequent(1);
        assert_eq!(frequent.len(), 1);
        assert_eq!(frequent[0].absolute_support(), 2);
    }

    #[test]
    fn into_frequent_filters_by_minsup() {
        let mut table = PairTable::new();
        table.record(PairKey::new(1, false, false), 0);
        table.record(PairKey::new(2, false, false), 0);
        table.record(PairKey::new(2, false, false), 1);
        let frequent = table.into_frequent(2);
        assert_eq!(frequent.len(), 1);
        assert_eq!(frequent[0].key.item, 2);
    }
}
