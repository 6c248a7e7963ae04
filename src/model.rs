//! Immutable in-memory representation of the mining input.
//!
//! A [`SequenceDatabase`] is a flat, 0-based indexed list of [`Sequence`]s.
//! Neither type is ever mutated once constructed; the loader (`crate::loader`)
//! and the mining driver (`crate::driver`) are the only producers.

use std::fmt;

use fnv::FnvHashSet;
use tinyvec::TinyVec;

/// An item identifier. Always positive; the loader rejects non-positive
/// values before a `Sequence` is ever built.
pub type Item = i32;

/// A dense, 0-based sequence identifier, used as the unit of support
/// counting throughout the miner.
pub type SequenceId = usize;

/// A non-empty, strictly ascending run of distinct items.
///
/// Backed by `TinyVec` so the common case of a handful of items per itemset
/// never touches the heap.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Itemset(TinyVec<[Item; 4]>);

impl Itemset {
    /// Builds an itemset from items already known to be strictly ascending
    /// and distinct. Only asserted in debug builds; callers that cannot
    /// guarantee the order (e.g. the loader) must sort/validate first.
    pub fn from_ascending(items: TinyVec<[Item; 4]>) -> Self {
        debug_assert!(
            items.windows(2).all(|w| w[0] < w[1]),
            "itemset items must be strictly ascending"
        );
        debug_assert!(!items.is_empty(), "itemset must be non-empty");
        Itemset(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.0
    }

    pub fn get(&self, index: usize) -> Option<Item> {
        self.0.get(index).copied()
    }

    /// First index whose item equals `item`, scanning left to right and
    /// stopping early once the scanned value exceeds it (ascending order).
    pub fn index_of(&self, item: Item) -> Option<usize> {
        for (idx, &x) in self.0.iter().enumerate() {
            if x == item {
                return Some(idx);
            }
            if x > item {
                break;
            }
        }
        None
    }

    /// Appends an item, keeping ascending order. Used only when building a
    /// new itemset from a frequency-filtered rewrite or an I-extension; the
    /// item is assumed (and debug-checked) to be greater than the current
    /// last item.
    pub fn push(&mut self, item: Item) {
        debug_assert!(
            self.0.last().map(|&last| last < item).unwrap_or(true),
            "push must preserve ascending order"
        );
        self.0.push(item);
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for item in self.0.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
            first = false;
        }
        Ok(())
    }
}

/// An ordered list of itemsets, identified by its dense position in the
/// owning [`SequenceDatabase`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sequence {
    pub id: SequenceId,
    itemsets: Vec<Itemset>,
}

impl Sequence {
    pub fn new(id: SequenceId, itemsets: Vec<Itemset>) -> Self {
        Sequence { id, itemsets }
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    pub fn itemset(&self, i: usize) -> &Itemset {
        &self.itemsets[i]
    }

    pub fn itemsets(&self) -> &[Itemset] {
        &self.itemsets
    }

    /// Total number of item occurrences across all itemsets.
    pub fn item_occurrence_count(&self) -> usize {
        self.itemsets.iter().map(Itemset::len).sum()
    }

    /// Rewrites this sequence keeping only items present in `keep`,
    /// dropping itemsets that become empty. Used by the driver's initial
    /// scan to build the frequency-filtered starting database.
    pub fn rewrite_keeping(&self, keep: &FnvHashSet<Item>) -> Option<Sequence> {
        let mut itemsets = Vec::with_capacity(self.itemsets.len());
        for itemset in &self.itemsets {
            let filtered: TinyVec<[Item; 4]> =
                itemset.items().iter().copied().filter(|it| keep.contains(it)).collect();
            if !filtered.is_empty() {
                itemsets.push(Itemset::from_ascending(filtered));
            }
        }
        if itemsets.is_empty() {
            None
        } else {
            Some(Sequence::new(self.id, itemsets))
        }
    }
}

/// An ordered, immutable-after-construction list of base sequences.
#[derive(Debug, Clone, Default)]
pub struct SequenceDatabase {
    sequences: Vec<Sequence>,
}

impl SequenceDatabase {
    pub fn new(sequences: Vec<Sequence>) -> Self {
        SequenceDatabase { sequences }
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn get(&self, id: SequenceId) -> &Sequence {
        &self.sequences[id]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sequence> {
        self.sequences.iter()
    }
}

/// A closed or in-progress sequential pattern: an ordered list of itemsets
/// plus the set of base sequence IDs it covers.
///
/// Cheap to clone structurally (itemsets are small), but every extension
/// during recursion does produce a fresh clone rather than mutate a shared
/// prefix in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequentialPattern {
    itemsets: Vec<Itemset>,
    support_set: FnvHashSet<SequenceId>,
}

impl SequentialPattern {
    pub fn singleton(item: Item, support_set: FnvHashSet<SequenceId>) -> Self {
        let mut iset = TinyVec::<[Item; 4]>::new();
        iset.push(item);
        SequentialPattern {
            itemsets: vec![Itemset::from_ascending(iset)],
            support_set,
        }
    }

    pub fn itemsets(&self) -> &[Itemset] {
        &self.itemsets
    }

    pub fn support_set(&self) -> &FnvHashSet<SequenceId> {
        &self.support_set
    }

    pub fn set_support_set(&mut self, support_set: FnvHashSet<SequenceId>) {
        self.support_set = support_set;
    }

    pub fn absolute_support(&self) -> usize {
        self.support_set.len()
    }

    /// Total number of item occurrences across all itemsets; this is the
    /// index space that the period extractor and backward-check scanner
    /// iterate over.
    pub fn item_occurrence_count(&self) -> usize {
        self.itemsets.iter().map(Itemset::len).sum()
    }

    /// The `i`-th item occurrence in flattening order (itemset-major,
    /// then item-minor).
    pub fn item_at(&self, i: usize) -> Option<Item> {
        let mut remaining = i;
        for itemset in &self.itemsets {
            if remaining < itemset.len() {
                return itemset.get(remaining);
            }
            remaining -= itemset.len();
        }
        None
    }

    /// Clones this pattern and appends `item` to the last itemset
    /// (I-extension).
    pub fn extend_last_itemset(&self, item: Item) -> SequentialPattern {
        let mut clone = self.clone();
        let last = clone.itemsets.last_mut().expect("pattern is never empty");
        last.push(item);
        clone
    }

    /// Clones this pattern and appends a new one-item itemset
    /// (S-extension).
    pub fn extend_new_itemset(&self, item: Item) -> SequentialPattern {
        let mut clone = self.clone();
        let mut iset = TinyVec::<[Item; 4]>::new();
        iset.push(item);
        clone.itemsets.push(Itemset::from_ascending(iset));
        clone
    }
}

impl fmt::Display for SequentialPattern {
    /// Renders in the file-mode line syntax, minus the trailing `#SUP:`
    /// token (callers append that, since the collector needs the raw
    /// support count too).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for itemset in &self.itemsets {
            write!(f, "{} -1 ", itemset)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn itemset(items: &[Item]) -> Itemset {
        Itemset::from_ascending(items.iter().copied().collect())
    }

    #[test]
    fn index_of_stops_early_past_target() {
        let iset = itemset(&[1, 3, 5]);
        assert_eq!(iset.index_of(3), Some(1));
        assert_eq!(iset.index_of(4), None);
        assert_eq!(iset.index_of(5), Some(2));
        assert_eq!(iset.index_of(6), None);
    }

    #[test]
    fn rewrite_drops_empty_itemsets() {
        let seq = Sequence::new(
            0,
            vec![itemset(&[1, 2]), itemset(&[3]), itemset(&[4, 5])],
        );
        let keep: FnvHashSet<Item> = [1, 5].iter().copied().collect();
        let rewritten = seq.rewrite_keeping(&keep).unwrap();
        assert_eq!(rewritten.len(), 2);
        assert_eq!(rewritten.itemset(0).items(), &[1]);
        assert_eq!(rewritten.itemset(1).items(), &[5]);
    }

    #[test]
    fn rewrite_to_nothing_drops_sequence() {
        let seq = Sequence::new(0, vec![itemset(&[1]), itemset(&[2])]);
        let keep: FnvHashSet<Item> = FnvHashSet::default();
        assert!(seq.rewrite_keeping(&keep).is_none());
    }

    #[test]
    fn pattern_item_at_flattens_itemsets() {
        let mut p = SequentialPattern::singleton(1, FnvHashSet::default());
        p = p.extend_new_itemset(2);
        p = p.extend_last_itemset(3);
        assert_eq!(p.item_at(0), Some(1));
        assert_eq!(p.item_at(1), Some(2));
        assert_eq!(p.item_at(2), Some(3));
        assert_eq!(p.item_at(3), None);
    }

    #[test]
    fn pattern_display_matches_file_mode_syntax() {
        let mut p = SequentialPattern::singleton(1, FnvHashSet::default());
        p = p.extend_last_itemset(2);
        p = p.extend_new_itemset(5);
        assert_eq!(format!("{}", p), "1 2 -1 5 -1 ");
    }
}
