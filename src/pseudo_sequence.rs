//! Non-owning cursors over base sequences.
//!
//! A [`PseudoSequence`] never copies item data; it is a small `Copy` value
//! (a sequence id plus a handful of offsets) that describes a *visible
//! window* into one base [`Sequence`](crate::model::Sequence). The window
//! has a start (itemset index, item index within that itemset) and an
//! optional end bound of the same shape. No-bound means "extends to the end
//! of the base sequence", which is what the projector (`crate::projector`)
//! produces; a bound is used only for the regions returned by the period
//! extractor (`crate::period`), which are genuinely sub-ranges of a base
//! sequence.

use crate::model::{Item, SequenceDatabase, SequenceId};

/// An exclusive upper bound: items `[0, item)` of itemset `itemset` are
/// visible, and no itemset after `itemset` is visible at all. `item == 0`
/// means itemset `itemset` itself contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Bound {
    itemset: usize,
    item: usize,
}

/// A value-like cursor into a base sequence. See the module docs for the
/// windowing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PseudoSequence {
    seq_id: SequenceId,
    start_itemset: usize,
    start_item: usize,
    bound: Option<Bound>,
    postfix: bool,
}

impl PseudoSequence {
    /// The root cursor over an entire base sequence: used by the driver
    /// when wrapping the frequency-filtered initial database.
    pub fn whole(seq_id: SequenceId) -> Self {
        PseudoSequence {
            seq_id,
            start_itemset: 0,
            start_item: 0,
            bound: None,
            postfix: false,
        }
    }

    /// A cursor starting mid- or whole-sequence with no end bound, as
    /// produced by the projector.
    pub fn from_start(seq_id: SequenceId, start_itemset: usize, start_item: usize, postfix: bool) -> Self {
        PseudoSequence {
            seq_id,
            start_itemset,
            start_item,
            bound: None,
            postfix,
        }
    }

    /// A bounded region `[start_itemset:start_item, end_itemset:end_item)`,
    /// as produced by the period extractor.
    pub fn bounded(
        seq_id: SequenceId,
        start_itemset: usize,
        start_item: usize,
        postfix: bool,
        end_itemset: usize,
        end_item: usize,
    ) -> Self {
        PseudoSequence {
            seq_id,
            start_itemset,
            start_item,
            bound: Some(Bound {
                itemset: end_itemset,
                item: end_item,
            }),
            postfix,
        }
    }

    /// General constructor: an optional end bound, used by the period
    /// extractor where the same construction serves both the unbounded
    /// (i = |P|, period runs to sequence end) and bounded cases.
    pub fn new(
        seq_id: SequenceId,
        start_itemset: usize,
        start_item: usize,
        postfix: bool,
        end: Option<(usize, usize)>,
    ) -> Self {
        PseudoSequence {
            seq_id,
            start_itemset,
            start_item,
            bound: end.map(|(itemset, item)| Bound { itemset, item }),
            postfix,
        }
    }

    pub fn id(&self) -> SequenceId {
        self.seq_id
    }

    /// Number of itemsets still visible, possibly zero.
    pub fn size(&self, db: &SequenceDatabase) -> usize {
        let seq = db.get(self.seq_id);
        let last_exclusive = match self.bound {
            None => seq.len(),
            Some(Bound { itemset, item: 0 }) => itemset,
            Some(Bound { itemset, .. }) => itemset + 1,
        };
        last_exclusive.saturating_sub(self.start_itemset)
    }

    pub fn is_empty(&self, db: &SequenceDatabase) -> bool {
        self.size(db) == 0
    }

    fn real_index(&self, i: usize) -> usize {
        self.start_itemset + i
    }

    /// Lower bound (inclusive) into the base itemset's item array for
    /// visible itemset position `i`.
    fn lower(&self, i: usize) -> usize {
        if i == 0 {
            self.start_item
        } else {
            0
        }
    }

    /// Upper bound (exclusive) into the base itemset's item array for
    /// visible itemset position `i`.
    fn upper(&self, i: usize, db: &SequenceDatabase) -> usize {
        let real = self.real_index(i);
        let full_len = db.get(self.seq_id).itemset(real).len();
        match self.bound {
            Some(Bound { itemset, item }) if itemset == real => item,
            _ => full_len,
        }
    }

    /// Item count of the `i`-th visible itemset (first itemset may be
    /// shortened by the start offset, last by an end bound).
    pub fn itemset_len(&self, i: usize, db: &SequenceDatabase) -> usize {
        self.upper(i, db).saturating_sub(self.lower(i))
    }

    /// The `j`-th item of the `i`-th visible itemset.
    pub fn item_at(&self, i: usize, j: usize, db: &SequenceDatabase) -> Option<Item> {
        let real = self.real_index(i);
        let seq = db.get(self.seq_id);
        if real >= seq.len() {
            return None;
        }
        let pos = self.lower(i) + j;
        if pos >= self.upper(i, db) {
            return None;
        }
        seq.itemset(real).get(pos)
    }

    /// First relative index within the `i`-th visible itemset whose item
    /// equals `item`, or `None`. Exploits ascending order to break early.
    pub fn index_of(&self, i: usize, item: Item, db: &SequenceDatabase) -> Option<usize> {
        let real = self.real_index(i);
        let seq = db.get(self.seq_id);
        if real >= seq.len() {
            return None;
        }
        let base_itemset = seq.itemset(real);
        let lower = self.lower(i);
        let upper = self.upper(i, db);
        for pos in lower..upper {
            let x = base_itemset.get(pos)?;
            if x == item {
                return Some(pos - lower);
            }
            if x > item {
                break;
            }
        }
        None
    }

    /// True iff `i == 0` and the cursor's first visible itemset is a
    /// structural remainder of the base itemset (projection landed
    /// mid-itemset).
    pub fn is_postfix(&self, i: usize) -> bool {
        i == 0 && self.postfix
    }

    /// True iff the `i`-th visible itemset has material of the base
    /// itemset to its right that is not visible here.
    pub fn is_cut_at_right(&self, i: usize, db: &SequenceDatabase) -> bool {
        let real = self.real_index(i);
        match self.bound {
            Some(Bound { itemset, item }) if itemset == real => {
                item < db.get(self.seq_id).itemset(real).len()
            }
            _ => false,
        }
    }

    /// Builds a child cursor anchored one position past `(i, index)`
    /// within the same visible window: if that is not the last item of
    /// itemset `i`, the child stays in itemset `i` at `index + 1` and is
    /// marked postfix; otherwise, if a following itemset exists, the child
    /// starts there at item 0 and postfix resets to `false`. Returns `None`
    /// if neither condition holds (end of the visible window).
    ///
    /// Preserves this cursor's end bound, so projecting further into a
    /// bounded region (as happens when the backward-check scanner walks a
    /// period) still respects that bound.
    pub fn child_after(&self, i: usize, index: usize, db: &SequenceDatabase) -> Option<PseudoSequence> {
        let real = self.real_index(i);
        let upper = self.upper(i, db);
        let lower = self.lower(i);
        if lower + index + 1 < upper {
            Some(PseudoSequence {
                seq_id: self.seq_id,
                start_itemset: real,
                start_item: lower + index + 1,
                bound: self.bound,
                postfix: true,
            })
        } else {
            let seq = db.get(self.seq_id);
            let next_real = real + 1;
            let next_visible = match self.bound {
                Some(Bound { itemset, item: 0 }) => next_real < itemset,
                Some(Bound { itemset, .. }) => next_real <= itemset,
                None => next_real < seq.len(),
            };
            if next_visible {
                Some(PseudoSequence {
                    seq_id: self.seq_id,
                    start_itemset: next_real,
                    start_item: 0,
                    bound: self.bound,
                    postfix: false,
                })
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Itemset, Sequence};
    use tinyvec::tiny_vec;

    fn db_one() -> SequenceDatabase {
        SequenceDatabase::new(vec![Sequence::new(
            0,
            vec![
                Itemset::from_ascending(tiny_vec![1, 2]),
                Itemset::from_ascending(tiny_vec![2]),
                Itemset::from_ascending(tiny_vec![3, 4]),
            ],
        )])
    }

    #[test]
    fn whole_sequence_is_not_postfix_and_not_cut() {
        let db = db_one();
        let ps = PseudoSequence::whole(0);
        assert_eq!(ps.size(&db), 3);
        assert!(!ps.is_postfix(0));
        assert!(!ps.is_cut_at_right(0, &db));
        assert!(!ps.is_cut_at_right(2, &db));
    }

    #[test]
    fn postfix_start_mid_itemset() {
        let db = db_one();
        let ps = PseudoSequence::from_start(0, 0, 1, true);
        assert_eq!(ps.itemset_len(0, &db), 1);
        assert_eq!(ps.item_at(0, 0, &db), Some(2));
        assert!(ps.is_postfix(0));
        assert!(!ps.is_cut_at_right(0, &db));
    }

    #[test]
    fn bounded_region_is_cut_at_right_at_its_end_itemset() {
        let db = db_one();
        // Region covering itemset 0 fully and itemset 1 up to (exclusive)
        // item 0 -- i.e. itemset 1 contributes nothing, so the visible
        // window is just itemset 0, not cut at right since the cut point
        // is the itemset boundary.
        let ps = PseudoSequence::bounded(0, 0, 0, false, 1, 0);
        assert_eq!(ps.size(&db), 1);
        assert!(!ps.is_cut_at_right(0, &db));

        // Region ending mid-itemset-2 is cut at right there.
        let ps2 = PseudoSequence::bounded(0, 0, 0, false, 2, 1);
        assert_eq!(ps2.size(&db), 3);
        assert!(ps2.is_cut_at_right(2, &db));
        assert_eq!(ps2.itemset_len(2, &db), 1);
        assert_eq!(ps2.item_at(2, 0, &db), Some(3));
    }

    #[test]
    fn child_after_same_itemset_is_postfix() {
        let db = db_one();
        let ps = PseudoSequence::whole(0);
        let child = ps.child_after(0, 0, &db).unwrap();
        assert!(child.is_postfix(0));
        assert_eq!(child.item_at(0, 0, &db), Some(2));
    }

    #[test]
    fn child_after_crosses_itemset_resets_postfix() {
        let db = db_one();
        let ps = PseudoSequence::whole(0);
        // index 0 of itemset 0 is the last occurrence to consider for item
        // "1"; but item 2 is still there, so child_after(0, 0) stays
        // within itemset 0. To cross over we need the *last* item index.
        let last_index = ps.itemset_len(0, &db) - 1;
        let child = ps.child_after(0, last_index, &db).unwrap();
        assert!(!child.is_postfix(0));
        assert_eq!(child.item_at(0, 0, &db), Some(2));
    }

    #[test]
    fn child_after_end_of_sequence_is_none() {
        let db = db_one();
        let ps = PseudoSequence::whole(0);
        let last_itemset = ps.size(&db) - 1;
        let last_index = ps.itemset_len(last_itemset, &db) - 1;
        assert!(ps.child_after(last_itemset, last_index, &db).is_none());
    }
}
