//! Frequent-pair scanners: the two ways of enumerating candidate
//! one-item extensions.
//!
//! The growth scanner drives ordinary pattern growth (`crate::driver`); the
//! backward-check scanner drives the closure oracle's BackScan pruning and
//! backward-extension test (`crate::closure`). Both emit [`PairKey`]s into
//! a [`PairTable`] that the caller later filters by support.

use crate::model::SequenceDatabase;
use crate::pair::{PairKey, PairTable};
use crate::pseudo_sequence::PseudoSequence;

/// For every pseudo-sequence, every visible itemset, every item: records
/// the pair keyed by `(item, is_cut_at_right, is_postfix)` of its
/// enclosing itemset, with that pseudo-sequence's base id in the pair's
/// support set.
pub fn frequent_pairs(database: &[PseudoSequence], db: &SequenceDatabase) -> PairTable {
    let mut table = PairTable::new();
    for ps in database {
        let size = ps.size(db);
        for i in 0..size {
            let is_prefix = ps.is_cut_at_right(i, db);
            let is_postfix = ps.is_postfix(i);
            let len = ps.itemset_len(i, db);
            for j in 0..len {
                if let Some(x) = ps.item_at(i, j, db) {
                    table.record(PairKey::new(x, is_prefix, is_postfix), ps.id());
                }
            }
        }
    }
    table
}

/// Enumerates pairs over a list of *period* pseudo-sequences for the
/// backward-extension check at prefix index `i_period`.
///
/// `item_i` is the prefix item at `i_period`; `item_im1` is the prefix item
/// at `i_period - 1`, if any. For each itemset in each period, besides the
/// normal pair, a variant with `is_postfix` flipped is emitted whenever
/// `item_im1` appears earlier in the same itemset, and a variant with
/// `is_prefix` flipped is emitted whenever `item_i` appears later in the
/// same itemset -- these recognize an item sitting inside a period as
/// structurally equivalent to an occurrence adjacent to the pattern.
pub fn pairs_for_backward_check(
    periods: &[PseudoSequence],
    item_i: crate::model::Item,
    item_im1: Option<crate::model::Item>,
    db: &SequenceDatabase,
) -> PairTable {
    let mut table = PairTable::new();
    for p in periods {
        let size = p.size(db);
        for i in 0..size {
            let len = p.itemset_len(i, db);
            let is_prefix = p.is_cut_at_right(i, db);
            let is_postfix = p.is_postfix(i);

            // Pre-pass: does item_i appear anywhere in this itemset?
            // Ascending order lets us stop scanning once we pass item_i.
            let mut saw_i = false;
            for j in 0..len {
                match p.item_at(i, j, db) {
                    Some(x) if x == item_i => {
                        saw_i = true;
                        break;
                    }
                    Some(x) if x > item_i => break,
                    _ => {}
                }
            }

            let mut saw_im1 = false;
            for j in 0..len {
                let item = match p.item_at(i, j, db) {
                    Some(x) => x,
                    None => continue,
                };

                let key = PairKey::new(item, is_prefix, is_postfix);
                table.record(key, p.id());

                if saw_im1 {
                    table.record(key.with_postfix_flipped(), p.id());
                }
                if saw_i {
                    table.record(key.with_prefix_flipped(), p.id());
                }

                if let Some(im1) = item_im1 {
                    if item == im1 {
                        saw_im1 = true;
                    }
                }
            }
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Itemset, Sequence};
    use tinyvec::tiny_vec;

    fn db_one() -> SequenceDatabase {
        SequenceDatabase::new(vec![Sequence::new(
            0,
            vec![Itemset::from_ascending(tiny_vec![1, 2, 3])],
        )])
    }

    #[test]
    fn growth_scanner_records_all_items_with_structural_context() {
        let db = db_one();
        let pseudo_db = vec![PseudoSequence::whole(0)];
        let table = frequent_pairs(&pseudo_db, &db);
        let pairs = table.into_all();
        assert_eq!(pairs.len(), 3);
        for pair in pairs {
            assert!(!pair.key.is_prefix);
            assert!(!pair.key.is_postfix);
            assert_eq!(pair.absolute_support(), 1);
        }
    }

    #[test]
    fn backward_check_flips_prefix_when_item_i_seen_later() {
        let db = db_one();
        let periods = vec![PseudoSequence::whole(0)];
        // item_i = 3 (appears after items 1 and 2 in the itemset).
        let table = pairs_for_backward_check(&periods, 3, Some(2), &db);
        let pairs = table.into_all();
        // sawI is a single itemset-wide flag (item 3 occurs somewhere in
        // this itemset), so every item emitted gets a prefix-flipped
        // variant. item 2 (== item_im1) flips sawIm1 on for the items
        // after it, so item 3 additionally gets a postfix-flipped variant.
        let item1_keys: Vec<_> = pairs.iter().filter(|p| p.key.item == 1).collect();
        let item2_keys: Vec<_> = pairs.iter().filter(|p| p.key.item == 2).collect();
        let item3_keys: Vec<_> = pairs.iter().filter(|p| p.key.item == 3).collect();
        assert_eq!(item1_keys.len(), 2);
        assert!(item1_keys.iter().any(|p| p.key.is_prefix));
        assert_eq!(item2_keys.len(), 2);
        assert_eq!(item3_keys.len(), 3);
        assert!(item3_keys.iter().any(|p| p.key.is_postfix));
        assert!(item3_keys.iter().any(|p| p.key.is_prefix));
    }
}
