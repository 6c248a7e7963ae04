//! Builds projected pseudo-databases for a single extension item.
//!
//! Projection never copies item data: each output cursor is a `Copy`
//! [`PseudoSequence`] derived from an input cursor. One base sequence
//! contributes at most one cursor per projection call -- the scan stops at
//! the first occurrence in a pseudo-sequence that is structurally eligible
//! for the requested extension kind.

use crate::model::SequenceDatabase;
use crate::model::Item;
use crate::pseudo_sequence::PseudoSequence;

/// Projects `database` on `item`.
///
/// `in_suffix` selects the extension kind being grown: `true` for an
/// I-extension (the item must occur inside a postfix remainder itemset),
/// `false` for an S-extension (the item must occur in a whole itemset).
/// Only the first visible itemset of a pseudo-sequence can ever be a
/// postfix remainder, so `in_suffix = true` only ever matches at itemset
/// position 0; `in_suffix = false` matches any visible itemset, including
/// position 0 when it is not itself a postfix remainder.
pub fn project(
    item: Item,
    database: &[PseudoSequence],
    in_suffix: bool,
    db: &SequenceDatabase,
) -> Vec<PseudoSequence> {
    let mut result = Vec::new();
    for ps in database {
        let size = ps.size(db);
        for i in 0..size {
            if ps.is_postfix(i) != in_suffix {
                continue;
            }
            if let Some(index) = ps.index_of(i, item, db) {
                if let Some(child) = ps.child_after(i, index, db) {
                    if !child.is_empty(db) {
                        result.push(child);
                    }
                }
                break;
            }
        }
    }
    result
}
