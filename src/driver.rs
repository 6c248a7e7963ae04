//! The top-level BIDE+ driver: initial scan and rewriting, singleton
//! seeding, and the shared recurse/project/close loop that both the
//! singleton loop and the recursive step funnel through.
//!
//! Everything upstream of this module (pseudo-sequences, the projector, the
//! two scanners, the closure oracle) is a value-level building block with no
//! opinion on control flow; this is where they are assembled into the
//! actual mining algorithm.

use fnv::{FnvHashMap, FnvHashSet};

use crate::closure::{back_scan_prunes, has_backward_extension};
use crate::error::MiningError;
use crate::model::{Item, Sequence, SequenceDatabase, SequenceId, SequentialPattern};
use crate::output::OutputSink;
use crate::projector::project;
use crate::pseudo_sequence::PseudoSequence;
use crate::scanner::frequent_pairs;

/// Validates the raw input before any mining work begins: `minsup`
/// must be a positive integer, and every itemset of every sequence must be
/// a strictly ascending list of positive items. A `SequenceDatabase` built
/// directly (bypassing `crate::loader`) only gets the ordering checked
/// here, via `debug_assert!` in `Itemset::from_ascending`, in debug builds;
/// this is the one place that checks it unconditionally for any caller.
pub fn validate(db: &SequenceDatabase, minsup: usize) -> Result<(), MiningError> {
    if minsup < 1 {
        return Err(MiningError::InvalidInput {
            reason: format!("minsup must be a positive integer, got {}", minsup),
            sequence_index: None,
        });
    }
    for seq in db.iter() {
        for itemset in seq.itemsets() {
            let items = itemset.items();
            if items.is_empty() {
                return Err(MiningError::InvalidInput {
                    reason: "itemset must be non-empty".to_string(),
                    sequence_index: Some(seq.id),
                });
            }
            for &item in items {
                if item <= 0 {
                    return Err(MiningError::InvalidInput {
                        reason: format!("item {} is not positive", item),
                        sequence_index: Some(seq.id),
                    });
                }
            }
            for w in items.windows(2) {
                if w[0] >= w[1] {
                    return Err(MiningError::InvalidInput {
                        reason: format!(
                            "items {} and {} within an itemset are not strictly ascending",
                            w[0], w[1]
                        ),
                        sequence_index: Some(seq.id),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Per-item sequence-id supports over the whole database, computed in one
/// initial pass.
fn scan_supports(db: &SequenceDatabase) -> FnvHashMap<Item, FnvHashSet<SequenceId>> {
    let mut map: FnvHashMap<Item, FnvHashSet<SequenceId>> = FnvHashMap::default();
    for seq in db.iter() {
        for itemset in seq.itemsets() {
            for &item in itemset.items() {
                map.entry(item).or_insert_with(FnvHashSet::default).insert(seq.id);
            }
        }
    }
    map
}

/// Rewrites every sequence keeping only frequent items.
/// Slots are kept dense and in the original order -- even sequences that
/// rewrite to nothing -- so that `SequenceId`s (and `SequenceDatabase::get`,
/// which indexes directly by id) stay aligned with the original database.
/// A sequence can only rewrite to nothing if every item it held was
/// infrequent, in which case no frequent item's support set ever names it,
/// so the empty slot is never actually dereferenced during mining.
fn rewrite_database(db: &SequenceDatabase, keep: &FnvHashSet<Item>) -> SequenceDatabase {
    let slots = db
        .iter()
        .map(|seq| seq.rewrite_keeping(keep).unwrap_or_else(|| Sequence::new(seq.id, Vec::new())))
        .collect();
    SequenceDatabase::new(slots)
}

/// Runs BIDE+ over `db` at `minsup`, emitting every closed frequent
/// sequential pattern to `sink` exactly once. Returns the number emitted.
pub fn mine(db: &SequenceDatabase, minsup: usize, sink: &mut dyn OutputSink) -> Result<usize, MiningError> {
    validate(db, minsup)?;

    let item_to_ids = scan_supports(db);
    let mut frequent_items: Vec<Item> = item_to_ids
        .iter()
        .filter(|(_, ids)| ids.len() >= minsup)
        .map(|(&item, _)| item)
        .collect();
    // Enumeration order is not part of the contract, but a
    // deterministic order makes this driver's own behavior reproducible
    // and keeps `tests/` from depending on hash-map iteration order.
    frequent_items.sort_unstable();

    let keep: FnvHashSet<Item> = frequent_items.iter().copied().collect();
    let initial_db = rewrite_database(db, &keep);
    let root_pseudo_db: Vec<PseudoSequence> = initial_db
        .iter()
        .filter(|seq| !seq.is_empty())
        .map(|seq| PseudoSequence::whole(seq.id))
        .collect();

    let mut emitted = 0usize;

    for item in frequent_items {
        let support_set = item_to_ids.get(&item).cloned().unwrap_or_default();
        let prefix = SequentialPattern::singleton(item, support_set);

        // The item is never inside a postfix remainder at the root, so this
        // is always an S-extension projection.
        let projected = project(item, &root_pseudo_db, false, &initial_db);

        let max_successor_support = if back_scan_prunes(&prefix, &initial_db) {
            0
        } else {
            recurse(&prefix, &projected, &initial_db, minsup, sink, &mut emitted)?
        };

        if prefix.absolute_support() != max_successor_support && !has_backward_extension(&prefix, &initial_db) {
            sink.emit(&prefix)?;
            emitted += 1;
        }
    }

    Ok(emitted)
}

/// One recursive step: grows `prefix` over its projected
/// pseudo-database `db`, emitting every closed extension found, and returns
/// the maximum absolute support seen among the (frequent) pairs it grew
/// through -- the forward-extension signal the caller needs to judge
/// whether `prefix` itself is closed.
fn recurse(
    prefix: &SequentialPattern,
    pseudo_db: &[PseudoSequence],
    base_db: &SequenceDatabase,
    minsup: usize,
    sink: &mut dyn OutputSink,
    emitted: &mut usize,
) -> Result<usize, MiningError> {
    let pairs = frequent_pairs(pseudo_db, base_db).into_frequent(minsup);

    let mut max_successor_support = 0usize;

    for pair in pairs {
        let mut clone = if pair.key.is_postfix {
            prefix.extend_last_itemset(pair.key.item)
        } else {
            prefix.extend_new_itemset(pair.key.item)
        };
        clone.set_support_set(pair.support_set);

        let projected_child = project(pair.key.item, pseudo_db, pair.key.is_postfix, base_db);

        let child_max_successor_support = if back_scan_prunes(&clone, base_db) {
            0
        } else {
            recurse(&clone, &projected_child, base_db, minsup, sink, emitted)?
        };

        if clone.absolute_support() != child_max_successor_support && !has_backward_extension(&clone, base_db) {
            sink.emit(&clone)?;
            *emitted += 1;
        }

        max_successor_support = max_successor_support.max(clone.absolute_support());
    }

    Ok(max_successor_support)
}
