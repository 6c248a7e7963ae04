//! Maximum and semi-maximum periods of a prefix within a base sequence.
//! This is the part of BIDE+ that lets the closure oracle
//! (`crate::closure`) look *inward* at the sequences a prefix already
//! covers, rather than only forward through the projected database.
//!
//! Both period kinds are built from the same two matching passes over a
//! base sequence: a left-to-right greedy ("leftmost") match of the prefix,
//! and a right-to-left greedy ("rightmost") match. The maximum period uses
//! only the leftmost pass; the semi-maximum period's upper boundary looks
//! further back using the rightmost pass, which is exactly why it is never
//! smaller than the maximum period.

use crate::model::{Sequence, SequenceDatabase, SequenceId, SequentialPattern};
use crate::pseudo_sequence::PseudoSequence;

/// Position one step forward from `(itemset, item)`, or `None` at the end
/// of the sequence.
fn next_position(seq: &Sequence, itemset: usize, item: usize) -> Option<(usize, usize)> {
    let len = seq.itemset(itemset).len();
    if item + 1 < len {
        Some((itemset, item + 1))
    } else {
        let next_itemset = itemset + 1;
        if next_itemset < seq.len() {
            Some((next_itemset, 0))
        } else {
            None
        }
    }
}

/// Position one step backward from `(itemset, item)`, or `None` at the
/// start of the sequence.
fn prev_position(seq: &Sequence, itemset: usize, item: usize) -> Option<(usize, usize)> {
    if item > 0 {
        Some((itemset, item - 1))
    } else if itemset > 0 {
        let prev_itemset = itemset - 1;
        let len = seq.itemset(prev_itemset).len();
        debug_assert!(len > 0, "itemsets are never empty");
        Some((prev_itemset, len - 1))
    } else {
        None
    }
}

fn last_position(seq: &Sequence) -> Option<(usize, usize)> {
    if seq.is_empty() {
        return None;
    }
    let last_itemset = seq.len() - 1;
    let len = seq.itemset(last_itemset).len();
    debug_assert!(len > 0, "itemsets are never empty");
    Some((last_itemset, len - 1))
}

/// Greedy leftmost match: scanning forward, the `k`-th entry is the
/// earliest position (at or after the match for `k-1`) holding
/// `pattern.item_at(k)`.
///
/// Panics if `pattern` is not actually a subsequence of `seq` -- this is
/// only ever called with sequences from a pattern's own support set, where
/// that is a maintained invariant; a panic here means the invariant
/// was violated elsewhere, not a recoverable input error.
fn forward_match_positions(seq: &Sequence, pattern: &SequentialPattern) -> Vec<(usize, usize)> {
    let n = pattern.item_occurrence_count();
    let mut result = Vec::with_capacity(n);
    let mut cursor = if seq.is_empty() { None } else { Some((0usize, 0usize)) };
    for k in 0..n {
        let target = pattern.item_at(k).expect("k within item_occurrence_count");
        let mut found = None;
        let mut pos = cursor;
        while let Some((ii, jj)) = pos {
            if seq.itemset(ii).get(jj) == Some(target) {
                found = Some((ii, jj));
                break;
            }
            pos = next_position(seq, ii, jj);
        }
        let m = found.expect("pattern must be a subsequence of its support-set sequences");
        result.push(m);
        cursor = next_position(seq, m.0, m.1);
    }
    result
}

/// Greedy rightmost match: scanning backward, the `k`-th entry is the
/// latest position (at or before the match for `k+1`) holding
/// `pattern.item_at(k)`.
fn backward_match_positions(seq: &Sequence, pattern: &SequentialPattern) -> Vec<(usize, usize)> {
    let n = pattern.item_occurrence_count();
    let mut result = vec![(0usize, 0usize); n];
    let mut cursor = last_position(seq);
    for k in (0..n).rev() {
        let target = pattern.item_at(k).expect("k within item_occurrence_count");
        let mut found = None;
        let mut pos = cursor;
        while let Some((ii, jj)) = pos {
            if seq.itemset(ii).get(jj) == Some(target) {
                found = Some((ii, jj));
                break;
            }
            pos = prev_position(seq, ii, jj);
        }
        let m = found.expect("pattern must be a subsequence of its support-set sequences");
        result[k] = m;
        cursor = prev_position(seq, m.0, m.1);
    }
    result
}

/// The start of a period strictly after `prev` (or the very start of the
/// sequence, when `prev` is `None` for `i = 0`). Returns `None` when there
/// is nothing left after `prev` -- the period is then necessarily empty.
fn start_after(seq: &Sequence, prev: Option<(usize, usize)>) -> Option<(usize, usize, bool)> {
    match prev {
        None => Some((0, 0, false)),
        Some((ii, jj)) => next_position(seq, ii, jj).map(|(ni, nj)| (ni, nj, ni == ii)),
    }
}

/// Computes maximum and semi-maximum periods of a prefix within one base
/// sequence. Bundles the two matching passes so callers iterating `i` over
/// a whole prefix reuse them instead of re-scanning the sequence per index.
///
/// Re-scans the sequence independently for every (prefix, sequence) pair
/// requested; the closure oracle calls this once per base sequence in a
/// prefix's support set, which keeps the cost proportional to the prefix's
/// own support rather than the whole database.
pub struct PeriodExtractor<'db> {
    db: &'db SequenceDatabase,
}

impl<'db> PeriodExtractor<'db> {
    pub fn new(db: &'db SequenceDatabase) -> Self {
        PeriodExtractor { db }
    }

    /// The `i`-th maximum period of `pattern` within sequence `seq_id`.
    pub fn maximum_period(
        &self,
        seq_id: SequenceId,
        pattern: &SequentialPattern,
        i: usize,
    ) -> Option<PseudoSequence> {
        let seq = self.db.get(seq_id);
        let fwd = forward_match_positions(seq, pattern);
        let end = fwd.get(i).copied();
        self.build(seq_id, seq, &fwd, end, i)
    }

    /// The `i`-th semi-maximum period of `pattern` within sequence
    /// `seq_id`. Identical to the maximum period except its upper boundary
    /// (for `i < |pattern|`) is the rightmost match of item `i`, not the
    /// leftmost -- hence "looks further back" and is never smaller.
    pub fn semi_maximum_period(
        &self,
        seq_id: SequenceId,
        pattern: &SequentialPattern,
        i: usize,
    ) -> Option<PseudoSequence> {
        let seq = self.db.get(seq_id);
        let fwd = forward_match_positions(seq, pattern);
        let n = pattern.item_occurrence_count();
        let end = if i < n {
            backward_match_positions(seq, pattern).get(i).copied()
        } else {
            None
        };
        self.build(seq_id, seq, &fwd, end, i)
    }

    fn build(
        &self,
        seq_id: SequenceId,
        seq: &Sequence,
        fwd: &[(usize, usize)],
        end: Option<(usize, usize)>,
        i: usize,
    ) -> Option<PseudoSequence> {
        let prev = if i == 0 { None } else { fwd.get(i - 1).copied() };
        let (start_itemset, start_item, postfix) = start_after(seq, prev)?;
        let ps = PseudoSequence::new(seq_id, start_itemset, start_item, postfix, end);
        if ps.is_empty(self.db) {
            None
        } else {
            Some(ps)
        }
    }
}
