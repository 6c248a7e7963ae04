//! The closure oracle: BackScan pruning and the backward-extension
//! closure check. These two tests share the same shape -- build periods at
//! every prefix index over exactly the prefix's own support-set sequences,
//! scan them for pairs, and ask whether any pair reaches the prefix's own
//! support -- differing only in which period kind (semi-maximum vs
//! maximum) feeds the scan.

use crate::model::{SequenceDatabase, SequentialPattern};
use crate::period::PeriodExtractor;
use crate::pseudo_sequence::PseudoSequence;
use crate::scanner::pairs_for_backward_check;

/// Collects the i-th period (maximum or semi-maximum, selected by
/// `extract`) over every sequence in `prefix`'s support set.
fn periods_at<'a>(
    prefix: &SequentialPattern,
    extractor: &PeriodExtractor<'a>,
    i: usize,
    extract: impl Fn(&PeriodExtractor<'a>, usize, &SequentialPattern, usize) -> Option<PseudoSequence>,
) -> Vec<PseudoSequence> {
    prefix
        .support_set()
        .iter()
        .filter_map(|&seq_id| extract(extractor, seq_id, prefix, i))
        .collect()
}

/// True iff `prefix` can be proven unable to grow any closed pattern: some
/// item appears, in every sequence of `prefix`'s support, within the i-th
/// semi-maximum period in a structural position equivalent to extending
/// `prefix` at index `i` -- i.e. a same-support extension is guaranteed to
/// exist however recursion proceeds, so the whole subtree can be skipped.
pub fn back_scan_prunes(prefix: &SequentialPattern, db: &SequenceDatabase) -> bool {
    let extractor = PeriodExtractor::new(db);
    let target_support = prefix.absolute_support();
    let n = prefix.item_occurrence_count();
    for i in 0..n {
        let periods = periods_at(prefix, &extractor, i, PeriodExtractor::semi_maximum_period);
        if periods.is_empty() {
            continue;
        }
        if any_pair_reaches_support(prefix, &periods, i, db, target_support) {
            return true;
        }
    }
    false
}

/// True iff `prefix` has a same-support backward extension, i.e. is not
/// closed: identical to [`back_scan_prunes`] but driven by maximum
/// periods rather than semi-maximum ones.
pub fn has_backward_extension(prefix: &SequentialPattern, db: &SequenceDatabase) -> bool {
    let extractor = PeriodExtractor::new(db);
    let target_support = prefix.absolute_support();
    let n = prefix.item_occurrence_count();
    for i in 0..n {
        let periods = periods_at(prefix, &extractor, i, PeriodExtractor::maximum_period);
        if periods.is_empty() {
            continue;
        }
        if any_pair_reaches_support(prefix, &periods, i, db, target_support) {
            return true;
        }
    }
    false
}

fn any_pair_reaches_support(
    prefix: &SequentialPattern,
    periods: &[PseudoSequence],
    i: usize,
    db: &SequenceDatabase,
    target_support: usize,
) -> bool {
    let item_i = match prefix.item_at(i) {
        Some(x) => x,
        None => return false,
    };
    let item_im1 = if i > 0 { prefix.item_at(i - 1) } else { None };
    let table = pairs_for_backward_check(periods, item_i, item_im1, db);
    table.into_all().into_iter().any(|pair| pair.absolute_support() == target_support)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Itemset, Sequence};
    use fnv::FnvHashSet;
    use tinyvec::tiny_vec;

    fn db_closed_pair() -> SequenceDatabase {
        // (1)(2) repeated 3 times -- "1" and "2" are each frequent at
        // support 3, but "1" is always immediately followed by "2" with
        // nothing else in between, so singleton "1" has a same-support
        // backward... actually forward extension; this scenario is used
        // to sanity-check that has_backward_extension does not misfire on
        // a pattern with no periods at all (supp-set sequences consist of
        // exactly the pattern and nothing else).
        SequenceDatabase::new(vec![
            Sequence::new(0, vec![Itemset::from_ascending(tiny_vec![1]), Itemset::from_ascending(tiny_vec![2])]),
            Sequence::new(1, vec![Itemset::from_ascending(tiny_vec![1]), Itemset::from_ascending(tiny_vec![2])]),
        ])
    }

    #[test]
    fn no_backward_extension_when_pattern_fills_whole_sequences() {
        let db = db_closed_pair();
        let mut support = FnvHashSet::default();
        support.insert(0);
        support.insert(1);
        let mut pattern = SequentialPattern::singleton(1, support.clone());
        pattern = pattern.extend_new_itemset(2);
        pattern.set_support_set(support);
        assert!(!has_backward_extension(&pattern, &db));
        assert!(!back_scan_prunes(&pattern, &db));
    }

    #[test]
    fn backward_extension_detected_for_scenario_four() {
        // From SPEC_FULL.md scenario 4: (1)(2)(3), (1)(2)(3), (2)(3).
        // Pattern "1 -1 3 -1" has support 2 but is backward-extended by 2.
        let db = SequenceDatabase::new(vec![
            Sequence::new(
                0,
                vec![
                    Itemset::from_ascending(tiny_vec![1]),
                    Itemset::from_ascending(tiny_vec![2]),
                    Itemset::from_ascending(tiny_vec![3]),
                ],
            ),
            Sequence::new(
                1,
                vec![
                    Itemset::from_ascending(tiny_vec![1]),
                    Itemset::from_ascending(tiny_vec![2]),
                    Itemset::from_ascending(tiny_vec![3]),
                ],
            ),
        ]);
        let mut support = FnvHashSet::default();
        support.insert(0);
        support.insert(1);
        let mut pattern = SequentialPattern::singleton(1, support.clone());
        pattern = pattern.extend_new_itemset(3);
        pattern.set_support_set(support);
        assert!(has_backward_extension(&pattern, &db));
    }
}
