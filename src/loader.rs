//! Parses the SPMF-style sequence-database line format into a
//! [`SequenceDatabase`]. This module produces the core's input type but
//! contains no mining logic and is never on the closure/backscan hot path.
//!
//! Line format: items of an itemset separated by spaces, `-1` terminates
//! an itemset, an optional trailing `-2` terminates the line's sequence
//! (`1 2 -1 3 -1 -2`). Blank lines and `#`-prefixed comment lines are
//! skipped; sequence IDs are assigned densely, in order, over the
//! surviving lines.

use std::io::BufRead;

use annotate_snippets::display_list::DisplayList;
use annotate_snippets::snippet::{Annotation, AnnotationType, Slice, Snippet, SourceAnnotation};
use lazy_static::lazy_static;
use regex::Regex;
use tinyvec::TinyVec;

use crate::error::MiningError;
use crate::model::{Item, Itemset, Sequence, SequenceDatabase};

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"-?\d+").unwrap();
}

/// Reads a whole sequence database from `reader`.
pub fn load<R: BufRead>(reader: R) -> Result<SequenceDatabase, MiningError> {
    let mut sequences = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        sequences.push(parse_line(trimmed, sequences.len(), line_no)?);
    }
    Ok(SequenceDatabase::new(sequences))
}

fn parse_line(line: &str, seq_id: usize, source_line_no: usize) -> Result<Sequence, MiningError> {
    let mut itemsets = Vec::new();
    let mut current: TinyVec<[Item; 4]> = TinyVec::new();

    for mat in TOKEN.find_iter(line) {
        let value: i64 = mat.as_str().parse().expect("regex only matches optionally-signed integers");
        match value {
            -2 => break,
            -1 => {
                if current.is_empty() {
                    return Err(diagnostic(line, source_line_no, mat.start(), mat.end(), "empty itemset before -1"));
                }
                itemsets.push(Itemset::from_ascending(std::mem::take(&mut current)));
            }
            item if item <= 0 => {
                return Err(diagnostic(line, source_line_no, mat.start(), mat.end(), "item must be positive"));
            }
            item => {
                let item = item as Item;
                if current.last().map(|&last| last >= item).unwrap_or(false) {
                    return Err(diagnostic(
                        line,
                        source_line_no,
                        mat.start(),
                        mat.end(),
                        "items within an itemset must be strictly ascending",
                    ));
                }
                current.push(item);
            }
        }
    }

    if !current.is_empty() {
        return Err(diagnostic(line, source_line_no, 0, line.len(), "itemset missing terminating -1"));
    }
    if itemsets.is_empty() {
        return Err(diagnostic(line, source_line_no, 0, line.len(), "line contains no itemsets"));
    }

    Ok(Sequence::new(seq_id, itemsets))
}

/// Renders an `annotate-snippets` pointer at the offending token and wraps
/// it as an `InvalidInput` -- the loader's own flavor of the error
/// the driver's `validate` also raises for a `SequenceDatabase` built
/// directly.
fn diagnostic(line: &str, line_no: usize, start: usize, end: usize, message: &str) -> MiningError {
    let snippet = Snippet {
        title: Some(Annotation { label: Some(message), id: None, annotation_type: AnnotationType::Error }),
        footer: vec![],
        slices: vec![Slice {
            source: line,
            line_start: line_no + 1,
            origin: Some("<input>"),
            fold: false,
            annotations: vec![SourceAnnotation { label: message, annotation_type: AnnotationType::Error, range: (start, end) }],
        }],
    };
    MiningError::InvalidInput { reason: DisplayList::from(snippet).to_string(), sequence_index: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    fn load_str(text: &str) -> Result<SequenceDatabase, MiningError> {
        load(Cursor::new(text.as_bytes()))
    }

    #[test]
    fn parses_itemsets_and_trailing_sequence_terminator() {
        let db = load_str("1 2 -1 3 -1 -2\n").unwrap();
        assert_eq!(db.len(), 1);
        let seq = db.get(0);
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.itemset(0).items(), &[1, 2]);
        assert_eq!(seq.itemset(1).items(), &[3]);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let db = load_str("# a comment\n\n1 -1\n\n2 -1\n").unwrap();
        assert_eq!(db.len(), 2);
        assert_eq!(db.get(0).itemset(0).items(), &[1]);
        assert_eq!(db.get(1).itemset(0).items(), &[2]);
    }

    #[test]
    fn sequence_ids_are_dense_and_in_order() {
        let db = load_str("1 -1\n2 -1\n3 -1\n").unwrap();
        for (idx, seq) in db.iter().enumerate() {
            assert_eq!(seq.id, idx);
        }
    }

    #[test]
    fn rejects_non_ascending_items() {
        let err = load_str("2 1 -1\n").unwrap_err();
        assert_matches!(err, MiningError::InvalidInput { .. });
    }

    #[test]
    fn rejects_non_positive_items() {
        let err = load_str("0 -1\n").unwrap_err();
        assert_matches!(err, MiningError::InvalidInput { .. });
    }

    #[test]
    fn rejects_missing_terminator() {
        let err = load_str("1 2\n").unwrap_err();
        assert_matches!(err, MiningError::InvalidInput { .. });
    }
}
