//! Output sink abstraction: a file-mode serializer and an in-memory,
//! length-bucketed collector behind one `OutputSink` trait, so the driver
//! (`crate::driver`) calls a single `emit` regardless of mode.

use std::io::{self, Write};

use crate::error::MiningError;
use crate::model::SequentialPattern;
use crate::stats::PatternCount;

/// Accepts one closed pattern at a time as the driver discovers it.
pub trait OutputSink {
    fn emit(&mut self, pattern: &SequentialPattern) -> Result<(), MiningError>;
}

/// File mode: one pattern per line, `<items> -1 <items> -1  #SUP: <n>`.
/// Buffered; any write failure propagates immediately as `MiningError::Io`,
/// leaving whatever was already flushed in place -- there is no partial-line
/// retry.
pub struct FileSink<W: Write> {
    writer: io::BufWriter<W>,
}

impl<W: Write> FileSink<W> {
    pub fn new(writer: W) -> Self {
        FileSink { writer: io::BufWriter::new(writer) }
    }
}

impl<W: Write> OutputSink for FileSink<W> {
    fn emit(&mut self, pattern: &SequentialPattern) -> Result<(), MiningError> {
        // `SequentialPattern`'s `Display` already ends each itemset (and so
        // the whole pattern) with a trailing space, so the leading space in
        // " #SUP:" below is what produces the double space before `#SUP:`.
        writeln!(self.writer, "{} #SUP: {}", pattern, pattern.absolute_support())?;
        Ok(())
    }
}

/// Memory mode: patterns bucketed by length (number of itemsets).
/// Iteration order within a bucket is unspecified.
#[derive(Debug, Default)]
pub struct MemoryCollector {
    buckets: Vec<Vec<SequentialPattern>>,
}

impl MemoryCollector {
    pub fn new() -> Self {
        MemoryCollector::default()
    }

    /// Patterns of length `k` (1-based itemset count); empty slice if none
    /// were emitted at that length.
    pub fn of_length(&self, k: usize) -> &[SequentialPattern] {
        k.checked_sub(1).and_then(|idx| self.buckets.get(idx)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Largest pattern length with any emitted patterns, or 0 if empty.
    pub fn max_length(&self) -> usize {
        self.buckets.len()
    }

    pub fn all(&self) -> impl Iterator<Item = &SequentialPattern> {
        self.buckets.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

impl OutputSink for MemoryCollector {
    fn emit(&mut self, pattern: &SequentialPattern) -> Result<(), MiningError> {
        let k = pattern.itemsets().len();
        if self.buckets.len() < k {
            self.buckets.resize_with(k, Vec::new);
        }
        self.buckets[k - 1].push(pattern.clone());
        Ok(())
    }
}

impl PatternCount for MemoryCollector {
    fn pattern_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnv::FnvHashSet;

    fn pattern(items: &[i32]) -> SequentialPattern {
        let mut support = FnvHashSet::default();
        support.insert(0);
        let mut p = SequentialPattern::singleton(items[0], support);
        for &item in &items[1..] {
            p = p.extend_new_itemset(item);
        }
        p
    }

    #[test]
    fn file_sink_renders_worked_example_syntax() {
        let mut buf = Vec::new();
        {
            let mut sink = FileSink::new(&mut buf);
            sink.emit(&pattern(&[1, 5])).unwrap();
        }
        assert_eq!(String::from_utf8(buf).unwrap(), "1 -1 5 -1  #SUP: 1\n");
    }

    #[test]
    fn memory_collector_buckets_by_pattern_length() {
        let mut collector = MemoryCollector::new();
        collector.emit(&pattern(&[1])).unwrap();
        collector.emit(&pattern(&[2, 3])).unwrap();
        collector.emit(&pattern(&[4])).unwrap();
        assert_eq!(collector.of_length(1).len(), 2);
        assert_eq!(collector.of_length(2).len(), 1);
        assert!(collector.of_length(3).is_empty());
        assert_eq!(collector.len(), 3);
    }
}
