//! A closed sequential pattern miner implementing BIDE+.
//!
//! The algorithmic core lives in [`model`], [`pseudo_sequence`], [`pair`],
//! [`period`], [`projector`], [`scanner`], [`closure`], and [`driver`];
//! [`loader`], [`output`], and [`stats`] are the ambient collaborators a
//! deployable tool needs around that core.
//!
//! [`mine_to_memory`] and [`mine_to_file`] are the two invocation surfaces:
//! both route through [`driver::mine`], which is generic over any
//! [`OutputSink`].

pub mod closure;
pub mod driver;
pub mod error;
pub mod loader;
pub mod model;
pub mod output;
pub mod pair;
pub mod period;
pub mod projector;
pub mod pseudo_sequence;
pub mod scanner;
pub mod stats;

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Instant;

pub use error::MiningError;
pub use model::{Item, Itemset, Sequence, SequenceDatabase, SequenceId, SequentialPattern};
pub use output::{FileSink, MemoryCollector, OutputSink};
pub use stats::MiningStats;

/// Mines `db` for closed frequent sequential patterns at `minsup`,
/// collecting the result in memory.
pub fn mine_to_memory(db: &SequenceDatabase, minsup: usize) -> Result<(MemoryCollector, MiningStats), MiningError> {
    let mut collector = MemoryCollector::new();
    let start = Instant::now();
    driver::mine(db, minsup, &mut collector)?;
    let elapsed = start.elapsed();
    log::debug!("mining completed in {:?}, {} pattern(s)", elapsed, collector.len());
    let stats = MiningStats { elapsed, pattern_count: collector.len(), peak_rss_kb: stats::sample_peak_rss_kb() };
    Ok((collector, stats))
}

/// Mines `db`, writing one pattern per line to `path` in the file-mode
/// line syntax. Returns only the run's statistics: the patterns themselves
/// were streamed to disk, not kept in memory.
pub fn mine_to_file<P: AsRef<Path>>(db: &SequenceDatabase, minsup: usize, path: P) -> Result<MiningStats, MiningError> {
    let file = File::create(path).map_err(MiningError::from)?;
    let mut sink = FileSink::new(file);
    let start = Instant::now();
    let pattern_count = driver::mine(db, minsup, &mut sink)?;
    let elapsed = start.elapsed();
    log::debug!("mining completed in {:?}, {} pattern(s)", elapsed, pattern_count);
    Ok(MiningStats { elapsed, pattern_count, peak_rss_kb: stats::sample_peak_rss_kb() })
}

/// Loads a sequence database from `reader` and mines it in memory.
/// A small convenience wrapper combining [`loader::load`] and
/// [`mine_to_memory`] for the common CLI/library case.
pub fn load_and_mine<R: io::BufRead>(
    reader: R,
    minsup: usize,
) -> Result<(MemoryCollector, MiningStats), MiningError> {
    let db = loader::load(reader)?;
    mine_to_memory(&db, minsup)
}
