//! Thin CLI wrapper around the `bide_seqminer` library. Loads a
//! sequence database, mines it, and reports statistics; contains no mining
//! logic of its own.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

use bide_seqminer::{loader, mine_to_file, mine_to_memory, MiningError, MiningStats};
use clap::{App, Arg, ArgMatches};

fn main() {
    let matches = App::new("seqminer")
        .version("0.1.0")
        .about("Closed sequential pattern miner (BIDE+)")
        .arg(Arg::with_name("input").required(true).index(1).help("Input sequence database, SPMF line format"))
        .arg(
            Arg::with_name("minsup")
                .short("s")
                .long("minsup")
                .takes_value(true)
                .required(true)
                .help("Minimum support: an absolute sequence count, not a fraction"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .help("Output file path, SPMF line format; omit to print patterns to stdout"),
        )
        .arg(Arg::with_name("verbose").short("v").multiple(true).help("Increase log verbosity (-v, -vv)"))
        .get_matches();

    let level = match matches.occurrences_of("verbose") {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        _ => log::Level::Debug,
    };
    if let Err(err) = simple_logger::init_with_level(level) {
        eprintln!("warning: logger already initialized: {}", err);
    }

    if let Err(err) = run(&matches) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), MiningError> {
    let input_path = matches.value_of("input").expect("required by clap");
    let minsup: usize = matches
        .value_of("minsup")
        .expect("required by clap")
        .parse()
        .map_err(|_| MiningError::InvalidInput {
            reason: "minsup must be a positive integer".to_string(),
            sequence_index: None,
        })?;

    let file = File::open(input_path).map_err(MiningError::from)?;
    let db = loader::load(BufReader::new(file))?;

    let stats = match matches.value_of("output") {
        Some(path) => mine_to_file(&db, minsup, path)?,
        None => {
            let (collector, stats) = mine_to_memory(&db, minsup)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for pattern in collector.all() {
                writeln!(out, "{} #SUP: {}", pattern, pattern.absolute_support()).map_err(MiningError::from)?;
            }
            stats
        }
    };
    report_stats(&stats);
    Ok(())
}

fn report_stats(stats: &MiningStats) {
    eprintln!(
        "patterns: {}  elapsed: {:?}  peak RSS: {}",
        stats.pattern_count,
        stats.elapsed,
        stats.peak_rss_kb.map(|kb| format!("{} KiB", kb)).unwrap_or_else(|| "n/a".to_string())
    );
}
