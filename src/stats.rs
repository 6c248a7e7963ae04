//! Best-effort instrumentation probe.
//!
//! Wall-clock timing is measured by the caller (`crate::mine_to_memory`,
//! `crate::mine_to_file`) around the call into `crate::driver::mine`,
//! logged through `log::debug!` rather than printed directly. This module
//! supplies the other half: a best-effort peak resident memory sample.
//! Nothing here is allowed to influence mining behavior, and a failure to
//! sample memory is not a mining error -- it just yields `None`.

use std::fs;
use std::time::Duration;

/// Statistics collected around one mining run: total elapsed time,
/// how many patterns were emitted, and (best effort) peak RSS.
#[derive(Debug, Clone, Copy, Default)]
pub struct MiningStats {
    pub elapsed: Duration,
    pub pattern_count: usize,
    pub peak_rss_kb: Option<u64>,
}

/// Anything the probe can report a final pattern count for, so the library
/// entry points can build a `MiningStats` uniformly whether the driver
/// returned a plain count (file mode) or a `MemoryCollector` (memory mode).
pub trait PatternCount {
    fn pattern_count(&self) -> usize;
}

impl PatternCount for usize {
    fn pattern_count(&self) -> usize {
        *self
    }
}

/// Linux-only best-effort peak RSS sample, parsed from `/proc/self/status`'s
/// `VmHWM` line (kilobytes). `None` on any other platform, or if the file is
/// unreadable or the line is missing/malformed.
#[cfg(target_os = "linux")]
pub fn sample_peak_rss_kb() -> Option<u64> {
    let status = fs::read_to_string("/proc/self/status").ok()?;
    for line in status.lines() {
        if let Some(rest) = line.strip_prefix("VmHWM:") {
            return rest.trim().split_whitespace().next()?.parse().ok();
        }
    }
    None
}

#[cfg(not(target_os = "linux"))]
pub fn sample_peak_rss_kb() -> Option<u64> {
    None
}
