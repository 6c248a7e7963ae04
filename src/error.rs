//! Error kinds for the miner.
//!
//! Kept as one small per-concern enum rather than a single crate-wide
//! catch-all: every variant here corresponds to exactly one of the three
//! ways a mining run can fail, and nothing else in this crate returns an
//! error.

use std::fmt;

/// Everything that can go wrong calling into this crate from the outside.
///
/// There are no retry paths: mining itself is deterministic, and an
/// invariant violation inside the algorithm (e.g. a pair's support
/// exceeding its parent's) is a bug, surfaced as a panic in debug builds
/// rather than one of these variants.
#[derive(Debug)]
pub enum MiningError {
    /// The input failed validation before mining began: a non-ascending or
    /// repeated item within an itemset, a non-positive item, or
    /// `minsup < 1`.
    InvalidInput {
        reason: String,
        /// 0-based index of the offending sequence, when known.
        sequence_index: Option<usize>,
    },
    /// A file-mode output write failed. Propagates immediately; any
    /// partial file is left as-is.
    Io(std::io::Error),
    /// Best-effort signal from the instrumentation probe or output sink.
    /// Never raised by the mining core itself.
    ResourceExhausted { detail: String },
}

impl fmt::Display for MiningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiningError::InvalidInput { reason, sequence_index: Some(idx) } => {
                write!(f, "invalid input at sequence {}: {}", idx, reason)
            }
            MiningError::InvalidInput { reason, sequence_index: None } => {
                write!(f, "invalid input: {}", reason)
            }
            MiningError::Io(err) => write!(f, "output I/O error: {}", err),
            MiningError::ResourceExhausted { detail } => write!(f, "resource exhausted: {}", detail),
        }
    }
}

impl std::error::Error for MiningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MiningError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MiningError {
    fn from(err: std::io::Error) -> Self {
        MiningError::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: MiningError = io_err.into();
        assert_matches!(err, MiningError::Io(_));
    }

    #[test]
    fn invalid_input_display_includes_sequence_index() {
        let err = MiningError::InvalidInput {
            reason: "items not ascending".to_string(),
            sequence_index: Some(3),
        };
        assert_eq!(err.to_string(), "invalid input at sequence 3: items not ascending");
    }
}
