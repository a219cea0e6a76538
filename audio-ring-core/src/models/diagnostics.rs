use serde::{Deserialize, Serialize};

use super::error::RingError;

/// Transfer counters for a `StageLink`.
///
/// Overflow and underrun never raise errors, so these counters are how a
/// pipeline finds out how much data it lost or was short.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDiagnostics {
    pub write_calls: u64,
    pub bytes_offered: u64,
    pub bytes_written: u64,
    /// Bytes rejected because the ring was full.
    pub bytes_dropped: u64,

    pub read_calls: u64,
    pub bytes_requested: u64,
    /// Bytes copied out to a destination.
    pub bytes_read: u64,
    /// Bytes consumed without copying.
    pub bytes_skipped: u64,
    /// Requested bytes that were not available.
    pub bytes_short: u64,

    pub clears: u64,
}

impl LinkDiagnostics {
    pub(crate) fn record_write(&mut self, offered: usize, written: usize) {
        self.write_calls += 1;
        self.bytes_offered += offered as u64;
        self.bytes_written += written as u64;
        self.bytes_dropped += (offered - written) as u64;
    }

    pub(crate) fn record_read(&mut self, requested: usize, delivered: usize, copied: bool) {
        self.read_calls += 1;
        self.bytes_requested += requested as u64;
        if copied {
            self.bytes_read += delivered as u64;
        } else {
            self.bytes_skipped += delivered as u64;
        }
        self.bytes_short += (requested - delivered) as u64;
    }

    /// Fraction of offered bytes that were dropped (0.0 when nothing was offered).
    pub fn drop_ratio(&self) -> f64 {
        if self.bytes_offered == 0 {
            return 0.0;
        }
        self.bytes_dropped as f64 / self.bytes_offered as f64
    }

    pub fn to_json(&self) -> Result<String, RingError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| RingError::ConfigurationFailed(format!("failed to serialize diagnostics: {}", e)))
    }
}
