use serde::{Deserialize, Serialize};

use super::error::RingError;

/// Sizing for a ring that buffers one PCM stream.
///
/// Capacity is either given directly in bytes or derived from the stream
/// format and the amount of audio that should fit in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfiguration {
    /// Stream sample rate in Hz (default: 48000).
    pub sample_rate: u32,

    /// Interleaved channel count (default: 2). Valid range: 1..=8.
    pub channels: u16,

    /// Bits per sample (default: 16). Valid values: 8, 16, 24, 32.
    pub bit_depth: u16,

    /// Milliseconds of audio the ring must hold (default: 5000).
    pub buffered_ms: u32,

    /// Explicit capacity in bytes. Overrides the format-derived size.
    pub capacity_bytes: Option<usize>,
}

impl RingConfiguration {
    /// Configuration with an explicit byte capacity and default format.
    pub fn with_capacity(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes: Some(capacity_bytes),
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, RingError> {
        serde_json::from_str(json)
            .map_err(|e| RingError::ConfigurationFailed(format!("failed to parse configuration: {}", e)))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if !(1..=8).contains(&self.channels) {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        if ![8, 16, 24, 32].contains(&self.bit_depth) {
            return Err(format!("unsupported bit depth: {}", self.bit_depth));
        }
        if self.capacity() == 0 {
            return Err("ring capacity must be positive".into());
        }
        Ok(())
    }

    /// Bytes in one interleaved frame (one sample per channel).
    pub fn bytes_per_frame(&self) -> usize {
        self.channels as usize * (self.bit_depth as usize / 8)
    }

    /// Ring capacity in bytes.
    pub fn capacity(&self) -> usize {
        if let Some(bytes) = self.capacity_bytes {
            return bytes;
        }
        let frames = u64::from(self.sample_rate) * u64::from(self.buffered_ms) / 1000;
        let bytes = frames.saturating_mul(self.bytes_per_frame() as u64);
        usize::try_from(bytes).unwrap_or(usize::MAX)
    }

    /// Playback time in seconds represented by `bytes` of this stream.
    pub fn duration_secs(&self, bytes: usize) -> f64 {
        let frame = self.bytes_per_frame();
        if frame == 0 || self.sample_rate == 0 {
            return 0.0;
        }
        (bytes / frame) as f64 / f64::from(self.sample_rate)
    }
}

impl Default for RingConfiguration {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            channels: 2,
            bit_depth: 16,
            buffered_ms: 5000,
            capacity_bytes: None,
        }
    }
}
