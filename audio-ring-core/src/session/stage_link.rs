use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::config::RingConfiguration;
use crate::models::diagnostics::LinkDiagnostics;
use crate::models::error::RingError;
use crate::processing::ring_buffer::RingBuffer;

/// Ring and counters, guarded together by one lock.
#[derive(Debug)]
struct LinkState {
    ring: RingBuffer,
    diagnostics: LinkDiagnostics,
}

/// A ring shared between a producing stage and a consuming stage.
///
/// Every call takes the lock once and never waits for data or space:
/// writes past the free space are dropped and reads past the filled bytes
/// come back short, exactly as with a bare `RingBuffer`.
///
/// ```text
/// [capture callback] → LinkWriter ─┐
///                                  ├→ Mutex<RingBuffer> → LinkReader → [processing loop]
/// ```
#[derive(Debug, Clone)]
pub struct StageLink {
    state: Arc<Mutex<LinkState>>,
}

impl StageLink {
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        Ok(Self::from_ring(RingBuffer::new(capacity)?))
    }

    pub fn from_config(config: &RingConfiguration) -> Result<Self, RingError> {
        Ok(Self::from_ring(RingBuffer::from_config(config)?))
    }

    /// Take ownership of an existing ring, keeping any bytes already in it.
    pub fn from_ring(ring: RingBuffer) -> Self {
        Self {
            state: Arc::new(Mutex::new(LinkState {
                ring,
                diagnostics: LinkDiagnostics::default(),
            })),
        }
    }

    pub fn writer(&self) -> LinkWriter {
        LinkWriter {
            state: Arc::clone(&self.state),
        }
    }

    pub fn reader(&self) -> LinkReader {
        LinkReader {
            state: Arc::clone(&self.state),
        }
    }

    pub fn filled_count(&self) -> usize {
        self.state.lock().ring.filled_count()
    }

    pub fn capacity(&self) -> usize {
        self.state.lock().ring.capacity()
    }

    /// Drop all unread bytes.
    pub fn clear(&self) {
        clear_state(&self.state);
    }

    pub fn diagnostics(&self) -> LinkDiagnostics {
        self.state.lock().diagnostics.clone()
    }

    pub fn reset_diagnostics(&self) {
        self.state.lock().diagnostics = LinkDiagnostics::default();
    }
}

fn clear_state(state: &Mutex<LinkState>) {
    let mut s = state.lock();
    s.ring.clear();
    s.diagnostics.clears += 1;
}

/// Producer handle of a `StageLink`.
#[derive(Debug, Clone)]
pub struct LinkWriter {
    state: Arc<Mutex<LinkState>>,
}

impl LinkWriter {
    /// Append `data`, returning how many bytes the ring accepted.
    pub fn write(&self, data: &[u8]) -> usize {
        let (written, filled) = {
            let mut s = self.state.lock();
            let written = s.ring.write(data);
            s.diagnostics.record_write(data.len(), written);
            (written, s.ring.filled_count())
        };

        if written < data.len() {
            log::debug!(
                "stage link full: dropped {} of {} bytes ({} buffered)",
                data.len() - written,
                data.len(),
                filled
            );
        }
        written
    }

    pub fn free_space(&self) -> usize {
        self.state.lock().ring.free_space()
    }
}

/// Consumer handle of a `StageLink`.
#[derive(Debug, Clone)]
pub struct LinkReader {
    state: Arc<Mutex<LinkState>>,
}

impl LinkReader {
    /// Remove up to `dest.len()` bytes into `dest`.
    pub fn read(&self, dest: &mut [u8]) -> usize {
        let requested = dest.len();
        let mut s = self.state.lock();
        let delivered = s.ring.read(dest);
        s.diagnostics.record_read(requested, delivered, true);
        delivered
    }

    /// Read up to `max` bytes into a new vector.
    pub fn read_vec(&self, max: usize) -> Vec<u8> {
        let mut s = self.state.lock();
        let mut out = vec![0u8; max.min(s.ring.filled_count())];
        let delivered = s.ring.read(&mut out);
        s.diagnostics.record_read(max, delivered, true);
        out
    }

    /// Discard up to `size` bytes.
    pub fn skip(&self, size: usize) -> usize {
        let mut s = self.state.lock();
        let delivered = s.ring.skip(size);
        s.diagnostics.record_read(size, delivered, false);
        delivered
    }

    pub fn filled_count(&self) -> usize {
        self.state.lock().ring.filled_count()
    }

    /// Drop all unread bytes, e.g. after the consumer falls too far behind.
    pub fn clear(&self) {
        clear_state(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handles_share_one_ring() {
        let link = StageLink::new(8).unwrap();
        let writer = link.writer();
        let reader = link.reader();

        assert_eq!(writer.write(&[1, 2, 3]), 3);
        assert_eq!(link.filled_count(), 3);
        assert_eq!(reader.filled_count(), 3);
        assert_eq!(writer.free_space(), 5);

        assert_eq!(reader.read_vec(8), vec![1, 2, 3]);
        assert_eq!(link.filled_count(), 0);
    }

    #[test]
    fn drops_and_shortfalls_are_counted() {
        let link = StageLink::new(4).unwrap();
        let writer = link.writer();
        let reader = link.reader();

        assert_eq!(writer.write(&[1, 2, 3, 4, 5, 6]), 4);
        assert_eq!(reader.skip(1), 1);

        let mut out = [0u8; 5];
        assert_eq!(reader.read(&mut out), 3);
        assert_eq!(&out[..3], &[2, 3, 4]);

        let diag = link.diagnostics();
        assert_eq!(diag.write_calls, 1);
        assert_eq!(diag.bytes_offered, 6);
        assert_eq!(diag.bytes_written, 4);
        assert_eq!(diag.bytes_dropped, 2);
        assert_eq!(diag.read_calls, 2);
        assert_eq!(diag.bytes_requested, 6);
        assert_eq!(diag.bytes_skipped, 1);
        assert_eq!(diag.bytes_read, 3);
        assert_eq!(diag.bytes_short, 2);
    }

    #[test]
    fn read_vec_returns_only_available() {
        let link = StageLink::new(8).unwrap();
        link.writer().write(&[9, 8]);

        assert_eq!(link.reader().read_vec(5), vec![9, 8]);
        assert!(link.reader().read_vec(5).is_empty());
        assert_eq!(link.diagnostics().bytes_short, 8);
    }

    #[test]
    fn clear_and_reset() {
        let link = StageLink::new(8).unwrap();
        link.writer().write(&[1, 2, 3]);
        link.reader().clear();

        assert_eq!(link.filled_count(), 0);
        assert_eq!(link.diagnostics().clears, 1);

        link.reset_diagnostics();
        assert_eq!(link.diagnostics(), LinkDiagnostics::default());
    }

    #[test]
    fn from_ring_keeps_buffered_bytes() {
        let mut ring = RingBuffer::new(4).unwrap();
        ring.write(&[7, 7]);

        let link = StageLink::from_ring(ring);
        assert_eq!(link.capacity(), 4);
        assert_eq!(link.reader().read_vec(4), vec![7, 7]);
    }

    #[test]
    fn from_config_rejects_invalid() {
        let config = RingConfiguration {
            channels: 0,
            ..RingConfiguration::default()
        };
        assert!(matches!(
            StageLink::from_config(&config),
            Err(RingError::ConfigurationFailed(_))
        ));
    }

    #[test]
    fn producer_and_consumer_threads() {
        let link = StageLink::new(64).unwrap();
        let writer = link.writer();
        let reader = link.reader();
        let input: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

        let expected = input.clone();
        let producer = thread::spawn(move || {
            let mut offset = 0;
            while offset < input.len() {
                let end = (offset + 48).min(input.len());
                offset += writer.write(&input[offset..end]);
                thread::yield_now();
            }
        });

        let consumer = thread::spawn(move || {
            let mut output = Vec::with_capacity(10_000);
            let mut chunk = [0u8; 32];
            while output.len() < 10_000 {
                let n = reader.read(&mut chunk);
                output.extend_from_slice(&chunk[..n]);
                if n == 0 {
                    thread::yield_now();
                }
            }
            output
        });

        producer.join().unwrap();
        let output = consumer.join().unwrap();

        assert_eq!(output, expected);
        assert_eq!(link.diagnostics().bytes_written, 10_000);
        assert_eq!(link.diagnostics().bytes_read, 10_000);
    }
}
