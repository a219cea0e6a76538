use std::io;

use crate::models::config::RingConfiguration;
use crate::models::error::RingError;

/// Fixed-capacity circular FIFO of bytes.
///
/// The store is allocated once at construction and released on drop. Writes
/// that exceed the free space and reads that exceed the filled bytes are
/// clamped silently: the returned count is the only indication of a partial
/// transfer.
///
/// There is no internal synchronization. For cross-thread use wrap it in
/// `StageLink` or an `Arc<parking_lot::Mutex<RingBuffer>>`.
#[derive(Debug)]
pub struct RingBuffer {
    store: Box<[u8]>,
    head: usize,
    tail: usize,
    filled: usize,
}

impl RingBuffer {
    /// Allocate a ring holding exactly `capacity` bytes.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::InvalidCapacity(capacity));
        }

        let mut store = Vec::new();
        store
            .try_reserve_exact(capacity)
            .map_err(|source| RingError::AllocationFailed { capacity, source })?;
        store.resize(capacity, 0u8);
        log::debug!("allocated {} byte ring", capacity);

        Ok(Self {
            store: store.into_boxed_slice(),
            head: 0,
            tail: 0,
            filled: 0,
        })
    }

    /// Validate `config` and allocate a ring of `config.capacity()` bytes.
    pub fn from_config(config: &RingConfiguration) -> Result<Self, RingError> {
        config.validate().map_err(RingError::ConfigurationFailed)?;
        Self::new(config.capacity())
    }

    /// Append up to `data.len()` bytes and return how many were accepted.
    ///
    /// Bytes beyond the free space are dropped. Returns 0 when the ring is full.
    pub fn write(&mut self, data: &[u8]) -> usize {
        let effective = data.len().min(self.free_space());
        if effective < data.len() {
            log::trace!("ring overflow: dropped {} of {} bytes", data.len() - effective, data.len());
        }
        if effective == 0 {
            return 0;
        }

        let capacity = self.capacity();
        let remaining = capacity - self.tail;
        let data = &data[..effective];

        if effective <= remaining {
            self.store[self.tail..self.tail + effective].copy_from_slice(data);
            self.tail = wrap(self.tail + effective, capacity);
        } else {
            // Split: fill to the end of the store, then continue from the start.
            let (first, second) = data.split_at(remaining);
            self.store[self.tail..].copy_from_slice(first);
            self.store[..second.len()].copy_from_slice(second);
            self.tail = second.len();
        }

        self.filled += effective;
        effective
    }

    /// Remove up to `dest.len()` bytes into `dest` and return how many were read.
    pub fn read(&mut self, dest: &mut [u8]) -> usize {
        let size = dest.len();
        self.read_with(Some(dest), size)
    }

    /// Discard up to `size` bytes without copying them out.
    pub fn skip(&mut self, size: usize) -> usize {
        self.read_with(None, size)
    }

    /// Remove up to `size` bytes, copying them into `dest` when one is given.
    ///
    /// With `dest` set to `None` the bytes are discarded but the read cursor
    /// and fill level still advance. With a destination, the transfer is also
    /// clamped to `dest.len()`. Returns 0 when the ring is empty.
    pub fn read_with(&mut self, dest: Option<&mut [u8]>, size: usize) -> usize {
        let mut effective = size.min(self.filled);
        if effective < size {
            log::trace!("ring underrun: {} of {} bytes available", effective, size);
        }
        if let Some(ref dest) = dest {
            effective = effective.min(dest.len());
        }
        if effective == 0 {
            return 0;
        }

        let capacity = self.capacity();
        let remaining = capacity - self.head;

        if effective <= remaining {
            if let Some(dest) = dest {
                dest[..effective].copy_from_slice(&self.store[self.head..self.head + effective]);
            }
            self.head = wrap(self.head + effective, capacity);
        } else {
            let wrapped = effective - remaining;
            if let Some(dest) = dest {
                dest[..remaining].copy_from_slice(&self.store[self.head..]);
                dest[remaining..effective].copy_from_slice(&self.store[..wrapped]);
            }
            self.head = wrapped;
        }

        self.filled -= effective;
        effective
    }

    /// Drop all unread bytes. The store is kept.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.filled = 0;
    }

    /// Number of unread bytes.
    pub fn filled_count(&self) -> usize {
        self.filled
    }

    /// Bytes that can be written before the ring is full.
    pub fn free_space(&self) -> usize {
        self.capacity() - self.filled
    }

    pub fn capacity(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.capacity()
    }
}

#[inline]
fn wrap(cursor: usize, capacity: usize) -> usize {
    if cursor == capacity {
        0
    } else {
        cursor
    }
}

/// `Ok(0)` means the ring is full; `write_all` turns that into `WriteZero`.
impl io::Write for RingBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(RingBuffer::write(self, buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// `Ok(0)` means the ring is currently drained, not that the stream ended.
impl io::Read for RingBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(RingBuffer::read(self, buf))
    }
}
