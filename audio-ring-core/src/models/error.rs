use std::collections::TryReserveError;

use thiserror::Error;

/// Errors raised while constructing or configuring a ring buffer.
///
/// Overflow on write and underrun on read are deliberately absent: both are
/// reported only through the returned transfer count.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RingError {
    #[error("failed to allocate {capacity} byte ring store")]
    AllocationFailed {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("invalid ring capacity: {0}")]
    InvalidCapacity(usize),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),
}
