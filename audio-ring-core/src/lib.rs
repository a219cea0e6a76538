//! # audio-ring-core
//!
//! Fixed-capacity byte ring buffer used to decouple streaming pipeline stages.
//!
//! A producer stage (e.g. an audio capture callback) writes bytes while a
//! consumer stage drains them at its own rate. Overflow and underrun are
//! silent: the returned transfer count is the only signal of a partial
//! transfer.
//!
//! ## Architecture
//!
//! ```text
//! audio-ring-core (this crate)
//! ├── models/       ← RingError, RingConfiguration, LinkDiagnostics
//! ├── processing/   ← RingBuffer (io::Read / io::Write)
//! └── session/      ← StageLink, LinkWriter, LinkReader
//! ```
//!
//! `RingBuffer` carries no synchronization of its own. Share it across threads
//! through `StageLink` or another lock of the caller's choosing.

pub mod models;
pub mod processing;
pub mod session;

// Re-export key types at crate root for convenience.
pub use models::config::RingConfiguration;
pub use models::diagnostics::LinkDiagnostics;
pub use models::error::RingError;
pub use processing::ring_buffer::RingBuffer;
pub use session::stage_link::{LinkReader, LinkWriter, StageLink};
