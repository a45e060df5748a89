//! Offline recording
//!
//! A `RecordingWriter` that keeps messages instead of sending them, so a
//! capture can be saved to disk and replayed later without a live peer.

pub mod session;

pub use session::{RecordedMessage, RecordedSession, ReplaySummary};
