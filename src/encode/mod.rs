//! Frame sinks.
//!
//! Sinks consume a rendered transition in frame order. Writing a container is left to the
//! system `ffmpeg`.

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
