//! Encoding sinks.
//!
//! Sinks consume finished frames in timeline order, each with its display duration, and turn
//! them into one encoded blob on `finalize`.

/// Animated GIF output via the `image` crate.
pub mod gif;
/// Numbered PNG files, one per frame.
pub mod png_seq;
/// Generic sink trait and the in-memory sink.
pub mod sink;
