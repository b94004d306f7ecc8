//! Encode capability: turning rendered frames into file payloads.

/// Encoder traits, parameters and the built-in encoder selection.
pub mod encoder;
/// Encoder backed by the system `ffmpeg` binary.
pub mod ffmpeg;
/// In-process encoder backed by the `image` crate.
pub mod still;
