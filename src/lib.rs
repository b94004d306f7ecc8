//! Bouncer synthesizes a bouncing-ball frame sequence from a single still image.
//!
//! The source image is decoded once into a base frame. For every output frame the ball physics
//! advance one tick, the base frame is cloned, a shaded ball is composited onto the clone, and the
//! result is encoded and written to `<stem>NNN.<ext>`.
//!
//! - Describe the run with a [`BounceConfig`] and [`RenderOpts`]
//! - Call [`run_pipeline`]
//! - Inspect the returned [`RenderStats`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod export;
mod foundation;
mod frame;
mod physics;
mod pipeline;
mod render;

/// Encode contexts: the in-process still-image encoder and the `ffmpeg` encoder.
pub mod encode;

pub use crate::foundation::core::{FrameIndex, FrameRange, PixelFormat};
pub use crate::foundation::error::{BouncerError, BouncerResult};

pub use crate::assets::decode::{decode_image, decode_image_bytes, validate_input_extension};
pub use crate::encode::encoder::{
    EncodeParams, EncodedFrame, EncoderFactory, EncoderKind, FrameEncoder,
};
pub use crate::encode::ffmpeg::{FfmpegEncoder, is_ffmpeg_on_path};
pub use crate::encode::still::{ImageCodec, ImageEncoder};
pub use crate::export::exporter::{ExportOutcome, export_frame, frame_file_name, write_payload};
pub use crate::frame::buffer::FrameBuffer;
pub use crate::physics::ball::{Arena, BallState};
pub use crate::pipeline::config::{
    BounceConfig, JPEG_EXTENSIONS, MAX_FLOOR, MAX_FRAMES, MAX_ROW_ALIGNMENT,
};
pub use crate::pipeline::driver::{
    RenderOpts, RenderStats, render_sequence, run_pipeline, run_pipeline_with,
};
pub use crate::render::sprite::{MARKER_BYTE, render_ball, shade, shade_at};
