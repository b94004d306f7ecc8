use crate::foundation::error::{BouncerError, BouncerResult};

/// Zero-based index of a frame in the output sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open range of frame indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// First frame (inclusive).
    pub start: FrameIndex,
    /// One past the last frame.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> BouncerResult<Self> {
        if start.0 > end.0 {
            return Err(BouncerError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Range `0..count`.
    pub fn first(count: u64) -> Self {
        Self {
            start: FrameIndex(0),
            end: FrameIndex(count),
        }
    }

    /// Number of frames covered.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Whether the range covers no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Whether `f` lies inside the range.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    /// Iterate the indices in order.
    pub fn iter(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

/// Pixel layout of a [`crate::FrameBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// One luma byte per pixel.
    Gray8,
    /// Four bytes per pixel: a leading alpha/marker byte followed by R, G, B.
    Argb8,
}

impl PixelFormat {
    /// Bytes occupied by one pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Argb8 => 4,
        }
    }

    /// Name of the matching `ffmpeg` rawvideo pixel format.
    pub fn ffmpeg_name(self) -> &'static str {
        match self {
            Self::Gray8 => "gray",
            Self::Argb8 => "argb",
        }
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gray8 => f.write_str("gray8"),
            Self::Argb8 => f.write_str("argb8"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
