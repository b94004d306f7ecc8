use crate::encode::ffmpeg::FfmpegEncoder;
use crate::encode::still::{ImageCodec, ImageEncoder};
use crate::foundation::core::PixelFormat;
use crate::foundation::error::{BouncerError, BouncerResult};
use crate::frame::buffer::FrameBuffer;

/// Payload produced by one encode call.
///
/// An invalid frame carries no payload and must not be written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodedFrame {
    /// Encoded bytes, written verbatim to the output file.
    pub bytes: Vec<u8>,
    /// Whether the encoder produced a usable packet.
    pub valid: bool,
}

impl EncodedFrame {
    /// Wrap a packet; an empty packet is treated as invalid.
    pub fn packet(bytes: Vec<u8>) -> Self {
        let valid = !bytes.is_empty();
        Self { bytes, valid }
    }

    /// A result with no packet.
    pub fn invalid() -> Self {
        Self::default()
    }
}

/// Fixed parameters an encode context is opened with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeParams {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel layout every frame must arrive in.
    pub format: PixelFormat,
}

impl EncodeParams {
    /// Reject zero-sized geometry.
    pub fn validate(&self) -> BouncerResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(BouncerError::validation(
                "encode width/height must be non-zero",
            ));
        }
        Ok(())
    }

    /// Fail unless `frame` matches these parameters.
    pub fn check_frame(&self, frame: &FrameBuffer) -> BouncerResult<()> {
        if frame.width() != self.width || frame.height() != self.height {
            return Err(BouncerError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                self.width,
                self.height
            )));
        }
        if frame.format() != self.format {
            return Err(BouncerError::encode(format!(
                "pixel format mismatch: got {}, expected {}",
                frame.format(),
                self.format
            )));
        }
        Ok(())
    }
}

/// An open encode context.
///
/// Opened once with fixed [`EncodeParams`] and reused for every frame of a run. Contexts are not
/// shared between threads; parallel runs open one per rayon job and close it when the job ends.
pub trait FrameEncoder: Send {
    /// Encode one frame. `Err` and invalid results both mean "skip this frame".
    fn encode(&mut self, frame: &FrameBuffer) -> BouncerResult<EncodedFrame>;

    /// Release the context. Further `encode` calls fail.
    fn close(&mut self) -> BouncerResult<()> {
        Ok(())
    }
}

/// Opens encode contexts and describes what they produce.
pub trait EncoderFactory: Sync {
    /// Supported pixel layouts, preferred first.
    fn pixel_formats(&self) -> &[PixelFormat];

    /// Output file extension (without the dot).
    fn extension(&self) -> &str;

    /// Open a fresh encode context.
    fn open(&self, params: EncodeParams) -> BouncerResult<Box<dyn FrameEncoder>>;

    /// Pick the pixel layout for a run: `requested` when supported, else the preferred one.
    fn negotiate(&self, requested: Option<PixelFormat>) -> BouncerResult<PixelFormat> {
        let formats = self.pixel_formats();
        match requested {
            Some(f) if formats.contains(&f) => Ok(f),
            Some(f) => Err(BouncerError::validation(format!(
                "encoder does not accept pixel format {f}"
            ))),
            None => formats
                .first()
                .copied()
                .ok_or_else(|| BouncerError::encode("encoder advertises no pixel formats")),
        }
    }
}

/// Built-in encoders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncoderKind {
    /// In-process still-image encoding via the `image` crate.
    Image(ImageCodec),
    /// The system `ffmpeg` binary with the named video codec (e.g. `png`, `bmp`, `mjpeg`).
    Ffmpeg {
        /// ffmpeg encoder name passed to `-c:v`.
        codec: String,
    },
}

impl Default for EncoderKind {
    fn default() -> Self {
        Self::Image(ImageCodec::Png)
    }
}

const ALL_FORMATS: [PixelFormat; 2] = [PixelFormat::Argb8, PixelFormat::Gray8];

impl EncoderFactory for EncoderKind {
    fn pixel_formats(&self) -> &[PixelFormat] {
        &ALL_FORMATS
    }

    fn extension(&self) -> &str {
        match self {
            Self::Image(codec) => codec.extension(),
            Self::Ffmpeg { codec } => ffmpeg_extension(codec),
        }
    }

    fn open(&self, params: EncodeParams) -> BouncerResult<Box<dyn FrameEncoder>> {
        match self {
            Self::Image(codec) => Ok(Box::new(ImageEncoder::open(*codec, params)?)),
            Self::Ffmpeg { codec } => Ok(Box::new(FfmpegEncoder::open(codec, params)?)),
        }
    }
}

/// File extension for an ffmpeg still-image codec.
pub fn ffmpeg_extension(codec: &str) -> &str {
    match codec {
        "mjpeg" | "jpegls" => "jpg",
        "apng" => "png",
        "libwebp" => "webp",
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;
