use std::io::Cursor;

use crate::assets::decode::argb_to_rgba_in_place;
use crate::encode::encoder::{EncodeParams, EncodedFrame, FrameEncoder};
use crate::foundation::core::PixelFormat;
use crate::foundation::error::{BouncerError, BouncerResult};
use crate::frame::buffer::FrameBuffer;

/// Still-image formats the in-process encoder can write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageCodec {
    /// Portable Network Graphics.
    Png,
    /// Windows bitmap.
    Bmp,
    /// Tagged Image File Format.
    Tiff,
}

impl ImageCodec {
    /// Output file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }
}

/// Encode context backed by the `image` crate.
///
/// Stateless per frame; the context only pins the geometry and keeps a scratch buffer for
/// unpadding rows and reordering ARGB to RGBA.
pub struct ImageEncoder {
    codec: ImageCodec,
    params: EncodeParams,
    scratch: Vec<u8>,
    closed: bool,
}

impl ImageEncoder {
    /// Open a context for frames matching `params`.
    pub fn open(codec: ImageCodec, params: EncodeParams) -> BouncerResult<Self> {
        params.validate()?;
        let len = params.width as usize * params.height as usize * params.format.bytes_per_pixel();
        Ok(Self {
            codec,
            params,
            scratch: Vec::with_capacity(len),
            closed: false,
        })
    }
}

impl FrameEncoder for ImageEncoder {
    fn encode(&mut self, frame: &FrameBuffer) -> BouncerResult<EncodedFrame> {
        if self.closed {
            return Err(BouncerError::encode("image encoder is already closed"));
        }
        self.params.check_frame(frame)?;

        frame.write_packed(&mut self.scratch);
        let color = match self.params.format {
            PixelFormat::Gray8 => image::ExtendedColorType::L8,
            PixelFormat::Argb8 => {
                argb_to_rgba_in_place(&mut self.scratch);
                image::ExtendedColorType::Rgba8
            }
        };

        let mut out = Cursor::new(Vec::new());
        image::write_buffer_with_format(
            &mut out,
            &self.scratch,
            self.params.width,
            self.params.height,
            color,
            self.codec.image_format(),
        )
        .map_err(|e| {
            BouncerError::encode(format!("{} encode failed: {e}", self.codec.extension()))
        })?;
        Ok(EncodedFrame::packet(out.into_inner()))
    }

    fn close(&mut self) -> BouncerResult<()> {
        self.closed = true;
        self.scratch = Vec::new();
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/still.rs"]
mod tests;
