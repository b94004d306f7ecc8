use crate::foundation::core::PixelFormat;
use crate::foundation::error::{BouncerError, BouncerResult};

/// An owned pixel raster plus its geometry.
///
/// Rows are `stride` bytes apart; `stride` may exceed `width * bytes_per_pixel` when rows are
/// padded to an alignment. Padding bytes carry no meaning and are stripped by [`Self::to_packed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    stride: usize,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate a zeroed frame whose rows are padded to a multiple of `row_alignment` bytes.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        row_alignment: usize,
    ) -> BouncerResult<Self> {
        if width == 0 || height == 0 {
            return Err(BouncerError::validation(
                "frame width/height must be non-zero",
            ));
        }
        if row_alignment == 0 {
            return Err(BouncerError::validation("row alignment must be non-zero"));
        }
        let row_bytes = width as usize * format.bytes_per_pixel();
        let stride = row_bytes
            .div_ceil(row_alignment)
            .checked_mul(row_alignment)
            .ok_or_else(|| {
                BouncerError::validation(format!(
                    "row alignment {row_alignment} overflows the row size"
                ))
            })?;
        let len = buffer_len(stride, height)?;
        Ok(Self {
            width,
            height,
            format,
            stride,
            pixels: vec![0u8; len],
        })
    }

    /// Wrap an existing buffer with an explicit stride.
    pub fn with_stride(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
        pixels: Vec<u8>,
    ) -> BouncerResult<Self> {
        if width == 0 || height == 0 {
            return Err(BouncerError::validation(
                "frame width/height must be non-zero",
            ));
        }
        let row_bytes = width as usize * format.bytes_per_pixel();
        if stride < row_bytes {
            return Err(BouncerError::validation(format!(
                "stride {stride} is smaller than row size {row_bytes}"
            )));
        }
        let len = buffer_len(stride, height)?;
        if pixels.len() != len {
            return Err(BouncerError::validation(format!(
                "pixel buffer holds {} bytes, expected stride*height = {len}",
                pixels.len(),
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            stride,
            pixels,
        })
    }

    /// Copy tightly packed rows into a frame padded to `row_alignment`.
    pub fn from_packed(
        width: u32,
        height: u32,
        format: PixelFormat,
        packed: &[u8],
        row_alignment: usize,
    ) -> BouncerResult<Self> {
        let mut frame = Self::new(width, height, format, row_alignment)?;
        let row_bytes = frame.row_bytes();
        if packed.len() != row_bytes * height as usize {
            return Err(BouncerError::validation(format!(
                "packed buffer holds {} bytes, expected {}",
                packed.len(),
                row_bytes * height as usize
            )));
        }
        for (y, src) in packed.chunks_exact(row_bytes).enumerate() {
            let start = y * frame.stride;
            frame.pixels[start..start + row_bytes].copy_from_slice(src);
        }
        Ok(frame)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Bytes per pixel of [`Self::format`].
    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    /// Bytes between the starts of consecutive rows.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Meaningful bytes per row (`width * bytes_per_pixel`).
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }

    /// Raw storage including row padding.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw storage including row padding.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride + x as usize * self.bytes_per_pixel()
    }

    /// Bytes of pixel `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = self.offset(x, y);
        Some(&self.pixels[at..at + self.bytes_per_pixel()])
    }

    /// Mutable bytes of pixel `(x, y)`, or `None` when out of bounds.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = self.offset(x, y);
        let bpp = self.bytes_per_pixel();
        Some(&mut self.pixels[at..at + bpp])
    }

    /// Meaningful bytes of row `y` (padding excluded).
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.stride;
        Some(&self.pixels[start..start + self.row_bytes()])
    }

    /// Copy the pixels into `dst` as tightly packed rows.
    pub fn write_packed(&self, dst: &mut Vec<u8>) {
        dst.clear();
        dst.reserve(self.row_bytes() * self.height as usize);
        for row in self.pixels.chunks_exact(self.stride) {
            dst.extend_from_slice(&row[..self.row_bytes()]);
        }
    }

    /// Tightly packed copy of the pixels.
    pub fn to_packed(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_packed(&mut out);
        out
    }
}

fn buffer_len(stride: usize, height: u32) -> BouncerResult<usize> {
    stride.checked_mul(height as usize).ok_or_else(|| {
        BouncerError::validation(format!(
            "frame of {height} rows with stride {stride} does not fit in memory"
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/frame/buffer.rs"]
mod tests;
