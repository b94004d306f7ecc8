use std::path::Path;

use crate::foundation::core::PixelFormat;
use crate::foundation::error::{BouncerError, BouncerResult};
use crate::frame::buffer::FrameBuffer;

/// Check that `path` ends in one of the `accepted` extensions (case-insensitive, without the dot).
pub fn validate_input_extension(path: &Path, accepted: &[String]) -> BouncerResult<()> {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return Err(BouncerError::usage(format!(
            "'{}' has no file extension; expected one of: {}",
            path.display(),
            accepted.join(", ")
        )));
    };
    if accepted
        .iter()
        .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(ext))
    {
        return Ok(());
    }
    Err(BouncerError::usage(format!(
        "'{}' has unsupported extension '.{ext}'; expected one of: {}",
        path.display(),
        accepted.join(", ")
    )))
}

/// Decode the still image at `path` into a base frame in `format`.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn decode_image(
    path: &Path,
    format: PixelFormat,
    row_alignment: usize,
) -> BouncerResult<FrameBuffer> {
    let bytes = std::fs::read(path)
        .map_err(|e| BouncerError::decode(format!("read '{}': {e}", path.display())))?;
    let frame = decode_image_bytes(&bytes, format, row_alignment)?;
    tracing::info!(
        width = frame.width(),
        height = frame.height(),
        stride = frame.stride(),
        "decoded base frame"
    );
    Ok(frame)
}

/// Decode encoded image bytes into a frame in `format`.
///
/// `Argb8` frames carry the source alpha in the leading byte (255 for opaque formats such as JPEG).
pub fn decode_image_bytes(
    bytes: &[u8],
    format: PixelFormat,
    row_alignment: usize,
) -> BouncerResult<FrameBuffer> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| BouncerError::decode(format!("decode image from memory: {e}")))?;
    let (width, height) = (dyn_img.width(), dyn_img.height());

    let packed = match format {
        PixelFormat::Gray8 => dyn_img.to_luma8().into_raw(),
        PixelFormat::Argb8 => {
            let mut argb = dyn_img.to_rgba8().into_raw();
            rgba_to_argb_in_place(&mut argb);
            argb
        }
    };
    FrameBuffer::from_packed(width, height, format, &packed, row_alignment)
}

fn rgba_to_argb_in_place(px: &mut [u8]) {
    for p in px.chunks_exact_mut(4) {
        p.rotate_right(1);
    }
}

/// Inverse of the ARGB packing: turn packed ARGB8 rows back into RGBA8.
pub(crate) fn argb_to_rgba_in_place(px: &mut [u8]) {
    for p in px.chunks_exact_mut(4) {
        p.rotate_left(1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
