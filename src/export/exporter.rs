use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::encoder::FrameEncoder;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::BouncerResult;
use crate::frame::buffer::FrameBuffer;

/// What happened to one frame on its way to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The payload was written.
    Written {
        /// Output file path.
        path: PathBuf,
        /// Payload size in bytes.
        bytes: usize,
    },
    /// The encoder failed or produced no packet; nothing was written.
    EncodeSkipped,
    /// Encoding succeeded but the file could not be written.
    WriteFailed,
}

/// Output file name for frame `index`: `<stem><index:03>.<ext>`.
pub fn frame_file_name(stem: &str, index: FrameIndex, ext: &str) -> String {
    format!("{stem}{:03}.{ext}", index.0)
}

/// Encode `frame` and write the payload to `out_dir/<stem><index:03>.<ext>`.
///
/// Per-frame failures are logged and reported through the outcome; they never abort the run.
pub fn export_frame(
    encoder: &mut dyn FrameEncoder,
    frame: &FrameBuffer,
    index: FrameIndex,
    out_dir: &Path,
    stem: &str,
    ext: &str,
) -> ExportOutcome {
    let encoded = match encoder.encode(frame) {
        Ok(encoded) if encoded.valid => encoded,
        Ok(_) => {
            tracing::warn!(frame = index.0, "encoder produced no packet; frame skipped");
            return ExportOutcome::EncodeSkipped;
        }
        Err(err) => {
            tracing::warn!(frame = index.0, error = %err, "encode failed; frame skipped");
            return ExportOutcome::EncodeSkipped;
        }
    };

    let path = out_dir.join(frame_file_name(stem, index, ext));
    match write_payload(&path, &encoded.bytes) {
        Ok(()) => {
            tracing::debug!(frame = index.0, path = %path.display(), bytes = encoded.bytes.len(), "frame written");
            ExportOutcome::Written {
                path,
                bytes: encoded.bytes.len(),
            }
        }
        Err(err) => {
            tracing::warn!(frame = index.0, path = %path.display(), error = %err, "write failed; frame skipped");
            ExportOutcome::WriteFailed
        }
    }
}

/// Create or truncate `path` and write `bytes` to it.
///
/// A partially written file is removed before the error is returned.
pub fn write_payload(path: &Path, bytes: &[u8]) -> BouncerResult<()> {
    let result = (|| -> anyhow::Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("create output file '{}'", path.display()))?;
        let mut w = BufWriter::new(file);
        w.write_all(bytes)
            .with_context(|| format!("write output file '{}'", path.display()))?;
        w.flush()
            .with_context(|| format!("flush output file '{}'", path.display()))?;
        Ok(())
    })();
    if result.is_err() && path.is_file() {
        let _ = std::fs::remove_file(path);
    }
    Ok(result?)
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
