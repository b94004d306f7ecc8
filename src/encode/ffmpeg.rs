use std::io::{Read, Write as _};
use std::process::{Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::encoder::{EncodeParams, EncodedFrame, FrameEncoder};
use crate::foundation::error::{BouncerError, BouncerResult};
use crate::frame::buffer::FrameBuffer;

/// Encode context that hands each frame to the system `ffmpeg` binary.
///
/// Every `encode` call runs one `ffmpeg` process: raw frame in on stdin, one encoded image out on
/// stdout. ffmpeg keeps no state between calls, so the context only pins the codec, geometry and
/// a scratch buffer.
pub struct FfmpegEncoder {
    codec: String,
    params: EncodeParams,
    scratch: Vec<u8>,
    closed: bool,
}

impl FfmpegEncoder {
    /// Open a context; fails when `ffmpeg` is not on `PATH`.
    pub fn open(codec: &str, params: EncodeParams) -> BouncerResult<Self> {
        params.validate()?;
        if codec.is_empty() || codec.starts_with('-') {
            return Err(BouncerError::validation(format!(
                "invalid ffmpeg codec name '{codec}'"
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(BouncerError::encode(
                "ffmpeg is required for the ffmpeg encoder, but was not found on PATH",
            ));
        }
        Ok(Self {
            codec: codec.to_string(),
            params,
            scratch: Vec::new(),
            closed: false,
        })
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            self.params.format.ffmpeg_name(),
            "-s",
            &format!("{}x{}", self.params.width, self.params.height),
            "-i",
            "pipe:0",
            "-frames:v",
            "1",
            "-c:v",
            &self.codec,
            "-f",
            "image2pipe",
            "pipe:1",
        ]);
        cmd
    }
}

impl FrameEncoder for FfmpegEncoder {
    fn encode(&mut self, frame: &FrameBuffer) -> BouncerResult<EncodedFrame> {
        if self.closed {
            return Err(BouncerError::encode("ffmpeg encoder is already closed"));
        }
        self.params.check_frame(frame)?;
        frame.write_packed(&mut self.scratch);

        let mut child = self.command().spawn().map_err(|e| {
            BouncerError::encode(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| BouncerError::encode("failed to open ffmpeg stdin (unexpected)"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BouncerError::encode("failed to open ffmpeg stdout (unexpected)"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BouncerError::encode("failed to open ffmpeg stderr (unexpected)"))?;
        let stdout_drain = drain(stdout);
        let stderr_drain = drain(stderr);

        let write_result = stdin.write_all(&self.scratch);
        drop(stdin);

        let status = child.wait().map_err(|e| {
            BouncerError::encode(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let packet = join_drain(stdout_drain, "stdout")?;
        let stderr_bytes = join_drain(stderr_drain, "stderr")?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(BouncerError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        write_result.map_err(|e| {
            BouncerError::encode(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;

        Ok(EncodedFrame::packet(packet))
    }

    fn close(&mut self) -> BouncerResult<()> {
        self.closed = true;
        self.scratch = Vec::new();
        Ok(())
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        pipe.read_to_end(&mut bytes)?;
        Ok(bytes)
    })
}

fn join_drain(
    handle: JoinHandle<std::io::Result<Vec<u8>>>,
    name: &str,
) -> BouncerResult<Vec<u8>> {
    handle
        .join()
        .map_err(|_| BouncerError::encode(format!("ffmpeg {name} drain thread panicked")))?
        .map_err(|e| BouncerError::encode(format!("ffmpeg {name} read failed: {e}")))
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
