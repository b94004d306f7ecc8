use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::assets::decode::{decode_image, validate_input_extension};
use crate::encode::encoder::{EncodeParams, EncoderFactory, EncoderKind, FrameEncoder};
use crate::export::exporter::{ExportOutcome, export_frame};
use crate::foundation::core::{FrameIndex, FrameRange, PixelFormat};
use crate::foundation::error::{BouncerError, BouncerResult};
use crate::frame::buffer::FrameBuffer;
use crate::physics::ball::BallState;
use crate::pipeline::config::BounceConfig;
use crate::render::sprite::render_ball;

/// Run-time options for [`run_pipeline`].
#[derive(Clone, Debug)]
pub struct RenderOpts {
    /// Directory the frame files are written to (created if missing).
    pub out_dir: PathBuf,
    /// Encoder used for every frame.
    pub encoder: EncoderKind,
    /// Pixel layout override; `None` takes the encoder's preferred layout.
    pub pixel_format: Option<PixelFormat>,
    /// Render and encode frames on a dedicated thread pool.
    pub parallel: bool,
    /// Worker count for parallel mode; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl Default for RenderOpts {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            encoder: EncoderKind::default(),
            pixel_format: None,
            parallel: false,
            threads: None,
        }
    }
}

/// Per-run frame tally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames attempted.
    pub frames_total: u64,
    /// Frames whose payload reached disk.
    pub frames_written: u64,
    /// Frames the encoder failed on or produced nothing for.
    pub frames_encode_skipped: u64,
    /// Frames that encoded but could not be written.
    pub frames_write_failed: u64,
}

impl RenderStats {
    fn record(&mut self, outcome: &ExportOutcome) {
        self.frames_total += 1;
        match outcome {
            ExportOutcome::Written { .. } => self.frames_written += 1,
            ExportOutcome::EncodeSkipped => self.frames_encode_skipped += 1,
            ExportOutcome::WriteFailed => self.frames_write_failed += 1,
        }
    }
}

/// Decode `input`, then render, encode and write the whole frame sequence.
///
/// Fatal: bad configuration, unsupported input extension, undecodable input, an encoder that
/// cannot be opened, an output directory that cannot be created. Everything that goes wrong with
/// an individual frame is logged and counted in the returned [`RenderStats`] instead.
pub fn run_pipeline(
    input: &Path,
    cfg: &BounceConfig,
    opts: &RenderOpts,
) -> BouncerResult<RenderStats> {
    run_pipeline_with(input, cfg, opts, &opts.encoder)
}

/// Like [`run_pipeline`], with a caller-supplied encoder factory in place of `opts.encoder`.
#[tracing::instrument(skip_all, fields(input = %input.display(), out_dir = %opts.out_dir.display()))]
pub fn run_pipeline_with(
    input: &Path,
    cfg: &BounceConfig,
    opts: &RenderOpts,
    factory: &dyn EncoderFactory,
) -> BouncerResult<RenderStats> {
    cfg.validate()?;
    validate_input_extension(input, &cfg.accepted_extensions)?;
    let format = factory.negotiate(opts.pixel_format)?;

    let base = Arc::new(decode_image(input, format, cfg.row_alignment)?);

    std::fs::create_dir_all(&opts.out_dir)
        .with_context(|| format!("create output directory '{}'", opts.out_dir.display()))?;

    tracing::info!(
        frames = cfg.total_frames,
        format = %format,
        ext = factory.extension(),
        parallel = opts.parallel,
        "rendering sequence"
    );
    let stats = render_sequence(&base, cfg, factory, &opts.out_dir, opts.parallel, opts.threads)?;
    tracing::info!(
        written = stats.frames_written,
        total = stats.frames_total,
        encode_skipped = stats.frames_encode_skipped,
        write_failed = stats.frames_write_failed,
        "sequence finished"
    );
    Ok(stats)
}

/// Render `cfg.total_frames` frames over `base` and export them to `out_dir`.
///
/// Frame `n` shows the ball after `n + 1` physics steps. `base` is only ever cloned.
pub fn render_sequence(
    base: &FrameBuffer,
    cfg: &BounceConfig,
    factory: &dyn EncoderFactory,
    out_dir: &Path,
    parallel: bool,
    threads: Option<usize>,
) -> BouncerResult<RenderStats> {
    let initial = BallState::from_geometry(base.width(), base.height(), cfg)?;
    let params = EncodeParams {
        width: base.width(),
        height: base.height(),
        format: base.format(),
    };
    let range = FrameRange::first(cfg.total_frames);
    let ext = factory.extension();
    let stem = cfg.file_stem.as_str();

    let mut stats = RenderStats::default();
    if !parallel {
        let mut encoder = factory.open(params)?;
        let mut state = initial;
        for index in range.iter() {
            state = state.step();
            let frame = compose_frame(base, &state);
            let outcome = export_frame(encoder.as_mut(), &frame, index, out_dir, stem, ext);
            stats.record(&outcome);
        }
        if let Err(err) = encoder.close() {
            tracing::warn!(error = %err, "closing encoder failed");
        }
        return Ok(stats);
    }

    // Surface an unusable encoder as a setup failure rather than one skip per frame.
    factory.open(params)?.close()?;

    let states = initial.trajectory(range.len_frames());
    let pool = build_thread_pool(threads)?;
    let outcomes = pool.install(|| {
        states
            .par_iter()
            .enumerate()
            .map_init(
                || WorkerEncoder(factory.open(params)),
                |worker, (i, state)| {
                    let index = FrameIndex(range.start.0 + i as u64);
                    let frame = compose_frame(base, state);
                    match &mut worker.0 {
                        Ok(encoder) => {
                            export_frame(encoder.as_mut(), &frame, index, out_dir, stem, ext)
                        }
                        Err(err) => {
                            tracing::warn!(frame = index.0, error = %err, "worker encoder unavailable; frame skipped");
                            ExportOutcome::EncodeSkipped
                        }
                    }
                },
            )
            .collect::<Vec<_>>()
    });

    for outcome in &outcomes {
        stats.record(outcome);
    }
    Ok(stats)
}

/// Encode context owned by one rayon job; closed when the job's state is dropped.
struct WorkerEncoder(BouncerResult<Box<dyn FrameEncoder>>);

impl Drop for WorkerEncoder {
    fn drop(&mut self) {
        if let Ok(encoder) = &mut self.0
            && let Err(err) = encoder.close()
        {
            tracing::warn!(error = %err, "closing worker encoder failed");
        }
    }
}

fn compose_frame(base: &FrameBuffer, state: &BallState) -> FrameBuffer {
    let mut frame = base.clone();
    render_ball(&mut frame, state);
    tracing::debug!(x = state.x, y = state.y, "composed frame");
    frame
}

fn build_thread_pool(threads: Option<usize>) -> BouncerResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(BouncerError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BouncerError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/driver.rs"]
mod tests;
