use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "bouncer",
    version,
    about = "Render a bouncing ball over a still image as a numbered frame sequence"
)]
struct Cli {
    /// Source still image (JPEG by default).
    input: PathBuf,

    /// Directory the frames are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Number of frames to render (overrides the config file).
    #[arg(long)]
    frames: Option<u64>,

    /// Encoder backend.
    #[arg(long, value_enum, default_value_t = EncoderChoice::Image)]
    encoder: EncoderChoice,

    /// Still-image format for the `image` encoder.
    #[arg(long, value_enum, default_value_t = CodecChoice::Png)]
    codec: CodecChoice,

    /// ffmpeg codec name for the `ffmpeg` encoder (requires `ffmpeg` on PATH).
    #[arg(long, default_value = "png")]
    ffmpeg_codec: String,

    /// Pixel layout override; defaults to the encoder's preferred layout.
    #[arg(long, value_enum)]
    pixel_format: Option<FormatChoice>,

    /// JSON sequence configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Render and encode frames on a worker pool.
    #[arg(long)]
    parallel: bool,

    /// Worker count for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,

    /// Log per-frame detail.
    #[arg(long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EncoderChoice {
    Image,
    Ffmpeg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodecChoice {
    Png,
    Bmp,
    Tiff,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Gray8,
    Argb8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mut cfg = match &cli.config {
        Some(path) => bouncer::BounceConfig::from_json_path(path)?,
        None => bouncer::BounceConfig::default(),
    };
    if let Some(frames) = cli.frames {
        cfg.total_frames = frames;
    }

    let opts = bouncer::RenderOpts {
        out_dir: cli.out_dir.clone(),
        encoder: make_encoder(&cli),
        pixel_format: cli.pixel_format.map(|f| match f {
            FormatChoice::Gray8 => bouncer::PixelFormat::Gray8,
            FormatChoice::Argb8 => bouncer::PixelFormat::Argb8,
        }),
        parallel: cli.parallel,
        threads: cli.threads,
    };

    let stats = bouncer::run_pipeline(&cli.input, &cfg, &opts)?;
    eprintln!(
        "wrote {} of {} frames to {}",
        stats.frames_written,
        stats.frames_total,
        opts.out_dir.display()
    );
    Ok(())
}

fn make_encoder(cli: &Cli) -> bouncer::EncoderKind {
    match cli.encoder {
        EncoderChoice::Image => bouncer::EncoderKind::Image(match cli.codec {
            CodecChoice::Png => bouncer::ImageCodec::Png,
            CodecChoice::Bmp => bouncer::ImageCodec::Bmp,
            CodecChoice::Tiff => bouncer::ImageCodec::Tiff,
        }),
        EncoderChoice::Ffmpeg => bouncer::EncoderKind::Ffmpeg {
            codec: cli.ffmpeg_codec.clone(),
        },
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
