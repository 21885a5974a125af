use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hand_volume::capture::{CaptureSource, ImageSequence, WebcamCapture};
use hand_volume::control::RunOptions;
use hand_volume::output::{CommandSink, LogSink, MeterDisplay};
use hand_volume::{
    ClassifierConfig, DisplayContext, FrameLoop, GestureClassifier, LevelDisplay, LevelMapper,
    OutputSink, SharedLevel,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Only log level changes
    Log,
    /// Run a mixer command for every level change
    Command,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input webcam device index
    #[arg(short, long, default_value_t = 0)]
    input_device: u32,

    /// Replay images from this directory instead of opening a webcam
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Capture resolution width
    #[arg(long, default_value_t = 640)]
    capture_width: u32,

    /// Capture resolution height
    #[arg(long, default_value_t = 480)]
    capture_height: u32,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Highest output level (five fingers)
    #[arg(long, default_value_t = 15)]
    max_level: u32,

    /// Where output levels go
    #[arg(long, value_enum, default_value_t = Backend::Log)]
    backend: Backend,

    /// Mixer command for the `command` backend; `{percent}` and `{level}` are substituted
    #[arg(long, default_value = CommandSink::PACTL)]
    volume_command: String,

    /// Gaussian blur sigma applied before thresholding
    #[arg(long, default_value_t = 1.1)]
    blur_sigma: f32,

    /// Intensity cut; darker pixels are treated as the hand
    #[arg(long, default_value_t = 60)]
    threshold: u8,

    /// Minimum contour area in square pixels
    #[arg(long, default_value_t = 100.0)]
    min_area: f64,

    /// Minimum convexity defect depth in pixels
    #[arg(long, default_value_t = 1.0)]
    min_defect_depth: f64,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            blur_sigma: self.blur_sigma,
            threshold: self.threshold,
            min_contour_area: self.min_area,
            min_defect_depth: self.min_defect_depth,
            ..ClassifierConfig::default()
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    tracing::info!("Hand volume starting");
    tracing::info!("Max level: {}", args.max_level);
    tracing::info!("Target FPS: {}", args.fps);

    let config = args.classifier_config();
    tracing::debug!("Classifier config: {:?}", config);

    let display: Box<dyn LevelDisplay + Send> = Box::new(MeterDisplay::default());
    let context = match args.backend {
        Backend::Log => spawn_display(LogSink::new(), display)?,
        Backend::Command => {
            let sink = CommandSink::parse(&args.volume_command)
                .context("Invalid volume command")?;
            spawn_display(sink, display)?
        }
    };

    let mapper = LevelMapper::new(args.max_level, context.poster());
    let mut frame_loop = FrameLoop::new(GestureClassifier::new(config), mapper);

    let options = RunOptions {
        fps: args.fps,
        max_frames: args.max_frames,
        stop: None,
    };

    let result = if let Some(dir) = &args.frames_dir {
        let mut capture = ImageSequence::from_dir(dir).context("Failed to load frames")?;
        run_pipeline(&mut capture, &mut frame_loop, &options)
    } else {
        let mut capture = WebcamCapture::new(
            args.input_device,
            args.capture_width,
            args.capture_height,
        )
        .context("Failed to initialize webcam capture")?;
        run_pipeline(&mut capture, &mut frame_loop, &options)
    };

    drop(frame_loop);
    context.shutdown()?;
    result
}

fn spawn_display<S>(sink: S, display: Box<dyn LevelDisplay + Send>) -> Result<DisplayContext>
where
    S: OutputSink + Send + 'static,
{
    DisplayContext::spawn(sink, Some(display), SharedLevel::default())
        .context("Failed to start display context")
}

fn run_pipeline<C: CaptureSource>(
    capture: &mut C,
    frame_loop: &mut FrameLoop,
    options: &RunOptions,
) -> Result<()> {
    let (width, height) = capture.resolution();
    tracing::info!("Capture: {}x{}", width, height);
    tracing::info!("Press Ctrl+C to stop");

    frame_loop.run(capture, options)?;

    let stats = frame_loop.stats();
    tracing::info!(
        "Processed {} frames ({} without a hand), classify={:.1}ms avg",
        stats.frames,
        stats.degraded,
        stats.average_classify_ms()
    );
    Ok(())
}
