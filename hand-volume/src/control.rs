use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};

use crate::capture::CaptureSource;
use crate::classifier::{FingerCount, GestureClassifier, Outcome, Stage};
use crate::frame::Frame;
use crate::output::LevelMapper;

/// Abort after this many capture failures in a row.
pub const MAX_CONSECUTIVE_CAPTURE_FAILURES: u32 = 30;

/// Log rolling statistics every this many frames.
const STATS_INTERVAL: u64 = 30;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoopStats {
    pub frames: u64,
    /// Frames that ended with zero fingers because of a rejection or an empty scene.
    pub degraded: u64,
    pub classify_time: Duration,
}

impl LoopStats {
    pub fn average_classify_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.classify_time.as_secs_f64() * 1000.0 / self.frames as f64
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Target frames per second; 0 disables rate limiting.
    pub fps: u32,
    /// Stop after this many classified frames.
    pub max_frames: Option<u64>,
    /// Stop when this flag is raised.
    pub stop: Option<Arc<AtomicBool>>,
}

/// Runs one classification cycle per delivered frame.
///
/// Cycles go `Idle -> Preprocessing -> Selecting -> Analyzing -> Counting ->
/// Mapping -> Idle`; any early exit jumps straight to `Mapping` with zero
/// fingers so the level falls when the hand leaves the frame. `&mut self`
/// guarantees one cycle at a time, and no per-frame data outlives its cycle.
#[derive(Debug)]
pub struct FrameLoop {
    classifier: GestureClassifier,
    mapper: LevelMapper,
    stage: Stage,
    last_cycle: Vec<Stage>,
    last_level: u32,
    stats: LoopStats,
}

impl FrameLoop {
    pub fn new(classifier: GestureClassifier, mapper: LevelMapper) -> Self {
        Self {
            classifier,
            mapper,
            stage: Stage::Idle,
            last_cycle: Vec::new(),
            last_level: 0,
            stats: LoopStats::default(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Stages visited by the most recent cycle, ending with `Idle`.
    pub fn last_cycle(&self) -> &[Stage] {
        &self.last_cycle
    }

    /// Level computed by the most recent cycle.
    pub fn last_level(&self) -> u32 {
        self.last_level
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    /// Classify one frame and post the resulting level.
    pub fn on_frame(&mut self, frame: &Frame) -> FingerCount {
        let started = Instant::now();
        self.last_cycle.clear();

        let Self {
            classifier,
            stage,
            last_cycle,
            ..
        } = &mut *self;
        let classification = classifier.classify_with(frame, |next| {
            *stage = next;
            last_cycle.push(next);
        });

        self.enter(Stage::Mapping);
        let level = self.mapper.apply(classification.fingers);
        self.last_level = level;
        self.enter(Stage::Idle);

        self.stats.frames += 1;
        self.stats.classify_time += started.elapsed();
        if !matches!(classification.outcome, Outcome::Counted { .. }) {
            self.stats.degraded += 1;
        }

        tracing::trace!(
            "Frame {}: {} fingers -> level {} ({:?})",
            self.stats.frames,
            classification.fingers,
            level,
            classification.outcome
        );

        classification.fingers
    }

    fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        self.last_cycle.push(stage);
    }

    /// Pull frames from `capture` until stopped, rate-limited to `options.fps`.
    ///
    /// A failed capture skips that frame; too many in a row ends the run.
    pub fn run<C: CaptureSource>(&mut self, capture: &mut C, options: &RunOptions) -> Result<()> {
        let frame_duration = (options.fps > 0)
            .then(|| Duration::from_secs_f64(1.0 / f64::from(options.fps)));
        let mut failures = 0u32;
        let mut classified = 0u64;

        tracing::info!("Starting frame loop");

        loop {
            if options
                .stop
                .as_ref()
                .is_some_and(|stop| stop.load(Ordering::Relaxed))
            {
                tracing::info!("Stop requested");
                break;
            }
            if options.max_frames.is_some_and(|max| classified >= max) {
                tracing::info!("Reached frame limit of {}", classified);
                break;
            }

            let loop_start = Instant::now();

            let frame = match capture.capture_frame() {
                Ok(frame) => {
                    failures = 0;
                    frame
                }
                Err(e) => {
                    failures += 1;
                    tracing::warn!("Skipping frame: {:#}", e);
                    if failures >= MAX_CONSECUTIVE_CAPTURE_FAILURES {
                        bail!("{} consecutive capture failures, giving up", failures);
                    }
                    continue;
                }
            };

            self.on_frame(&frame);
            classified += 1;

            if self.stats.frames % STATS_INTERVAL == 0 {
                tracing::info!(
                    "Frame {}: classify={:.1}ms, degraded={}, level={}/{}",
                    self.stats.frames,
                    self.stats.average_classify_ms(),
                    self.stats.degraded,
                    self.last_level,
                    self.mapper.max_level()
                );
            }

            if let Some(frame_duration) = frame_duration {
                let elapsed = loop_start.elapsed();
                if elapsed < frame_duration {
                    std::thread::sleep(frame_duration - elapsed);
                }
            }
        }

        Ok(())
    }
}
