//! Flow control for the headless frame loop.
//!
//! A run builds one [`Scene`] and drives it for a fixed number of frames. Each
//! frame is recorded by a [`DrawRecorder`], which is the data an instancing
//! renderer would upload.
//!
//! # Lifecycle Flow
//!
//! 1. Initialize logging
//! 2. Build the scene (terrain, controllers, optional assets)
//! 3. For every frame: advance the clock, draw the scene, log batch statistics
//! 4. Return the [`RunStats`] of the run

use instant::{Duration, Instant};
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    render::DrawRecorder,
    scene::{Scene, SceneConfig},
};

/// Monotonic clock measuring seconds since it was started.
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn seconds(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::start()
    }
}

/// Where frame times come from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Clock {
    /// Wall clock time since the run started.
    RealTime,
    /// Fixed step in seconds per frame, reproducible across runs.
    Fixed(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    pub frames: usize,
    pub clock: Clock,
    /// Seed of the scene generator. A fresh seed is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frames: 60,
            clock: Clock::Fixed(1.0 / 60.0),
            seed: None,
        }
    }
}

/// Summary of a finished run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunStats {
    pub frames: usize,
    /// Draw calls of the last frame.
    pub draw_calls: usize,
    /// Distinct drawables of the last frame.
    pub batches: usize,
    /// Instance bytes of the last frame.
    pub instance_bytes: usize,
    pub last_time: f32,
}

/// Builds the scene from `config` and draws `options.frames` frames.
pub fn run(config: SceneConfig, options: RunOptions) -> anyhow::Result<RunStats> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let seed = options.seed.unwrap_or_else(rand::random);
    log::info!("Building scene with seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let setup = Timer::start();
    let mut scene = Scene::new(config, &mut rng)?;
    log::info!("Scene built in {:?}", setup.elapsed());

    let mut recorder = DrawRecorder::default();
    let mut stats = RunStats::default();
    let timer = Timer::start();
    for frame in 0..options.frames {
        let time = match options.clock {
            Clock::RealTime => timer.seconds(),
            Clock::Fixed(step) => frame as f32 * step,
        };
        scene.frame(time, &mut recorder)?;
        log::debug!(
            "Frame {} at {:.3}s: {} draw calls in {} batches",
            frame,
            time,
            recorder.calls().len(),
            recorder.batches().len()
        );
        stats.last_time = time;
    }

    stats.frames = recorder.frames();
    stats.draw_calls = recorder.calls().len();
    stats.batches = recorder.batches().len();
    stats.instance_bytes = recorder.instance_bytes();
    log::info!(
        "Drew {} frames in {:?}, last frame {} draw calls, {} instance bytes",
        stats.frames,
        timer.elapsed(),
        stats.draw_calls,
        stats.instance_bytes
    );
    Ok(stats)
}
