//! Cooperative frame loop
//!
//! One thread runs clear, simulate, render, present, sleep, poll until the
//! game asks to quit or the optional frame limit is reached.

use log::{info, trace};
use serde::Serialize;

use crate::error::PlatformError;
use crate::platform::{Event, EventQueue, Platform, Sprites};
use crate::renderer::{RenderFrame, colors};
use crate::sim::{GameState, TickOutcome, tick};
use crate::tuning::Tuning;

/// Counters reported when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub shots_fired: u32,
    pub invaders_destroyed: u32,
    pub frames: u64,
    /// Input events lost to a full queue
    pub dropped_events: u64,
}

/// Turns wall-clock readings into simulation steps
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: f64,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(now: f64, max_dt: f32) -> Self {
        Self { last: now, max_dt }
    }

    /// Seconds since the previous call, clamped to `max_dt` when positive
    pub fn delta(&mut self, now: f64) -> f32 {
        let dt = (now - self.last).max(0.0) as f32;
        self.last = now;
        if self.max_dt > 0.0 && dt > self.max_dt {
            trace!("frame dt {dt:.3}s clamped to {:.3}s", self.max_dt);
            self.max_dt
        } else {
            dt
        }
    }
}

/// Run a session on `platform` until quit, or for at most `max_frames` frames
pub fn run<P: Platform + ?Sized>(
    platform: &mut P,
    tuning: &Tuning,
    max_frames: Option<u64>,
) -> Result<SessionStats, PlatformError> {
    platform.create_window(tuning.window_width, tuning.window_height)?;
    info!(
        "Window {}x{} created",
        tuning.window_width, tuning.window_height
    );

    let sprites = Sprites::load(platform);

    let mut state = GameState::new(tuning.clone());
    state.admit_invaders();
    info!(
        "Session started with seed {:#x}, {} invaders",
        tuning.seed,
        state.invaders.len()
    );

    let mut events = EventQueue::default();
    let mut clock = FrameClock::new(platform.now_seconds(), tuning.max_frame_dt);
    let mut frames = 0u64;

    loop {
        if max_frames.is_some_and(|limit| frames >= limit) {
            info!("Frame limit of {frames} reached");
            break;
        }

        platform.clear_frame(colors::CLEAR);

        let dt = clock.delta(platform.now_seconds());
        if tick(&mut state, &mut events, dt) == TickOutcome::Quit {
            break;
        }

        let frame = RenderFrame::capture(&state, &sprites);
        platform.draw_frame(&frame);
        platform.present_frame();
        frames += 1;

        platform.sleep_ms(tuning.frame_sleep_ms);

        // A full queue must not swallow the OS exit request
        if platform.poll_platform_events(&mut events) && !events.push(Event::Quit) {
            info!("Exit requested with a full event queue");
            break;
        }
    }

    let stats = SessionStats {
        shots_fired: state.shots_fired,
        invaders_destroyed: state.invaders_destroyed,
        frames,
        dropped_events: events.dropped(),
    };
    info!(
        "Session ended after {} frames: {} shots, {} invaders destroyed",
        stats.frames, stats.shots_fired, stats.invaders_destroyed
    );
    Ok(stats)
}
