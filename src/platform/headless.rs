//! Headless platform
//!
//! Runs the full frame loop without a window: a simulated clock, drawing that
//! only records what it was given, and input from a script or a seeded
//! random pilot.

use std::collections::{HashMap, VecDeque};

use glam::{Vec2, Vec4};
use log::info;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::input::{Event, EventQueue, KeyCode};
use super::{Image, Platform, TextureHandle};
use crate::error::PlatformError;
use crate::renderer::{self, RenderFrame};

/// Where headless input comes from
#[derive(Debug, Clone, Default)]
pub enum InputScript {
    /// No input at all
    #[default]
    Idle,
    /// Events keyed by frame number. Events for frame N are delivered by the
    /// poll at the end of frame N and consumed by the following tick.
    Scripted(VecDeque<(u64, Event)>),
    /// Random key presses
    Random(RandomPilot),
}

impl InputScript {
    pub fn scripted(events: impl IntoIterator<Item = (u64, Event)>) -> Self {
        let mut events: Vec<_> = events.into_iter().collect();
        events.sort_by_key(|(frame, _)| *frame);
        InputScript::Scripted(events.into())
    }
}

/// Seeded random driver: wanders between directions and fires now and then.
///
/// Uses its own PCG stream so input never perturbs gameplay randomness.
#[derive(Debug, Clone)]
pub struct RandomPilot {
    rng: Pcg32,
    held: Option<KeyCode>,
    fire_held: bool,
    /// Chance per frame of switching direction
    turn_chance: f64,
    /// Chance per frame of firing
    fire_chance: f64,
}

const DIRECTIONS: [KeyCode; 4] = [KeyCode::Left, KeyCode::Right, KeyCode::Up, KeyCode::Down];

impl RandomPilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            held: None,
            fire_held: false,
            turn_chance: 0.1,
            fire_chance: 0.08,
        }
    }

    /// Override the per-frame turn and fire chances, clamped into [0,1]
    pub fn with_chances(mut self, turn: f64, fire: f64) -> Self {
        self.turn_chance = probability(turn);
        self.fire_chance = probability(fire);
        self
    }

    pub fn chances(&self) -> (f64, f64) {
        (self.turn_chance, self.fire_chance)
    }

    fn emit(&mut self, events: &mut EventQueue) {
        if self.fire_held {
            events.push(Event::release(KeyCode::Fire));
            self.fire_held = false;
        }

        if self.rng.random_bool(self.turn_chance) {
            if let Some(key) = self.held.take() {
                events.push(Event::release(key));
            }
            // Occasionally coast with nothing held
            if self.rng.random_bool(0.75) {
                let key = DIRECTIONS[self.rng.random_range(0..DIRECTIONS.len())];
                events.push(Event::press(key));
                self.held = Some(key);
            }
        }

        if self.rng.random_bool(self.fire_chance) {
            events.push(Event::press(KeyCode::Fire));
            self.fire_held = true;
        }
    }
}

fn probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

/// What the headless "screen" last saw
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessStats {
    pub frames_presented: u64,
    pub last_quad_count: usize,
    /// Size of the last instance buffer upload
    pub last_upload_bytes: usize,
    /// Background corners of the last frame
    pub last_background: [(Vec2, Vec4); 4],
    pub last_clear: Vec4,
}

#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    clock: f64,
    /// Simulated render time added on each present
    frame_cost: f64,
    window: Option<(u32, u32)>,
    images: HashMap<String, Image>,
    textures: Vec<(u32, u32)>,
    script: InputScript,
    polls: u64,
    quit_after: Option<u64>,
    pub stats: HeadlessStats,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self {
            clock: 0.0,
            frame_cost: 1.0 / 60.0,
            window: None,
            images: HashMap::new(),
            textures: Vec::new(),
            script: InputScript::Idle,
            polls: 0,
            quit_after: None,
            stats: HeadlessStats::default(),
        }
    }

    pub fn with_script(mut self, script: InputScript) -> Self {
        self.script = script;
        self
    }

    pub fn with_frame_cost(mut self, seconds: f64) -> Self {
        self.frame_cost = seconds;
        self
    }

    pub fn with_image(mut self, path: &str, image: Image) -> Self {
        self.register_image(path, image);
        self
    }

    /// Report an OS exit request from the poll after `frames` frames
    pub fn with_quit_after(mut self, frames: u64) -> Self {
        self.quit_after = Some(frames);
        self
    }

    /// Make `path` loadable
    pub fn register_image(&mut self, path: &str, image: Image) {
        self.images.insert(path.to_string(), image);
    }

    pub fn window(&self) -> Option<(u32, u32)> {
        self.window
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl Platform for HeadlessPlatform {
    fn create_window(&mut self, width: u32, height: u32) -> Result<(), PlatformError> {
        if width == 0 || height == 0 {
            return Err(PlatformError::WindowCreation(format!(
                "invalid size {width}x{height}"
            )));
        }
        info!("Headless window {width}x{height}");
        self.window = Some((width, height));
        Ok(())
    }

    fn clear_frame(&mut self, color: Vec4) {
        self.stats.last_clear = color;
    }

    fn draw_frame(&mut self, frame: &RenderFrame) {
        let instances = frame.instances();
        self.stats.last_quad_count = instances.len();
        self.stats.last_upload_bytes = renderer::as_bytes(&instances).len();
        self.stats.last_background = frame.background();
    }

    fn present_frame(&mut self) {
        self.stats.frames_presented += 1;
        self.clock += self.frame_cost;
    }

    fn poll_platform_events(&mut self, events: &mut EventQueue) -> bool {
        let frame = self.polls;
        self.polls += 1;

        match &mut self.script {
            InputScript::Idle => {}
            InputScript::Scripted(pending) => {
                while pending.front().is_some_and(|(at, _)| *at <= frame) {
                    if let Some((_, event)) = pending.pop_front() {
                        events.push(event);
                    }
                }
            }
            InputScript::Random(pilot) => pilot.emit(events),
        }

        self.quit_after.is_some_and(|limit| self.polls >= limit)
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.clock += ms as f64 / 1000.0;
    }

    fn now_seconds(&self) -> f64 {
        self.clock
    }

    fn load_image(&mut self, path: &str) -> Result<Image, PlatformError> {
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| PlatformError::ImageLoad {
                path: path.to_string(),
                reason: "not found".to_string(),
            })
    }

    fn upload_texture(&mut self, image: &Image) -> TextureHandle {
        self.textures.push((image.width, image.height));
        TextureHandle(self.textures.len() as u32 - 1)
    }
}
