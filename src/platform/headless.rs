//! Headless frame scheduling
//!
//! `ManualFrames` records frame requests instead of handing them to a display;
//! `HeadlessDriver` fires them against a virtual clock.

use crate::animation::{FrameHandle, FrameScheduler};
use crate::game::Game;
use crate::settings::Settings;

/// Frame scheduler with at most one outstanding frame, fired by hand
#[derive(Debug, Clone, Default)]
pub struct ManualFrames {
    next_id: i32,
    pending: Option<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the outstanding frame, as if the display fired it
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Frames requested so far
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Frames cancelled before they fired
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        self.requested += 1;
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

/// Runs a game against a virtual clock, one frame every `frame_interval_ms`
#[derive(Debug, Clone)]
pub struct HeadlessDriver {
    frames: ManualFrames,
    now: f64,
    frame_interval_ms: f64,
    max_frames: u64,
    frames_run: u64,
}

impl HeadlessDriver {
    pub fn new(settings: &Settings) -> Self {
        Self {
            frames: ManualFrames::new(),
            now: 0.0,
            frame_interval_ms: settings.frame_interval_ms,
            max_frames: settings.max_frames,
            frames_run: 0,
        }
    }

    /// Current virtual time (ms)
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    pub fn frames(&self) -> &ManualFrames {
        &self.frames
    }

    /// Let time pass without rendering (e.g. while paused)
    pub fn advance(&mut self, ms: f64) {
        self.now += ms;
    }

    pub fn start(&mut self, game: &mut Game) {
        game.start(self.now, &mut self.frames);
    }

    pub fn pause(&mut self, game: &mut Game) {
        game.pause(self.now, &mut self.frames);
    }

    pub fn reset(&mut self, game: &mut Game) {
        game.reset(&mut self.frames);
    }

    /// Fire the outstanding frame, if any. Returns false when nothing was scheduled.
    pub fn step(&mut self, game: &mut Game) -> bool {
        let Some(handle) = self.frames.take_pending() else {
            return false;
        };
        self.now += self.frame_interval_ms;
        self.frames_run += 1;
        game.on_animation_frame(handle, self.now, &mut self.frames);
        true
    }

    /// Fire frames until the animation chain stops or `max_frames` is reached.
    /// Returns the number of frames fired.
    pub fn run(&mut self, game: &mut Game) -> u64 {
        let start = self.frames_run;
        while self.frames_run < self.max_frames && self.step(game) {}
        if self.frames.pending().is_some() {
            log::warn!("Headless run stopped at the {} frame cap", self.max_frames);
        }
        self.frames_run - start
    }

    /// Fire up to `count` frames
    pub fn run_frames(&mut self, game: &mut Game, count: u64) -> u64 {
        let mut fired = 0;
        while fired < count && self.step(game) {
            fired += 1;
        }
        fired
    }
}
