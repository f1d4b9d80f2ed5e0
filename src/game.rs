//! Game session facade
//!
//! Owns the roster, the seeded RNG and the race session, and exposes the
//! commands and queries the presentation layer uses.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::animation::{FrameHandle, FrameScheduler};
use crate::sim::{GamePhase, Horse, Race, RaceEvent, RaceSession, Roster};

/// One player's game: roster, program and race state
#[derive(Debug, Clone)]
pub struct Game {
    seed: u64,
    rng: Pcg32,
    roster: Roster,
    session: RaceSession,
}

impl Game {
    /// Create a game with the given seed; the roster is generated immediately
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut roster = Roster::new();
        roster.initialize(&mut rng);

        Self {
            seed,
            rng,
            roster,
            session: RaceSession::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn session(&self) -> &RaceSession {
        &self.session
    }

    // === Commands ===

    /// Build a new six-race program from the roster
    pub fn generate_program(&mut self) -> bool {
        self.roster.initialize(&mut self.rng);
        self.session
            .generate_program(self.roster.horses(), &mut self.rng)
    }

    /// Start the current round, or resume it after a pause
    pub fn start(&mut self, now: f64, scheduler: &mut dyn FrameScheduler) {
        self.session.start_race(now, &mut self.rng, scheduler);
    }

    pub fn pause(&mut self, now: f64, scheduler: &mut dyn FrameScheduler) {
        self.session.pause_race(now, scheduler);
    }

    /// Back to Idle. The roster is kept.
    pub fn reset(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.session.reset(scheduler);
    }

    /// Drop the roster; the next program is drawn from a freshly generated one
    pub fn reset_roster(&mut self) {
        self.roster.reset();
    }

    /// Forward a fired display frame to the running race
    pub fn on_animation_frame(
        &mut self,
        handle: FrameHandle,
        now: f64,
        scheduler: &mut dyn FrameScheduler,
    ) {
        self.session
            .animation_frame(handle, now, &mut self.rng, scheduler);
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        self.session.drain_events()
    }

    // === Queries ===

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    pub fn can_generate(&self) -> bool {
        self.session.can_generate()
    }

    pub fn can_start(&self) -> bool {
        self.session.can_start()
    }

    pub fn is_racing(&self) -> bool {
        self.session.is_racing()
    }

    pub fn is_paused(&self) -> bool {
        self.session.is_paused()
    }

    pub fn current_race(&self) -> Option<&Race> {
        self.session.current_race()
    }

    pub fn race_program(&self) -> &[Race] {
        self.session.race_program()
    }

    pub fn current_round_index(&self) -> usize {
        self.session.current_round_index()
    }

    pub fn completed_races(&self) -> &[Race] {
        self.session.completed_races()
    }

    pub fn all_horses(&self) -> &[Horse] {
        self.roster.horses()
    }
}
