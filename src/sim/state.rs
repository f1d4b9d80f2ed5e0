//! Game phases and the race session state machine
//!
//! `RaceSession` owns the program, the round pointer, the completed log and
//! the timing bookkeeping of the running race. All mutation goes through its
//! methods, which check phase guards first and treat invalid requests as
//! no-ops.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::horse::Horse;
use super::race::{
    Race, RaceResult, RaceStatus, calculate_race_results, generate_race_program, simulate_race,
};
use crate::animation::{
    AnimationTick, FrameHandle, FrameScheduler, RaceAnimator, are_all_horses_finished,
};
use crate::consts::PROGRESS_COMPLETE;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// No program yet
    #[default]
    Idle,
    /// Program ready; the current round has not started
    ProgramGenerated,
    /// Current round is animating
    Racing,
    /// Current round is on hold
    Paused,
    /// Every round has been run
    Completed,
}

/// Notifications for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    /// A horse moved (fired once per horse per tick)
    HorsePosition {
        round_index: usize,
        horse_id: u32,
        position: f64,
    },
    /// A race finished (fired once per race)
    RaceCompleted {
        round_index: usize,
        results: Vec<RaceResult>,
    },
}

/// Complete state of one racing session
#[derive(Debug, Clone, Default)]
pub struct RaceSession {
    race_program: Vec<Race>,
    current_round_index: usize,
    phase: GamePhase,
    /// Append-only copies of finished races
    completed_races: Vec<Race>,
    /// Simulated lineup of the running race, fastest first
    simulation: Option<Vec<Horse>>,
    race_start_time: Option<f64>,
    race_paused_time: Option<f64>,
    elapsed_before_pause: f64,
    /// Frame the animation chain is waiting on
    animation_frame: Option<FrameHandle>,
    animator: Option<RaceAnimator>,
    events: Vec<RaceEvent>,
}

impl RaceSession {
    pub fn new() -> Self {
        Self::default()
    }

    // === Queries ===

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn can_generate(&self) -> bool {
        matches!(self.phase, GamePhase::Idle | GamePhase::Completed)
    }

    pub fn can_start(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::ProgramGenerated | GamePhase::Paused | GamePhase::Racing
        )
    }

    pub fn is_racing(&self) -> bool {
        self.phase == GamePhase::Racing
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Race at the round pointer (`None` once the program is exhausted)
    pub fn current_race(&self) -> Option<&Race> {
        self.race_program.get(self.current_round_index)
    }

    pub fn race_program(&self) -> &[Race] {
        &self.race_program
    }

    pub fn current_round_index(&self) -> usize {
        self.current_round_index
    }

    pub fn completed_races(&self) -> &[Race] {
        &self.completed_races
    }

    pub fn simulation(&self) -> Option<&[Horse]> {
        self.simulation.as_deref()
    }

    pub fn race_start_time(&self) -> Option<f64> {
        self.race_start_time
    }

    pub fn race_paused_time(&self) -> Option<f64> {
        self.race_paused_time
    }

    pub fn elapsed_before_pause(&self) -> f64 {
        self.elapsed_before_pause
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.animation_frame
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    // === Commands ===

    /// Build a fresh program from `horses`. Only from Idle or Completed.
    pub fn generate_program<R: Rng + ?Sized>(&mut self, horses: &[Horse], rng: &mut R) -> bool {
        if !self.can_generate() {
            log::debug!("generate ignored in phase {:?}", self.phase);
            return false;
        }

        self.race_program = generate_race_program(horses, rng);
        self.current_round_index = 0;
        self.completed_races.clear();
        self.clear_race_timing();
        self.phase = GamePhase::ProgramGenerated;

        log::info!(
            "Program generated: {} races from {} horses",
            self.race_program.len(),
            horses.len()
        );
        true
    }

    /// Start the current round, or resume it after a pause.
    ///
    /// The first start simulates the race; later starts reuse the simulation so
    /// finish times and progress survive the pause.
    pub fn start_race<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        rng: &mut R,
        scheduler: &mut dyn FrameScheduler,
    ) {
        if !self.can_start() {
            log::debug!("start ignored in phase {:?}", self.phase);
            return;
        }
        let round_index = self.current_round_index;
        let Some(race) = self.race_program.get_mut(round_index) else {
            log::debug!("start ignored: round {} is past the program", round_index);
            return;
        };

        if self.simulation.is_none() {
            let simulated = simulate_race(race, rng);
            log::info!(
                "Round {} ({}m) started, leader on paper: {}",
                race.round_number,
                race.distance,
                simulated.first().map_or("-", |h| h.name.as_str())
            );
            self.simulation = Some(simulated);
            self.race_start_time = Some(now);
            self.race_paused_time = None;
            self.elapsed_before_pause = 0.0;
        } else if let (Some(paused), Some(start)) =
            (self.race_paused_time.take(), self.race_start_time)
        {
            self.elapsed_before_pause += paused - start;
            self.race_start_time = Some(now);
            log::debug!(
                "Round {} resumed after {:.0}ms of racing",
                race.round_number,
                self.elapsed_before_pause
            );
        }

        race.mark_running();
        self.phase = GamePhase::Racing;

        // An animation chain already waiting on a frame keeps running
        if self.animation_frame.is_none() {
            if let (Some(simulation), Some(start)) = (&self.simulation, self.race_start_time) {
                self.animator = Some(RaceAnimator::new(simulation, start, self.elapsed_before_pause));
                self.animation_frame = scheduler.request_frame();
            }
        }
    }

    /// Put the running race on hold and cancel its pending frame
    pub fn pause_race(&mut self, now: f64, scheduler: &mut dyn FrameScheduler) {
        if self.phase == GamePhase::Racing {
            self.phase = GamePhase::Paused;
            self.race_paused_time = Some(now);
            log::debug!("Round {} paused", self.current_round_index + 1);
        }
        self.cancel_animation(scheduler);
    }

    /// Cancel the pending animation frame, if any
    pub fn cancel_animation(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.animation_frame.take() {
            scheduler.cancel_frame(handle);
        }
    }

    /// Set a horse's progress in a round's lineup. Unknown targets are ignored.
    pub fn update_horse_position(&mut self, round_index: usize, horse_id: u32, position: f64) {
        let Some(horse) = self
            .race_program
            .get_mut(round_index)
            .and_then(|race| race.horse_mut(horse_id))
        else {
            return;
        };

        horse.position = position.clamp(0.0, PROGRESS_COMPLETE);
        self.events.push(RaceEvent::HorsePosition {
            round_index,
            horse_id,
            position: horse.position,
        });
    }

    /// Record results for a running round and log a copy of it. Unknown rounds
    /// and rounds that are not running are ignored.
    pub fn complete_race(&mut self, round_index: usize, results: Vec<RaceResult>) {
        let Some(race) = self.race_program.get_mut(round_index) else {
            return;
        };
        if race.status != RaceStatus::Running {
            log::debug!(
                "complete ignored: round {} is {:?}",
                race.round_number,
                race.status
            );
            return;
        }

        race.complete(results.clone());
        self.completed_races.push(race.clone());

        if let Some(winner) = results.first() {
            log::info!(
                "Round {} won by {} in {:.0}ms",
                race.round_number,
                winner.horse_name,
                winner.time
            );
        }
        self.events.push(RaceEvent::RaceCompleted { round_index, results });
    }

    /// Move the round pointer forward, cancel any pending frame and drop the
    /// finished race's timing
    pub fn next_round(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.cancel_animation(scheduler);
        self.current_round_index += 1;
        self.clear_race_timing();

        if self.current_round_index >= self.race_program.len() {
            self.phase = GamePhase::Completed;
            log::info!("Program completed ({} races)", self.completed_races.len());
        } else {
            self.phase = GamePhase::ProgramGenerated;
        }
    }

    /// Back to Idle with an empty program
    pub fn reset(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.cancel_animation(scheduler);
        self.race_program.clear();
        self.current_round_index = 0;
        self.completed_races.clear();
        self.clear_race_timing();
        self.phase = GamePhase::Idle;
        log::info!("Game reset");
    }

    /// Frame callback: advance the animation and settle the race once it resolves.
    ///
    /// Frames other than the pending one are stale (cancelled or superseded) and
    /// are ignored.
    pub fn animation_frame<R: Rng + ?Sized>(
        &mut self,
        handle: FrameHandle,
        now: f64,
        rng: &mut R,
        scheduler: &mut dyn FrameScheduler,
    ) {
        if self.animation_frame != Some(handle) {
            log::trace!("ignoring stale frame {:?}", handle);
            return;
        }
        self.animation_frame = None;

        let Some(animator) = self.animator.take() else {
            return;
        };

        let round_index = self.current_round_index;
        let racing = self.phase == GamePhase::Racing;
        let mut updates = Vec::new();
        let tick = animator.tick(now, || racing, |horse_id, position| {
            updates.push((horse_id, position));
        });

        for (horse_id, position) in updates {
            self.update_horse_position(round_index, horse_id, position);
        }

        match tick {
            AnimationTick::Continue => {
                self.animator = Some(animator);
                self.animation_frame = scheduler.request_frame();
            }
            AnimationTick::Resolved => self.settle_race(now, rng, scheduler),
        }
    }

    /// Complete the current race if everyone crossed the line, then chain into
    /// the next round.
    fn settle_race<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        rng: &mut R,
        scheduler: &mut dyn FrameScheduler,
    ) {
        if self.phase == GamePhase::Paused {
            return;
        }
        let round_index = self.current_round_index;
        let (Some(simulation), Some(race)) = (&self.simulation, self.race_program.get(round_index))
        else {
            return;
        };
        if !are_all_horses_finished(simulation, &race.horses) {
            return;
        }

        let results = calculate_race_results(simulation);
        self.complete_race(round_index, results);
        self.next_round(scheduler);

        if self.phase == GamePhase::ProgramGenerated {
            self.start_race(now, rng, scheduler);
        }
    }

    fn clear_race_timing(&mut self) {
        self.simulation = None;
        self.race_start_time = None;
        self.race_paused_time = None;
        self.elapsed_before_pause = 0.0;
        self.animation_frame = None;
        self.animator = None;
    }
}
